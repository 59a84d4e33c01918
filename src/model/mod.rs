pub mod item;

pub use item::{
    ItemRarity, ItemStats, StatFilter, StatGroup, StatValue, TradeQuery, TradeSearch, TradeStatus,
};
