use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Item quality tier as printed on the item header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemRarity {
    Unique,
    Rare,
    Magic,
    Normal,
}

impl ItemRarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemRarity::Unique => "Unique",
            ItemRarity::Rare => "Rare",
            ItemRarity::Magic => "Magic",
            ItemRarity::Normal => "Normal",
        }
    }
}

impl fmt::Display for ItemRarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Missing and `null` both decode to the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A present key is kept even when it holds `null`, so it serializes back.
fn keep_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// An item as read off a screenshot by the model.
///
/// Field names follow the JSON the model is asked to return (`baseType`,
/// `explicitMods`, `tradeQuery`). Fields the model may leave out or send as
/// `null`, such as `name` on a rare item or an undetected `league`, default
/// to empty. Only `rarity` and `tradeQuery.query.status.option` are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStats {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub rarity: ItemRarity,
    #[serde(default, deserialize_with = "null_as_default")]
    pub base_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub league: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub explicit_mods: Vec<String>,
    pub trade_query: TradeQuery,
}

impl ItemStats {
    pub fn is_unique(&self) -> bool {
        self.rarity == ItemRarity::Unique
    }

    /// The league the item was seen in, if the model found one.
    pub fn league(&self) -> Option<&str> {
        Some(self.league.as_str()).filter(|l| !l.is_empty())
    }
}

/// A trade-site search body.
///
/// Only the parts the model is asked to fill are typed. Everything else
/// (e.g. a `sort` object, or `query.filters` added by the caller) is kept in
/// `extra` at every level and serialized back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeQuery {
    pub query: TradeSearch,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSearch {
    pub status: TradeStatus,
    /// Unique item name; omitted for rare and magic items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Base type
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stats: Vec<StatGroup>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TradeSearch {
    /// Insert or replace a key of the search object, e.g. `filters`.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.extra.insert(key.into(), value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeStatus {
    /// Seller availability, e.g. `online`
    pub option: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A group of stat filters combined by `type` (`and`, `not`, `count`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatGroup {
    #[serde(rename = "type")]
    pub group_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub filters: Vec<StatFilter>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One stat filter. Keys other than `id` and `value` (`disabled`,
/// `option`, ...) live in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatFilter {
    /// Modifier text with the numbers removed, e.g. `to maximum life`
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<StatValue>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Bounds of a stat filter, kept exactly as the model wrote them: `50`
/// stays an integer, `"10"` stays a string.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatValue {
    #[serde(
        default,
        deserialize_with = "keep_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub min: Option<Value>,
    #[serde(
        default,
        deserialize_with = "keep_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub max: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StatValue {
    /// `min` as a number, accepting numeric strings.
    pub fn min_f64(&self) -> Option<f64> {
        self.min.as_ref().and_then(number_like)
    }

    /// `max` as a number, accepting numeric strings.
    pub fn max_f64(&self) -> Option<f64> {
        self.max.as_ref().and_then(number_like)
    }
}

fn number_like(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
