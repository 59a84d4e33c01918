//! Logging setup for itemlens
//!
//! The library itself only emits `tracing` events. Applications that don't
//! install their own subscriber can use the helpers here.

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable that overrides the level passed to [`init_logging`].
pub const LOG_ENV_VAR: &str = "ITEMLENS_LOG";

/// Log levels supported by itemlens.
///
/// These map to the tracing level hierarchy: ERROR, WARN, INFO, DEBUG, TRACE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Failed analyses only
    Error,
    /// Failures plus blocked or truncated model replies
    Warn,
    /// Adds one line per analysis and client construction
    Info,
    /// Adds request URLs, part counts and reply sizes
    Debug,
    /// Adds raw model reply text
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }

    /// Filter directive limiting output to this crate at this level.
    pub fn directive(self) -> String {
        format!("itemlens={}", self.to_tracing_level())
    }
}

/// Initialize logging with a specific level.
///
/// Call once at application start.
///
/// ```no_run
/// use itemlens::logging::{init_logging, LogLevel};
///
/// init_logging(LogLevel::Info);
/// tracing::info!("Application starting");
/// ```
///
/// Setting `ITEMLENS_LOG` (e.g. `ITEMLENS_LOG=debug`) takes precedence over
/// `level`.
pub fn init_logging(level: LogLevel) {
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(level.directive()));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(env_filter)
        .init();

    tracing::info!("itemlens logging initialized at level: {:?}", level);
}

/// Initialize logging with a custom filter string.
///
/// ```no_run
/// use itemlens::logging::init_logging_with_filter;
///
/// init_logging_with_filter("itemlens=debug,itemlens::backend=trace");
/// ```
pub fn init_logging_with_filter(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| {
        eprintln!("Invalid filter string: {}, using default (info)", filter);
        EnvFilter::new(LogLevel::Info.directive())
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(env_filter)
        .init();

    tracing::info!("itemlens logging initialized with custom filter: {}", filter);
}
