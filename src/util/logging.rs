//! Structured logging setup for featurescan
//!
//! Logging goes through the `tracing` ecosystem and is written to stderr, so
//! stdout stays free for generated feature lists.
//!
//! # Example
//!
//! ```no_run
//! use featurescan::util::logging;
//! use tracing::{debug, info};
//!
//! logging::init_from_env();
//!
//! info!("Generating features");
//! debug!(scanner = "binary-app-scanner.jar", "Binding scanner");
//! ```
//!
//! Debug output matters beyond this crate: when the `featurescan` target is at
//! DEBUG, the resolver also asks the scanner to write its own diagnostic log.

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Minimum level for the `featurescan` target
    pub level: Level,

    /// One JSON object per event, with source locations and thread names
    pub use_json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
        }
    }
}

impl LoggingConfig {
    /// Reads `FEATURESCAN_LOG_LEVEL` and `FEATURESCAN_LOG_JSON`.
    pub fn from_env() -> Self {
        let level = env::var("FEATURESCAN_LOG_LEVEL")
            .map(|v| parse_level(&v))
            .unwrap_or(Level::INFO);

        let use_json = env::var("FEATURESCAN_LOG_JSON")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        Self { level, use_json }
    }
}

/// Parses a log level, defaulting to INFO for anything unrecognised.
///
/// ```
/// use featurescan::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("debug"), Level::DEBUG);
/// assert_eq!(parse_level("INFO"), Level::INFO);
/// assert_eq!(parse_level("invalid"), Level::INFO);
/// ```
pub fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

fn build_filter(level: Level) -> EnvFilter {
    if env::var("RUST_LOG").is_ok() {
        return EnvFilter::from_default_env();
    }

    EnvFilter::new(format!("warn,featurescan={}", level))
}

/// Initializes the logging system. Only the first call has any effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = build_filter(config.level);

        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_file(true)
                        .with_line_number(true)
                        .with_thread_names(true),
                )
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    });
}

/// Initializes logging from the environment alone.
pub fn init_from_env() {
    init_logging(LoggingConfig::from_env());
}
