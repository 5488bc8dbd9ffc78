//! Configuration management for featurescan
//!
//! Settings come from environment variables with sensible defaults, and the
//! command line overrides them.
//!
//! # Environment Variables
//!
//! - `FEATURESCAN_SCANNER`: path to the binary scanner artifact
//! - `FEATURESCAN_JAVA`: Java launcher; default `$JAVA_HOME/bin/java`, then `java`
//! - `FEATURESCAN_LOG_LEVEL`: logging level - default: "info"
//! - `FEATURESCAN_LOG_LOCATION`: directory the scanner writes its own log to
//! - `FEATURESCAN_JVM_OPTIONS`: whitespace-separated options for the scanner JVM
//!
//! # Example
//!
//! ```no_run
//! use featurescan::FeaturescanConfig;
//!
//! let config = FeaturescanConfig::default();
//! config.validate().expect("Invalid configuration");
//! let resolver = config.create_resolver();
//! ```

use crate::scanner::jar::{default_java_launcher, JarScanner};
use crate::scanner::FeatureResolver;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Invalid log level: {0}. Valid options: trace, debug, info, warn, error")]
    InvalidLogLevel(String),
}

#[derive(Debug, Clone)]
pub struct FeaturescanConfig {
    /// Binary scanner artifact
    pub scanner_path: Option<PathBuf>,

    /// Java launcher used to run the scanner
    pub java: PathBuf,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Scanner-side log directory, used only when debug logging is on
    pub log_location: Option<String>,

    /// Extra options passed to the scanner JVM, e.g. `-Xmx512m`
    pub jvm_options: Vec<String>,
}

impl Default for FeaturescanConfig {
    fn default() -> Self {
        let scanner_path = env::var_os("FEATURESCAN_SCANNER").map(PathBuf::from);

        let java = env::var_os("FEATURESCAN_JAVA")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_java_launcher);

        let log_level = env::var("FEATURESCAN_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        let log_location = env::var("FEATURESCAN_LOG_LOCATION")
            .ok()
            .filter(|v| !v.is_empty());

        let jvm_options = env::var("FEATURESCAN_JVM_OPTIONS")
            .map(|v| v.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        Self {
            scanner_path,
            java,
            log_level,
            log_location,
            jvm_options,
        }
    }
}

impl FeaturescanConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.scanner_path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::ValidationFailed(
                    "Scanner path must not be empty".to_string(),
                ));
            }
        }

        if self.java.as_os_str().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Java launcher must not be empty".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => Err(ConfigError::InvalidLogLevel(self.log_level.clone())),
        }
    }

    /// Resolver backed by the scanner artifact through a child JVM
    pub fn create_resolver(&self) -> FeatureResolver {
        let provider = self
            .jvm_options
            .iter()
            .fold(JarScanner::new(self.java.clone()), |scanner, option| {
                scanner.with_jvm_option(option.as_str())
            });
        FeatureResolver::with_provider(Arc::new(provider), self.scanner_path.clone())
    }
}

impl fmt::Display for FeaturescanConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "featurescan Configuration:")?;
        match &self.scanner_path {
            Some(path) => writeln!(f, "  Scanner: {}", path.display())?,
            None => writeln!(f, "  Scanner: (not set)")?,
        }
        writeln!(f, "  Java: {}", self.java.display())?;
        if !self.jvm_options.is_empty() {
            writeln!(f, "  JVM Options: {}", self.jvm_options.join(" "))?;
        }
        if let Some(location) = &self.log_location {
            writeln!(f, "  Log Location: {}", location)?;
        }
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}
