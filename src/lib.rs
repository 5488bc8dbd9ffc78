//! featurescan - Liberty feature generation through the binary scanner
//!
//! This library drives an external binary scanner over compiled application
//! classes and turns its answers into the set of Liberty features the
//! application needs. Conflicts reported by the scanner are not errors: a
//! recovery pass rescans every class directory and the caller receives a
//! suggested feature set alongside the conflict.
//!
//! # Core Concepts
//!
//! - **Analysis provider**: something that can open the scanner artifact and
//!   call into it ([`scanner::JarScanner`], [`scanner::StubScanner`])
//! - **Binding**: the lazily resolved, cached entry point of the scanner
//! - **Outcome**: a resolved feature list or one of three conflict kinds, each
//!   with a suggestion from recovery
//!
//! # Example Usage
//!
//! ```no_run
//! use featurescan::{FeaturescanConfig, ResolveRequest, ScanOutcome};
//!
//! let resolver = FeaturescanConfig::default().create_resolver();
//! let request = ResolveRequest::new()
//!     .with_class_directories(["target/classes"])
//!     .optimized(true);
//!
//! match resolver.resolve_features(&request) {
//!     Ok(ScanOutcome::Resolved { features }) => println!("{:?}", features),
//!     Ok(conflict) => println!("{}", conflict.user_message().unwrap_or_default()),
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`scanner`]: binding, invocation and conflict recovery
//! - [`config`]: environment-driven configuration
//! - [`cli`]: command line arguments and output formatting

pub mod cli;
pub mod config;
pub mod scanner;
pub mod util;

pub use config::{ConfigError, FeaturescanConfig};
pub use scanner::{
    AnalysisProvider, BindingError, Conflict, FeatureResolver, FeatureSet, InvocationError,
    JarScanner, Modification, ModuleBinder, PlatformSpec, ResolveRequest, ScanOutcome,
    StubResponse, StubScanner, NO_SUGGESTION,
};
pub use util::{init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_featurescan() {
        assert_eq!(NAME, "featurescan");
    }
}
