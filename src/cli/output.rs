//! Output formatting for scan outcomes
//!
//! Outcomes render as JSON, YAML or human-readable text. Structured formats
//! carry the outcome kind in an `outcome` field; the human format adds the
//! user-facing conflict message.
//!
//! # Example
//!
//! ```
//! use featurescan::cli::output::{OutputFormat, OutputFormatter};
//! use featurescan::scanner::ScanOutcome;
//!
//! let outcome = ScanOutcome::resolved(["servlet-4.0".to_string()].into());
//! let formatter = OutputFormatter::new(OutputFormat::Json);
//! let output = formatter.format(&outcome).unwrap();
//! assert!(output.contains("servlet-4.0"));
//! ```

use anyhow::{Context, Result};

use crate::config::FeaturescanConfig;
use crate::scanner::{FeatureSet, ScanOutcome};

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

/// Output formatter for scan outcomes
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a scan outcome according to the configured format
    pub fn format(&self, outcome: &ScanOutcome) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(outcome)
                .context("Failed to serialize scan outcome to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(outcome).context("Failed to serialize scan outcome to YAML")
            }
            OutputFormat::Human => Ok(self.format_human(outcome)),
        }
    }

    /// Formats the effective configuration
    pub fn format_config(&self, config: &FeaturescanConfig) -> Result<String> {
        let view = serde_json::json!({
            "scanner": config.scanner_path.as_ref().map(|p| p.display().to_string()),
            "java": config.java.display().to_string(),
            "log_level": config.log_level,
            "log_location": config.log_location,
            "jvm_options": config.jvm_options,
        });

        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&view)
                .context("Failed to serialize configuration to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(&view).context("Failed to serialize configuration to YAML")
            }
            OutputFormat::Human => Ok(config.to_string()),
        }
    }

    fn format_human(&self, outcome: &ScanOutcome) -> String {
        let mut output = String::new();

        match outcome {
            ScanOutcome::Resolved { features } => {
                output.push_str("\u{2713} Generated Features\n");
                output.push_str(RULE);
                output.push_str("\n\n");
                push_feature_tree(&mut output, "Features", Some(features));
            }
            _ => {
                output.push_str("\u{26A0} Feature Conflict\n");
                output.push_str(RULE);
                output.push_str("\n\n");

                let heading = match outcome {
                    ScanOutcome::ModificationRequired(_) => "Features to modify",
                    _ => "Conflicting features",
                };
                push_feature_tree(&mut output, heading, outcome.implicated());
                output.push('\n');
                push_feature_tree(&mut output, "Suggested features", outcome.suggestions());

                if let Some(message) = outcome.user_message() {
                    output.push('\n');
                    output.push_str(&message);
                    output.push('\n');
                }
            }
        }

        output
    }
}

fn push_feature_tree(output: &mut String, heading: &str, features: Option<&FeatureSet>) {
    output.push_str(&format!("{}:\n", heading));
    match features {
        Some(features) if !features.is_empty() => {
            for (i, feature) in features.iter().enumerate() {
                let connector = if i == features.len() - 1 {
                    "\u{2514}"
                } else {
                    "\u{251C}"
                };
                output.push_str(&format!("{}\u{2500} {}\n", connector, feature));
            }
        }
        Some(_) => output.push_str("\u{2514}\u{2500} (none)\n"),
        None => output.push_str("\u{2514}\u{2500} (not available)\n"),
    }
}
