//! Call contract types shared by the resolver and the providers

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::env;
use std::fmt;

/// Set of feature identifiers, e.g. `servlet-4.0` or `mpHealth-3.0`
pub type FeatureSet = BTreeSet<String>;

/// Log level handed to the module when diagnostics are enabled
pub const DIAGNOSTIC_LOG_LEVEL: &str = "*=FINE";

/// What a scan target's paths point at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    ClassFiles,
    ClassDirectories,
}

/// The inputs submitted to the module for analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTarget {
    kind: TargetKind,
    paths: BTreeSet<String>,
}

impl ScanTarget {
    pub fn class_files<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: TargetKind::ClassFiles,
            paths: files.into_iter().map(Into::into).collect(),
        }
    }

    pub fn class_directories<I, S>(directories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: TargetKind::ClassDirectories,
            paths: directories.into_iter().map(Into::into).collect(),
        }
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    pub fn paths(&self) -> &BTreeSet<String> {
        &self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }
}

/// Target platform levels the generated features must be valid for
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformSpec {
    /// Java EE / Jakarta EE tag, e.g. `ee8`
    pub target_java_ee: Option<String>,
    /// MicroProfile tag, e.g. `mp4.1`
    pub target_microprofile: Option<String>,
}

impl PlatformSpec {
    pub fn new(target_java_ee: Option<String>, target_microprofile: Option<String>) -> Self {
        Self {
            target_java_ee,
            target_microprofile,
        }
    }
}

/// Module-side logging, either fully on or fully off
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    pub level: Option<String>,
    pub location: Option<String>,
}

impl LogConfig {
    /// The location is dropped whenever diagnostics are off.
    pub fn derive(diagnostics: bool, location: Option<&str>) -> Self {
        if diagnostics {
            Self {
                level: Some(DIAGNOSTIC_LOG_LEVEL.to_string()),
                location: location.map(str::to_string),
            }
        } else {
            Self::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.level.is_some()
    }
}

/// Locale in the host's `language_COUNTRY` form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Process default locale from `LC_ALL`, `LC_MESSAGES` then `LANG`.
    pub fn system_default() -> Self {
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|key| env::var(key).ok())
            .find_map(|value| Self::parse_posix(&value))
            .unwrap_or_else(|| Self::new("en_US"))
    }

    /// Parses `de_DE.UTF-8@euro` style values; `C` and `POSIX` carry no locale.
    pub fn parse_posix(value: &str) -> Option<Self> {
        let tag = value
            .split(['.', '@'])
            .next()
            .unwrap_or_default()
            .trim()
            .replace('-', "_");

        if tag.is_empty() || tag == "C" || tag == "POSIX" {
            return None;
        }

        Some(Self(tag))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The seven arguments of the entry point, in call order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanArguments {
    pub binary_inputs: BTreeSet<String>,
    #[serde(rename = "targetJavaEE")]
    pub target_java_ee: Option<String>,
    pub target_micro_profile: Option<String>,
    pub current_features: FeatureSet,
    pub log_location: Option<String>,
    pub log_level: Option<String>,
    pub locale: Locale,
}

impl ScanArguments {
    pub fn new(
        target: &ScanTarget,
        platform: &PlatformSpec,
        current_features: FeatureSet,
        log: LogConfig,
        locale: Locale,
    ) -> Self {
        Self {
            binary_inputs: target.paths().clone(),
            target_java_ee: platform.target_java_ee.clone(),
            target_micro_profile: platform.target_microprofile.clone(),
            current_features,
            log_location: log.location,
            log_level: log.level,
            locale,
        }
    }
}

impl fmt::Display for ScanArguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  binaryInputs: {:?}", self.binary_inputs)?;
        writeln!(f, "  targetJavaEE: {:?}", self.target_java_ee)?;
        writeln!(f, "  targetMicroP: {:?}", self.target_micro_profile)?;
        writeln!(f, "  currentFeatures: {:?}", self.current_features)?;
        writeln!(f, "  logLocation: {:?}", self.log_location)?;
        writeln!(f, "  logLevel: {:?}", self.log_level)?;
        write!(f, "  locale: {}", self.locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_off_drops_location() {
        let log = LogConfig::derive(false, Some("/tmp/scanner-logs"));
        assert!(!log.is_enabled());
        assert!(log.location.is_none());
    }

    #[test]
    fn test_log_config_on_keeps_location() {
        let log = LogConfig::derive(true, Some("/tmp/scanner-logs"));
        assert_eq!(log.level.as_deref(), Some(DIAGNOSTIC_LOG_LEVEL));
        assert_eq!(log.location.as_deref(), Some("/tmp/scanner-logs"));
    }

    #[test]
    fn test_locale_parse_posix() {
        assert_eq!(Locale::parse_posix("de_DE.UTF-8"), Some(Locale::new("de_DE")));
        assert_eq!(Locale::parse_posix("fr_FR@euro"), Some(Locale::new("fr_FR")));
        assert_eq!(Locale::parse_posix("en-GB"), Some(Locale::new("en_GB")));
        assert_eq!(Locale::parse_posix("C"), None);
        assert_eq!(Locale::parse_posix("POSIX"), None);
        assert_eq!(Locale::parse_posix(""), None);
    }

    #[test]
    fn test_scan_arguments_serialize_in_contract_names() {
        let args = ScanArguments::new(
            &ScanTarget::class_directories(["target/classes"]),
            &PlatformSpec::new(Some("ee8".into()), None),
            FeatureSet::new(),
            LogConfig::default(),
            Locale::new("en_US"),
        );

        let json = serde_json::to_value(&args).unwrap();
        assert_eq!(json["binaryInputs"][0], "target/classes");
        assert_eq!(json["targetJavaEE"], "ee8");
        assert_eq!(json["targetMicroProfile"], serde_json::Value::Null);
        assert_eq!(json["locale"], "en_US");
    }
}
