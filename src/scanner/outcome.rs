//! Outcomes of a feature resolution

use super::messages;
use super::types::FeatureSet;
use serde::Serialize;

/// Placeholder suggestion meaning no working feature set could be computed.
/// Callers compare against this string, so it must not change.
pub const NO_SUGGESTION: &str = "[None available]";

/// The single-element sentinel suggestion set
pub fn no_suggestion_set() -> FeatureSet {
    FeatureSet::from([NO_SUGGESTION.to_string()])
}

pub fn is_no_suggestion(set: &FeatureSet) -> bool {
    set.len() == 1 && set.contains(NO_SUGGESTION)
}

/// Conflicting features plus the suggestion recovery produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    /// Features named by the module, if they could be read
    pub conflicts: Option<FeatureSet>,
    /// `None` when no recommendation exists
    pub suggestions: Option<FeatureSet>,
}

impl Conflict {
    pub fn has_recommendation(&self) -> bool {
        self.suggestions.is_some()
    }
}

/// Features the module wants changed, with a never-empty suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Modification {
    pub features: Option<FeatureSet>,
    pub suggestions: FeatureSet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScanOutcome {
    Resolved { features: FeatureSet },
    ProvidedConflict(Conflict),
    ComputedConflict(Conflict),
    ModificationRequired(Modification),
}

impl ScanOutcome {
    pub fn resolved(features: FeatureSet) -> Self {
        ScanOutcome::Resolved { features }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, ScanOutcome::Resolved { .. })
    }

    pub fn features(&self) -> Option<&FeatureSet> {
        match self {
            ScanOutcome::Resolved { features } => Some(features),
            _ => None,
        }
    }

    /// True when the conflict lies in the configured features rather than in
    /// the scanned code.
    pub fn is_existing_features_conflict(&self) -> bool {
        matches!(self, ScanOutcome::ProvidedConflict(_))
    }

    /// Conflicting or to-be-modified features
    pub fn implicated(&self) -> Option<&FeatureSet> {
        match self {
            ScanOutcome::Resolved { .. } => None,
            ScanOutcome::ProvidedConflict(c) | ScanOutcome::ComputedConflict(c) => {
                c.conflicts.as_ref()
            }
            ScanOutcome::ModificationRequired(m) => m.features.as_ref(),
        }
    }

    pub fn suggestions(&self) -> Option<&FeatureSet> {
        match self {
            ScanOutcome::Resolved { .. } => None,
            ScanOutcome::ProvidedConflict(c) | ScanOutcome::ComputedConflict(c) => {
                c.suggestions.as_ref()
            }
            ScanOutcome::ModificationRequired(m) => Some(&m.suggestions),
        }
    }

    /// Message for the build tool user; `None` for a resolved scan.
    pub fn user_message(&self) -> Option<String> {
        match self {
            ScanOutcome::Resolved { .. } => None,
            ScanOutcome::ProvidedConflict(c) => Some(messages::conflict_message(
                true,
                c.conflicts.as_ref(),
                c.suggestions.as_ref(),
            )),
            ScanOutcome::ComputedConflict(c) => Some(messages::conflict_message(
                false,
                c.conflicts.as_ref(),
                c.suggestions.as_ref(),
            )),
            ScanOutcome::ModificationRequired(m) => Some(messages::modification_message(
                m.features.as_ref(),
                &m.suggestions,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> FeatureSet {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sentinel_is_exact() {
        let sentinel = no_suggestion_set();
        assert_eq!(sentinel.len(), 1);
        assert_eq!(sentinel.iter().next().unwrap(), "[None available]");
        assert!(is_no_suggestion(&sentinel));
        assert!(!is_no_suggestion(&set(&["[None available]", "cdi-2.0"])));
    }

    #[test]
    fn test_existing_features_flag() {
        let conflict = Conflict {
            conflicts: Some(set(&["cdi-1.2", "cdi-2.0"])),
            suggestions: None,
        };
        assert!(ScanOutcome::ProvidedConflict(conflict.clone()).is_existing_features_conflict());
        assert!(!ScanOutcome::ComputedConflict(conflict).is_existing_features_conflict());
    }

    #[test]
    fn test_accessors() {
        let outcome = ScanOutcome::ModificationRequired(Modification {
            features: Some(set(&["jaxrs-2.0"])),
            suggestions: set(&["jaxrs-2.1"]),
        });
        assert_eq!(outcome.implicated(), Some(&set(&["jaxrs-2.0"])));
        assert_eq!(outcome.suggestions(), Some(&set(&["jaxrs-2.1"])));
        assert!(outcome.features().is_none());
        assert!(outcome.user_message().is_some());

        let resolved = ScanOutcome::resolved(set(&["servlet-4.0"]));
        assert!(resolved.is_resolved());
        assert!(resolved.user_message().is_none());
    }

    #[test]
    fn test_serialize_tagged() {
        let json = serde_json::to_value(ScanOutcome::resolved(set(&["servlet-4.0"]))).unwrap();
        assert_eq!(json["outcome"], "resolved");
        assert_eq!(json["features"][0], "servlet-4.0");

        let json = serde_json::to_value(ScanOutcome::ComputedConflict(Conflict {
            conflicts: Some(set(&["a"])),
            suggestions: None,
        }))
        .unwrap();
        assert_eq!(json["outcome"], "computed_conflict");
        assert_eq!(json["suggestions"], serde_json::Value::Null);
    }
}
