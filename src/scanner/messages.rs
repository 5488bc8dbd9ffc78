//! User-facing conflict messages

use super::outcome::is_no_suggestion;
use super::types::FeatureSet;

/// Render a set as `[a, b]`, the form the module's host prints sets in.
///
/// The sentinel suggestion already carries its brackets and is printed as-is.
pub fn format_feature_set(set: &FeatureSet) -> String {
    if is_no_suggestion(set) {
        return set.iter().next().cloned().unwrap_or_default();
    }
    let items: Vec<&str> = set.iter().map(String::as_str).collect();
    format!("[{}]", items.join(", "))
}

fn format_optional(set: Option<&FeatureSet>) -> String {
    set.map(format_feature_set).unwrap_or_else(|| "[]".to_string())
}

/// Configured features and the application's API usage conflict.
pub fn app_conflict_message(conflicts: Option<&FeatureSet>, suggestions: &FeatureSet) -> String {
    format!(
        "A working set of features could not be generated due to conflicts between configured \
         features and the application's API usage: {}. Review and update your server \
         configuration and application to ensure they are not using conflicting features and \
         APIs from different levels of MicroProfile, Java EE, or Jakarta EE. Refer to the \
         following set of suggested features for guidance: {}.",
        format_optional(conflicts),
        format_feature_set(suggestions)
    )
}

/// Configured features conflict among themselves.
pub fn configured_conflict_message(
    conflicts: Option<&FeatureSet>,
    suggestions: &FeatureSet,
) -> String {
    format!(
        "A working set of features could not be generated due to conflicts between configured \
         features: {}. Review and update your server configuration to ensure it is not using \
         conflicting features from different levels of MicroProfile, Java EE, or Jakarta EE. \
         Refer to the following set of suggested features for guidance: {}.",
        format_optional(conflicts),
        format_feature_set(suggestions)
    )
}

/// No recommendation could be computed.
pub fn no_recommendation_message(conflicts: Option<&FeatureSet>) -> String {
    format!(
        "A working set of features could not be generated due to conflicts in the \
         application\u{2019}s API usage: {}. Review and update your application to ensure it is \
         not using conflicting APIs from different levels of MicroProfile, Java EE, or Jakarta EE.",
        format_optional(conflicts)
    )
}

pub fn conflict_message(
    existing_features: bool,
    conflicts: Option<&FeatureSet>,
    suggestions: Option<&FeatureSet>,
) -> String {
    match suggestions {
        None => no_recommendation_message(conflicts),
        Some(suggestions) if existing_features => {
            configured_conflict_message(conflicts, suggestions)
        }
        Some(suggestions) => app_conflict_message(conflicts, suggestions),
    }
}

pub fn modification_message(features: Option<&FeatureSet>, suggestions: &FeatureSet) -> String {
    app_conflict_message(features, suggestions)
}
