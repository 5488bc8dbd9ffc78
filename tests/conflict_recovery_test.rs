//! Conflict classification and recovery against a scripted scanner
//!
//! Every test binds a `StubScanner` to a real temporary artifact path and
//! scripts the replies of the first call and of the recovery call.

use featurescan::scanner::outcome::no_suggestion_set;
use featurescan::scanner::types::DIAGNOSTIC_LOG_LEVEL;
use featurescan::scanner::{
    ConditionKind, Conflict, FeatureResolver, FeatureSet, Locale, Modification, PlatformSpec,
    RaisedCondition, ResolveRequest, ScanOutcome, StubResponse, StubScanner,
};
use std::sync::Arc;
use tempfile::NamedTempFile;
use yare::parameterized;

fn set(items: &[&str]) -> FeatureSet {
    items.iter().map(|s| s.to_string()).collect()
}

struct Harness {
    stub: Arc<StubScanner>,
    resolver: FeatureResolver,
    _artifact: NamedTempFile,
}

fn harness() -> Harness {
    let artifact = NamedTempFile::new().expect("Failed to create artifact");
    let stub = Arc::new(StubScanner::new());
    let resolver = FeatureResolver::with_provider(stub.clone(), Some(artifact.path().to_path_buf()))
        .with_diagnostics(false)
        .with_locale(Locale::new("en_US"));

    Harness {
        stub,
        resolver,
        _artifact: artifact,
    }
}

fn conflicting_request() -> ResolveRequest {
    ResolveRequest::new()
        .with_current_features(["cdi-1.2", "servlet-4.0"])
        .with_class_files(["target/classes/com/demo/Api.class"])
        .with_class_directories(["target/classes", "target/generated-classes"])
}

#[test]
fn test_resolved_scan_returns_features() {
    let h = harness();
    h.stub
        .add_response(StubResponse::features(["jaxrs-2.1", "servlet-4.0"]));

    let outcome = h.resolver.resolve_features(&conflicting_request()).unwrap();

    assert_eq!(outcome, ScanOutcome::resolved(set(&["jaxrs-2.1", "servlet-4.0"])));
    assert_eq!(h.stub.calls().len(), 1);
    assert_eq!(h.stub.remaining_responses(), 0);
}

#[test]
fn test_provided_conflict_with_successful_recovery() {
    let h = harness();
    h.stub.add_responses([
        StubResponse::conflict(ConditionKind::ProvidedFeatureConflict, ["A", "B"]),
        StubResponse::features(["C", "D"]),
    ]);

    let outcome = h.resolver.resolve_features(&conflicting_request()).unwrap();

    assert_eq!(
        outcome,
        ScanOutcome::ProvidedConflict(Conflict {
            conflicts: Some(set(&["A", "B"])),
            suggestions: Some(set(&["C", "D"])),
        })
    );
    assert!(outcome.is_existing_features_conflict());
}

#[test]
fn test_recovery_rescans_directories_without_current_features() {
    let h = harness();
    h.stub.add_responses([
        StubResponse::conflict(ConditionKind::FeatureConflict, ["cdi-1.2", "cdi-2.0"]),
        StubResponse::features(["cdi-2.0"]),
    ]);

    h.resolver.resolve_features(&conflicting_request()).unwrap();

    let calls = h.stub.calls();
    assert_eq!(calls.len(), 2);

    assert_eq!(calls[0].binary_inputs, set(&["target/classes/com/demo/Api.class"]));
    assert_eq!(calls[0].current_features, set(&["cdi-1.2", "servlet-4.0"]));

    assert_eq!(
        calls[1].binary_inputs,
        set(&["target/classes", "target/generated-classes"])
    );
    assert!(calls[1].current_features.is_empty());
}

#[test]
fn test_modification_with_conflicting_recovery_yields_sentinel() {
    let h = harness();
    h.stub.add_responses([
        StubResponse::conflict(ConditionKind::RequiredFeatureModified, ["X"]),
        StubResponse::conflict(ConditionKind::FeatureConflict, ["Y", "Z"]),
    ]);

    let outcome = h.resolver.resolve_features(&conflicting_request()).unwrap();

    assert_eq!(
        outcome,
        ScanOutcome::ModificationRequired(Modification {
            features: Some(set(&["X"])),
            suggestions: set(&["[None available]"]),
        })
    );
}

#[test]
fn test_provided_conflict_during_recovery_yields_no_suggestion() {
    let h = harness();
    h.stub.add_responses([
        StubResponse::conflict(ConditionKind::ProvidedFeatureConflict, ["A", "B"]),
        StubResponse::conflict(ConditionKind::ProvidedFeatureConflict, ["A"]),
    ]);

    let outcome = h.resolver.resolve_features(&conflicting_request()).unwrap();

    assert_eq!(
        outcome,
        ScanOutcome::ProvidedConflict(Conflict {
            conflicts: Some(set(&["A", "B"])),
            suggestions: None,
        })
    );
    assert!(outcome
        .user_message()
        .unwrap()
        .contains("conflicts in the application"));
}

#[test]
fn test_modification_never_lacks_a_suggestion() {
    let h = harness();
    h.stub.add_responses([
        StubResponse::conflict(ConditionKind::RequiredFeatureModified, ["X"]),
        StubResponse::conflict(ConditionKind::ProvidedFeatureConflict, ["X"]),
    ]);

    let outcome = h.resolver.resolve_features(&conflicting_request()).unwrap();

    assert_eq!(outcome.suggestions(), Some(&no_suggestion_set()));
}

#[test]
fn test_modification_with_empty_recovery_yields_sentinel() {
    let h = harness();
    h.stub.add_responses([
        StubResponse::conflict(ConditionKind::RequiredFeatureModified, ["X"]),
        StubResponse::features(Vec::<String>::new()),
    ]);

    let outcome = h.resolver.resolve_features(&conflicting_request()).unwrap();

    assert_eq!(
        outcome,
        ScanOutcome::ModificationRequired(Modification {
            features: Some(set(&["X"])),
            suggestions: no_suggestion_set(),
        })
    );
    assert!(outcome.user_message().unwrap().contains("[None available]"));
}

#[parameterized(
    provided = { ConditionKind::ProvidedFeatureConflict },
    computed = { ConditionKind::FeatureConflict },
)]
fn test_conflict_with_empty_recovery_has_no_suggestion(kind: ConditionKind) {
    let h = harness();
    h.stub.add_responses([
        StubResponse::conflict(kind, ["A", "B"]),
        StubResponse::features(Vec::<String>::new()),
    ]);

    let outcome = h.resolver.resolve_features(&conflicting_request()).unwrap();

    assert_eq!(outcome.implicated(), Some(&set(&["A", "B"])));
    assert_eq!(outcome.suggestions(), None);
    assert!(outcome
        .user_message()
        .unwrap()
        .contains("conflicts in the application\u{2019}s API usage: [A, B]"));
}

#[test]
fn test_computed_conflict_with_provided_conflict_during_recovery() {
    let h = harness();
    h.stub.add_responses([
        StubResponse::conflict(ConditionKind::FeatureConflict, ["cdi-1.2", "cdi-2.0"]),
        StubResponse::conflict(ConditionKind::ProvidedFeatureConflict, ["cdi-2.0"]),
    ]);

    let outcome = h.resolver.resolve_features(&conflicting_request()).unwrap();

    assert_eq!(
        outcome,
        ScanOutcome::ComputedConflict(Conflict {
            conflicts: Some(set(&["cdi-1.2", "cdi-2.0"])),
            suggestions: None,
        })
    );
    let message = outcome.user_message().unwrap();
    assert!(message.contains("conflicts in the application\u{2019}s API usage: [cdi-1.2, cdi-2.0]"));
    assert!(!message.contains("suggested features"));
    assert_eq!(h.stub.calls().len(), 2);
}

#[parameterized(
    provided = { ConditionKind::ProvidedFeatureConflict },
    computed = { ConditionKind::FeatureConflict },
    modified = { ConditionKind::RequiredFeatureModified },
)]
fn test_each_condition_maps_to_its_outcome(kind: ConditionKind) {
    let h = harness();
    h.stub.add_responses([
        StubResponse::conflict(kind, ["A"]),
        StubResponse::features(["C"]),
    ]);

    let outcome = h.resolver.resolve_features(&conflicting_request()).unwrap();

    let matches_kind = match kind {
        ConditionKind::ProvidedFeatureConflict => {
            matches!(outcome, ScanOutcome::ProvidedConflict(_))
        }
        ConditionKind::FeatureConflict => matches!(outcome, ScanOutcome::ComputedConflict(_)),
        ConditionKind::RequiredFeatureModified => {
            matches!(outcome, ScanOutcome::ModificationRequired(_))
        }
    };
    assert!(matches_kind, "unexpected outcome {:?} for {:?}", outcome, kind);
    assert_eq!(outcome.implicated(), Some(&set(&["A"])));
    assert_eq!(outcome.suggestions(), Some(&set(&["C"])));
}

#[parameterized(
    computed = { ConditionKind::FeatureConflict },
    modified = { ConditionKind::RequiredFeatureModified },
)]
fn test_recovery_conflicts_become_sentinel(recovery_kind: ConditionKind) {
    let h = harness();
    h.stub.add_responses([
        StubResponse::conflict(ConditionKind::FeatureConflict, ["A"]),
        StubResponse::conflict(recovery_kind, ["B"]),
    ]);

    let outcome = h.resolver.resolve_features(&conflicting_request()).unwrap();

    assert_eq!(outcome.suggestions(), Some(&no_suggestion_set()));
}

#[test]
fn test_unreadable_implicated_features_still_produce_outcome() {
    let h = harness();
    h.stub.add_responses([
        StubResponse::raise(RaisedCondition::new(
            ConditionKind::FeatureConflict.class_name(),
        )),
        StubResponse::features(["C"]),
    ]);

    let outcome = h.resolver.resolve_features(&conflicting_request()).unwrap();

    assert_eq!(
        outcome,
        ScanOutcome::ComputedConflict(Conflict {
            conflicts: None,
            suggestions: Some(set(&["C"])),
        })
    );
}

#[test]
fn test_unrecognized_condition_is_an_error() {
    let h = harness();
    h.stub.add_responses([
        StubResponse::raise(
            RaisedCondition::new("java.lang.IllegalStateException").with_message("bad class file"),
        ),
        StubResponse::features(["never-used"]),
    ]);

    let err = h
        .resolver
        .resolve_features(&conflicting_request())
        .unwrap_err();

    assert!(err
        .message()
        .starts_with("Error scanning the application for Liberty features"));
    assert!(err.message().contains("bad class file"));
    assert!(!err.is_binding_failure());
    // No recovery attempt after an undocumented condition.
    assert_eq!(h.stub.calls().len(), 1);
    assert_eq!(h.stub.remaining_responses(), 1);
}

#[test]
fn test_unrecognized_condition_during_recovery_is_an_error() {
    let h = harness();
    h.stub.add_responses([
        StubResponse::conflict(ConditionKind::FeatureConflict, ["A"]),
        StubResponse::raise(RaisedCondition::new("java.io.IOException").with_message("disk")),
    ]);

    let err = h
        .resolver
        .resolve_features(&conflicting_request())
        .unwrap_err();

    assert!(err
        .message()
        .starts_with("Error scanning the application for Liberty feature recommendations"));
}

#[test]
fn test_access_failure_is_an_error() {
    let h = harness();
    h.stub
        .add_response(StubResponse::access_failure("scanner crashed"));

    let err = h
        .resolver
        .resolve_features(&conflicting_request())
        .unwrap_err();

    assert!(err.message().contains("scanner crashed"));
}

#[test]
fn test_recovery_is_never_repeated() {
    let h = harness();
    h.stub.add_responses([
        StubResponse::conflict(ConditionKind::FeatureConflict, ["A"]),
        StubResponse::conflict(ConditionKind::FeatureConflict, ["A"]),
        StubResponse::features(["unused"]),
    ]);

    h.resolver.resolve_features(&conflicting_request()).unwrap();

    assert_eq!(h.stub.calls().len(), 2);
    assert_eq!(h.stub.remaining_responses(), 1);
}

#[test]
fn test_optimized_scan_submits_directories() {
    let h = harness();
    h.stub.add_response(StubResponse::features(["servlet-4.0"]));

    h.resolver
        .resolve_features(&conflicting_request().optimized(true))
        .unwrap();

    assert_eq!(
        h.stub.calls()[0].binary_inputs,
        set(&["target/classes", "target/generated-classes"])
    );
}

#[test]
fn test_platform_and_locale_are_passed_through() {
    let h = harness();
    h.stub.add_response(StubResponse::features(["mpHealth-3.1"]));

    let request = conflicting_request().with_platform(PlatformSpec::new(
        Some("ee8".to_string()),
        Some("mp4.1".to_string()),
    ));
    h.resolver.resolve_features(&request).unwrap();

    let call = &h.stub.calls()[0];
    assert_eq!(call.target_java_ee.as_deref(), Some("ee8"));
    assert_eq!(call.target_micro_profile.as_deref(), Some("mp4.1"));
    assert_eq!(call.locale.as_str(), "en_US");
}

#[test]
fn test_diagnostics_control_module_logging() {
    let h = harness();
    h.stub.add_response(StubResponse::features(["servlet-4.0"]));
    h.resolver
        .resolve_features(&conflicting_request().with_log_location("target/scanner-logs"))
        .unwrap();

    let quiet_call = &h.stub.calls()[0];
    assert!(quiet_call.log_level.is_none());
    assert!(quiet_call.log_location.is_none());

    let artifact = NamedTempFile::new().unwrap();
    let stub = Arc::new(StubScanner::new());
    let resolver = FeatureResolver::with_provider(stub.clone(), Some(artifact.path().to_path_buf()))
        .with_diagnostics(true);
    stub.add_response(StubResponse::features(["servlet-4.0"]));
    resolver
        .resolve_features(&conflicting_request().with_log_location("target/scanner-logs"))
        .unwrap();

    let verbose_call = &stub.calls()[0];
    assert_eq!(verbose_call.log_level.as_deref(), Some(DIAGNOSTIC_LOG_LEVEL));
    assert_eq!(verbose_call.log_location.as_deref(), Some("target/scanner-logs"));
}

#[test]
fn test_target_kind_never_mixes() {
    let h = harness();
    h.stub.add_responses([
        StubResponse::conflict(ConditionKind::FeatureConflict, ["A"]),
        StubResponse::features(["B"]),
    ]);

    h.resolver.resolve_features(&conflicting_request()).unwrap();

    // First call carries files only, recovery carries directories only.
    let calls = h.stub.calls();
    assert!(calls[0].binary_inputs.iter().all(|p| p.ends_with(".class")));
    assert!(calls[1].binary_inputs.iter().all(|p| !p.ends_with(".class")));
}
