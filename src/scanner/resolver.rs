//! Feature resolution and conflict recovery
//!
//! A resolution is one call to the module's entry point. When the module
//! throws one of its three conflict conditions the resolver calls it a second
//! time over every class directory with no configured features, and reports
//! the result of that second call as a suggestion. The second call never
//! triggers a third.

use super::binder::{Binding, ModuleBinder};
use super::error::InvocationError;
use super::inputs::assemble_target;
use super::outcome::{no_suggestion_set, Conflict, Modification, ScanOutcome};
use super::provider::{AnalysisProvider, ConditionKind, ModuleFault, RaisedCondition};
use super::types::{FeatureSet, Locale, LogConfig, PlatformSpec, ScanArguments, ScanTarget};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// Everything a caller supplies for one resolution
#[derive(Debug, Clone, Default)]
pub struct ResolveRequest {
    /// Features already present in the server configuration
    pub current_features: FeatureSet,
    /// Class files to scan when not optimizing; a subset of the directories
    pub class_files: Option<Vec<String>>,
    /// Directories holding all of the application's classes
    pub class_directories: Option<BTreeSet<String>>,
    /// Where the module writes its own log, when diagnostics are on
    pub log_location: Option<String>,
    pub platform: PlatformSpec,
    /// Scan every class directory instead of the listed files
    pub optimize: bool,
}

impl ResolveRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_current_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.current_features = features.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_class_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.class_files = Some(files.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_class_directories<I, S>(mut self, directories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.class_directories = Some(directories.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_log_location(mut self, location: impl Into<String>) -> Self {
        self.log_location = Some(location.into());
        self
    }

    pub fn with_platform(mut self, platform: PlatformSpec) -> Self {
        self.platform = platform;
        self
    }

    pub fn optimized(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }
}

/// Drives the analysis module and turns its conditions into outcomes
pub struct FeatureResolver {
    binder: ModuleBinder,
    diagnostics: bool,
    locale: Locale,
}

impl FeatureResolver {
    pub fn new(binder: ModuleBinder) -> Self {
        Self {
            binder,
            diagnostics: tracing::enabled!(tracing::Level::DEBUG),
            locale: Locale::system_default(),
        }
    }

    pub fn with_provider(provider: Arc<dyn AnalysisProvider>, module_path: Option<PathBuf>) -> Self {
        Self::new(ModuleBinder::new(provider, module_path))
    }

    /// Force module-side diagnostics on or off.
    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn binder(&self) -> &ModuleBinder {
        &self.binder
    }

    pub fn diagnostics_enabled(&self) -> bool {
        self.diagnostics
    }

    /// Generate the features the application needs.
    ///
    /// Conflicts are reported as outcomes carrying a suggestion from a
    /// recovery pass. Only binding failures and conditions the module does not
    /// document are errors.
    pub fn resolve_features(&self, request: &ResolveRequest) -> Result<ScanOutcome, InvocationError> {
        let binding = self.binder.bind()?;

        let target = assemble_target(
            request.class_files.as_deref(),
            request.class_directories.as_ref(),
            request.optimize,
        );
        let arguments = self.arguments(
            &target,
            &request.platform,
            request.current_features.clone(),
            request.log_location.as_deref(),
        );

        debug!(
            "Calling {} with the following inputs...\n{}",
            binding.module_name(),
            arguments
        );

        let raised = match binding.generate_feature_list(&arguments) {
            Ok(features) => {
                for feature in &features {
                    debug!("{}", feature);
                }
                return Ok(ScanOutcome::resolved(features));
            }
            Err(ModuleFault::Raised(raised)) => raised,
            Err(ModuleFault::Access(reason)) => {
                return Err(InvocationError::new(format!(
                    "An error occurred when trying to call the binary scanner jar: {reason}"
                )));
            }
        };

        let Some(kind) = binding.classify(&raised) else {
            debug!("Exception from binary scanner: {}", raised);
            return Err(InvocationError::new(format!(
                "Error scanning the application for Liberty features: {raised}"
            )));
        };

        let implicated = binding.condition_features(&raised);
        let suggestions = self.recover(
            request.class_directories.as_ref(),
            request.log_location.as_deref(),
            &request.platform,
        )?;

        let outcome = match kind {
            ConditionKind::ProvidedFeatureConflict => ScanOutcome::ProvidedConflict(Conflict {
                conflicts: implicated,
                suggestions,
            }),
            ConditionKind::FeatureConflict => ScanOutcome::ComputedConflict(Conflict {
                conflicts: implicated,
                suggestions,
            }),
            ConditionKind::RequiredFeatureModified => {
                ScanOutcome::ModificationRequired(Modification {
                    features: implicated,
                    suggestions: suggestions.unwrap_or_else(no_suggestion_set),
                })
            }
        };

        debug!(?kind, "Binary scanner reported a conflict");
        Ok(outcome)
    }

    /// Compute a suggested feature set from every class directory, ignoring
    /// the configured features.
    ///
    /// Returns `None` when no recommendation is possible, including a rescan
    /// that finds no features, and the sentinel set when the scanned code
    /// alone cannot be satisfied.
    pub fn recover(
        &self,
        class_directories: Option<&BTreeSet<String>>,
        log_location: Option<&str>,
        platform: &PlatformSpec,
    ) -> Result<Option<FeatureSet>, InvocationError> {
        let binding = self.binder.bind().map_err(|e| {
            InvocationError::new(format!(
                "An error occurred when trying to call the binary scanner jar for recommendations: {e}"
            ))
        })?;

        let target = ScanTarget::class_directories(class_directories.into_iter().flatten().cloned());
        let arguments = self.arguments(&target, platform, FeatureSet::new(), log_location);

        debug!(
            "Recalling binary scanner with the following inputs...\n{}",
            arguments
        );

        match binding.generate_feature_list(&arguments) {
            Ok(features) if features.is_empty() => {
                debug!("Binary scanner recommended no features");
                Ok(None)
            }
            Ok(features) => {
                for feature in &features {
                    debug!("{}", feature);
                }
                Ok(Some(features))
            }
            Err(ModuleFault::Raised(raised)) => Self::recovery_suggestion(&binding, raised),
            Err(ModuleFault::Access(reason)) => Err(InvocationError::new(format!(
                "An error occurred when trying to call the binary scanner jar for recommendations: {reason}"
            ))),
        }
    }

    fn recovery_suggestion(
        binding: &Binding,
        raised: RaisedCondition,
    ) -> Result<Option<FeatureSet>, InvocationError> {
        match binding.classify(&raised) {
            // No configured features were passed, so this one is not expected.
            Some(ConditionKind::ProvidedFeatureConflict) => {
                warn!("Unexpected exception from re-run of binary scanner: {}", raised);
                Ok(None)
            }
            Some(ConditionKind::FeatureConflict) | Some(ConditionKind::RequiredFeatureModified) => {
                debug!("Scanned classes conflict with each other: {}", raised);
                Ok(Some(no_suggestion_set()))
            }
            None => {
                debug!("Exception from rerunning binary scanner: {}", raised);
                Err(InvocationError::new(format!(
                    "Error scanning the application for Liberty feature recommendations: {raised}"
                )))
            }
        }
    }

    fn arguments(
        &self,
        target: &ScanTarget,
        platform: &PlatformSpec,
        current_features: FeatureSet,
        log_location: Option<&str>,
    ) -> ScanArguments {
        ScanArguments::new(
            target,
            platform,
            current_features,
            LogConfig::derive(self.diagnostics, log_location),
            self.locale.clone(),
        )
    }
}

impl std::fmt::Debug for FeatureResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureResolver")
            .field("binder", &self.binder)
            .field("diagnostics", &self.diagnostics)
            .field("locale", &self.locale)
            .finish()
    }
}
