use super::error::BindingError;
use super::provider::{
    AnalysisProvider, ConditionKind, ModuleFault, ModuleHandle, OperationDescriptor,
    RaisedCondition, ENTRY_POINT, ENTRY_POINT_SIGNATURE, GET_FEATURES, SCANNER_CLASS,
};
use super::types::{FeatureSet, ScanArguments};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// Resolved entry point of a loaded analysis module
pub struct Binding {
    path: PathBuf,
    handle: Arc<dyn ModuleHandle>,
    entry_point: OperationDescriptor,
    version: Option<String>,
}

impl Binding {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn module_name(&self) -> String {
        self.handle.display_name()
    }

    pub fn generate_feature_list(&self, arguments: &ScanArguments) -> Result<FeatureSet, ModuleFault> {
        self.handle.invoke(&self.entry_point.name, arguments)
    }

    /// Recognised condition kind of `raised`, by class identity only
    pub fn classify(&self, raised: &RaisedCondition) -> Option<ConditionKind> {
        ConditionKind::from_class_name(&raised.class_name)
    }

    /// Features carried by a conflict condition; `None` when they cannot be read.
    pub fn condition_features(&self, raised: &RaisedCondition) -> Option<FeatureSet> {
        match raised.features_via(GET_FEATURES) {
            Ok(features) => Some(features),
            Err(e) => {
                debug!(
                    "An error occurred when trying to call the binary scanner jar {}(): {}",
                    GET_FEATURES, e
                );
                None
            }
        }
    }
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("path", &self.path)
            .field("module", &self.handle.display_name())
            .field("entry_point", &self.entry_point.name)
            .field("version", &self.version)
            .finish()
    }
}

#[derive(Default)]
struct BinderState {
    handle: Option<Arc<dyn ModuleHandle>>,
    binding: Option<Arc<Binding>>,
}

/// Binds to the analysis module at a fixed path, at most once
pub struct ModuleBinder {
    provider: Arc<dyn AnalysisProvider>,
    path: Option<PathBuf>,
    state: Mutex<BinderState>,
}

impl ModuleBinder {
    pub fn new(provider: Arc<dyn AnalysisProvider>, path: Option<PathBuf>) -> Self {
        Self {
            provider,
            path,
            state: Mutex::new(BinderState::default()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn is_bound(&self) -> bool {
        self.lock_state().binding.is_some()
    }

    pub fn bind(&self) -> Result<Arc<Binding>, BindingError> {
        let mut state = self.lock_state();

        if let Some(binding) = state.binding.as_ref() {
            return Ok(binding.clone());
        }

        let path = self.path.as_ref().ok_or(BindingError::LocationUndefined)?;

        let handle = match state.handle.as_ref() {
            Some(handle) => handle.clone(),
            None => {
                if !path.exists() {
                    return Err(BindingError::NotFound(path.clone()));
                }
                debug!(
                    "Opening analysis module {} with provider {}",
                    path.display(),
                    self.provider.name()
                );
                let handle = self.provider.open(path)?;
                state.handle = Some(handle.clone());
                handle
            }
        };

        let descriptor = handle.describe()?;
        if descriptor.class_name != SCANNER_CLASS {
            return Err(BindingError::ClassNotFound(SCANNER_CLASS.to_string()));
        }

        let entry_point = descriptor
            .operation(ENTRY_POINT)
            .ok_or_else(|| BindingError::MethodNotFound {
                class: SCANNER_CLASS.to_string(),
                method: ENTRY_POINT.to_string(),
            })?;

        if !entry_point.matches_signature(&ENTRY_POINT_SIGNATURE) {
            return Err(BindingError::SignatureMismatch {
                method: ENTRY_POINT.to_string(),
                expected: ENTRY_POINT_SIGNATURE.iter().map(|p| p.to_string()).collect(),
                found: entry_point.parameters.clone(),
            });
        }

        let binding = Arc::new(Binding {
            path: path.clone(),
            handle,
            entry_point: entry_point.clone(),
            version: descriptor.version.clone(),
        });
        debug!(
            "Bound {}.{} from {} (version {})",
            SCANNER_CLASS,
            ENTRY_POINT,
            path.display(),
            binding.version().unwrap_or("unknown")
        );

        state.binding = Some(binding.clone());
        Ok(binding)
    }

    fn lock_state(&self) -> MutexGuard<'_, BinderState> {
        // State is only ever replaced whole, so a poisoned lock is still consistent.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for ModuleBinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleBinder")
            .field("provider", &self.provider.name())
            .field("path", &self.path)
            .field("bound", &self.is_bound())
            .finish()
    }
}
