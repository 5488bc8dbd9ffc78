use super::error::BindingError;
use super::provider::{
    AnalysisProvider, ConditionKind, ModuleDescriptor, ModuleFault, ModuleHandle, RaisedCondition,
};
use super::types::{FeatureSet, ScanArguments};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-process analysis provider with scripted replies
///
/// Every `open` returns a handle sharing the same script, so a test can keep
/// the provider and inspect what the resolver sent.
pub struct StubScanner {
    inner: Arc<StubState>,
    name: String,
}

#[derive(Debug, Clone)]
pub enum StubResponse {
    Features(FeatureSet),
    Raise(RaisedCondition),
    AccessFailure(String),
}

impl StubResponse {
    pub fn features<I, S>(features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StubResponse::Features(features.into_iter().map(Into::into).collect())
    }

    pub fn conflict<I, S>(kind: ConditionKind, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StubResponse::Raise(kind.raise(features))
    }

    pub fn raise(condition: RaisedCondition) -> Self {
        StubResponse::Raise(condition)
    }

    pub fn access_failure(reason: impl Into<String>) -> Self {
        StubResponse::AccessFailure(reason.into())
    }
}

struct StubState {
    responses: Mutex<VecDeque<StubResponse>>,
    calls: Mutex<Vec<ScanArguments>>,
    descriptor: Mutex<ModuleDescriptor>,
    describe_failures: AtomicUsize,
    open_failure: Mutex<Option<String>>,
    opens: AtomicUsize,
    describes: AtomicUsize,
}

impl StubScanner {
    pub fn new() -> Self {
        Self::with_name("StubScanner")
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(StubState {
                responses: Mutex::new(VecDeque::new()),
                calls: Mutex::new(Vec::new()),
                descriptor: Mutex::new(ModuleDescriptor::binary_scanner(Some("stub"))),
                describe_failures: AtomicUsize::new(0),
                open_failure: Mutex::new(None),
                opens: AtomicUsize::new(0),
                describes: AtomicUsize::new(0),
            }),
            name: name.into(),
        }
    }

    pub fn with_descriptor(self, descriptor: ModuleDescriptor) -> Self {
        *self.inner.descriptor.lock().unwrap() = descriptor;
        self
    }

    /// Make the next `times` describe calls fail as if the class were absent.
    pub fn fail_describe(self, times: usize) -> Self {
        self.inner.describe_failures.store(times, Ordering::SeqCst);
        self
    }

    pub fn fail_open(self, reason: impl Into<String>) -> Self {
        *self.inner.open_failure.lock().unwrap() = Some(reason.into());
        self
    }

    pub fn add_response(&self, response: StubResponse) {
        self.inner.responses.lock().unwrap().push_back(response);
    }

    pub fn add_responses(&self, responses: impl IntoIterator<Item = StubResponse>) {
        let mut queue = self.inner.responses.lock().unwrap();
        for response in responses {
            queue.push_back(response);
        }
    }

    pub fn remaining_responses(&self) -> usize {
        self.inner.responses.lock().unwrap().len()
    }

    /// Every argument list received, in call order
    pub fn calls(&self) -> Vec<ScanArguments> {
        self.inner.calls.lock().unwrap().clone()
    }

    /// How many times a module handle was opened
    pub fn open_count(&self) -> usize {
        self.inner.opens.load(Ordering::SeqCst)
    }

    pub fn describe_count(&self) -> usize {
        self.inner.describes.load(Ordering::SeqCst)
    }
}

impl Default for StubScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisProvider for StubScanner {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&self, path: &Path) -> Result<Arc<dyn ModuleHandle>, BindingError> {
        self.inner.opens.fetch_add(1, Ordering::SeqCst);

        if let Some(reason) = self.inner.open_failure.lock().unwrap().clone() {
            return Err(BindingError::LoadFailed {
                path: path.to_path_buf(),
                reason,
            });
        }

        Ok(Arc::new(StubHandle {
            state: self.inner.clone(),
            name: format!("{} ({})", self.name, path.display()),
        }))
    }
}

impl std::fmt::Debug for StubScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StubScanner")
            .field("name", &self.name)
            .field("remaining_responses", &self.remaining_responses())
            .field("opens", &self.open_count())
            .finish()
    }
}

struct StubHandle {
    state: Arc<StubState>,
    name: String,
}

impl ModuleHandle for StubHandle {
    fn describe(&self) -> Result<ModuleDescriptor, BindingError> {
        self.state.describes.fetch_add(1, Ordering::SeqCst);

        let pending = self.state.describe_failures.load(Ordering::SeqCst);
        if pending > 0 {
            self.state
                .describe_failures
                .store(pending - 1, Ordering::SeqCst);
            let class = self.state.descriptor.lock().unwrap().class_name.clone();
            return Err(BindingError::ClassNotFound(class));
        }

        Ok(self.state.descriptor.lock().unwrap().clone())
    }

    fn invoke(&self, _operation: &str, arguments: &ScanArguments) -> Result<FeatureSet, ModuleFault> {
        self.state.calls.lock().unwrap().push(arguments.clone());

        let response = self
            .state
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ModuleFault::Access("StubScanner: No more responses in queue".to_string()))?;

        match response {
            StubResponse::Features(features) => Ok(features),
            StubResponse::Raise(condition) => Err(ModuleFault::Raised(condition)),
            StubResponse::AccessFailure(reason) => Err(ModuleFault::Access(reason)),
        }
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }
}
