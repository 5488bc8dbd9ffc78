//! Binary scanner integration
//!
//! This module binds to an external analysis module, submits the classes to
//! scan and turns the module's answers into [`ScanOutcome`]s. Providers are
//! pluggable: [`JarScanner`] runs the real artifact in a child JVM and
//! [`StubScanner`] answers in-process from a script.

pub mod binder;
pub mod error;
pub mod inputs;
pub mod jar;
pub mod messages;
pub mod outcome;
pub mod provider;
pub mod resolver;
pub mod stub;
pub mod types;
pub mod versions;

pub use binder::{Binding, ModuleBinder};
pub use error::{AccessorError, BindingError, InvocationError};
pub use inputs::assemble_target;
pub use jar::JarScanner;
pub use outcome::{Conflict, Modification, ScanOutcome, NO_SUGGESTION};
pub use provider::{
    AnalysisProvider, ConditionKind, ModuleDescriptor, ModuleFault, ModuleHandle,
    OperationDescriptor, RaisedCondition,
};
pub use resolver::{FeatureResolver, ResolveRequest};
pub use stub::{StubResponse, StubScanner};
pub use types::{FeatureSet, Locale, LogConfig, PlatformSpec, ScanArguments, ScanTarget, TargetKind};
