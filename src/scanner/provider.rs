//! Analysis provider abstraction
//!
//! A provider knows how to open the analysis module found at a path. The
//! opened [`ModuleHandle`] describes what it exports and performs calls. The
//! binder checks the description against the fixed entry-point contract, so
//! providers never need to know which operation the resolver uses.

use super::error::{AccessorError, BindingError};
use super::types::{FeatureSet, ScanArguments};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Fully-qualified name of the module's primary class
pub const SCANNER_CLASS: &str = "com.ibm.websphere.binary.cmdline.BinaryScanner";

/// Name of the entry-point operation
pub const ENTRY_POINT: &str = "generateFeatureList";

/// Ordered parameter types of the entry point:
/// binaryInputs, targetJavaEE, targetMicroProfile, currentFeatures,
/// logLocation, logLevel, locale
pub const ENTRY_POINT_SIGNATURE: [&str; 7] = [
    "java.util.Set",
    "java.lang.String",
    "java.lang.String",
    "java.util.Set",
    "java.lang.String",
    "java.lang.String",
    "java.util.Locale",
];

/// Accessor exposed by every conflict condition
pub const GET_FEATURES: &str = "getFeatures";

pub trait AnalysisProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Open an isolated handle scoped to the module at `path`.
    fn open(&self, path: &Path) -> Result<Arc<dyn ModuleHandle>, BindingError>;
}

pub trait ModuleHandle: Send + Sync {
    /// Report the primary class and the operations it exports.
    fn describe(&self) -> Result<ModuleDescriptor, BindingError>;

    /// Call `operation` with the seven-argument contract.
    fn invoke(&self, operation: &str, arguments: &ScanArguments) -> Result<FeatureSet, ModuleFault>;

    /// Human-readable name used in log output
    fn display_name(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    #[serde(rename = "class")]
    pub class_name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub operations: Vec<OperationDescriptor>,
}

impl ModuleDescriptor {
    /// Descriptor of a module exporting exactly the expected entry point
    pub fn binary_scanner(version: Option<&str>) -> Self {
        Self {
            class_name: SCANNER_CLASS.to_string(),
            version: version.map(str::to_string),
            operations: vec![OperationDescriptor::entry_point()],
        }
    }

    pub fn operation(&self, name: &str) -> Option<&OperationDescriptor> {
        self.operations.iter().find(|op| op.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    pub name: String,
    pub parameters: Vec<String>,
}

impl OperationDescriptor {
    pub fn entry_point() -> Self {
        Self {
            name: ENTRY_POINT.to_string(),
            parameters: ENTRY_POINT_SIGNATURE.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn matches_signature(&self, expected: &[&str]) -> bool {
        self.parameters.len() == expected.len()
            && self.parameters.iter().zip(expected).all(|(found, want)| found == want)
    }
}

/// Why a call did not return a feature list
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleFault {
    /// The module ran and threw
    Raised(RaisedCondition),
    /// The module could not be reached or its reply could not be read
    Access(String),
}

impl fmt::Display for ModuleFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleFault::Raised(condition) => write!(f, "{condition}"),
            ModuleFault::Access(reason) => f.write_str(reason),
        }
    }
}

/// A condition thrown by the module, identified by its class name
///
/// Accessor results are captured when the condition is raised and read back
/// by name, e.g. `getFeatures`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaisedCondition {
    #[serde(rename = "class")]
    pub class_name: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub accessors: BTreeMap<String, serde_json::Value>,
}

impl RaisedCondition {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            message: None,
            accessors: BTreeMap::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let features: Vec<String> = features.into_iter().map(Into::into).collect();
        self.accessors
            .insert(GET_FEATURES.to_string(), serde_json::json!(features));
        self
    }

    pub fn with_accessor(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.accessors.insert(name.into(), value);
        self
    }

    /// Read a feature set through the named accessor.
    pub fn features_via(&self, accessor: &str) -> Result<FeatureSet, AccessorError> {
        let value = self.accessors.get(accessor).ok_or_else(|| AccessorError::NotFound {
            class: self.class_name.clone(),
            accessor: accessor.to_string(),
        })?;

        serde_json::from_value::<FeatureSet>(value.clone()).map_err(|e| AccessorError::BadReturn {
            class: self.class_name.clone(),
            accessor: accessor.to_string(),
            reason: e.to_string(),
        })
    }
}

impl fmt::Display for RaisedCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.class_name, message),
            None => f.write_str(&self.class_name),
        }
    }
}

/// The three recoverable conditions, by class identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionKind {
    /// Configured features conflict with each other
    ProvidedFeatureConflict,
    /// Scanned code conflicts with itself or with configured features
    FeatureConflict,
    /// A working set exists only if some features change
    RequiredFeatureModified,
}

impl ConditionKind {
    pub const ALL: [ConditionKind; 3] = [
        ConditionKind::ProvidedFeatureConflict,
        ConditionKind::FeatureConflict,
        ConditionKind::RequiredFeatureModified,
    ];

    pub fn class_name(&self) -> &'static str {
        match self {
            ConditionKind::ProvidedFeatureConflict => {
                "com.ibm.websphere.binary.cmdline.exceptions.ProvidedFeatureConflictException"
            }
            ConditionKind::FeatureConflict => {
                "com.ibm.websphere.binary.cmdline.exceptions.FeatureConflictException"
            }
            ConditionKind::RequiredFeatureModified => {
                "com.ibm.websphere.binary.cmdline.exceptions.RequiredFeatureModifiedException"
            }
        }
    }

    pub fn from_class_name(class_name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.class_name() == class_name)
    }

    /// Build a raised condition of this kind carrying `features`.
    pub fn raise<I, S>(self, features: I) -> RaisedCondition
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RaisedCondition::new(self.class_name()).with_features(features)
    }
}
