//! Scanner errors
//!
//! Binding problems and unrecoverable invocation failures are errors. The
//! three recognised conflict conditions are not: they surface as
//! [`ScanOutcome`](super::outcome::ScanOutcome) variants after recovery.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to load the module or resolve its entry point
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BindingError {
    #[error("The binary scanner jar location is not defined.")]
    LocationUndefined,

    #[error("Could not find the binary scanner jar at {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to load {}: {reason}", .path.display())]
    LoadFailed { path: PathBuf, reason: String },

    #[error("Class not found: {0}")]
    ClassNotFound(String),

    #[error("No method {method} on {class}")]
    MethodNotFound { class: String, method: String },

    #[error("Method {method} has signature ({}), expected ({})", .found.join(", "), .expected.join(", "))]
    SignatureMismatch {
        method: String,
        expected: Vec<String>,
        found: Vec<String>,
    },
}

/// The only fatal error the resolver returns
#[derive(Debug, Error)]
#[error("{message}")]
pub struct InvocationError {
    message: String,
    #[source]
    binding: Option<BindingError>,
}

impl InvocationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            binding: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The binding failure behind this error, if that is what it was
    pub fn binding_error(&self) -> Option<&BindingError> {
        self.binding.as_ref()
    }

    pub fn is_binding_failure(&self) -> bool {
        self.binding.is_some()
    }
}

impl From<BindingError> for InvocationError {
    fn from(err: BindingError) -> Self {
        let message = match &err {
            BindingError::LocationUndefined | BindingError::NotFound(_) => err.to_string(),
            _ => format!("An error occurred when trying to call the binary scanner jar: {err}"),
        };
        Self {
            message,
            binding: Some(err),
        }
    }
}

/// Failure to read a value off a raised condition
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessorError {
    #[error("Error finding {class} method {accessor}()")]
    NotFound { class: String, accessor: String },

    #[error("{class}.{accessor}() returned an unexpected value: {reason}")]
    BadReturn {
        class: String,
        accessor: String,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_location_message() {
        let err: InvocationError = BindingError::LocationUndefined.into();
        assert_eq!(err.message(), "The binary scanner jar location is not defined.");
        assert!(err.is_binding_failure());
    }

    #[test]
    fn test_not_found_message_names_path() {
        let err: InvocationError = BindingError::NotFound(PathBuf::from("/opt/scanner.jar")).into();
        assert!(err.message().contains("/opt/scanner.jar"));
    }

    #[test]
    fn test_resolution_failure_is_wrapped() {
        let err: InvocationError =
            BindingError::ClassNotFound("com.example.Missing".to_string()).into();
        assert!(err
            .message()
            .starts_with("An error occurred when trying to call the binary scanner jar"));
        assert!(matches!(
            err.binding_error(),
            Some(BindingError::ClassNotFound(_))
        ));
    }

    #[test]
    fn test_signature_mismatch_display() {
        let err = BindingError::SignatureMismatch {
            method: "generateFeatureList".into(),
            expected: vec!["java.util.Set".into()],
            found: vec!["java.util.List".into()],
        };
        assert_eq!(
            err.to_string(),
            "Method generateFeatureList has signature (java.util.List), expected (java.util.Set)"
        );
    }
}
