//! Child-JVM adapter for the binary scanner artifact
//!
//! The scanner has no machine-readable command line of its own, so each call
//! runs a small bridge program, `ScannerBridge.java`, through the JDK source
//! launcher: `java [options] <bridge> <artifact>`. The bridge loads
//! [`SCANNER_CLASS`](super::provider::SCANNER_CLASS) from the artifact with a
//! `URLClassLoader`, looks up `generateFeatureList` by its seven-parameter
//! signature and invokes it. A
//! condition thrown by the scanner is reported with the result of its
//! `getFeatures` accessor. The source launcher needs Java 11 or later.
//!
//! One JSON document travels in each direction:
//!
//! ```text
//! -> {"op":"describe"}
//! <- {"class":"...","version":"...","operations":[{"name":"...","parameters":[...]}]}
//!
//! -> {"op":"invoke","operation":"generateFeatureList","arguments":{...}}
//! <- {"result":["servlet-4.0", ...]}
//! <- {"thrown":{"class":"...","message":"...","accessors":{"getFeatures":[...]}}}
//! ```
//!
//! The artifact's class loader has only the JDK platform loader as parent, so
//! nothing from the host classpath leaks in.

use super::error::BindingError;
use super::provider::{AnalysisProvider, ModuleDescriptor, ModuleFault, ModuleHandle, RaisedCondition};
use super::types::{FeatureSet, ScanArguments};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use tempfile::TempDir;
use tracing::debug;

/// Main class of the bridge program
pub const BRIDGE_CLASS: &str = "ScannerBridge";

/// Source of the bridge program, run by the JDK source launcher
pub const BRIDGE_SOURCE: &str = include_str!("bridge/ScannerBridge.java");

/// Provider that runs the scanner artifact in a child JVM
#[derive(Debug, Clone)]
pub struct JarScanner {
    java: PathBuf,
    jvm_options: Vec<String>,
}

impl JarScanner {
    pub fn new(java: impl Into<PathBuf>) -> Self {
        Self {
            java: java.into(),
            jvm_options: Vec::new(),
        }
    }

    /// Launcher from `JAVA_HOME`, falling back to `java` on the PATH
    pub fn from_env() -> Self {
        Self::new(default_java_launcher())
    }

    pub fn with_jvm_option(mut self, option: impl Into<String>) -> Self {
        self.jvm_options.push(option.into());
        self
    }

    pub fn java(&self) -> &Path {
        &self.java
    }
}

impl Default for JarScanner {
    fn default() -> Self {
        Self::from_env()
    }
}

pub fn default_java_launcher() -> PathBuf {
    match env::var_os("JAVA_HOME") {
        Some(home) if !home.is_empty() => {
            let exe = if cfg!(windows) { "java.exe" } else { "java" };
            PathBuf::from(home).join("bin").join(exe)
        }
        _ => PathBuf::from("java"),
    }
}

impl AnalysisProvider for JarScanner {
    fn name(&self) -> &str {
        "jar"
    }

    fn open(&self, path: &Path) -> Result<Arc<dyn ModuleHandle>, BindingError> {
        if !path.is_file() {
            return Err(BindingError::LoadFailed {
                path: path.to_path_buf(),
                reason: "not a regular file".to_string(),
            });
        }

        let artifact = path.canonicalize().map_err(|e| BindingError::LoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let bridge_dir = write_bridge().map_err(|e| BindingError::LoadFailed {
            path: path.to_path_buf(),
            reason: format!("failed to write the scanner bridge: {e}"),
        })?;
        debug!("Wrote {} to {}", BRIDGE_CLASS, bridge_dir.path().display());

        Ok(Arc::new(JarModule {
            java: self.java.clone(),
            jvm_options: self.jvm_options.clone(),
            artifact,
            bridge: bridge_dir.path().join(format!("{BRIDGE_CLASS}.java")),
            _bridge_dir: bridge_dir,
        }))
    }
}

/// Write the bridge source into a fresh directory owned by the handle.
fn write_bridge() -> std::io::Result<TempDir> {
    let dir = tempfile::Builder::new().prefix("featurescan-").tempdir()?;
    fs::write(dir.path().join(format!("{BRIDGE_CLASS}.java")), BRIDGE_SOURCE)?;
    Ok(dir)
}

/// Kill and reap a child whose exchange was abandoned.
fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum BridgeRequest<'a> {
    Describe,
    Invoke {
        operation: &'a str,
        arguments: &'a ScanArguments,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum InvokeReply {
    Result(FeatureSet),
    Thrown(RaisedCondition),
}

struct JarModule {
    java: PathBuf,
    jvm_options: Vec<String>,
    artifact: PathBuf,
    bridge: PathBuf,
    _bridge_dir: TempDir,
}

impl JarModule {
    /// Run one exchange and return the child's stdout.
    fn exchange(&self, request: &BridgeRequest<'_>) -> Result<Vec<u8>, String> {
        let payload = serde_json::to_vec(request).map_err(|e| e.to_string())?;

        let mut child = Command::new(&self.java)
            .args(&self.jvm_options)
            .arg(&self.bridge)
            .arg(&self.artifact)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| format!("failed to start {}: {}", self.java.display(), e))?;

        if let Some(mut stdin) = child.stdin.take() {
            let sent = stdin
                .write_all(&payload)
                .and_then(|_| stdin.write_all(b"\n"));
            if let Err(e) = sent {
                drop(stdin);
                reap(&mut child);
                return Err(format!("failed to send request: {e}"));
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| format!("failed to read scanner output: {e}"))?;
        debug!("binary scanner bridge exited with {}", output.status);

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            debug!("binary scanner stderr: {}", stderr.trim());
        }

        if output.stdout.iter().all(u8::is_ascii_whitespace) {
            return Err(format!(
                "{} exited with {} and produced no reply",
                self.java.display(),
                output.status
            ));
        }

        Ok(output.stdout)
    }
}

impl ModuleHandle for JarModule {
    fn describe(&self) -> Result<ModuleDescriptor, BindingError> {
        let load_failed = |reason: String| BindingError::LoadFailed {
            path: self.artifact.clone(),
            reason,
        };

        let stdout = self.exchange(&BridgeRequest::Describe).map_err(load_failed)?;
        serde_json::from_slice(&stdout)
            .map_err(|e| load_failed(format!("unreadable module description: {e}")))
    }

    fn invoke(&self, operation: &str, arguments: &ScanArguments) -> Result<FeatureSet, ModuleFault> {
        let stdout = self
            .exchange(&BridgeRequest::Invoke {
                operation,
                arguments,
            })
            .map_err(ModuleFault::Access)?;

        match serde_json::from_slice::<InvokeReply>(&stdout) {
            Ok(InvokeReply::Result(features)) => Ok(features),
            Ok(InvokeReply::Thrown(condition)) => Err(ModuleFault::Raised(condition)),
            Err(e) => Err(ModuleFault::Access(format!("unreadable scanner reply: {e}"))),
        }
    }

    fn display_name(&self) -> String {
        self.artifact
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.artifact.display().to_string())
    }
}
