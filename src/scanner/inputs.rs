//! Scan target selection

use super::types::ScanTarget;
use std::collections::BTreeSet;

/// Decide what the module scans.
///
/// With `optimize` the whole class directories are scanned and the file list
/// is ignored; without it only the listed class files are. Missing or empty
/// input yields an empty target, which is still submitted.
pub fn assemble_target(
    class_files: Option<&[String]>,
    class_directories: Option<&BTreeSet<String>>,
    optimize: bool,
) -> ScanTarget {
    if optimize {
        match class_directories {
            Some(directories) if !directories.is_empty() => {
                ScanTarget::class_directories(directories.iter().cloned())
            }
            _ => ScanTarget::class_directories(Vec::<String>::new()),
        }
    } else {
        match class_files {
            Some(files) if !files.is_empty() => ScanTarget::class_files(files.iter().cloned()),
            _ => ScanTarget::class_files(Vec::<String>::new()),
        }
    }
}
