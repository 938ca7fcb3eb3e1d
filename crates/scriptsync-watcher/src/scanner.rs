//! Recursive script scanning.
//!
//! Walks a directory, keeps files whose extension is in the configured set,
//! and reads each one as UTF-8 text. Unreadable entries are recorded and
//! skipped so one bad file never costs the rest of the snapshot.

use scriptsync_core::ScriptMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Why a single entry was left out of a scan.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("path is not valid UTF-8: {0}")]
    NonUtf8Path(PathBuf),
}

/// Result of scanning a directory.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Every script that could be read.
    pub scripts: ScriptMap,
    /// Entries that were skipped, with the reason.
    pub errors: Vec<(String, String)>,
    /// Time taken in milliseconds.
    pub duration_ms: u64,
}

/// Scans `root` recursively for files with one of `extensions`.
///
/// A missing root, or one that is not a directory, yields an empty result
/// rather than an error.
pub fn scan_directory(root: &Path, extensions: &[String]) -> ScanResult {
    let start = Instant::now();
    let mut result = ScanResult::default();

    if !root.is_dir() {
        debug!("Watch directory {} does not exist", root.display());
        return result;
    }

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = error_key(root, e.path().unwrap_or(root));
                record_error(&mut result, path, ScanError::Walk(e));
                continue;
            }
        };

        if !entry.file_type().is_file() || !has_extension(entry.path(), extensions) {
            continue;
        }

        let path = entry.path();
        let key = match relative_key(root, path) {
            Some(key) => key,
            None => {
                record_error(
                    &mut result,
                    error_key(root, path),
                    ScanError::NonUtf8Path(path.to_path_buf()),
                );
                continue;
            }
        };

        match fs::read_to_string(path) {
            Ok(content) => {
                result.scripts.insert(key, content);
            }
            Err(source) => record_error(
                &mut result,
                key,
                ScanError::Read {
                    path: path.to_path_buf(),
                    source,
                },
            ),
        }
    }

    result.duration_ms = start.elapsed().as_millis() as u64;
    debug!(
        "Scanned {} scripts in {}ms ({} skipped)",
        result.scripts.len(),
        result.duration_ms,
        result.errors.len()
    );
    result
}

fn record_error(result: &mut ScanResult, path: String, error: ScanError) {
    warn!("Error reading {}: {}", path, error);
    result.errors.push((path, error.to_string()));
}

/// Checks if a file has one of the script extensions.
fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|e| e == ext))
        .unwrap_or(false)
}

/// Path relative to `root`, joined with `/` on every platform.
fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts = relative
        .components()
        .map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}

/// Key used when reporting a failure: relative where possible, else as given.
fn error_key(root: &Path, path: &Path) -> String {
    relative_key(root, path)
        .filter(|key| !key.is_empty())
        .unwrap_or_else(|| path.to_string_lossy().replace('\\', "/"))
}
