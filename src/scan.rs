//! Content discovery.
//!
//! Stage 1 of the build pipeline. Walks the content root and collects every
//! markdown file below it:
//!
//! ```text
//! content/
//! ├── config.toml        # Site config (not content, ignored by the scan)
//! ├── a.md               # → a.html
//! ├── b/
//! │   └── c.md           # → b/c.html
//! ├── .drafts/           # Hidden = skipped, with everything inside
//! └── cover.png          # Not markdown = skipped
//! ```
//!
//! ## Failure policy
//!
//! A missing or unreadable *root* is fatal ([`ScanError`]). Anything that goes
//! wrong below the root (a subdirectory without read permission, a broken
//! entry) is recorded as a [`ScanWarning`] and the walk continues: files that
//! were found are unaffected by the ones that were not.
//!
//! The result is sorted so the same tree always yields the same build.

use log::warn;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Content root does not exist: {}", .0.display())]
    RootNotFound(PathBuf),
    #[error("Content root is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("Content root cannot be read: {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A non-fatal problem found while walking the content tree.
#[derive(Debug, Clone)]
pub struct ScanWarning {
    pub path: Option<PathBuf>,
    pub message: String,
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}: {}", path.display(), self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[derive(Debug, Default)]
pub struct ScanResult {
    /// Markdown files, sorted lexicographically.
    pub files: Vec<PathBuf>,
    pub warnings: Vec<ScanWarning>,
}

const MARKDOWN_EXTENSION: &str = "md";

pub fn scan(root: &Path) -> Result<ScanResult, ScanError> {
    let metadata = match std::fs::metadata(root) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ScanError::RootNotFound(root.to_path_buf()));
        }
        Err(source) => {
            return Err(ScanError::Unreadable {
                path: root.to_path_buf(),
                source,
            });
        }
    };
    if !metadata.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }
    std::fs::read_dir(root).map_err(|source| ScanError::Unreadable {
        path: root.to_path_buf(),
        source,
    })?;

    let mut result = ScanResult::default();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

    for entry in walker {
        match entry {
            Ok(entry) => {
                if is_markdown(entry.path()) && entry.path().is_file() {
                    result.files.push(entry.into_path());
                }
            }
            Err(err) => {
                let warning = ScanWarning {
                    path: err.path().map(Path::to_path_buf),
                    message: err
                        .io_error()
                        .map(|e| e.to_string())
                        .unwrap_or_else(|| err.to_string()),
                };
                warn!("skipping {warning}");
                result.warnings.push(warning);
            }
        }
    }

    result.files.sort();
    Ok(result)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case(MARKDOWN_EXTENSION))
        .unwrap_or(false)
}
