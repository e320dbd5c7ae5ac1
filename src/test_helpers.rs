//! Shared test utilities for the markpress test suite.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();                 // tmp/content/ ← fixtures/content/
//! write_post(&tmp.path().join("content"), "extra.md", "Extra", None, &["x"]);
//!
//! let d = doc("b/c", Some("2024-02-01"), &["x", "y"]); // in-memory Document
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::document::parse_date;
use crate::route::Route;
use crate::types::{Document, Metadata};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to `<tmp>/content` and return the temp dir.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    let content = tmp.path().join("content");
    fs::create_dir_all(&content).unwrap();
    copy_dir_recursive(&fixtures, &content).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write a markdown post with front-matter under `root`, creating directories.
pub fn write_post(root: &Path, rel: &str, title: &str, date: Option<&str>, tags: &[&str]) -> PathBuf {
    let mut front = format!("---\ntitle: {title}\n");
    if let Some(date) = date {
        front.push_str(&format!("date: {date}\n"));
    }
    if !tags.is_empty() {
        front.push_str(&format!("tags: [{}]\n", tags.join(", ")));
    }
    front.push_str("---\n\nBody of ");
    front.push_str(title);
    front.push('\n');

    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, front).unwrap();
    path
}

// =========================================================================
// In-memory documents
// =========================================================================

/// Build a [`Document`] for routing key `key` without touching the disk.
/// Output paths are rooted at `out/`.
pub fn doc(key: &str, date: Option<&str>, tags: &[&str]) -> Document {
    let (routing_key, route) =
        Route::for_source(Path::new("out"), Path::new(&format!("{key}.md"))).unwrap();
    Document {
        source_path: PathBuf::from(format!("content/{key}.md")),
        routing_key,
        route,
        html_body: format!("<p>{key}</p>\n"),
        metadata: Metadata {
            title: key.to_string(),
            summary: None,
            image: None,
            published_at: date.map(str::to_string),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        },
        published: date.and_then(parse_date),
    }
}
