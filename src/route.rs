//! Output routing: where a page is written and how it is addressed.
//!
//! Every page has three derived locations:
//!
//! ```text
//! content/b/c.md
//!   output_path    public/b/c.html   (file system, under the output root)
//!   url            /b/c.html         (absolute site path, percent-encoded per segment)
//!   public_prefix  ..                (relative path from the page back to the site root)
//! ```
//!
//! Templates use `{{PUBLIC}}` to reference root-level assets from pages at any
//! depth (`{{PUBLIC}}/style.css` resolves to `../style.css` from `b/c.html`),
//! so the prefix depth must match the directory depth of the output file.

use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub output_path: PathBuf,
    pub url: String,
    pub public_prefix: String,
}

impl Route {
    /// Route for a page at `dirs/<stem>.html` below the site root.
    pub fn new(output_root: &Path, dirs: &[String], stem: &str) -> Self {
        let file_name = format!("{stem}.html");

        let mut output_path = output_root.to_path_buf();
        for dir in dirs {
            output_path.push(dir);
        }
        output_path.push(&file_name);

        let mut url = String::from("/");
        for dir in dirs {
            url.push_str(&urlencoding::encode(dir));
            url.push('/');
        }
        url.push_str(&urlencoding::encode(&file_name));

        Self {
            output_path,
            url,
            public_prefix: public_prefix(dirs.len()),
        }
    }

    /// Route for a markdown source given its path relative to the content root.
    ///
    /// Returns the routing key (`b/c` for `b/c.md`) alongside the route, or
    /// `None` if the path has no file stem or escapes the content root.
    pub fn for_source(output_root: &Path, relative: &Path) -> Option<(String, Self)> {
        let stem = relative.file_stem()?.to_string_lossy().to_string();
        let mut dirs = Vec::new();
        if let Some(parent) = relative.parent() {
            for component in parent.components() {
                match component {
                    Component::Normal(name) => dirs.push(name.to_string_lossy().to_string()),
                    Component::CurDir => {}
                    _ => return None,
                }
            }
        }

        let mut key = dirs.join("/");
        if !key.is_empty() {
            key.push('/');
        }
        key.push_str(&stem);

        Some((key, Self::new(output_root, &dirs, &stem)))
    }
}

/// `..` once per directory level, joined with `/`; `.` at the site root.
pub fn public_prefix(depth: usize) -> String {
    if depth == 0 {
        ".".to_string()
    } else {
        vec![".."; depth].join("/")
    }
}
