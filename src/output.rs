//! CLI output formatting for the build stages.
//!
//! Output is information-centric: each entity (post, tag page) leads with
//! its positional index and title, and file-system paths follow as indented
//! context lines.
//!
//! # Output Format
//!
//! ## Check / Scan
//!
//! ```text
//! Posts
//! 001 C (2024-02-01)
//!     Source: b/c.md
//!     Tags: x, y
//! 002 A (2024-01-01)
//!     Source: a.md
//!     Tags: x
//!
//! Tags
//!     x (2 posts)
//!     y (1 post)
//! ```
//!
//! ## Build
//!
//! ```text
//! Home → index.html
//!
//! Posts
//! 001 C → b/c.html
//! 002 A → a.html
//!
//! Tags
//! 001 x → tag/x.html
//!
//! Generated 2 posts, 1 tag page, 1 front page
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::pages::tag_index;
use crate::scan::ScanWarning;
use crate::site::{BuildReport, ParsedSite, WrittenPage};
use crate::template::{TemplateSource, Templates};
use crate::types::TargetKind;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Path shown relative to `root` when possible, always `/`-separated.
fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

fn warning_lines(warnings: &[ScanWarning]) -> Vec<String> {
    if warnings.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![String::new(), "Warnings".to_string()];
    for warning in warnings {
        lines.push(format!("{}{}", indent(1), warning));
    }
    lines
}

// ============================================================================
// Templates
// ============================================================================

pub fn format_templates(templates: &Templates) -> Vec<String> {
    let mut lines = vec!["Templates".to_string()];
    for (name, source) in &templates.sources {
        let origin = match source {
            TemplateSource::File(path) => path.display().to_string(),
            TemplateSource::Builtin => "built-in".to_string(),
        };
        lines.push(format!("{}{name}: {origin}", indent(1)));
    }
    lines
}

pub fn print_templates(templates: &Templates) {
    for line in format_templates(templates) {
        println!("{}", line);
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format the parsed document set: posts in listing order, then tags.
pub fn format_scan_output(parsed: &ParsedSite, content_root: &Path) -> Vec<String> {
    let mut lines = vec!["Posts".to_string()];

    for (i, doc) in parsed.documents.iter().enumerate() {
        let header = match &doc.metadata.published_at {
            Some(date) => format!("{} {} ({})", format_index(i + 1), doc.metadata.title, date),
            None => format!("{} {}", format_index(i + 1), doc.metadata.title),
        };
        lines.push(header);
        lines.push(format!(
            "{}Source: {}",
            indent(1),
            display_relative(&doc.source_path, content_root)
        ));
        if !doc.metadata.tags.is_empty() {
            let tags: Vec<&str> = doc.metadata.tags.iter().map(String::as_str).collect();
            lines.push(format!("{}Tags: {}", indent(1), tags.join(", ")));
        }
    }

    let index = tag_index(&parsed.documents);
    if !index.is_empty() {
        lines.push(String::new());
        lines.push("Tags".to_string());
        for (tag, docs) in &index {
            lines.push(format!("{}{} ({})", indent(1), tag, plural(docs.len(), "post")));
        }
    }

    lines.extend(warning_lines(&parsed.warnings));
    lines
}

pub fn print_scan_output(parsed: &ParsedSite, content_root: &Path) {
    for line in format_scan_output(parsed, content_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Build output
// ============================================================================

fn page_line(index: usize, page: &WrittenPage, output_root: &Path) -> String {
    format!(
        "{} {} → {}",
        format_index(index),
        page.title,
        display_relative(&page.output_path, output_root)
    )
}

/// Format the pages written by a build.
pub fn format_build_output(report: &BuildReport, output_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(front) = report.pages.iter().find(|p| p.kind == TargetKind::Front) {
        lines.push(format!(
            "Home → {}",
            display_relative(&front.output_path, output_root)
        ));
    }

    let posts: Vec<&WrittenPage> = report
        .pages
        .iter()
        .filter(|p| p.kind == TargetKind::Post)
        .collect();
    if !posts.is_empty() {
        lines.push(String::new());
        lines.push("Posts".to_string());
        for (i, page) in posts.iter().enumerate() {
            lines.push(page_line(i + 1, page, output_root));
        }
    }

    let tags: Vec<&WrittenPage> = report
        .pages
        .iter()
        .filter(|p| matches!(p.kind, TargetKind::Tag(_)))
        .collect();
    if !tags.is_empty() {
        lines.push(String::new());
        lines.push("Tags".to_string());
        for (i, page) in tags.iter().enumerate() {
            let name = match &page.kind {
                TargetKind::Tag(name) => name.as_str(),
                _ => page.title.as_str(),
            };
            lines.push(format!(
                "{} {} → {}",
                format_index(i + 1),
                name,
                display_relative(&page.output_path, output_root)
            ));
        }
    }

    lines.extend(warning_lines(&report.warnings));

    let fronts = report.count(|k| *k == TargetKind::Front);
    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {}, {}",
        plural(posts.len(), "post"),
        plural(tags.len(), "tag page"),
        plural(fronts, "front page"),
    ));
    lines
}

pub fn print_build_output(report: &BuildReport, output_root: &Path) {
    for line in format_build_output(report, output_root) {
        println!("{}", line);
    }
}
