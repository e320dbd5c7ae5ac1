//! Document parsing: one markdown file in, one [`Document`] out.
//!
//! Parsing reads the file, hands it to the markdown engine, validates the
//! front-matter and derives the document's [`Route`]. Documents are parsed
//! independently of each other, which is what lets the pipeline fan out over
//! the whole content set in parallel.
//!
//! ## Front-matter rules
//!
//! | Key | Required | Notes |
//! |-----|----------|-------|
//! | `title` | yes | blank titles count as missing |
//! | `summary` / `description` | no | `summary` wins if both are set |
//! | `image` | no | |
//! | `date` / `published_at` / `publishedAt` | no | first set key wins; `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS`, or RFC 3339 |
//! | `tags` | no | list; duplicates collapse; tags become file names so `/`, `\` and `..` are rejected; linked percent-encoded |

use crate::markdown;
use crate::route::Route;
use crate::types::{Document, Metadata};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
#[error("Failed to parse {}: {cause}", path.display())]
pub struct ParseError {
    pub path: PathBuf,
    #[source]
    pub cause: ParseCause,
}

#[derive(Error, Debug)]
pub enum ParseCause {
    #[error("cannot read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed front-matter: {0}")]
    FrontMatter(#[from] serde_yaml::Error),
    #[error("missing required front-matter field `title`")]
    MissingTitle,
    #[error("date {0:?} is not an ISO-8601 date")]
    InvalidDate(String),
    #[error("tag {0:?} cannot be used as a file name")]
    InvalidTag(String),
    #[error("file is not inside the content root")]
    OutsideContentRoot,
}

/// Parse the markdown file at `source`, a path below `content_root`.
pub fn parse_document(
    source: &Path,
    content_root: &Path,
    output_root: &Path,
) -> Result<Document, ParseError> {
    parse_inner(source, content_root, output_root).map_err(|cause| ParseError {
        path: source.to_path_buf(),
        cause,
    })
}

fn parse_inner(
    source: &Path,
    content_root: &Path,
    output_root: &Path,
) -> Result<Document, ParseCause> {
    let relative = source
        .strip_prefix(content_root)
        .map_err(|_| ParseCause::OutsideContentRoot)?;
    let (routing_key, route) =
        Route::for_source(output_root, relative).ok_or(ParseCause::OutsideContentRoot)?;

    let text = fs::read_to_string(source)?;
    let rendered = markdown::render(&text)?;
    let fm = rendered.front_matter;

    let title = fm
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(ParseCause::MissingTitle)?;

    let published = match fm.date.as_deref() {
        Some(raw) => Some(parse_date(raw).ok_or_else(|| ParseCause::InvalidDate(raw.to_string()))?),
        None => None,
    };

    let mut tags = BTreeSet::new();
    for tag in fm.tags {
        let tag = tag.trim().to_string();
        if !is_valid_tag(&tag) {
            return Err(ParseCause::InvalidTag(tag));
        }
        tags.insert(tag);
    }

    Ok(Document {
        source_path: source.to_path_buf(),
        routing_key,
        route,
        html_body: rendered.html,
        metadata: Metadata {
            title,
            summary: fm.summary.filter(|s| !s.trim().is_empty()),
            image: fm.image.filter(|s| !s.trim().is_empty()),
            published_at: fm.date,
            tags,
        },
        published,
    })
}

/// Parse an ISO-8601 date or date-time. Offsets are normalised to UTC.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn is_valid_tag(tag: &str) -> bool {
    !tag.is_empty() && !tag.contains('/') && !tag.contains('\\') && !tag.contains("..")
}
