//! Shared types used across all pipeline stages.
//!
//! Every page the generator writes, whether it comes from a markdown file or
//! is synthesized (tag listings, the front page), carries the same
//! [`Metadata`] record. Only `title` is mandatory, so renderers never need to
//! probe for the presence of page-type specific fields.

use crate::route::Route;
use chrono::NaiveDateTime;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Page metadata, from front-matter or synthesized by the page builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub title: String,
    /// Short description used in post cards and `<meta name="description">`.
    pub summary: Option<String>,
    /// Social-card image, absolute URL or root-relative path.
    pub image: Option<String>,
    /// Publication date exactly as written in the front-matter.
    pub published_at: Option<String>,
    pub tags: BTreeSet<String>,
}

/// A parsed markdown file.
#[derive(Debug, Clone)]
pub struct Document {
    pub source_path: PathBuf,
    /// Path relative to the content root without extension, `/`-separated
    /// (`b/c` for `content/b/c.md`).
    pub routing_key: String,
    pub route: Route,
    pub html_body: String,
    pub metadata: Metadata,
    /// `published_at` parsed for ordering.
    pub published: Option<NaiveDateTime>,
}

/// What a [`RenderTarget`] was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetKind {
    Post,
    Tag(String),
    Front,
}

/// One output page to produce.
#[derive(Debug, Clone)]
pub struct RenderTarget {
    pub kind: TargetKind,
    pub route: Route,
    /// HTML fragment substituted for `{{CONTENT}}`.
    pub content: String,
    pub metadata: Metadata,
    /// Site origin without trailing slash (`https://example.com`), or empty
    /// when the site is addressed by root-relative URLs only.
    pub base_url: String,
    /// Human-readable origin of the page, used in collision errors.
    pub origin: String,
}

impl RenderTarget {
    /// Public URL used for `og:url` and `<link rel="canonical">`.
    pub fn canonical_url(&self) -> String {
        format!("{}{}", self.base_url, self.route.url)
    }
}
