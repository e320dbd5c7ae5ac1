//! Page assembly: turns the parsed document set into render targets.
//!
//! Three passes, run only after every document has been parsed:
//!
//! 1. **Post pages**: one target per document, rendered with `post.html`.
//! 2. **Tag pages**: one `tag/<tag>.html` per distinct tag, listing a post
//!    card for every document carrying the tag, rendered with `tag.html`.
//! 3. **Front page**: `index.html` listing every document, rendered with
//!    `index.html`.
//!
//! ## Ordering
//!
//! Listings use one global order:
//!
//! - dated documents first, newest first;
//! - documents with the same date by routing key (`a`, `b/c`, ...);
//! - undated documents last, by routing key.
//!
//! Tags are visited alphabetically, so tag pages are produced in the same
//! order on every build.
//!
//! ## Collisions
//!
//! Two targets must never share an output path. [`check_collisions`] runs over
//! the complete target list before anything is written, catching both
//! `a.md`/`A.md` pairs, tags differing only in case (`Rust`/`rust`) and
//! documents that shadow generated pages (`content/tag/rust.md`,
//! `content/index.md`).

use crate::config::SiteSection;
use crate::route::Route;
use crate::template::tag_url;
use crate::types::{Document, Metadata, RenderTarget, TargetKind};
use maud::{Markup, html};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
#[error("Output path collision: {} is produced by both {first} and {second}", path.display())]
pub struct Collision {
    pub path: PathBuf,
    pub first: String,
    pub second: String,
}

/// Directory (below the output root) holding tag listing pages.
pub const TAG_DIR: &str = "tag";

/// Global listing order. See the module docs.
pub fn compare_documents(a: &Document, b: &Document) -> Ordering {
    match (a.published, b.published) {
        (Some(x), Some(y)) => y.cmp(&x).then_with(|| a.routing_key.cmp(&b.routing_key)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.routing_key.cmp(&b.routing_key),
    }
}

pub fn sort_documents(docs: &mut [Document]) {
    docs.sort_by(compare_documents);
}

/// Map each distinct tag to the documents carrying it, keeping `docs` order.
pub fn tag_index(docs: &[Document]) -> BTreeMap<&str, Vec<&Document>> {
    let mut index: BTreeMap<&str, Vec<&Document>> = BTreeMap::new();
    for doc in docs {
        for tag in &doc.metadata.tags {
            index.entry(tag.as_str()).or_default().push(doc);
        }
    }
    index
}

// ============================================================================
// Post cards
// ============================================================================

/// Summary snippet for one document: date, linked title, summary, tags.
pub fn post_card(doc: &Document) -> Markup {
    let date = doc
        .published
        .map(|d| d.format("%Y-%m-%d").to_string());

    html! {
        article.post-card {
            @if let (Some(display), Some(raw)) = (&date, &doc.metadata.published_at) {
                time datetime=(raw) { (display) }
            }
            h2 {
                a href=(doc.route.url) { (doc.metadata.title) }
            }
            @if let Some(summary) = &doc.metadata.summary {
                p.summary { (summary) }
            }
            @if !doc.metadata.tags.is_empty() {
                ul.tags {
                    @for tag in &doc.metadata.tags {
                        li { a href=(tag_url(tag)) { (tag) } }
                    }
                }
            }
        }
    }
}

/// Navigation fragment listing a post card per document.
pub fn post_list<'a>(docs: impl IntoIterator<Item = &'a Document>) -> String {
    html! {
        nav.post-list {
            @for doc in docs {
                (post_card(doc))
            }
        }
    }
    .into_string()
}

// ============================================================================
// Targets
// ============================================================================

pub fn post_targets(docs: &[Document], base_url: &str) -> Vec<RenderTarget> {
    docs.iter()
        .map(|doc| RenderTarget {
            kind: TargetKind::Post,
            route: doc.route.clone(),
            content: doc.html_body.clone(),
            metadata: doc.metadata.clone(),
            base_url: base_url.to_string(),
            origin: doc.source_path.display().to_string(),
        })
        .collect()
}

pub fn tag_targets(docs: &[Document], output_root: &Path, base_url: &str) -> Vec<RenderTarget> {
    tag_index(docs)
        .into_iter()
        .map(|(tag, tagged)| RenderTarget {
            kind: TargetKind::Tag(tag.to_string()),
            route: Route::new(output_root, &[TAG_DIR.to_string()], tag),
            content: post_list(tagged),
            metadata: Metadata {
                title: format!("Posts about {tag}"),
                summary: Some(format!("All posts tagged \"{tag}\"")),
                ..Metadata::default()
            },
            base_url: base_url.to_string(),
            origin: format!("tag \"{tag}\""),
        })
        .collect()
}

pub fn front_page_target(docs: &[Document], output_root: &Path, site: &SiteSection) -> RenderTarget {
    RenderTarget {
        kind: TargetKind::Front,
        route: Route::new(output_root, &[], "index"),
        content: post_list(docs),
        metadata: Metadata {
            title: site.title.clone(),
            summary: Some(site.description.clone()).filter(|d| !d.is_empty()),
            image: site.image.clone(),
            ..Metadata::default()
        },
        base_url: site.base_url.trim_end_matches('/').to_string(),
        origin: "front page".to_string(),
    }
}

/// Every page of the site. `docs` must already be in listing order.
pub fn build_targets(docs: &[Document], output_root: &Path, site: &SiteSection) -> Vec<RenderTarget> {
    let base_url = site.base_url.trim_end_matches('/');
    let mut targets = post_targets(docs, base_url);
    targets.extend(tag_targets(docs, output_root, base_url));
    targets.push(front_page_target(docs, output_root, site));
    targets
}

/// Fail on the first output path claimed by two targets.
///
/// Paths are compared case-insensitively: on the default macOS and Windows
/// file systems `a.html` and `A.html` are the same file.
pub fn check_collisions(targets: &[RenderTarget]) -> Result<(), Collision> {
    let mut seen: HashMap<String, &str> = HashMap::with_capacity(targets.len());
    for target in targets {
        let key = target.route.output_path.to_string_lossy().to_lowercase();
        if let Some(first) = seen.insert(key, target.origin.as_str()) {
            return Err(Collision {
                path: target.route.output_path.clone(),
                first: first.to_string(),
                second: target.origin.clone(),
            });
        }
    }
    Ok(())
}
