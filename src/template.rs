//! String templates with placeholder substitution.
//!
//! Page layout lives in plain HTML files so a site can be restyled without
//! recompiling. Each template may contain these tokens, all replaced at every
//! occurrence:
//!
//! | Token | Replacement |
//! |-------|-------------|
//! | `{{TITLE}}` | page title, HTML-escaped |
//! | `{{CONTENT}}` | page body, inserted verbatim (already-rendered HTML) |
//! | `{{TAGS}}` | one `<a href="/tag/<tag>.html">` link per tag, one per line |
//! | `{{PUBLIC}}` | relative path back to the site root (`.`, `..`, `../..`) |
//! | `{{META}}` | `<title>`, description, Open Graph / Twitter card tags, canonical link |
//!
//! Substitution is a single left-to-right pass over the template: text that
//! was inserted for one token is never scanned again, so a post that talks
//! about `{{TITLE}}` in its body keeps it literally. Any other `{{...}}`
//! sequence is copied through unchanged.
//!
//! ## Template set
//!
//! Three templates are read once at startup from the template directory:
//! `post.html`, `tag.html` and `index.html`. A file missing from the
//! directory falls back to the built-in version compiled into the binary.

use crate::types::{RenderTarget, TargetKind};
use log::info;
use maud::{Markup, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
#[error("Cannot read template {name} at {}: {source}", path.display())]
pub struct TemplateError {
    pub name: &'static str,
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

const BUILTIN_POST: &str = include_str!("../templates/post.html");
const BUILTIN_TAG: &str = include_str!("../templates/tag.html");
const BUILTIN_INDEX: &str = include_str!("../templates/index.html");

/// Where a template was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    File(PathBuf),
    Builtin,
}

/// The loaded template set, passed explicitly to every render.
#[derive(Debug, Clone)]
pub struct Templates {
    pub post: String,
    pub tag: String,
    pub index: String,
    /// `(template name, source)` in post, tag, index order.
    pub sources: Vec<(&'static str, TemplateSource)>,
}

impl Templates {
    pub fn builtin() -> Self {
        Self {
            post: BUILTIN_POST.to_string(),
            tag: BUILTIN_TAG.to_string(),
            index: BUILTIN_INDEX.to_string(),
            sources: vec![
                ("post", TemplateSource::Builtin),
                ("tag", TemplateSource::Builtin),
                ("index", TemplateSource::Builtin),
            ],
        }
    }

    /// Read `post.html`, `tag.html` and `index.html` from `dir`.
    pub fn load(dir: &Path) -> Result<Self, TemplateError> {
        let mut sources = Vec::with_capacity(3);
        let post = load_one(dir, "post", BUILTIN_POST, &mut sources)?;
        let tag = load_one(dir, "tag", BUILTIN_TAG, &mut sources)?;
        let index = load_one(dir, "index", BUILTIN_INDEX, &mut sources)?;
        Ok(Self {
            post,
            tag,
            index,
            sources,
        })
    }

    pub fn for_kind(&self, kind: &TargetKind) -> &str {
        match kind {
            TargetKind::Post => &self.post,
            TargetKind::Tag(_) => &self.tag,
            TargetKind::Front => &self.index,
        }
    }
}

fn load_one(
    dir: &Path,
    name: &'static str,
    builtin: &str,
    sources: &mut Vec<(&'static str, TemplateSource)>,
) -> Result<String, TemplateError> {
    let path = dir.join(format!("{name}.html"));
    if !path.exists() {
        info!("template {name}.html not found in {}, using built-in", dir.display());
        sources.push((name, TemplateSource::Builtin));
        return Ok(builtin.to_string());
    }
    let text = fs::read_to_string(&path).map_err(|source| TemplateError {
        name,
        path: path.clone(),
        source,
    })?;
    sources.push((name, TemplateSource::File(path)));
    Ok(text)
}

// ============================================================================
// Substitution
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Token {
    Title,
    Content,
    Tags,
    Public,
    Meta,
}

const TOKENS: &[(&str, Token)] = &[
    ("{{TITLE}}", Token::Title),
    ("{{CONTENT}}", Token::Content),
    ("{{TAGS}}", Token::Tags),
    ("{{PUBLIC}}", Token::Public),
    ("{{META}}", Token::Meta),
];

/// Render `template` for `target`. Never fails; unknown tokens pass through.
pub fn render(template: &str, target: &RenderTarget) -> String {
    let mut out = String::with_capacity(template.len() + target.content.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];
        match TOKENS.iter().find(|(literal, _)| candidate.starts_with(literal)) {
            Some((literal, token)) => {
                push_replacement(&mut out, *token, target);
                rest = &candidate[literal.len()..];
            }
            None => {
                // Advance one brace so `{{{TITLE}}` still finds its token.
                out.push('{');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn push_replacement(out: &mut String, token: Token, target: &RenderTarget) {
    match token {
        Token::Title => out.push_str(&escape_html(&target.metadata.title)),
        Token::Content => out.push_str(&target.content),
        Token::Tags => out.push_str(&tag_links(target.metadata.tags.iter())),
        Token::Public => out.push_str(&target.route.public_prefix),
        Token::Meta => out.push_str(&meta_block(target).into_string()),
    }
}

pub fn escape_html(text: &str) -> String {
    html! { (text) }.into_string()
}

/// Root-relative link to a tag's listing page, matching the route
/// [`crate::pages::tag_targets`] writes it to.
pub fn tag_url(tag: &str) -> String {
    format!("/tag/{}.html", urlencoding::encode(tag))
}

/// `<a>` per tag, newline separated.
pub fn tag_links<'a>(tags: impl Iterator<Item = &'a String>) -> String {
    tags.map(|tag| html! { a href=(tag_url(tag)) { (tag) } }.into_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn absolute_url(base_url: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{base_url}{path}")
    } else {
        path.to_string()
    }
}

fn meta_block(target: &RenderTarget) -> Markup {
    let meta = &target.metadata;
    let canonical = target.canonical_url();
    let og_type = match target.kind {
        TargetKind::Post => "article",
        _ => "website",
    };
    let image = meta
        .image
        .as_deref()
        .map(|img| absolute_url(&target.base_url, img));

    html! {
        title { (meta.title) }
        @if let Some(summary) = &meta.summary {
            meta name="description" content=(summary);
        }
        meta property="og:title" content=(meta.title);
        meta property="og:type" content=(og_type);
        meta property="og:url" content=(canonical);
        @if let Some(summary) = &meta.summary {
            meta property="og:description" content=(summary);
        }
        @if let Some(image) = &image {
            meta property="og:image" content=(image);
            meta name="twitter:card" content="summary_large_image";
            meta name="twitter:image" content=(image);
        } @else {
            meta name="twitter:card" content="summary";
        }
        meta name="twitter:title" content=(meta.title);
        @if let Some(summary) = &meta.summary {
            meta name="twitter:description" content=(summary);
        }
        link rel="canonical" href=(canonical);
    }
}
