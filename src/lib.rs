//! # markpress
//!
//! A minimal static site generator for markdown blogs. A directory of
//! markdown files with YAML front-matter becomes a directory of HTML pages,
//! plus one listing page per tag and a front page.
//!
//! # Pipeline
//!
//! ```text
//! 1. Scan      content/      →  markdown file list       (sorted, hidden entries skipped)
//! 2. Parse     file list     →  documents                (parallel; HTML + front-matter + route)
//! 3. Assemble  documents     →  render targets           (posts, tag pages, front page)
//! 4. Write     targets       →  public/                  (templates filled in, atomic writes)
//! ```
//!
//! Stage 2 is a barrier: tag pages and the front page aggregate over the
//! whole document set, so nothing is assembled until everything has parsed.
//! Any error aborts the build before the first page is written.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: walks the content directory for markdown files |
//! | [`markdown`] | pulldown-cmark rendering and YAML front-matter extraction |
//! | [`document`] | Stage 2: one file to one [`types::Document`], front-matter validation |
//! | [`route`] | Output path, public URL and `{{PUBLIC}}` prefix derivation |
//! | [`pages`] | Stage 3: post, tag and front-page targets; ordering; collision check |
//! | [`template`] | Template loading and `{{TOKEN}}` substitution |
//! | [`write`] | Stage 4: atomic file writes |
//! | [`site`] | The pipeline wiring the stages together |
//! | [`config`] | `config.toml` loading and validation |
//! | [`types`] | Shared types (`Metadata`, `Document`, `RenderTarget`) |
//! | [`output`] | CLI output formatting |
//! | [`logging`] | Diagnostic log setup |
//!
//! # Design Decisions
//!
//! ## String Templates Over a Template Engine
//!
//! Layout is plain HTML with five fixed tokens (`{{TITLE}}`, `{{CONTENT}}`,
//! `{{TAGS}}`, `{{PUBLIC}}`, `{{META}}`). The token set is small enough that a
//! single substitution pass covers it, and authors can restyle a site without
//! learning a template language. Generated fragments (post cards, meta tags,
//! tag links) are built with [Maud](https://maud.lambda.xyz/), so everything
//! interpolated from front-matter is escaped.
//!
//! ## Relative Asset Prefix
//!
//! Templates reference site-root assets through `{{PUBLIC}}`, a chain of `..`
//! segments matching the page depth, so stylesheets and images resolve from
//! any page wherever the output directory is served. Links between pages
//! (post cards, tag links) are root-relative (`/b/c.html`, `/tag/x.html`)
//! and expect the site to be served from a domain root.
//!
//! ## All-or-Nothing Builds
//!
//! A failed document fails the build. Publishing a site with some pages
//! silently missing is worse than keeping the previous build.

pub mod config;
pub mod document;
pub mod logging;
pub mod markdown;
pub mod output;
pub mod pages;
pub mod route;
pub mod scan;
pub mod site;
pub mod template;
pub mod types;
pub mod write;

#[cfg(test)]
pub(crate) mod test_helpers;
