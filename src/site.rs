//! The build pipeline.
//!
//! ```text
//! scan ─▶ parse (parallel) ─▶ sort + tag index ─▶ targets ─▶ collision check ─▶ render + write (parallel)
//!                          ▲ barrier: every document parsed before any page is assembled
//! ```
//!
//! The build is all-or-nothing. A document that fails to parse aborts the run
//! before a single file is written, and so does an output path collision; a
//! site with silently missing pages is worse than no new site at all. Scan
//! warnings (unreadable subdirectories) are the one tolerated failure: they
//! are reported and the documents that were found still build.

use crate::config::SiteConfig;
use crate::document::{ParseError, parse_document};
use crate::pages::{self, Collision};
use crate::scan::{self, ScanError, ScanWarning};
use crate::template::{self, TemplateError, Templates};
use crate::types::{Document, RenderTarget, TargetKind};
use crate::write::{WriteError, write_atomic};
use log::debug;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Discovery(#[from] ScanError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Collision(#[from] Collision),
    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Directories a build reads from and writes to.
#[derive(Debug, Clone)]
pub struct BuildPaths {
    pub content_root: PathBuf,
    pub output_root: PathBuf,
}

impl BuildPaths {
    pub fn new(content_root: impl AsRef<Path>, output_root: impl AsRef<Path>) -> Self {
        Self {
            content_root: content_root.as_ref().to_path_buf(),
            output_root: output_root.as_ref().to_path_buf(),
        }
    }
}

/// Documents found and parsed, before any page is assembled.
#[derive(Debug)]
pub struct ParsedSite {
    /// In listing order (newest first).
    pub documents: Vec<Document>,
    pub warnings: Vec<ScanWarning>,
}

/// One page that was written.
#[derive(Debug, Clone)]
pub struct WrittenPage {
    pub kind: TargetKind,
    pub title: String,
    pub output_path: PathBuf,
}

#[derive(Debug)]
pub struct BuildReport {
    pub pages: Vec<WrittenPage>,
    pub warnings: Vec<ScanWarning>,
}

impl BuildReport {
    pub fn count(&self, pred: impl Fn(&TargetKind) -> bool) -> usize {
        self.pages.iter().filter(|p| pred(&p.kind)).count()
    }
}

/// Scan and parse every document under the content root.
pub fn parse_site(paths: &BuildPaths) -> Result<ParsedSite, BuildError> {
    let scanned = scan::scan(&paths.content_root)?;

    let mut documents = scanned
        .files
        .par_iter()
        .map(|file| -> Result<Document, ParseError> {
            let doc = parse_document(file, &paths.content_root, &paths.output_root)?;
            debug!("parsed {} → {}", file.display(), doc.route.url);
            Ok(doc)
        })
        .collect::<Result<Vec<_>, ParseError>>()?;

    pages::sort_documents(&mut documents);

    Ok(ParsedSite {
        documents,
        warnings: scanned.warnings,
    })
}

/// Assemble every page of an already parsed site, failing on collisions.
pub fn plan_site(
    parsed: &ParsedSite,
    paths: &BuildPaths,
    config: &SiteConfig,
) -> Result<Vec<RenderTarget>, Collision> {
    let targets = pages::build_targets(&parsed.documents, &paths.output_root, &config.site);
    pages::check_collisions(&targets)?;
    Ok(targets)
}

/// Render and write `targets`. Each target owns a distinct output path.
pub fn write_site(
    targets: &[RenderTarget],
    templates: &Templates,
) -> Result<Vec<WrittenPage>, WriteError> {
    targets.par_iter().try_for_each(|target| {
        let html = template::render(templates.for_kind(&target.kind), target);
        write_atomic(&target.route.output_path, html.as_bytes())
    })?;

    Ok(targets
        .iter()
        .map(|t| WrittenPage {
            kind: t.kind.clone(),
            title: t.metadata.title.clone(),
            output_path: t.route.output_path.clone(),
        })
        .collect())
}

/// Run the full build.
pub fn build(
    paths: &BuildPaths,
    config: &SiteConfig,
    templates: &Templates,
) -> Result<BuildReport, BuildError> {
    let parsed = parse_site(paths)?;
    let targets = plan_site(&parsed, paths, config)?;
    let pages = write_site(&targets, templates)?;
    Ok(BuildReport {
        pages,
        warnings: parsed.warnings,
    })
}

/// Check that the site builds without writing anything.
pub fn check(paths: &BuildPaths, config: &SiteConfig) -> Result<ParsedSite, BuildError> {
    let parsed = parse_site(paths)?;
    plan_site(&parsed, paths, config)?;
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{setup_fixtures, write_post};
    use std::fs;
    use tempfile::TempDir;

    fn paths(tmp: &TempDir) -> BuildPaths {
        BuildPaths::new(tmp.path().join("content"), tmp.path().join("out"))
    }

    #[test]
    fn builds_fixture_site() {
        let tmp = setup_fixtures();
        let paths = paths(&tmp);
        let config = crate::config::load_config(&paths.content_root).unwrap();

        let report = build(&paths, &config, &Templates::builtin()).unwrap();

        let posts = report.count(|k| *k == TargetKind::Post);
        let parsed = parse_site(&paths).unwrap();
        assert_eq!(posts, parsed.documents.len());
        assert!(paths.output_root.join("index.html").is_file());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn parse_failure_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let paths = paths(&tmp);
        write_post(&paths.content_root, "good.md", "Good", Some("2024-01-01"), &["x"]);
        fs::write(paths.content_root.join("bad.md"), "---\nsummary: untitled\n---\n").unwrap();

        let err = build(&paths, &SiteConfig::default(), &Templates::builtin()).unwrap_err();

        match err {
            BuildError::Parse(e) => assert_eq!(e.path, paths.content_root.join("bad.md")),
            other => panic!("expected parse error, got {other:?}"),
        }
        assert!(!paths.output_root.exists());
    }

    #[test]
    fn collision_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let paths = paths(&tmp);
        write_post(&paths.content_root, "a.md", "A", None, &[]);
        write_post(&paths.content_root, "a.MD", "A again", None, &[]);

        let err = build(&paths, &SiteConfig::default(), &Templates::builtin()).unwrap_err();

        assert!(matches!(err, BuildError::Collision(ref c) if c.path == paths.output_root.join("a.html")));
        assert!(!paths.output_root.exists());
    }

    #[test]
    fn missing_content_root_is_discovery_error() {
        let tmp = TempDir::new().unwrap();
        let err = build(&paths(&tmp), &SiteConfig::default(), &Templates::builtin()).unwrap_err();
        assert!(matches!(err, BuildError::Discovery(ScanError::RootNotFound(_))));
    }

    #[test]
    fn check_does_not_write() {
        let tmp = TempDir::new().unwrap();
        let paths = paths(&tmp);
        write_post(&paths.content_root, "a.md", "A", None, &["x"]);

        let parsed = check(&paths, &SiteConfig::default()).unwrap();

        assert_eq!(parsed.documents.len(), 1);
        assert!(!paths.output_root.exists());
    }

    #[test]
    fn rebuild_is_byte_identical() {
        let tmp = setup_fixtures();
        let paths = paths(&tmp);
        let config = SiteConfig::default();

        build(&paths, &config, &Templates::builtin()).unwrap();
        let first = fs::read_to_string(paths.output_root.join("index.html")).unwrap();
        build(&paths, &config, &Templates::builtin()).unwrap();
        let second = fs::read_to_string(paths.output_root.join("index.html")).unwrap();

        assert_eq!(first, second);
    }
}
