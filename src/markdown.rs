//! Markdown engine adapter.
//!
//! Splits a document into its YAML front-matter and its HTML body in a single
//! pulldown-cmark pass. The metadata block is only recognised at the very
//! start of the file:
//!
//! ```markdown
//! ---
//! title: Hello
//! date: 2024-01-01
//! tags: [rust, web]
//! ---
//!
//! Body text.
//! ```

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd, html};
use serde::Deserialize;

/// Front-matter as written by the author. Unknown keys are ignored so posts
/// can carry fields for other tools.
///
/// Alternative spellings may appear together; the first key listed wins:
/// `summary` over `description`, `date` over `published_at` over
/// `publishedAt`.
#[derive(Debug, Default, Deserialize)]
#[serde(from = "RawFrontMatter")]
pub struct FrontMatter {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub image: Option<String>,
    pub date: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct RawFrontMatter {
    title: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    image: Option<String>,
    date: Option<String>,
    published_at: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at_camel: Option<String>,
    tags: Vec<String>,
}

impl From<RawFrontMatter> for FrontMatter {
    fn from(raw: RawFrontMatter) -> Self {
        Self {
            title: raw.title,
            summary: raw.summary.or(raw.description),
            image: raw.image,
            date: raw.date.or(raw.published_at).or(raw.published_at_camel),
            tags: raw.tags,
        }
    }
}

#[derive(Debug)]
pub struct Rendered {
    pub front_matter: FrontMatter,
    pub html: String,
}

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Render markdown to HTML, returning the decoded front-matter alongside.
pub fn render(source: &str) -> Result<Rendered, serde_yaml::Error> {
    let mut yaml = String::new();
    let mut in_metadata = false;
    let mut events = Vec::new();

    for event in Parser::new_ext(source, options()) {
        match event {
            Event::Start(Tag::MetadataBlock(_)) => in_metadata = true,
            Event::End(TagEnd::MetadataBlock(_)) => in_metadata = false,
            Event::Text(ref text) if in_metadata => yaml.push_str(text),
            _ => events.push(event),
        }
    }

    let front_matter = if yaml.trim().is_empty() {
        FrontMatter::default()
    } else {
        serde_yaml::from_str(&yaml)?
    };

    let mut html_output = String::new();
    html::push_html(&mut html_output, events.into_iter());

    Ok(Rendered {
        front_matter,
        html: html_output,
    })
}
