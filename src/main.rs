use clap::{Parser, Subcommand};
use markpress::site::{self, BuildPaths};
use markpress::template::Templates;
use markpress::{config, logging, output};
use std::path::PathBuf;
use std::process::ExitCode;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once, at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "markpress")]
#[command(about = "Static site generator for markdown blogs")]
#[command(long_about = "\
Static site generator for markdown blogs

Markdown files become HTML pages, every tag gets a listing page, and the
front page lists all posts newest first.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── hello.md                     # → public/hello.html
  └── 2024/
      └── rust.md                  # → public/2024/rust.html

Front-matter:

  ---
  title: Hello               # required
  summary: A first post      # or `description`
  image: /img/hello.png      # social-card image
  date: 2024-01-01           # ISO-8601, newest posts listed first
  tags: [rust, web]          # → public/tag/rust.html, public/tag/web.html
  ---

Templates (post.html, tag.html, index.html) are read from the templates
directory; missing ones fall back to built-in defaults.

Run 'markpress gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "public", global = true)]
    output: PathBuf,

    /// Template directory
    #[arg(long, default_value = "templates", global = true)]
    templates: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Build the full site (the default)
    Build,
    /// Parse all content and check for errors without writing
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let paths = BuildPaths::new(&cli.source, &cli.output);

    match cli.command.unwrap_or(Command::Build) {
        Command::Build => {
            let site_config = config::load_config(&paths.content_root)?;
            init_thread_pool(&site_config.processing);
            let templates = Templates::load(&cli.templates)?;
            output::print_templates(&templates);

            println!("==> Building {} → {}", paths.content_root.display(), paths.output_root.display());
            let report = site::build(&paths, &site_config, &templates)?;
            output::print_build_output(&report, &paths.output_root);

            println!("==> Build complete: {}", paths.output_root.display());
        }
        Command::Check => {
            let site_config = config::load_config(&paths.content_root)?;
            init_thread_pool(&site_config.processing);
            println!("==> Checking {}", paths.content_root.display());
            let parsed = site::check(&paths, &site_config)?;
            output::print_scan_output(&parsed, &paths.content_root);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; config can lower the count, not raise it.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
