//! Diagnostic logging.
//!
//! User-facing build output goes through [`crate::output`]; this module only
//! sets up `log` records (scan warnings, template fallbacks, per-document
//! debug lines) on stderr. Verbosity follows `RUST_LOG` and defaults to
//! `warn`, so a normal build prints warnings and nothing else.

use colored::Colorize;
use env_logger::{Builder, Env};
use log::Level;
use std::io::Write;

pub fn init_logging() {
    let env = Env::default().filter_or("RUST_LOG", "warn");
    Builder::from_env(env)
        .format(|buf, record| {
            let level = match record.level() {
                Level::Error => "error".red().bold(),
                Level::Warn => "warn".yellow().bold(),
                Level::Info => "info".green(),
                Level::Debug | Level::Trace => record.level().as_str().to_lowercase().dimmed(),
            };
            writeln!(
                buf,
                "{} {} {}",
                chrono::Local::now().format("%H:%M:%S").to_string().dimmed(),
                level,
                record.args()
            )
        })
        .try_init()
        .ok();
}
