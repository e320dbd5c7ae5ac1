//! Site configuration module.
//!
//! Handles loading and validating `config.toml`. The file lives in
//! the content root next to the markdown it describes:
//!
//! ```text
//! content/
//! ├── config.toml              # Site config (overrides stock defaults)
//! ├── hello.md
//! └── 2024/
//!     └── rust.md
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "My Blog"         # Front page title
//! description = ""          # Front page description (meta description)
//! base_url = ""             # Origin for canonical / Open Graph URLs
//! # image = "/cover.png"    # Social-card image for the front page
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [site]
//! title = "Field Notes"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Name of the config file within the content root.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site identity used by the front page and meta tags.
    pub site: SiteSection,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site.title must not be empty".into(),
            ));
        }
        let base = &self.site.base_url;
        if !base.is_empty() && !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::Validation(
                "site.base_url must be empty or start with http:// or https://".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Site identity.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    /// Front page title.
    pub title: String,
    /// Front page description.
    pub description: String,
    /// Origin prepended to page URLs in canonical links and Open Graph tags,
    /// e.g. `https://example.com`. Empty keeps them root-relative.
    pub base_url: String,
    /// Social-card image for the front page.
    pub image: Option<String>,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            description: String::new(),
            base_url: String::new(),
            image: None,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel parse/write workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading and validation
// =============================================================================

/// Load config from `config.toml` in the given directory.
///
/// A missing file yields the defaults. Keys absent from the file keep their
/// default values; unknown keys are rejected. The result is validated.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let config_path = root.join(CONFIG_FILENAME);
    let config: SiteConfig = if config_path.exists() {
        let content = fs::read_to_string(&config_path)?;
        toml::from_str(&content)?
    } else {
        SiteConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# markpress configuration
# =======================
# Place this file in the content root as config.toml.
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
# Title of the front page (index.html).
title = "My Blog"

# Description of the front page, used for <meta name="description">.
description = ""

# Origin prepended to page URLs in canonical links and Open Graph tags,
# e.g. "https://example.com". Leave empty to keep URLs root-relative.
base_url = ""

# Social-card image for the front page (absolute URL or /root-relative path).
# image = "/cover.png"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel parse/write workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = SiteConfig::default();
        assert_eq!(config.site.title, "My Blog");
        assert_eq!(config.site.description, "");
        assert_eq!(config.site.base_url, "");
        assert!(config.site.image.is_none());
        assert!(config.processing.max_processes.is_none());
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
[site]
title = "Field Notes"
"##;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.site.title, "Field Notes");
        assert_eq!(config.site.base_url, "");
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site, SiteSection::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            r##"
[site]
title = "Notes"
description = "Things"
base_url = "https://example.com"
image = "/cover.png"

[processing]
max_processes = 2
"##,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.title, "Notes");
        assert_eq!(config.site.description, "Things");
        assert_eq!(config.site.base_url, "https://example.com");
        assert_eq!(config.site.image.as_deref(), Some("/cover.png"));
        assert_eq!(config.processing.max_processes, Some(2));
    }

    #[test]
    fn load_config_partial_file_keeps_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "[processing]\nmax_processes = 3").unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site, SiteSection::default());
        assert_eq!(config.processing.max_processes, Some(3));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "[site\ntitle = ").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[site]\ntitel = \"typo\"");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[colors]\nbg = \"#fff\"");
        assert!(result.is_err());
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_empty_title() {
        let mut config = SiteConfig::default();
        config.site.title = "  ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_base_url_scheme() {
        let mut config = SiteConfig::default();
        config.site.base_url = "example.com".to_string();
        assert!(config.validate().is_err());
        config.site.base_url = "https://example.com".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_zero_processes() {
        let mut config = SiteConfig::default();
        config.processing.max_processes = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "[site]\ntitle = \"\"").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    // =========================================================================
    // Threads
    // =========================================================================

    #[test]
    fn effective_threads_auto() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&ProcessingConfig::default()), cores);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let config = ProcessingConfig {
            max_processes: Some(cores + 64),
        };
        assert_eq!(effective_threads(&config), cores);
    }

    // =========================================================================
    // Stock config
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config.site, SiteSection::default());
        assert!(config.processing.max_processes.is_none());
    }

}
