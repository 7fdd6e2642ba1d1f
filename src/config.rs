//! Resolver configuration module.
//!
//! Handles loading and validating `catalog-images.toml`. The file is
//! optional: stock defaults apply when it is missing, and a present file only
//! needs the keys it wants to override.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [images]
//! placeholder = "/images/placeholder.svg"  # Returned when nothing else resolves
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::resolve::DEFAULT_PLACEHOLDER;

/// File name looked up in the working directory when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "catalog-images.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `catalog-images.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Image resolution settings (placeholder).
    pub images: ImagesConfig,
    /// Parallel enrichment settings.
    pub processing: ProcessingConfig,
}

impl ResolverConfig {
    /// Validate config values are within acceptable ranges.
    ///
    /// The resolver tolerates an empty placeholder; a config file may not set one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.images.placeholder.is_empty() {
            return Err(ConfigError::Validation(
                "images.placeholder must not be empty".into(),
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

/// Image resolution settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Display path returned when a product has no usable image data.
    pub placeholder: String,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

/// Parallel enrichment settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel enrichment workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

impl ProcessingConfig {
    /// Worker count for the rayon pool: `max_processes` capped at the core
    /// count, or every core when unset.
    pub fn worker_count(&self) -> usize {
        let cores = std::thread::available_parallelism().map_or(1, |n| n.get());
        match self.max_processes {
            Some(limit) => limit.min(cores),
            None => cores,
        }
    }
}

// =============================================================================
// Config loading and validation
// =============================================================================

/// Parse and validate config text.
///
/// Every section and key has a default, so a sparse file fills in the rest.
pub fn parse_config(content: &str) -> Result<ResolverConfig, ConfigError> {
    let config: ResolverConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load `catalog-images.toml` from the given directory, falling back to
/// defaults when it is missing.
pub fn load_config(dir: &Path) -> Result<ResolverConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using stock defaults");
        return Ok(ResolverConfig::default());
    }
    load_config_file(&path)
}

/// Load config from an explicit file path. A missing file is an error.
pub fn load_config_file(path: &Path) -> Result<ResolverConfig, ConfigError> {
    let config = parse_config(&fs::read_to_string(path)?)?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

/// Returns a fully-commented stock `catalog-images.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# catalog-images configuration
# ============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Image resolution
# ---------------------------------------------------------------------------
[images]
# Display path returned when a product has no local path, no primary image
# URL and no image URL. Must not be empty.
placeholder = "/images/placeholder.svg"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers used by `enrich`.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
