//! Tool configuration module.
//!
//! Handles loading, validating, and merging `media-manifest.toml`. Stock
//! defaults are serialized to a TOML table, the user file is merged over it
//! key by key, and the result is deserialized with unknown keys rejected.
//! Command-line flags override the merged values afterwards.
//!
//! ## Keys
//!
//! ```toml
//! # Every key is optional; defaults shown
//!
//! projects_root = "public/projects"  # One subdirectory per project
//! public_prefix = "/projects"        # URL prefix for `src` paths
//! public_dir = "public"              # Served as static files by `serve`
//!
//! [collage]
//! max_height = 300                   # Layout height cap (and GIF floor)
//!
//! [output]
//! dir = "generated"                  # Where `build` writes artifacts
//! format = "ts"                      # "ts" or "json"
//!
//! [server]
//! host = "0.0.0.0"
//! port = 3000
//!
//! [processing]
//! max_processes = 4                  # Max parallel probes (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Only the keys you set are overridden:
//!
//! ```toml
//! [collage]
//! max_height = 240
//! ```

use crate::emit::ArtifactFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILENAME: &str = "media-manifest.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tool configuration loaded from `media-manifest.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManifestConfig {
    /// Directory holding one subdirectory per project.
    pub projects_root: String,
    /// URL prefix the front end uses to reach `projects_root`.
    pub public_prefix: String,
    /// Static file root for the dev server.
    pub public_dir: String,
    /// Collage sizing.
    pub collage: CollageConfig,
    /// Static artifact settings for `build`.
    pub output: OutputConfig,
    /// Dev server bind address.
    pub server: ServerConfig,
    /// Parallel probing settings.
    pub processing: ProcessingConfig,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            projects_root: "public/projects".to_string(),
            public_prefix: "/projects".to_string(),
            public_dir: "public".to_string(),
            collage: CollageConfig::default(),
            output: OutputConfig::default(),
            server: ServerConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl ManifestConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.collage.max_height == 0 {
            return Err(ConfigError::Validation(
                "collage.max_height must be greater than 0".into(),
            ));
        }
        if !self.public_prefix.starts_with('/') {
            return Err(ConfigError::Validation(
                "public_prefix must start with '/'".into(),
            ));
        }
        if self.projects_root.trim().is_empty() {
            return Err(ConfigError::Validation(
                "projects_root must not be empty".into(),
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

/// Collage layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollageConfig {
    /// Tallest layout height for collage images, in pixels. Animated GIFs
    /// are also scaled up to this height.
    pub max_height: u32,
}

impl Default for CollageConfig {
    fn default() -> Self {
        Self { max_height: 300 }
    }
}

/// Static artifact settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub dir: String,
    pub format: ArtifactFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "generated".to_string(),
            format: ArtifactFormat::TypeScript,
        }
    }
}

/// Dev server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel probe workers.
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
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ManifestConfig::default()).unwrap_or_else(|_| {
        toml::Value::Table(toml::map::Map::new())
    })
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load the config file at `path`, falling back to stock defaults when the
/// file does not exist.
pub fn load_config(path: &Path) -> Result<ManifestConfig, ConfigError> {
    let overlay = if path.exists() {
        let content = fs::read_to_string(path)?;
        Some(toml::from_str::<toml::Value>(&content)?)
    } else {
        tracing::debug!("No config at {}, using defaults", path.display());
        None
    };

    let merged = match overlay {
        Some(ov) => merge_toml(stock_defaults_value(), ov),
        None => stock_defaults_value(),
    };
    let config: ManifestConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `media-manifest.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# media-manifest configuration
# ============================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# Directory holding one subdirectory per project. Each project may contain
# `collage/`, `approach/`, and `prototypes/` folders.
projects_root = "public/projects"

# URL prefix for asset `src` paths, as seen by the browser.
public_prefix = "/projects"

# Served as static files by `media-manifest serve`.
public_dir = "public"

# ---------------------------------------------------------------------------
# Collage sizing
# ---------------------------------------------------------------------------
[collage]
# Images taller than this are scaled down for layout. Animated GIFs are also
# scaled up to exactly this height.
max_height = 300

# ---------------------------------------------------------------------------
# Static artifacts (`media-manifest build`)
# ---------------------------------------------------------------------------
[output]
dir = "generated"
# "ts" writes importable TypeScript modules, "json" writes plain manifests.
format = "ts"

# ---------------------------------------------------------------------------
# Dev server (`media-manifest serve`)
# ---------------------------------------------------------------------------
[server]
host = "0.0.0.0"
port = 3000

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel image probes.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
