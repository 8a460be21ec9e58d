//! Run configuration.
//!
//! Handles loading, validating, and merging `parts.toml`. The file is
//! optional: stock defaults describe the two historical runs, the robot
//! part set and the background set.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [[runs]]
//! name = "parts"                  # Used to select the run on the command line
//! source = "sets/set1/green"      # Part tree to scan
//! output = "src/robot_parts.rs"   # Generated Rust module
//!
//! [[runs]]
//! name = "backgrounds"
//! source = "backgrounds"
//! output = "src/backgrounds.rs"
//!
//! [processing]
//! max_processes = 4               # Max parallel encoders (omit for auto = CPU cores)
//! verify = false                  # Decode every encoding back and check dimensions
//! ```
//!
//! ## Merging
//!
//! User values are merged over the stock defaults: tables key by key,
//! arrays replaced wholesale. Declaring any `[[runs]]` therefore replaces
//! both default runs.
//!
//! Encoding quality and effort are not configurable: they are fixed in
//! [`imaging`](crate::imaging).
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILENAME: &str = "parts.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `parts.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollectConfig {
    /// Generations to perform, in order.
    pub runs: Vec<RunConfig>,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            runs: vec![
                RunConfig {
                    name: "parts".to_string(),
                    source: PathBuf::from("sets/set1/green"),
                    output: PathBuf::from("src/robot_parts.rs"),
                },
                RunConfig {
                    name: "backgrounds".to_string(),
                    source: PathBuf::from("backgrounds"),
                    output: PathBuf::from("src/backgrounds.rs"),
                },
            ],
            processing: ProcessingConfig::default(),
        }
    }
}

impl CollectConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.runs.is_empty() {
            return Err(ConfigError::Validation(
                "at least one [[runs]] entry is required".into(),
            ));
        }

        let mut names = HashSet::new();
        let mut outputs = HashSet::new();
        for run in &self.runs {
            if run.name.trim().is_empty() {
                return Err(ConfigError::Validation("runs.name must not be empty".into()));
            }
            if !names.insert(run.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate run name '{}'",
                    run.name
                )));
            }
            if !outputs.insert(run.output.as_path()) {
                return Err(ConfigError::Validation(format!(
                    "runs '{}' writes to {}, which another run already writes",
                    run.name,
                    run.output.display()
                )));
            }
        }

        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Look up runs by name. An empty selection means every run.
    pub fn select_runs(&self, names: &[String]) -> Result<Vec<&RunConfig>, ConfigError> {
        if names.is_empty() {
            return Ok(self.runs.iter().collect());
        }
        names
            .iter()
            .map(|name| {
                self.runs.iter().find(|r| &r.name == name).ok_or_else(|| {
                    let known: Vec<&str> = self.runs.iter().map(|r| r.name.as_str()).collect();
                    ConfigError::Validation(format!(
                        "unknown run '{name}'. Available: {}",
                        known.join(", ")
                    ))
                })
            })
            .collect()
    }
}

/// One generation: a part tree in, a Rust module out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub name: String,
    pub source: PathBuf,
    pub output: PathBuf,
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel encoding workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
    /// Decode each encoding back and compare dimensions with the source.
    pub verify: bool,
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
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(CollectConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay, arrays included, replace base values entirely.
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

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<CollectConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: CollectConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the file at `path`.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result. A missing file yields the stock defaults.
pub fn load_config(path: &Path) -> Result<CollectConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `parts.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# robo-parts configuration
# ========================
#
# Every key is optional; the values below are the defaults.
# Paths are relative to the directory robo-parts runs in.

# Each [[runs]] entry turns one part tree into one generated Rust module.
# Declaring any run replaces the default list entirely.

[[runs]]
# Name used to select the run: `robo-parts collect parts`
name = "parts"
# Directory tree to scan. Every directory holding .png files is a category;
# a `name#N` directory name places the category at layer N.
source = "sets/set1/green"
# Generated module (EMPTY, PARTS, PARTS_LENGTH and one array per category).
output = "src/robot_parts.rs"

[[runs]]
name = "backgrounds"
source = "backgrounds"
output = "src/backgrounds.rs"

[processing]
# Maximum parallel encoders. Omit to use every CPU core.
# max_processes = 4

# Decode every encoded part back and check its dimensions.
# Slower, catches encoder regressions.
verify = false
"##
}
