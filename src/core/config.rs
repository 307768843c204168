//! Configuration loading and data directory resolution.

use crate::core::error::BrewlogError;
use crate::core::schemas;
use crate::core::store::StoreKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const HOME_ENV_VAR: &str = "BREWLOG_HOME";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrewlogConfig {
    pub storage: StoreKind,
    pub data_dir: Option<PathBuf>,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for BrewlogConfig {
    fn default() -> Self {
        Self {
            storage: StoreKind::default(),
            data_dir: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// `<platform config dir>/brewlog/brewlog.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("brewlog").join(schemas::CONFIG_FILE_NAME))
}

/// Loads the config file. An explicit path must exist; the default path is
/// optional and its absence means defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<BrewlogConfig, BrewlogError> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(BrewlogError::Config(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(BrewlogConfig::default()),
        },
    };
    parse_config_file(&path)
}

pub fn parse_config_file(path: &Path) -> Result<BrewlogConfig, BrewlogError> {
    let content = fs::read_to_string(path).map_err(|e| {
        BrewlogError::Config(format!("cannot read {}: {}", path.display(), e))
    })?;
    let config: BrewlogConfig = toml::from_str(&content)
        .map_err(|e| BrewlogError::Config(format!("{}: {}", path.display(), e)))?;
    Ok(config)
}

/// Data directory resolution, highest priority first:
/// 1. Command-line argument
/// 2. `BREWLOG_HOME`
/// 3. `data_dir` from the config file
/// 4. Platform data directory
/// 5. `./.brewlog`
pub fn resolve_data_dir(
    cli_arg: Option<&Path>,
    env_value: Option<&str>,
    config: &BrewlogConfig,
) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }
    if let Some(value) = env_value.filter(|v| !v.trim().is_empty()) {
        return PathBuf::from(value);
    }
    if let Some(path) = &config.data_dir {
        return path.clone();
    }
    dirs::data_dir()
        .map(|d| d.join("brewlog"))
        .unwrap_or_else(|| PathBuf::from(".brewlog"))
}
