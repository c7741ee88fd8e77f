//! Engine config file I/O
//!
//! The editor never touches disk. These helpers let the embedding
//! application keep per-device tuning in a YAML file next to its own
//! settings. Whatever comes off disk is passed through
//! [`EngineConfig::sanitized`] before the editor sees it.

use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};

use super::EngineConfig;

/// Read an engine config, surfacing every problem
///
/// `Ok(None)` means there is no file at `path`. Parse and read errors are
/// returned with the path attached.
pub fn read_engine_config(path: &Path) -> Result<Option<EngineConfig>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read engine config {:?}", path));
        }
    };

    let config: EngineConfig = serde_yaml::from_str(&contents)
        .with_context(|| format!("Invalid engine config YAML in {:?}", path))?;
    Ok(Some(config.sanitized()))
}

/// Load an engine config for startup
///
/// Never fails: a missing or unreadable file yields the defaults, with the
/// reason logged.
pub fn load_engine_config(path: &Path) -> EngineConfig {
    match read_engine_config(path) {
        Ok(Some(config)) => {
            log::info!("Loaded engine config from {:?}", path);
            config
        }
        Ok(None) => {
            log::info!("No engine config at {:?}, using defaults", path);
            EngineConfig::default()
        }
        Err(e) => {
            log::warn!("{:#}; using default engine config", e);
            EngineConfig::default()
        }
    }
}

/// Write the sanitized form of `config`, creating parent directories
pub fn save_engine_config(config: &EngineConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {:?}", parent))?;
    }

    let yaml = serde_yaml::to_string(&config.clone().sanitized())
        .context("Failed to serialize engine config")?;
    std::fs::write(path, yaml)
        .with_context(|| format!("Failed to write engine config {:?}", path))?;

    log::debug!("Engine config saved to {:?}", path);
    Ok(())
}
