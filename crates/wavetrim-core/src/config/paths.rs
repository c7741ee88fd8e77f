//! Path utilities for wavetrim configuration files

use std::path::PathBuf;

/// Get the default configuration directory
///
/// Returns: `<platform config dir>/wavetrim`, or `./wavetrim` when the
/// platform has no config directory.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wavetrim")
}

/// Get the default config file path
///
/// # Arguments
/// * `filename` - Config file name (e.g., "engine.yaml")
pub fn default_config_path(filename: &str) -> PathBuf {
    default_config_dir().join(filename)
}
