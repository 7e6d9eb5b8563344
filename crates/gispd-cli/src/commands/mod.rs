pub mod batch;
pub mod config;
pub mod process;

use std::path::{Path, PathBuf};

use tracing::debug;

use gispd_core::GispdConfig;

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gispd")
        .join("config.json")
}

/// Load the configuration from `--config`, else the default location, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<GispdConfig> {
    if let Some(path) = config_path {
        return Ok(GispdConfig::from_file(Path::new(path))?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Using configuration {}", path.display());
        Ok(GispdConfig::from_file(&path)?)
    } else {
        Ok(GispdConfig::default())
    }
}
