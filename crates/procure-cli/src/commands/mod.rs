pub mod commodities;
pub mod config;
pub mod extract;

use std::path::{Path, PathBuf};

use procure_core::ProcureConfig;
use tracing::debug;

/// `~/.config/procure/config.json` or the platform equivalent.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("procure")
        .join("config.json")
}

/// Path given with `--config`, else the default location.
pub fn resolve_config_path(config_path: Option<&str>) -> PathBuf {
    config_path.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load configuration, falling back to defaults when no file exists.
///
/// An explicitly given path must exist.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<ProcureConfig> {
    if let Some(path) = config_path {
        return Ok(ProcureConfig::from_file(Path::new(path))?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading config from {}", path.display());
        Ok(ProcureConfig::from_file(&path)?)
    } else {
        Ok(ProcureConfig::default())
    }
}
