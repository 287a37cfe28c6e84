//! Loading the typed config for every command.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// The config file could not be read, parsed, or validated, or points at
/// inputs that are not usable.
#[derive(Debug, Error)]
#[error("invalid configuration {path:?}: {message}")]
pub struct ConfigInvalid {
    pub path: PathBuf,
    pub message: String,
}

impl ConfigInvalid {
    pub fn new(path: &Path, message: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<odo_config::Config, ConfigInvalid> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| ConfigInvalid::new(path, format!("read failed: {e}")))?;
    let cfg = odo_config::load_toml(&text)
        .map_err(|e| ConfigInvalid::new(path, format!("parse failed: {e}")))?;
    cfg.validate()
        .map_err(|e| ConfigInvalid::new(path, e.to_string()))?;
    Ok(cfg)
}
