pub mod schema;

use std::path::{Path, PathBuf};

use crate::error::StatuslineError;

pub use schema::StatuslineConfig;

/// Environment variable that overrides the config location.
pub const CONFIG_ENV: &str = "CCSL_CONFIG";

/// `$CCSL_CONFIG`, else `~/.claude/statusline-config.json`.
pub fn config_path() -> Option<PathBuf> {
    std::env::var_os(CONFIG_ENV)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".claude").join("statusline-config.json")))
}

/// Load the user configuration. A missing, unreadable, or malformed file
/// yields the built-in default.
pub fn load() -> StatuslineConfig {
    match config_path() {
        Some(path) => load_from(&path),
        None => StatuslineConfig::default(),
    }
}

pub fn load_from(path: &Path) -> StatuslineConfig {
    match std::fs::read_to_string(path) {
        Ok(contents) => StatuslineConfig::from_json(&contents),
        Err(e) => {
            tracing::debug!("no config at {}: {}", path.display(), e);
            StatuslineConfig::default()
        }
    }
}

/// Pretty-printed JSON as written to disk.
pub fn to_json(config: &StatuslineConfig) -> Result<String, StatuslineError> {
    Ok(serde_json::to_string_pretty(config)?)
}

/// Write `config` to `path`, creating parent directories.
pub fn save(config: &StatuslineConfig, path: &Path) -> Result<(), StatuslineError> {
    let json = to_json(config)?;
    let write_err = |source| StatuslineError::ConfigWrite {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, format!("{}\n", json)).map_err(write_err)
}
