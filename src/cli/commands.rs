//! Subcommand handlers for config actions.

use std::path::{Path, PathBuf};

use crate::config::{Config, ConfigError, DEFAULT_CONFIG_TOML};

/// Render the effective configuration and where it came from.
pub fn render_config(config: &Config, config_path: &Path) -> String {
    let body = toml::to_string_pretty(config)
        .unwrap_or_else(|e| format!("# failed to render configuration: {}\n", e));
    let origin = if config_path.exists() {
        "exists"
    } else {
        "not found, showing defaults"
    };
    format!(
        "# Config file: {} ({})\n\n{}",
        config_path.display(),
        origin,
        body
    )
}

/// Write the commented default config file to `config_path`.
///
/// Creates parent directories as needed. Refuses to overwrite an existing file.
pub fn init_config(config_path: &Path) -> Result<PathBuf, ConfigError> {
    if config_path.exists() {
        return Err(ConfigError::Invalid(format!(
            "Config file already exists: {}. Use 'face-recorder config show' to view current settings.",
            config_path.display()
        )));
    }

    let io_error = |e| ConfigError::Io {
        path: config_path.to_path_buf(),
        source: e,
    };
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    std::fs::write(config_path, DEFAULT_CONFIG_TOML).map_err(io_error)?;

    Ok(config_path.to_path_buf())
}
