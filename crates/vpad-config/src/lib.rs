//! Configuration management for vpad
//!
//! Touch-control layouts and dispatch settings in TOML. The system file is
//! loaded first and the user's file is merged over it, so a user file only
//! needs the keys it changes.

mod dispatch;
mod layout;

pub use dispatch::DispatchConfig;
pub use layout::{ButtonConfig, default_buttons, validate_buttons};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Standard configuration paths
pub const CONFIG_DIR: &str = "/etc/vpad";
pub const CONFIG_FILE: &str = "layout.toml";

/// Per-user configuration directory (`$HOME/.config/vpad`)
pub fn user_config_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config").join("vpad"))
}

/// Main vpad configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PadConfig {
    #[serde(default)]
    pub dispatch: DispatchConfig,

    #[serde(default = "default_buttons")]
    pub buttons: Vec<ButtonConfig>,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            dispatch: DispatchConfig::default(),
            buttons: default_buttons(),
        }
    }
}

impl PadConfig {
    /// Load and validate configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load_default() -> Result<Self, ConfigError> {
        let mut paths = vec![Path::new(CONFIG_DIR).join(CONFIG_FILE)];
        if let Some(dir) = user_config_dir() {
            paths.push(dir.join(CONFIG_FILE));
        }
        Self::load_layered(&paths)
    }

    /// Merge every existing file in `paths`, later files overriding earlier ones.
    ///
    /// Arrays are replaced wholesale, so a user `[[buttons]]` list replaces the
    /// system layout rather than extending it.
    pub fn load_layered(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        let mut merged: Option<toml::Value> = None;

        for path in paths.iter().filter(|p| p.exists()) {
            let table: toml::Table = std::fs::read_to_string(path)?.parse()?;
            tracing::debug!("Loaded configuration layer {}", path.display());
            match merged.as_mut() {
                Some(base) => merge_toml(base, toml::Value::Table(table)),
                None => merged = Some(toml::Value::Table(table)),
            }
        }

        let Some(merged) = merged else {
            tracing::warn!("No configuration file found, using defaults");
            return Ok(Self::default());
        };

        let config: Self = merged.try_into()?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.dispatch.axis_epsilon.is_finite() || self.dispatch.axis_epsilon < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "axis_epsilon must be a non-negative number, got {}",
                self.dispatch.axis_epsilon
            )));
        }
        validate_buttons(&self.buttons, self.dispatch.axis_epsilon)
    }

    pub fn button(&self, name: &str) -> Option<&ButtonConfig> {
        self.buttons.iter().find(|b| b.name == name)
    }
}

/// Helper function to merge TOML values
pub fn merge_toml(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                if let Some(base_value) = base_table.get_mut(&key) {
                    merge_toml(base_value, value);
                } else {
                    base_table.insert(key, value);
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
