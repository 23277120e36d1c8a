//! Configuration file management.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use medstock_store::SaveMode;
use serde::{Deserialize, Serialize};

use crate::cli::{ConfigKey, DataArgs, OutputFormat, parse_bool_arg};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Inventory file path
    #[serde(default)]
    pub inventory_file: Option<PathBuf>,

    /// History file path
    #[serde(default)]
    pub history_file: Option<PathBuf>,

    /// Record actions in the history file
    #[serde(default = "default_true")]
    pub history: bool,

    /// When the interactive menu writes the inventory file
    #[serde(default)]
    pub save_mode: SaveMode,

    /// Disable colored output
    #[serde(default)]
    pub no_color: bool,

    /// Default output format
    #[serde(default)]
    pub format: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inventory_file: None,
            history_file: None,
            history: true,
            save_mode: SaveMode::default(),
            no_color: false,
            format: None,
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("medstock")
            .join("config.toml")
    }

    /// Config file path, honouring `--config` / `MEDSTOCK_CONFIG`
    pub fn path(data: &DataArgs) -> PathBuf {
        data.config.clone().unwrap_or_else(Self::default_path)
    }

    /// Load config from file, or return default if not found
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config: {}", e);
                    }
                },
                Err(e) => {
                    eprintln!("Warning: Failed to read config: {}", e);
                }
            }
        }
        Self::default()
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Current value of `key`, or `None` if unset
    pub fn get(&self, key: ConfigKey) -> Option<String> {
        match key {
            ConfigKey::InventoryFile => {
                self.inventory_file.as_ref().map(|p| p.display().to_string())
            }
            ConfigKey::HistoryFile => self.history_file.as_ref().map(|p| p.display().to_string()),
            ConfigKey::History => Some(self.history.to_string()),
            ConfigKey::SaveMode => Some(save_mode_name(self.save_mode).to_string()),
            ConfigKey::NoColor => Some(self.no_color.to_string()),
            ConfigKey::Format => self.format.clone(),
        }
    }

    /// Set `key` from its textual form, validating the value
    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<()> {
        match key {
            ConfigKey::InventoryFile => self.inventory_file = Some(PathBuf::from(value)),
            ConfigKey::HistoryFile => self.history_file = Some(PathBuf::from(value)),
            ConfigKey::History => {
                self.history = parse_bool_arg(value).map_err(anyhow::Error::msg)?
            }
            ConfigKey::SaveMode => self.save_mode = parse_save_mode(value)?,
            ConfigKey::NoColor => {
                self.no_color = parse_bool_arg(value).map_err(anyhow::Error::msg)?
            }
            ConfigKey::Format => {
                parse_format(value)?;
                self.format = Some(value.to_lowercase());
            }
        }
        Ok(())
    }

    /// Reset `key` to its default
    pub fn unset(&mut self, key: ConfigKey) {
        let defaults = Self::default();
        match key {
            ConfigKey::InventoryFile => self.inventory_file = None,
            ConfigKey::HistoryFile => self.history_file = None,
            ConfigKey::History => self.history = defaults.history,
            ConfigKey::SaveMode => self.save_mode = defaults.save_mode,
            ConfigKey::NoColor => self.no_color = defaults.no_color,
            ConfigKey::Format => self.format = None,
        }
    }
}

fn save_mode_name(mode: SaveMode) -> &'static str {
    match mode {
        SaveMode::Immediate => "immediate",
        SaveMode::OnExit => "on-exit",
    }
}

fn parse_save_mode(value: &str) -> Result<SaveMode> {
    match value.to_lowercase().as_str() {
        "immediate" => Ok(SaveMode::Immediate),
        "on-exit" | "on_exit" | "onexit" => Ok(SaveMode::OnExit),
        _ => bail!("Invalid save mode '{}'. Use: immediate, on-exit", value),
    }
}

fn parse_format(value: &str) -> Result<OutputFormat> {
    match value.to_lowercase().as_str() {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        _ => bail!("Invalid format '{}'. Use: text, json", value),
    }
}

/// Resolve inventory path from arg/env var, then config, then the default
pub fn resolve_inventory_path(data: &DataArgs, config: &Config) -> PathBuf {
    data.inventory
        .clone()
        .or_else(|| config.inventory_file.clone())
        .unwrap_or_else(medstock_store::default_inventory_path)
}

/// Resolve the history path, or `None` when history is disabled
pub fn resolve_history_path(data: &DataArgs, config: &Config) -> Option<PathBuf> {
    if data.no_history || !config.history {
        return None;
    }
    Some(
        data.history_file
            .clone()
            .or_else(|| config.history_file.clone())
            .unwrap_or_else(medstock_store::default_history_path),
    )
}

/// Resolve output format: explicit flag, then config, then text.
/// An unrecognised configured format falls back to text.
pub fn resolve_format(format: Option<OutputFormat>, config: &Config) -> OutputFormat {
    format
        .or_else(|| config.format.as_deref().and_then(|f| parse_format(f).ok()))
        .unwrap_or_default()
}
