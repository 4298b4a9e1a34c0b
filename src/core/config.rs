//! Configuration management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Serial link configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialConfig {
    /// Preferred port identifier (e.g. "COM6"); used unconditionally when set
    #[serde(default)]
    pub preferred_port: Option<String>,
    /// Baud rate
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// Blocking-read timeout in milliseconds
    #[serde(default = "default_read_timeout")]
    pub read_timeout_ms: u64,
    /// Maximum accepted line length in bytes; longer unterminated input is discarded
    #[serde(default = "default_max_line_len")]
    pub max_line_len: usize,
    /// Delay after opening the port before the first read, in milliseconds
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,
}

fn default_baud_rate() -> u32 {
    115_200
}
fn default_read_timeout() -> u64 {
    200
}
fn default_max_line_len() -> usize {
    crate::protocol::MAX_LINE_LEN
}
fn default_settle_delay() -> u64 {
    300
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            preferred_port: None,
            baud_rate: default_baud_rate(),
            read_timeout_ms: default_read_timeout(),
            max_line_len: default_max_line_len(),
            settle_delay_ms: default_settle_delay(),
        }
    }
}

/// Button action configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionConfig {
    /// Application, shortcut, or batch file launched on a `BTN:` event
    #[serde(default)]
    pub launch_path: Option<PathBuf>,
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Serial link configuration
    #[serde(default)]
    pub serial: SerialConfig,
    /// Button action configuration
    #[serde(default)]
    pub action: ActionConfig,
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;
            Ok(config)
        } else {
            // Return default config if file doesn't exist
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        // Create parent directories if needed
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "micdeck", "MicDeck")
            .context("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }
}
