use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the symptom-checking backend
    pub api_base_url: String,

    /// Bound on a single in-flight request, in seconds
    pub request_timeout_secs: u64,

    /// Cadence of the per-character reply reveal, in milliseconds
    pub typing_interval_ms: u64,

    /// Symptomate home directory (chat history, logs, config)
    pub data_dir: PathBuf,

    /// UI preferences
    pub ui: UiConfig,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub show_timestamps: bool,
    /// How long transient notices stay visible, in seconds
    pub notice_duration_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"));
        Config {
            api_base_url: "http://localhost:5000".to_string(),
            request_timeout_secs: 20,
            typing_interval_ms: 30,
            data_dir: home.join(".symptomate"),
            ui: UiConfig {
                show_timestamps: true,
                notice_duration_secs: 3,
            },
        }
    }
}

impl Config {
    /// Load configuration from `~/.symptomate/config.toml`, falling back to
    /// defaults when the file is missing.
    pub fn load() -> Result<Self> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        let data_dir = home.join(".symptomate");
        let config_path = data_dir.join("config.toml");

        fs::create_dir_all(&data_dir).context("Failed to create .symptomate directory")?;

        let mut config = if config_path.exists() {
            let content =
                fs::read_to_string(&config_path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")?
        } else {
            Config::default()
        };

        // The data dir always tracks the home we resolved, regardless of what
        // a copied config file claims.
        config.data_dir = data_dir;

        Ok(config)
    }

    /// Save configuration to file
    #[allow(dead_code)]
    pub fn save(&self) -> Result<()> {
        let config_path = self.data_dir.join("config.toml");
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&config_path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Path of the log file the tracing subscriber writes to.
    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("symptomate.log")
    }
}
