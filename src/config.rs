use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageConfig {
    /// General settings
    pub general: GeneralConfig,

    /// Analysis endpoint settings
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level when RUST_LOG is not set
    pub log_level: String,

    /// Log file (stderr would corrupt the TUI)
    pub log_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Full URL of the /analyze endpoint
    pub endpoint: String,

    /// Timeout for the whole request, in seconds
    pub timeout_seconds: u64,

    /// Timeout for establishing the connection, in seconds
    pub connect_timeout_seconds: u64,
}

impl TriageConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.load_env_vars();

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Get the default configuration path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
        Ok(home.join(".mailtriage").join("config.toml"))
    }

    /// Allow the endpoint to be overridden without editing the file
    fn load_env_vars(&mut self) {
        if let Ok(endpoint) = std::env::var("MAILTRIAGE_ENDPOINT") {
            self.api.endpoint = endpoint;
        }
    }
}

impl Default for TriageConfig {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        let triage_dir = home.join(".mailtriage");

        Self {
            general: GeneralConfig {
                log_level: "info".to_string(),
                log_file: triage_dir.join("mailtriage.log"),
            },
            api: ApiConfig {
                endpoint: "http://127.0.0.1:5000/analyze".to_string(),
                timeout_seconds: 120,
                connect_timeout_seconds: 10,
            },
        }
    }
}

/// Load or create configuration
pub fn load_or_create_config(path: Option<&Path>) -> Result<TriageConfig> {
    let config_path = if let Some(p) = path {
        p.to_path_buf()
    } else {
        TriageConfig::default_path()?
    };

    if config_path.exists() {
        TriageConfig::load(&config_path)
    } else {
        let mut config = TriageConfig::default();
        // The file keeps the defaults; the env override applies on top.
        config.save(&config_path)?;
        config.load_env_vars();
        Ok(config)
    }
}
