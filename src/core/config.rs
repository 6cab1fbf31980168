use crate::core::align::PairingStrategy;
use crate::core::series::LookbackWindow;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_BENCHMARK: &str = "SPY";
pub const ALPHA_VANTAGE_KEY_VAR: &str = "ALPHA_VANTAGE_API_KEY";
pub const FINNHUB_KEY_VAR: &str = "FINNHUB_API_KEY";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AlphaVantageConfig {
    #[serde(default = "AlphaVantageConfig::default_base_url")]
    pub base_url: String,
    pub api_key: Option<String>,
}

impl AlphaVantageConfig {
    fn default_base_url() -> String {
        "https://www.alphavantage.co".to_string()
    }

    /// Configured key, falling back to the `ALPHA_VANTAGE_API_KEY` environment variable.
    pub fn api_key(&self) -> String {
        resolve_key(self.api_key.as_deref(), ALPHA_VANTAGE_KEY_VAR)
    }
}

impl Default for AlphaVantageConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            api_key: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FinnhubConfig {
    #[serde(default = "FinnhubConfig::default_base_url")]
    pub base_url: String,
    pub api_key: Option<String>,
}

impl FinnhubConfig {
    fn default_base_url() -> String {
        "https://finnhub.io".to_string()
    }

    /// Configured key, falling back to the `FINNHUB_API_KEY` environment variable.
    pub fn api_key(&self) -> String {
        resolve_key(self.api_key.as_deref(), FINNHUB_KEY_VAR)
    }
}

impl Default for FinnhubConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            api_key: None,
        }
    }
}

fn resolve_key(configured: Option<&str>, env_var: &str) -> String {
    configured
        .map(str::to_string)
        .or_else(|| std::env::var(env_var).ok())
        .unwrap_or_default()
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub alpha_vantage: AlphaVantageConfig,
    #[serde(default)]
    pub finnhub: FinnhubConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default = "AppConfig::default_benchmark")]
    pub benchmark: String,
    #[serde(default)]
    pub default_range: LookbackWindow,
    #[serde(default)]
    pub pairing: PairingStrategy,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            benchmark: Self::default_benchmark(),
            default_range: LookbackWindow::default(),
            pairing: PairingStrategy::default(),
            providers: ProvidersConfig::default(),
        }
    }
}

impl AppConfig {
    fn default_benchmark() -> String {
        DEFAULT_BENCHMARK.to_string()
    }

    /// Loads the config from the default location, or defaults if none has been set up.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "spycompare", "spycompare")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
