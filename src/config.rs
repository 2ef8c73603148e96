use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{ConfidenceThreshold, Configuration, ModelId};

pub const API_KEY_ENV: &str = "ROBOFLOW_API_KEY";
pub const DEFAULT_API_URL: &str = "https://serverless.roboflow.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MODELS: [&str; 3] = [
    "encre-ferrogallique-2-wy9md/5",
    "encre-ferrogallique-2-wy9md/3",
    "encre-ferrogallique-2-wy9md/2",
];

/// Settings loaded once at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the hosted inference service
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Overridden by the `ROBOFLOW_API_KEY` environment variable
    #[serde(default)]
    pub api_key: Option<String>,

    /// Selectable model versions; the first one is the default
    #[serde(default = "default_models")]
    pub models: Vec<ModelId>,

    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_models() -> Vec<ModelId> {
    DEFAULT_MODELS.iter().map(|m| ModelId::new(*m)).collect()
}

fn default_confidence_threshold() -> f64 {
    ConfidenceThreshold::DEFAULT.value()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: None,
            models: default_models(),
            confidence_threshold: default_confidence_threshold(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Settings {
    /// On Linux: ~/.config/ferroscan/settings.yaml
    pub fn settings_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ferroscan")
            .join("settings.yaml")
    }

    /// Load settings from YAML. A missing default file yields the defaults;
    /// a missing explicit file is an error.
    pub fn load(custom_path: Option<&Path>) -> Result<Self> {
        let path = match custom_path {
            Some(p) => {
                if !p.exists() {
                    return Err(Error::Config(format!("settings file not found: {}", p.display())));
                }
                p.to_path_buf()
            }
            None => {
                let p = Self::settings_path();
                if !p.exists() {
                    info!("Settings file not found at {:?}, using defaults", p);
                    return Ok(Self::default());
                }
                p
            }
        };

        let contents = fs::read_to_string(&path)?;
        let settings = Self::from_yaml(&contents)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        info!("Loaded settings from {:?}", path);
        debug!(
            api_url = %settings.api_url,
            models = settings.models.len(),
            threshold = settings.confidence_threshold,
            "settings"
        );
        Ok(settings)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let settings: Settings =
            serde_yaml::from_str(contents).map_err(|e| Error::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.models.is_empty() {
            return Err(Error::Config("at least one model must be listed".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be positive".to_string()));
        }
        ConfidenceThreshold::new(self.confidence_threshold)?;
        Ok(())
    }

    /// Credential from the environment, falling back to the settings file.
    pub fn api_key(&self) -> Result<String> {
        let from_env = std::env::var(API_KEY_ENV).ok();
        self.resolve_api_key(from_env)
    }

    fn resolve_api_key(&self, from_env: Option<String>) -> Result<String> {
        from_env
            .or_else(|| self.api_key.clone())
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(Error::CredentialMissing { env: API_KEY_ENV })
    }

    /// Initial configuration: first listed model and the configured threshold.
    pub fn default_configuration(&self) -> Result<Configuration> {
        let model_id = self
            .models
            .first()
            .cloned()
            .ok_or_else(|| Error::Config("at least one model must be listed".to_string()))?;
        Ok(Configuration {
            model_id,
            confidence_threshold: ConfidenceThreshold::new(self.confidence_threshold)?,
        })
    }
}
