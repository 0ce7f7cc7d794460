//! Configuration management with file persistence

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Vestibule configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub identity: IdentityConfig,
    pub profile: ProfileConfig,
}

/// Identity platform endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    #[serde(skip)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

/// Document store endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub base_url: String,
    pub collection: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            identity: IdentityConfig {
                api_key: None,
                base_url: "https://identitytoolkit.googleapis.com".to_string(),
                timeout_secs: 30,
            },
            profile: ProfileConfig {
                base_url: "http://localhost:8080/v1/documents".to_string(),
                collection: "profiles".to_string(),
                timeout_secs: 30,
            },
        }
    }
}

impl IdentityConfig {
    /// Resolve the API key from the environment
    pub fn resolved_api_key(&self) -> anyhow::Result<Option<String>> {
        self.enforce_env_only()?;

        Ok(env::var("VESTIBULE_API_KEY").ok())
    }

    /// Resolve the API key and redact it for display
    pub fn redacted_api_key(&self) -> anyhow::Result<Option<String>> {
        self.resolved_api_key().map(|opt| {
            opt.map(|key| {
                if key.len() <= 4 {
                    "***".to_string()
                } else {
                    let suffix = &key[key.len() - 4..];
                    format!("***{}", suffix)
                }
            })
        })
    }

    /// Reject keys smuggled in through the config file
    pub fn enforce_env_only(&self) -> anyhow::Result<()> {
        if self.api_key.is_some() {
            return Err(anyhow!(
                "API keys must be provided via environment variables, not stored in configuration"
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("VESTIBULE_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("vestibule")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, or create default if it doesn't exist
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            config.validate()?;
            Ok(config)
        } else {
            // Return default config without creating file
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> anyhow::Result<()> {
        self.validate()?;

        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let path = Self::config_path()?;
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        self.identity.enforce_env_only()?;

        if !self.identity.base_url.starts_with("http") {
            return Err(anyhow!(
                "identity.base_url must be an http(s) URL, got '{}'",
                self.identity.base_url
            ));
        }
        if !self.profile.base_url.starts_with("http") {
            return Err(anyhow!(
                "profile.base_url must be an http(s) URL, got '{}'",
                self.profile.base_url
            ));
        }
        if self.profile.collection.is_empty() {
            return Err(anyhow!("profile.collection must not be empty"));
        }
        if self.identity.timeout_secs == 0 || self.profile.timeout_secs == 0 {
            return Err(anyhow!("timeouts must be greater than zero"));
        }

        Ok(())
    }
}
