use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::PathBuf};

use crate::{model::Units, provider::ProviderId};

/// Environment variable that overrides the stored OpenWeather key.
pub const OPENWEATHER_API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Configuration for a single provider (e.g., API key).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Optional default provider id, e.g. "openweather" or "demo".
    pub default_provider: Option<String>,

    /// Unit system requested from providers.
    #[serde(default)]
    pub units: Units,

    /// Place name used when no coordinates are given on the command line.
    pub default_place: Option<String>,

    /// Example TOML:
    /// [providers.openweather]
    /// api_key = "..."
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    #[serde(skip)]
    env_api_key: Option<String>,
}

impl Config {
    /// Return the default provider as a strongly-typed ProviderId.
    pub fn default_provider_id(&self) -> Result<ProviderId> {
        let s = self.default_provider.as_ref().ok_or_else(|| {
            anyhow!(
                "No default provider configured.\n\
                 Hint: run `weather-dash configure` or pass `--provider demo`."
            )
        })?;

        ProviderId::try_from(s.as_str())
    }

    /// Store default provider as string.
    pub fn set_default_provider(&mut self, id: ProviderId) {
        self.default_provider = Some(id.as_str().to_string());
    }

    /// Load config from disk (or defaults on first run) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };

        cfg.apply_env_key(std::env::var(OPENWEATHER_API_KEY_ENV).ok());
        Ok(cfg)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::debug!(path = %path.display(), "saved configuration");
        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-dash", "weather-dash")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Set/replace a provider API key; the first configured provider becomes the default.
    pub fn upsert_provider_api_key(&mut self, provider_id: ProviderId, api_key: String) {
        self.providers.insert(provider_id.as_str().to_string(), ProviderConfig { api_key });

        if self.default_provider.is_none() {
            self.default_provider = Some(provider_id.to_string());
        }
    }

    /// API key for a provider. For OpenWeather the environment override wins.
    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        self.env_api_key
            .as_deref()
            .filter(|_| provider_id == ProviderId::OpenWeather)
            .or_else(|| self.providers.get(provider_id.as_str()).map(|cfg| cfg.api_key.as_str()))
    }

    pub fn is_provider_configured(&self, provider_id: ProviderId) -> bool {
        provider_id == ProviderId::Demo || self.provider_api_key(provider_id).is_some()
    }

    fn apply_env_key(&mut self, key: Option<String>) {
        self.env_api_key = key.filter(|k| !k.trim().is_empty());

        if self.env_api_key.is_some() && self.default_provider.is_none() {
            self.set_default_provider(ProviderId::OpenWeather);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderId;

    #[test]
    fn default_provider_id_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.default_provider_id().unwrap_err();

        assert!(err.to_string().contains("No default provider configured"));
    }

    #[test]
    fn set_api_key_and_default_for_provider() {
        let mut cfg = Config::default();

        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "OPEN_KEY".into());

        let default = cfg.default_provider_id().expect("default provider must exist");
        assert_eq!(default, ProviderId::OpenWeather);

        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), Some("OPEN_KEY"));
        assert!(cfg.is_provider_configured(ProviderId::OpenWeather));
    }

    #[test]
    fn set_default_provider_overrides_default() {
        let mut cfg = Config::default();

        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "OPEN_KEY".into());
        cfg.set_default_provider(ProviderId::Demo);

        let default = cfg.default_provider_id().expect("default provider must exist");
        assert_eq!(default, ProviderId::Demo);
    }

    #[test]
    fn env_key_overrides_stored_key() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "STORED".into());

        cfg.apply_env_key(Some("FROM_ENV".into()));
        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), Some("FROM_ENV"));

        cfg.apply_env_key(Some("   ".into()));
        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), Some("STORED"));
    }

    #[test]
    fn env_key_sets_default_provider_when_unset() {
        let mut cfg = Config::default();
        cfg.apply_env_key(Some("FROM_ENV".into()));

        assert_eq!(cfg.default_provider_id().unwrap(), ProviderId::OpenWeather);
    }

    #[test]
    fn demo_provider_needs_no_key() {
        let cfg = Config::default();
        assert!(cfg.is_provider_configured(ProviderId::Demo));
        assert!(!cfg.is_provider_configured(ProviderId::OpenWeather));
    }

    #[test]
    fn parses_toml_with_units_and_place() {
        let cfg: Config = toml::from_str(
            r#"
            default_provider = "openweather"
            units = "imperial"
            default_place = "Denver, US"

            [providers.openweather]
            api_key = "abc"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.units, Units::Imperial);
        assert_eq!(cfg.default_place.as_deref(), Some("Denver, US"));
        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), Some("abc"));
    }

    #[test]
    fn missing_sections_use_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.units, Units::Metric);
        assert!(cfg.providers.is_empty());
    }
}
