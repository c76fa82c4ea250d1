//! Configuration management for nakliye
//!
//! Config stored at: ~/.config/nakliye/config.json

use nakliye_domain::service::PricingPolicy;
use nakliye_types::{ConfigError, OutputFormat, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the external backend API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Listen address for `nakliye serve`
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Per-request timeout against the backend
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Default output format (table, json, csv)
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub log_json: bool,

    /// Shipping charge constants
    #[serde(default)]
    pub pricing: PricingPolicy,
}

fn default_api_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            bind: default_bind(),
            request_timeout_secs: default_request_timeout_secs(),
            output_format: OutputFormat::default(),
            log_json: false,
            pricing: PricingPolicy::default(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("nakliye");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Load config from the default location, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Load config from a file, or defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)).into())
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::SaveError(format!("{}: {}", parent.display(), e)))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .map_err(|e| ConfigError::SaveError(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }

    /// Apply `NAKLIYE_*` overrides read through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("NAKLIYE_API_URL").filter(|v| !v.trim().is_empty()) {
            self.api_url = url.trim().to_string();
        }
        if let Some(bind) = lookup("NAKLIYE_BIND").filter(|v| !v.trim().is_empty()) {
            self.bind = bind.trim().to_string();
        }
        if let Some(flag) = lookup("NAKLIYE_LOG_JSON") {
            match flag.as_str() {
                "1" | "true" | "TRUE" | "yes" | "YES" => self.log_json = true,
                "0" | "false" | "FALSE" | "no" | "NO" => self.log_json = false,
                _ => {}
            }
        }
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Nakliye Configuration")?;
        writeln!(f, "=====================")?;
        writeln!(f)?;
        writeln!(f, "API URL:         {}", self.api_url)?;
        writeln!(f, "Bind address:    {}", self.bind)?;
        writeln!(f, "Request timeout: {}s", self.request_timeout_secs)?;
        writeln!(f, "Output format:   {}", self.output_format)?;
        writeln!(f, "JSON logs:       {}", self.log_json)?;
        writeln!(
            f,
            "Pricing:         {} TL + {} TL per {} min wait",
            self.pricing.base_price,
            self.pricing.price_per_wait_window,
            self.pricing.wait_window_minutes
        )?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:     {}", path.display())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.pricing.base_price, 100);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut config = Config::default();
        config.api_url = "https://api.example.com".to_string();
        config.pricing.price_per_wait_window = 25;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_field_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"api_url":"http://backend:4000","pricing":{"base_price":150}}"#)
            .unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_url, "http://backend:4000");
        assert_eq!(config.bind, "127.0.0.1:8080");
        assert_eq!(config.pricing.base_price, 150);
        assert_eq!(config.pricing.wait_window_minutes, 360);
    }

    #[test]
    fn test_invalid_file_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(
            err,
            nakliye_types::Error::Config(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("NAKLIYE_API_URL", " http://override:9000 "),
            ("NAKLIYE_LOG_JSON", "yes"),
            ("NAKLIYE_BIND", ""),
        ]
        .into_iter()
        .collect();
        let mut config = Config::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.api_url, "http://override:9000");
        assert!(config.log_json);
        assert_eq!(config.bind, "127.0.0.1:8080");
    }
}
