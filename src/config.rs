use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default ShopTag.ai keyword endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://server.shoptag.ai/api/keywords";
/// Default language requested for generated listing text.
pub const DEFAULT_LANGUAGE: &str = "en";
/// Default upper bound on keywords returned per image.
pub const DEFAULT_MAX_KEYWORDS: u32 = 25;

/// Top-level configuration for shoptag-listings.
///
/// Only the tagging API options are configurable; the CSV layout is fixed.
///
/// # Loading
///
/// ```rust,no_run
/// use shoptag_listings::config::Config;
///
/// // From a JSON file
/// let config = Config::load(Some("config.json".as_ref())).unwrap();
///
/// // Or use defaults and customize
/// let mut config = Config::default();
/// config.api.language = "de".into();
/// config.api.max_keywords = 10;
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Options sent with every tagging request.
    pub api: ApiConfig,
}

/// Options for the remote tagging API.
///
/// Passed into [`ShopTagService`](crate::tagging::ShopTagService) explicitly,
/// so tests and callers can point it at another endpoint or change the
/// request fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// URL the images are POSTed to.
    pub endpoint: String,
    /// Value of the `language` form field.
    pub language: String,
    /// Value of the `maxKeywords` form field.
    pub max_keywords: u32,
    /// Whole-request timeout in seconds. `None` leaves the transport default.
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            max_keywords: DEFAULT_MAX_KEYWORDS,
            timeout_secs: None,
        }
    }
}

impl ApiConfig {
    /// The configured request timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Config {
    /// Resolve the config file path — same directory as the executable.
    pub fn config_path() -> Result<PathBuf> {
        let exe_path = std::env::current_exe().context("Failed to get executable path")?;
        let exe_dir = exe_path
            .parent()
            .context("Failed to get executable directory")?;
        Ok(exe_dir.join("config.json"))
    }

    /// Load config from the given path, or from the default location.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            log::debug!(
                "Config file not found at {}. Using defaults.",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
        let config: Config = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", config_path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file {}", config_path.display()))?;
        Ok(config)
    }

    /// Save config to the given path, or to the default location.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write config file {}", config_path.display()))?;
        log::info!("Config saved to {}", config_path.display());
        Ok(())
    }

    /// Reject values the API cannot accept.
    pub fn validate(&self) -> Result<()> {
        if self.api.endpoint.trim().is_empty() {
            anyhow::bail!("api.endpoint must not be empty");
        }
        if self.api.language.trim().is_empty() {
            anyhow::bail!("api.language must not be empty");
        }
        if self.api.max_keywords == 0 {
            anyhow::bail!("api.max_keywords must be at least 1");
        }
        if self.api.timeout_secs == Some(0) {
            anyhow::bail!("api.timeout_secs must be at least 1 when set");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_shoptag_api() {
        let config = Config::default();
        assert_eq!(config.api.endpoint, "https://server.shoptag.ai/api/keywords");
        assert_eq!(config.api.language, "en");
        assert_eq!(config.api.max_keywords, 25);
        assert!(config.api.timeout().is_none());
    }

    #[test]
    fn load_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(Some(dir.path().join("absent.json").as_path())).unwrap();
        assert_eq!(config.api, ApiConfig::default());
    }

    #[test]
    fn load_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"api": {"language": "fr", "timeout_secs": 30}}"#).unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.api.language, "fr");
        assert_eq!(config.api.max_keywords, 25);
        assert_eq!(config.api.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.api.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn load_malformed_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = Config::load(Some(path.as_path())).unwrap_err();
        assert!(err.to_string().contains("config.json"), "{err}");
    }

    #[test]
    fn load_rejects_zero_keywords() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"api": {"max_keywords": 0}}"#).unwrap();

        let err = Config::load(Some(path.as_path())).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("config.json"), "{message}");
        assert!(message.contains("max_keywords"), "{message}");
    }

    #[test]
    fn save_into_missing_directory_names_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope").join("listing-config.json");

        let err = Config::default().save(Some(path.as_path())).unwrap_err();
        assert!(err.to_string().contains("listing-config.json"), "{err}");
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let mut config = Config::default();
        config.api.max_keywords = 10;
        config.save(Some(path.as_path())).unwrap();

        let loaded = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(loaded.api.max_keywords, 10);
    }
}
