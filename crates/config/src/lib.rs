//! Configuration loading, validation, and management for Seriloka.
//!
//! Loads configuration from `~/.seriloka/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.seriloka/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key used only when the persistent store holds none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model used when the persistent store holds no selection
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Max tokens per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Completion service settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Live lookup settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Persistent store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Persona settings
    #[serde(default)]
    pub assistant: AssistantConfig,
}

fn default_model() -> String {
    "google/gemini-2.0-flash-exp:free".into()
}
fn default_max_tokens() -> u32 {
    1000
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_model", &self.default_model)
            .field("max_tokens", &self.max_tokens)
            .field("provider", &self.provider)
            .field("search", &self.search)
            .field("store", &self.store)
            .field("assistant", &self.assistant)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_provider_name")]
    pub name: String,

    #[serde(default = "default_provider_url")]
    pub api_url: String,

    /// Sent as `HTTP-Referer` (OpenRouter app attribution)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referer: Option<String>,

    /// Sent as `X-Title` (OpenRouter app attribution)
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,
}

fn default_provider_name() -> String {
    "openrouter".into()
}
fn default_provider_url() -> String {
    "https://openrouter.ai/api/v1".into()
}
fn default_title() -> String {
    "Seriloka CEO Assistant - Hanafi".into()
}
fn default_provider_timeout() -> u64 {
    120
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            api_url: default_provider_url(),
            referer: None,
            title: default_title(),
            timeout_secs: default_provider_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Whether live lookups run at all (off until the user opts in)
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_search_url")]
    pub api_url: String,

    /// Max results per lookup
    #[serde(default = "default_search_limit")]
    pub limit: u32,

    /// Appended to the query for the single retry after an empty result
    #[serde(default = "default_fallback_suffix")]
    pub fallback_suffix: String,

    /// Region appended to trend-style queries that do not name it
    #[serde(default = "default_locality", skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,

    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,
}

fn default_search_url() -> String {
    "https://en.wikipedia.org/w/api.php".into()
}
fn default_search_limit() -> u32 {
    5
}
fn default_fallback_suffix() -> String {
    "general information".into()
}
fn default_locality() -> Option<String> {
    Some("Malaysia".into())
}
fn default_search_timeout() -> u64 {
    15
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_url: default_search_url(),
            limit: default_search_limit(),
            fallback_suffix: default_fallback_suffix(),
            locality: default_locality(),
            timeout_secs: default_search_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store file; defaults to `~/.seriloka/store.json`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// How many of the most recent turns are persisted
    #[serde(default = "default_history_cap")]
    pub history_cap: usize,
}

fn default_history_cap() -> usize {
    50
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: None,
            history_cap: default_history_cap(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Replace the built-in persona prompt entirely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt_override: Option<String>,
}

impl AppConfig {
    /// Load configuration from the default path (~/.seriloka/config.toml).
    ///
    /// Also checks environment variables:
    /// - `SERILOKA_API_KEY`, then `OPENROUTER_API_KEY`, when no key is configured
    /// - `SERILOKA_MODEL` overrides the default model
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        Self::load_from(&config_path).map(Self::with_env_overrides)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    pub fn with_env_overrides(mut self) -> Self {
        if self.api_key.is_none() {
            self.api_key = std::env::var("SERILOKA_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENROUTER_API_KEY").ok())
                .filter(|k| !k.trim().is_empty());
        }

        if let Ok(model) = std::env::var("SERILOKA_MODEL") {
            if !model.trim().is_empty() {
                self.default_model = model;
            }
        }

        self
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".seriloka")
    }

    /// The store file, from config or the default location.
    pub fn store_path(&self) -> PathBuf {
        self.store
            .path
            .clone()
            .unwrap_or_else(|| Self::config_dir().join("store.json"))
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "default_model must not be empty".into(),
            ));
        }

        if self.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "max_tokens must be greater than 0".into(),
            ));
        }

        if self.store.history_cap == 0 {
            return Err(ConfigError::ValidationError(
                "store.history_cap must be greater than 0".into(),
            ));
        }

        if !(1..=50).contains(&self.search.limit) {
            return Err(ConfigError::ValidationError(
                "search.limit must be between 1 and 50".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_model: default_model(),
            max_tokens: default_max_tokens(),
            provider: ProviderConfig::default(),
            search: SearchConfig::default(),
            store: StoreConfig::default(),
            assistant: AssistantConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_tokens, 1000);
        assert_eq!(config.store.history_cap, 50);
        assert!(!config.search.enabled);
        assert_eq!(config.search.locality.as_deref(), Some("Malaysia"));
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.default_model, config.default_model);
        assert_eq!(parsed.provider.api_url, config.provider.api_url);
        assert_eq!(parsed.search.limit, config.search.limit);
    }

    #[test]
    fn zero_history_cap_rejected() {
        let config = AppConfig {
            store: StoreConfig {
                path: None,
                history_cap: 0,
            },
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn out_of_range_search_limit_rejected() {
        let mut config = AppConfig::default();
        config.search.limit = 500;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        let config = result.unwrap();
        assert_eq!(config.provider.name, "openrouter");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "default_model = \"google/learnlm-1.5-pro-experimental:free\"").unwrap();
        writeln!(tmp, "[search]").unwrap();
        writeln!(tmp, "enabled = true").unwrap();

        let config = AppConfig::load_from(tmp.path()).unwrap();
        assert_eq!(
            config.default_model,
            "google/learnlm-1.5-pro-experimental:free"
        );
        assert!(config.search.enabled);
        assert_eq!(config.search.fallback_suffix, "general information");
        assert_eq!(config.max_tokens, 1000);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "max_tokens = \"lots\"").unwrap();
        let err = AppConfig::load_from(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = AppConfig {
            api_key: Some("sk-or-v1-secret".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-or-v1-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn store_path_defaults_under_config_dir() {
        let config = AppConfig::default();
        assert!(config.store_path().ends_with(".seriloka/store.json"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("openrouter.ai"));
        assert!(toml_str.contains("wikipedia.org"));
    }
}
