use serde::{Deserialize, Serialize};
use spacesync_core::{Region, RetryConfig, UnknownRegion};
use std::path::PathBuf;

const ENV_OAUTH_TOKEN: &str = "SPACESYNC_OAUTH_TOKEN";
const ENV_REGION: &str = "SPACESYNC_REGION";
const ENV_API_URL: &str = "SPACESYNC_API_URL";

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Management API token
    pub oauth_token: ConfigValue<Option<String>>,
    /// Hosting region, selects the API host
    pub region: ConfigValue<Region>,
    /// Explicit API base URL, takes precedence over the region
    pub api_url: ConfigValue<Option<String>>,
    /// Replace target components instead of overlaying them
    pub components_full_sync: ConfigValue<bool>,
    /// Retries for rate-limited requests
    pub max_retries: ConfigValue<u32>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    oauth_token: Option<String>,
    region: Option<String>,
    api_url: Option<String>,
    components_full_sync: Option<bool>,
    max_retries: Option<u32>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::load_with_env(config_path, |key| std::env::var(key).ok())
    }

    pub(crate) fn load_with_env<F>(config_path: Option<PathBuf>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Start with defaults
        let mut oauth_token = ConfigValue::new(None, ConfigSource::Default);
        let mut region = ConfigValue::new(Region::default(), ConfigSource::Default);
        let mut api_url = ConfigValue::new(None, ConfigSource::Default);
        let mut components_full_sync = ConfigValue::new(false, ConfigSource::Default);
        let mut max_retries =
            ConfigValue::new(RetryConfig::default().max_retries, ConfigSource::Default);
        let mut config_file = None;

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(token) = file_config.oauth_token {
                oauth_token = ConfigValue::new(Some(token), ConfigSource::File);
            }
            if let Some(name) = file_config.region {
                let parsed = name
                    .parse::<Region>()
                    .map_err(|e| ConfigError::InvalidRegion(ConfigSource::File, e))?;
                region = ConfigValue::new(parsed, ConfigSource::File);
            }
            if let Some(url) = file_config.api_url {
                api_url = ConfigValue::new(Some(url), ConfigSource::File);
            }
            if let Some(full_sync) = file_config.components_full_sync {
                components_full_sync = ConfigValue::new(full_sync, ConfigSource::File);
            }
            if let Some(retries) = file_config.max_retries {
                max_retries = ConfigValue::new(retries, ConfigSource::File);
            }
        }

        // Apply environment variable overrides
        if let Some(token) = env(ENV_OAUTH_TOKEN) {
            oauth_token = ConfigValue::new(Some(token), ConfigSource::Environment);
        }
        if let Some(name) = env(ENV_REGION) {
            let parsed = name
                .parse::<Region>()
                .map_err(|e| ConfigError::InvalidRegion(ConfigSource::Environment, e))?;
            region = ConfigValue::new(parsed, ConfigSource::Environment);
        }
        if let Some(url) = env(ENV_API_URL) {
            api_url = ConfigValue::new(Some(url), ConfigSource::Environment);
        }

        Ok(Self {
            oauth_token,
            region,
            api_url,
            components_full_sync,
            max_retries,
            config_file,
        })
    }

    /// Base URL requests are sent to.
    pub fn api_base_url(&self) -> String {
        match &self.api_url.value {
            Some(url) => url.clone(),
            None => self.region.value.base_url().to_string(),
        }
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_retries: self.max_retries.value,
            ..RetryConfig::default()
        }
    }

    /// Copy of the configuration safe to print.
    pub fn masked(&self) -> Self {
        let mut masked = self.clone();
        masked.oauth_token.value = self.oauth_token.value.as_deref().map(mask_token);
        masked
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/spacesync/
    /// - macOS: ~/Library/Application Support/spacesync/
    /// - Windows: %APPDATA%/spacesync/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("spacesync")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

/// Hides all but the last four characters of a token.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidRegion(ConfigSource, UnknownRegion),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidRegion(source, e) => {
                write!(f, "Invalid region in {}: {}", source, e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
