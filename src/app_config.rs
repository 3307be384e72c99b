use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings. Credentials are never
/// stored in the config file; they come from environment variables.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Block store config
    #[serde(default)]
    pub store: StoreConfig,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Sync run config
    #[serde(default)]
    pub sync: SyncConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Block store (Notion API) configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StoreConfig {
    // @field: API token for the primary database (env NOTION_API_TOKEN)
    #[serde(default = "String::new", skip_serializing)]
    pub api_token: String,

    // @field: Primary database id (env NOTION_DATABASE_ID)
    #[serde(default = "String::new")]
    pub database_id: String,

    // @field: Optional API token for the secondary database (env NOTION_API_TOKEN_2)
    #[serde(default = "String::new", skip_serializing)]
    pub secondary_api_token: String,

    // @field: Optional secondary database id (env NOTION_DATABASE_ID_2)
    #[serde(default = "String::new")]
    pub secondary_database_id: String,

    // @field: Service URL
    #[serde(default = "default_store_endpoint")]
    pub endpoint: String,

    // @field: API version header value
    #[serde(default = "default_store_api_version")]
    pub api_version: String,

    // @field: Max blocks per create/append call
    #[serde(default = "default_block_batch_size")]
    pub block_batch_size: usize,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl StoreConfig {
    /// Whether a secondary database is fully configured
    pub fn has_secondary(&self) -> bool {
        !self.secondary_api_token.is_empty() && !self.secondary_database_id.is_empty()
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            database_id: String::new(),
            secondary_api_token: String::new(),
            secondary_database_id: String::new(),
            endpoint: default_store_endpoint(),
            api_version: default_store_api_version(),
            block_batch_size: default_block_batch_size(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Whether translation runs at all (env ENABLE_TRANSLATION)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Model name
    #[serde(default = "default_deepseek_model")]
    pub model: String,

    /// API key for the service (env DEEPSEEK_API_KEY)
    #[serde(default = "String::new", skip_serializing)]
    pub api_key: String,

    /// Service endpoint URL
    #[serde(default = "default_deepseek_endpoint")]
    pub endpoint: String,

    /// Temperature parameter for text generation
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate per request
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "default_translation_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum characters per translation batch
    #[serde(default = "default_max_chars_per_batch")]
    pub max_chars_per_batch: usize,

    /// Maximum units per translation batch
    #[serde(default = "default_max_units_per_batch")]
    pub max_units_per_batch: usize,

    /// Minimum trimmed length for body text to be translated
    #[serde(default = "default_min_text_length")]
    pub min_text_length: usize,

    /// Minimum trimmed length for headings to be translated
    #[serde(default = "default_min_title_length")]
    pub min_title_length: usize,

    /// Maximum length of an appended translation run
    #[serde(default = "default_max_translation_length")]
    pub max_translation_length: usize,

    /// Rate limit delay in milliseconds between consecutive oracle calls
    #[serde(default = "default_rate_limit_delay_ms")]
    pub rate_limit_delay_ms: u64,
}

impl TranslationConfig {
    /// Translation only runs when enabled and a key is present; a missing
    /// key downgrades to a no-translation sync rather than failing the run
    pub fn is_active(&self) -> bool {
        self.enabled && !self.api_key.is_empty()
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            model: default_deepseek_model(),
            api_key: String::new(),
            endpoint: default_deepseek_endpoint(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_translation_timeout_secs(),
            max_chars_per_batch: default_max_chars_per_batch(),
            max_units_per_batch: default_max_units_per_batch(),
            min_text_length: default_min_text_length(),
            min_title_length: default_min_title_length(),
            max_translation_length: default_max_translation_length(),
            rate_limit_delay_ms: default_rate_limit_delay_ms(),
        }
    }
}

/// Sync run configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SyncConfig {
    /// Maximum messages to process per run (env MAX_EMAIL_LIMIT)
    #[serde(default = "default_max_messages")]
    pub max_messages: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_messages: default_max_messages(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_true() -> bool {
    true
}

fn default_store_endpoint() -> String {
    "https://api.notion.com/v1".to_string()
}

fn default_store_api_version() -> String {
    "2022-06-28".to_string()
}

fn default_block_batch_size() -> usize {
    100
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_deepseek_model() -> String {
    "deepseek-chat".to_string()
}

fn default_deepseek_endpoint() -> String {
    "https://api.deepseek.com/v1/chat/completions".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_tokens() -> u32 {
    8000
}

fn default_translation_timeout_secs() -> u64 {
    60
}

fn default_max_chars_per_batch() -> usize {
    6000
}

fn default_max_units_per_batch() -> usize {
    80
}

fn default_min_text_length() -> usize {
    20
}

fn default_min_title_length() -> usize {
    5
}

fn default_max_translation_length() -> usize {
    1900
}

fn default_rate_limit_delay_ms() -> u64 {
    300
}

fn default_max_messages() -> usize {
    50
}

impl Config {
    /// Apply environment variables on top of the loaded configuration.
    /// Credentials only ever come from here.
    pub fn apply_env(&mut self) {
        if let Ok(token) = std::env::var("NOTION_API_TOKEN") {
            self.store.api_token = token;
        }
        if let Ok(id) = std::env::var("NOTION_DATABASE_ID") {
            self.store.database_id = id;
        }
        if let Ok(token) = std::env::var("NOTION_API_TOKEN_2") {
            self.store.secondary_api_token = token;
        }
        if let Ok(id) = std::env::var("NOTION_DATABASE_ID_2") {
            self.store.secondary_database_id = id;
        }
        if let Ok(key) = std::env::var("DEEPSEEK_API_KEY") {
            self.translation.api_key = key;
        }
        if let Ok(enabled) = std::env::var("ENABLE_TRANSLATION") {
            self.translation.enabled = enabled.to_lowercase() == "true";
        }
        if let Ok(limit) = std::env::var("MAX_EMAIL_LIMIT") {
            if let Ok(limit) = limit.parse() {
                self.sync.max_messages = limit;
            }
        }
    }

    /// Validate the configuration for consistency and required values.
    /// Missing store credentials are the only fatal class: the run aborts
    /// before any document is processed.
    pub fn validate(&self) -> Result<()> {
        if self.store.api_token.is_empty() {
            return Err(anyhow!("NOTION_API_TOKEN environment variable not set"));
        }
        if self.store.database_id.is_empty() {
            return Err(anyhow!("NOTION_DATABASE_ID environment variable not set"));
        }
        if self.store.block_batch_size == 0 {
            return Err(anyhow!("store.block_batch_size must be at least 1"));
        }
        url::Url::parse(&self.store.endpoint)
            .map_err(|e| anyhow!("Invalid store endpoint '{}': {}", self.store.endpoint, e))?;
        url::Url::parse(&self.translation.endpoint)
            .map_err(|e| anyhow!("Invalid translation endpoint '{}': {}", self.translation.endpoint, e))?;
        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            store: StoreConfig::default(),
            translation: TranslationConfig::default(),
            sync: SyncConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
