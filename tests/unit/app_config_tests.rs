/*!
 * Tests for app configuration
 */

use lettersync::app_config::{Config, LogLevel, TranslationConfig};

/// Default config carries the documented batching constants
#[test]
fn test_default_config_shouldCarryBatchingDefaults() {
    let config = Config::default();
    assert_eq!(config.translation.max_chars_per_batch, 6000);
    assert_eq!(config.translation.max_units_per_batch, 80);
    assert_eq!(config.translation.min_text_length, 20);
    assert_eq!(config.translation.min_title_length, 5);
    assert_eq!(config.translation.max_translation_length, 1900);
    assert_eq!(config.translation.rate_limit_delay_ms, 300);
    assert_eq!(config.store.block_batch_size, 100);
    assert_eq!(config.sync.max_messages, 50);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Validation fails fast on missing store credentials
#[test]
fn test_validate_withMissingCredentials_shouldFail() {
    let config = Config::default();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.store.api_token = "secret".to_string();
    assert!(config.validate().is_err(), "database id still missing");

    config.store.database_id = "db".to_string();
    assert!(config.validate().is_ok());
}

/// Translation is only active with both the toggle and a key
#[test]
fn test_translation_is_active_withToggleAndKey_shouldRequireBoth() {
    let mut translation = TranslationConfig::default();
    assert!(translation.enabled);
    assert!(!translation.is_active(), "no key yet");

    translation.api_key = "key".to_string();
    assert!(translation.is_active());

    translation.enabled = false;
    assert!(!translation.is_active());
}

/// A sparse config file deserializes with defaults filled in
#[test]
fn test_config_deserialization_withSparseJson_shouldFillDefaults() {
    let config: Config = serde_json::from_str(r#"{"translation": {"model": "deepseek-reasoner"}}"#)
        .expect("parse sparse config");
    assert_eq!(config.translation.model, "deepseek-reasoner");
    assert_eq!(config.translation.max_chars_per_batch, 6000);
    assert_eq!(config.store.endpoint, "https://api.notion.com/v1");
}

/// Secrets never serialize into the config file
#[test]
fn test_config_serialization_shouldSkipSecrets() {
    let mut config = Config::default();
    config.store.api_token = "secret-token".to_string();
    config.translation.api_key = "secret-key".to_string();

    let json = serde_json::to_string(&config).expect("serialize");
    assert!(!json.contains("secret-token"));
    assert!(!json.contains("secret-key"));
}
