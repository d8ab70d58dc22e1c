//! Tests for configuration loading and validation

use prompt_social_rust::config::AppConfig;

#[test]
fn test_default_values() {
    let config = AppConfig::default();

    assert_eq!(config.database.url, "data/prompt_social.db");
    assert_eq!(config.database.max_connections, 10);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, "text");
    assert_eq!(config.feed.default_page_size, 10);
    assert_eq!(config.feed.max_page_size, 100);
    assert_eq!(config.leaderboard.default_page_size, 10);
}

#[test]
fn test_default_config_validates() {
    let config = AppConfig::default();
    assert!(config.validate().is_ok());
}

#[test]
fn test_zero_max_connections_rejected() {
    let mut config = AppConfig::default();
    config.database.max_connections = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_empty_database_url_rejected() {
    let mut config = AppConfig::default();
    config.database.url = String::new();
    assert!(config.validate().is_err());
}

#[test]
fn test_invalid_log_level_rejected() {
    let mut config = AppConfig::default();
    config.logging.level = "verbose".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_invalid_log_format_rejected() {
    let mut config = AppConfig::default();
    config.logging.format = "xml".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_default_page_size_over_max_rejected() {
    let mut config = AppConfig::default();
    config.leaderboard.default_page_size = 500;
    assert!(config.validate().is_err());
}

#[test]
fn test_yaml_round_trip() {
    let config = AppConfig::default();
    let yaml = config.to_yaml().expect("Failed to render YAML");

    let parsed: AppConfig = serde_yaml::from_str(&yaml).expect("Failed to parse YAML");
    assert_eq!(parsed.database.url, config.database.url);
    assert_eq!(parsed.feed.max_page_size, config.feed.max_page_size);
}
