//! Tests for client configuration

use jutge_api_client::config::{API_URL_ENV, DEFAULT_API_URL};
use jutge_api_client::{ClientConfig, ErrorKind};
use serial_test::serial;
use tempfile::TempDir;

#[test]
fn test_defaults() {
    let config = ClientConfig::default();
    assert_eq!(config.api_url, DEFAULT_API_URL);
    assert!(config.use_cache);
    assert!(config.client_ttls.is_empty());
}

#[test]
fn test_save_and_reload() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("config.toml");
    let config = ClientConfig::default()
        .with_api_url("http://localhost:8000/api")
        .with_ttl("tables.get_languages", 3600);

    config.save_to(&path).unwrap();
    assert_eq!(ClientConfig::from_file(&path).unwrap(), config);
}

#[test]
fn test_partial_file_fills_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(&path, "use_cache = false\n").unwrap();

    let config = ClientConfig::from_file(&path).unwrap();
    assert_eq!(config.api_url, DEFAULT_API_URL);
    assert!(!config.use_cache);
}

#[test]
fn test_unparsable_file_is_config_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(&path, "use_cache = \"sometimes\"\n").unwrap();

    let err = ClientConfig::from_file(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
fn test_missing_file_is_config_error() {
    let temp = TempDir::new().unwrap();
    let err = ClientConfig::from_file(&temp.path().join("absent.toml")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
fn test_ttl_respects_cache_switch() {
    let mut config = ClientConfig::default().with_ttl("misc.get_time", 10);
    assert_eq!(config.ttl("misc.get_time"), Some(10));
    assert_eq!(config.ttl("misc.get_fortune"), None);

    config.use_cache = false;
    assert_eq!(config.ttl("misc.get_time"), None);
}

#[test]
#[serial]
fn test_env_overrides_url() {
    // SAFETY: serialized with every other test touching the environment
    unsafe { std::env::set_var(API_URL_ENV, "http://env.example/api") };
    let mut config = ClientConfig::default();
    config.apply_env();
    unsafe { std::env::remove_var(API_URL_ENV) };

    assert_eq!(config.api_url, "http://env.example/api");
}

#[test]
#[serial]
fn test_blank_env_is_ignored() {
    // SAFETY: serialized with every other test touching the environment
    unsafe { std::env::set_var(API_URL_ENV, "  ") };
    let mut config = ClientConfig::default();
    config.apply_env();
    unsafe { std::env::remove_var(API_URL_ENV) };

    assert_eq!(config.api_url, DEFAULT_API_URL);
}

#[test]
#[serial]
fn test_load_applies_env_override() {
    // SAFETY: serialized with every other test touching the environment
    unsafe { std::env::set_var(API_URL_ENV, "http://loaded.example/api") };
    let config = ClientConfig::load();
    unsafe { std::env::remove_var(API_URL_ENV) };

    assert_eq!(config.api_url, "http://loaded.example/api");
}
