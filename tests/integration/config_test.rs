//! Configuration layering from file and environment

use std::io::Write;

use campus_connect::shared::config::{API_URL_ENV, CONFIG_FILE_ENV, DATA_DIR_ENV};
use campus_connect::shared::{AppConfig, ConfigError};
use pretty_assertions::assert_eq;
use serial_test::serial;
use tempfile::NamedTempFile;

fn clear_env() {
    std::env::remove_var(API_URL_ENV);
    std::env::remove_var(DATA_DIR_ENV);
    std::env::remove_var(CONFIG_FILE_ENV);
}

#[test]
#[serial]
fn test_load_from_explicit_file() {
    clear_env();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "api_url = \"https://campus.example.edu/api/\"").unwrap();
    writeln!(file, "data_dir = \"/var/lib/campus\"").unwrap();
    std::env::set_var(CONFIG_FILE_ENV, file.path());

    let config = AppConfig::load();
    clear_env();

    let config = config.unwrap();
    assert_eq!(config.api_base_url, "https://campus.example.edu/api");
    assert_eq!(config.storage_path, std::path::PathBuf::from("/var/lib/campus/session.db"));
}

#[test]
#[serial]
fn test_env_wins_over_file() {
    clear_env();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "api_url = \"https://file.example.edu/api\"").unwrap();
    std::env::set_var(CONFIG_FILE_ENV, file.path());
    std::env::set_var(API_URL_ENV, "http://localhost:9000/api");

    let config = AppConfig::load();
    clear_env();

    assert_eq!(config.unwrap().api_base_url, "http://localhost:9000/api");
}

#[test]
#[serial]
fn test_missing_explicit_file_is_an_error() {
    clear_env();
    std::env::set_var(CONFIG_FILE_ENV, "/nonexistent/campus.toml");

    let result = AppConfig::load();
    clear_env();

    assert!(matches!(result, Err(ConfigError::Read { .. })));
}

#[test]
#[serial]
fn test_invalid_env_url_is_an_error() {
    clear_env();
    std::env::set_var(API_URL_ENV, "campus.example.edu");

    let result = AppConfig::load();
    clear_env();

    assert!(matches!(result, Err(ConfigError::InvalidUrl(_))));
}
