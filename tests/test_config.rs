// Configuration tests
// Author: Gabriel Demetrios Lafis

use std::fs;
use std::time::Duration;

use rust_report_engine::utils::{AppError, Config};

#[test]
fn test_defaults() {
    let config = Config::default();

    assert_eq!(config.server.port, 8080);
    assert_eq!(config.backend.base_url, "http://localhost:8000/api");
    assert_eq!(config.backend.timeout_secs, 60);
    assert_eq!(config.polling.interval(), Duration::from_secs(30));
    assert_eq!(config.export.delimiter, ',');
    assert!(config.storage.path.is_none());
    assert_eq!(config.log_level_filter(), log::LevelFilter::Info);
}

#[test]
fn test_yaml_overrides_sections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(
        &path,
        "backend:\n  base_url: https://reports.example.com/api\n  token: secret\n\
         polling:\n  interval_secs: 0\n\
         export:\n  delimiter: ';'\n\
         logging:\n  level: DEBUG\n",
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();

    assert_eq!(config.backend.base_url, "https://reports.example.com/api");
    assert_eq!(config.backend.token.as_deref(), Some("secret"));
    assert_eq!(config.backend.timeout_secs, 60);
    // never poll faster than once a second
    assert_eq!(config.polling.interval(), Duration::from_secs(1));
    assert_eq!(config.export.delimiter, ';');
    assert_eq!(config.log_level_filter(), log::LevelFilter::Debug);
    assert_eq!(config.server.host, "127.0.0.1");
}

#[test]
fn test_json_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"server": {"port": 9090, "enable_cors": true}, "storage": {"path": "/tmp/prefs.json"}}"#).unwrap();

    let config = Config::from_file(&path).unwrap();

    assert_eq!(config.server.port, 9090);
    assert!(config.server.enable_cors);
    assert_eq!(config.storage.path.as_deref(), Some("/tmp/prefs.json"));
}

#[test]
fn test_config_errors() {
    let dir = tempfile::tempdir().unwrap();

    let toml = dir.path().join("config.toml");
    fs::write(&toml, "port = 1").unwrap();
    assert!(matches!(Config::from_file(&toml), Err(AppError::Config(_))));

    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{").unwrap();
    assert!(matches!(Config::from_file(&broken), Err(AppError::Config(_))));

    let missing = dir.path().join("missing.yaml");
    assert!(matches!(Config::from_file(&missing), Err(AppError::Io(_))));
}
