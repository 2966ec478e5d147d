use cabin_config::{Config, ConfigError, ConfigManager};
use std::fs;
use tempfile::tempdir;

#[test]
fn default_config_is_valid() {
    let cfg = Config::default();

    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.backup_retention, 5);
    assert!(cfg.ui_color_enabled);
    assert!(cfg.resolve_data_dir().ends_with(".cabin_admin"));
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    assert_eq!(manager.load().expect("load"), Config::default());
    assert!(!manager.config_path().exists());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));

    let cfg = Config {
        currency: "EUR".to_string(),
        locale: "pt-PT".to_string(),
        data_dir: Some(dir.path().join("data")),
        log_filter: Some("cabin_admin=debug".into()),
        backup_retention: 3,
        ui_color_enabled: false,
    };

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert_eq!(loaded.resolve_data_dir(), dir.path().join("data"));
}

#[test]
fn partial_file_fills_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));
    fs::write(
        manager.config_path(),
        r#"{ "locale": "en-GB", "currency": "GBP" }"#,
    )
    .expect("write config");

    let loaded = manager.load().expect("load config");
    assert_eq!(loaded.currency, "GBP");
    assert_eq!(loaded.backup_retention, 5);
    assert!(loaded.ui_color_enabled);
}

#[test]
fn invalid_values_are_rejected_on_save() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));
    let cfg = Config {
        backup_retention: 0,
        ..Config::default()
    };

    assert!(matches!(
        manager.save(&cfg),
        Err(ConfigError::Invalid { key: "backup_retention", .. })
    ));
    assert!(!manager.config_path().exists());
}
