mod common;

use common::setup_test_env;
use spender_core::{config::Config, errors::SpenderError};

#[test]
fn save_then_load_roundtrip() {
    let (_, manager) = setup_test_env();
    let config = Config {
        currency: "EUR".into(),
        enforce_category_sign: false,
        last_opened_ledger: Some("household".into()),
        ..Config::default()
    };
    manager.save(&config).unwrap();
    assert_eq!(manager.load().unwrap(), config);
}

#[test]
fn backup_and_restore() {
    let (_, manager) = setup_test_env();
    let mut config = Config::default();
    manager.save(&config).unwrap();
    let backup = manager.backup(&config, Some("pre change")).unwrap();

    config.default_overall_budget = 3500.0;
    manager.save(&config).unwrap();

    let restored = manager.restore(&backup).unwrap();
    assert_eq!(restored.default_overall_budget, 2000.0);
    assert_eq!(manager.load().unwrap(), restored);
    assert_eq!(manager.list_backups().unwrap(), vec![backup]);
}

#[test]
fn restoring_unknown_backup_fails() {
    let (_, manager) = setup_test_env();
    assert!(matches!(
        manager.restore("config_20990101_0000.json"),
        Err(SpenderError::ConfigError(_))
    ));
}
