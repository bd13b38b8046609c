use fleetsim_core::config::{ConfigError, FleetConfig};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

#[test]
fn test_save_then_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let mut config = FleetConfig::default();
    config.fleet_size = 12;
    config.seed = Some(99);
    config.summarizer.model = "custom-model".to_string();
    config.save(&path).unwrap();

    let loaded = FleetConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let loaded = FleetConfig::load_or_default(&dir.path().join("absent.json")).unwrap();
    assert_eq!(loaded, FleetConfig::default());
}

#[test]
fn test_invalid_json_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ fleet_size: ").unwrap();
    assert!(matches!(FleetConfig::load(&path), Err(ConfigError::Parse(_))));
}

#[test]
fn test_invalid_values_are_rejected_on_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "fleet_size": 0 }"#).unwrap();
    assert!(matches!(
        FleetConfig::load(&path),
        Err(ConfigError::InvalidValue {
            field: "fleet_size",
            ..
        })
    ));
}
