use siteplan_settings::{Config, ConfigError, SettingsError, YAxis};
use tempfile::TempDir;

#[test]
fn test_toml_round_trip() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.grid.pitch_ft = 5.0;
    config.viewport.y_axis = YAxis::Down;
    config.viewport.fit_zoom_cap = Some(4.0);
    config.interaction.single_shot_tools = false;
    config.save_to_file(&path).expect("save");

    let loaded = Config::load_from_file(&path).expect("load");
    assert_eq!(loaded, config);
}

#[test]
fn test_json_round_trip() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.json");

    let mut config = Config::default();
    config.notifications.building_update_debounce_ms = 120;
    config.footprints.building.width_ft = 80.0;
    config.save_to_file(&path).expect("save");

    let loaded = Config::load_from_file(&path).expect("load");
    assert_eq!(loaded.notifications.building_update_debounce_ms, 120);
    assert_eq!(loaded.footprints.building.width_ft, 80.0);
}

#[test]
fn test_unknown_extension_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.yaml");
    let err = Config::default().save_to_file(&path).unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Config(ConfigError::UnsupportedFormat(ref ext)) if ext == "yaml"
    ));
}

#[test]
fn test_invalid_file_fails_validation() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[viewport]\nmin_zoom = 5.0\nmax_zoom = 2.0\n").expect("write");
    let err = Config::load_from_file(&path).unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Config(ConfigError::ValueOutOfRange { .. })
    ));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().expect("tempdir");
    let err = Config::load_from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, SettingsError::IoError(_)));
}
