use super::*;
use tempfile::tempdir;

#[test]
fn test_settings_path_location() {
    let path = get_settings_path().unwrap();
    assert!(path.ends_with("quicksearch/settings.json"));
}

#[test]
fn test_write_default_settings_creates_parents() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join(SETTINGS_FILE);

    write_default_settings(&path).unwrap();
    assert!(path.exists());

    let config = load_settings_from(&path).unwrap();
    assert_eq!(config, SearchConfig::default());
}

#[test]
fn test_write_default_settings_keeps_user_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(SETTINGS_FILE);
    std::fs::write(&path, r#"{"max_file_size": 10}"#).unwrap();

    write_default_settings(&path).unwrap();

    let config = load_settings_from(&path).unwrap();
    assert_eq!(config.max_file_size, 10);
    assert_eq!(config.max_line_length, 1000);
}

#[test]
fn test_load_settings_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(SETTINGS_FILE);
    std::fs::write(&path, "{ not json").unwrap();

    let err = load_settings_from(&path).unwrap_err();
    assert!(matches!(err, SettingsError::Parse(_)));
}

#[test]
fn test_load_settings_missing_file() {
    let dir = tempdir().unwrap();
    let err = load_settings_from(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, SettingsError::Io(_)));
}
