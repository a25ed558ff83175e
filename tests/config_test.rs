//! Settings files and the generated template

use std::fs;

use tempfile::TempDir;

use tree_builder::config::Settings;

#[test]
fn given_template_when_loaded_then_equals_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tree-builder.toml");
    fs::write(&path, Settings::template()).unwrap();

    let settings = Settings::load_from(&path).unwrap();

    assert_eq!(settings, Settings::default());
}

#[test]
fn given_full_file_when_loaded_then_all_fields_overridden() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tree-builder.toml");
    fs::write(
        &path,
        "label_field = \"title\"\npretty = false\ndefault_file = \"/data/tree.json\"\n",
    )
    .unwrap();

    let settings = Settings::load_from(&path).unwrap();

    assert_eq!(settings.label_field, "title");
    assert!(!settings.pretty);
    assert_eq!(settings.default_file.as_deref(), Some(std::path::Path::new("/data/tree.json")));
}

#[test]
fn given_settings_when_to_toml_then_loads_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("roundtrip.toml");
    let settings = Settings {
        label_field: "title".into(),
        pretty: false,
        default_file: None,
    };
    fs::write(&path, settings.to_toml().unwrap()).unwrap();

    assert_eq!(Settings::load_from(&path).unwrap(), settings);
}

#[test]
fn given_invalid_toml_when_loaded_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "pretty = [").unwrap();

    let err = Settings::load_from(&path).unwrap_err();

    assert!(err.to_string().starts_with("config error:"));
}
