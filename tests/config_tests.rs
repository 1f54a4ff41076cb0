use std::fs;
use std::time::Duration;

use formstore_core::config::{ConfigManager, FormStoreConfig};
use formstore_core::ui::FormBuilder;
use formstore_core::FormError;

#[test]
fn test_toml_file_drives_form_defaults() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("formstore.toml"),
        r#"
[forms]
default_timeout_ms = 45000
task_label_prefix = "support-bot"

[logging]
level = "formstore_core=trace"
"#,
    )
    .unwrap();

    let manager =
        ConfigManager::load_from_directory_with_env(Some(dir.path().to_path_buf()), "test")
            .unwrap();
    let config = manager.config();
    assert_eq!(config.forms.default_timeout(), Some(Duration::from_secs(45)));
    assert_eq!(config.logging.level.as_deref(), Some("formstore_core=trace"));

    let form = FormBuilder::with_config(&config.forms).build().unwrap();
    assert_eq!(form.timeout(), Some(Duration::from_secs(45)));
}

#[test]
fn test_timeouts_can_be_disabled_per_environment() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("formstore.development.toml"),
        "[forms]\ntimeouts_enabled = false\n",
    )
    .unwrap();

    let manager = ConfigManager::load_from_directory_with_env(
        Some(dir.path().to_path_buf()),
        "development",
    )
    .unwrap();
    let form = FormBuilder::with_config(&manager.config().forms)
        .build()
        .unwrap();
    assert_eq!(form.timeout(), None);
}

#[test]
fn test_invalid_values_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("formstore.toml"),
        "[forms]\ndefault_timeout_ms = 0\n",
    )
    .unwrap();

    let err = ConfigManager::load_from_directory_with_env(Some(dir.path().to_path_buf()), "test")
        .unwrap_err();
    assert!(matches!(err, FormError::Configuration(_)));
}

#[test]
fn test_malformed_file_is_a_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("formstore.toml"), "[forms\nbroken").unwrap();

    let err = ConfigManager::load_from_directory_with_env(Some(dir.path().to_path_buf()), "test")
        .unwrap_err();
    assert!(matches!(err, FormError::Configuration(_)));
}

#[test]
fn test_environment_variables_override_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("formstore.toml"), "[logging]\njson = false\n").unwrap();

    std::env::set_var("FORMSTORE__LOGGING__JSON", "true");
    let result =
        ConfigManager::load_from_directory_with_env(Some(dir.path().to_path_buf()), "test");
    std::env::remove_var("FORMSTORE__LOGGING__JSON");

    assert!(result.unwrap().config().logging.json);
}

#[test]
fn test_config_serializes_to_toml_friendly_json() {
    let value = serde_json::to_value(FormStoreConfig::default()).unwrap();
    assert_eq!(value["forms"]["default_timeout_ms"], 180_000);
    assert_eq!(value["forms"]["timeouts_enabled"], true);
}
