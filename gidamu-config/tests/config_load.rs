use gidamu_config::GidamuConfigLoader;
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn loads_file_and_expands_credentials_from_env() {
    let tmp = TempDir::new().unwrap();

    let file_yaml = r#"
version: "1"
account:
  username: "${RIDIBOOKS_USERNAME}"
  password: "${RIDIBOOKS_PASSWORD}"
scan:
  window_hours: 24
  content_marker: webnovel
"#;
    let p = write_yaml(&tmp, "gidamu.yaml", file_yaml);

    temp_env::with_vars(
        [
            ("RIDIBOOKS_USERNAME", Some("reader@example.com")),
            ("RIDIBOOKS_PASSWORD", Some("hunter2")),
        ],
        || {
            let config = GidamuConfigLoader::new()
                .with_file(&p)
                .load()
                .expect("load rental config");

            assert_eq!(config.account.username, "reader@example.com");
            assert_eq!(config.account.password, "hunter2");
            config.validate().expect("expanded credentials validate");
        },
    );
}

#[test]
#[serial]
fn missing_credential_env_fails_validation_before_any_browser_work() {
    let tmp = TempDir::new().unwrap();

    let file_yaml = r#"
account:
  username: "${RIDIBOOKS_USERNAME}"
  password: "${RIDIBOOKS_PASSWORD}"
"#;
    let p = write_yaml(&tmp, "gidamu.yaml", file_yaml);

    temp_env::with_vars(
        [
            ("RIDIBOOKS_USERNAME", None::<&str>),
            ("RIDIBOOKS_PASSWORD", None::<&str>),
        ],
        || {
            let config = GidamuConfigLoader::new()
                .with_file(&p)
                .load()
                .expect("file still loads");

            let err = config.validate().expect_err("unset credentials rejected");
            assert!(err.to_string().contains("RIDIBOOKS_USERNAME"));
        },
    );
}

#[test]
#[serial]
fn selector_overrides_replace_defaults() {
    let tmp = TempDir::new().unwrap();

    let file_yaml = r##"
account:
  username: "reader"
  password: "secret"
site:
  selectors:
    login_marker: "#ridi-gnb-profile"
"##;
    let p = write_yaml(&tmp, "gidamu.yaml", file_yaml);

    let config = GidamuConfigLoader::new()
        .with_file(&p)
        .load()
        .expect("load rental config");

    assert_eq!(config.site.selectors.login_marker, "#ridi-gnb-profile");
    // Untouched selectors keep their defaults.
    assert_eq!(config.site.selectors.username_field, "#id");
}
