//! Loader for the rental workflow configuration: YAML + environment overlays.
//!
//! Configuration is read from `gidamu.yaml`, overridden by `GIDAMU`-prefixed
//! environment variables, and `${VAR}` placeholders in string values are
//! expanded from the process environment. Credentials are normally supplied
//! as `${RIDIBOOKS_USERNAME}` / `${RIDIBOOKS_PASSWORD}` references so they
//! never live in the file itself.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

/// Top-level configuration for one rental run.
#[derive(Debug, Clone, Deserialize)]
pub struct RentalConfig {
    #[serde(default)]
    pub version: Option<String>,
    pub account: AccountConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub telegram: Option<TelegramConfig>,
}

/// Login identifier and secret. Read-only after load; never logged.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
    pub username: String,
    pub password: String,
}

/// Browser session options.
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,
    #[serde(default = "default_true")]
    pub headless: bool,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    #[serde(default = "default_window_height")]
    pub window_height: u32,
}

/// Storefront endpoints and the selector set for its pages.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_login_url")]
    pub login_url: String,
    #[serde(default = "default_notifications_url")]
    pub notifications_url: String,
    #[serde(default)]
    pub selectors: Selectors,
}

/// Page-element selectors. CSS strings, except those written as XPath
/// (leading `//`) for text-content matches.
///
/// These are a fragile contract with the remote site; layout changes are
/// absorbed here and in the portal adapter, not in the workflow control
/// flow.
// FIXME(selectors): the notification list/item/timestamp classes are carried
// over from the previous site revision and need re-checking against the live
// notification markup.
#[derive(Debug, Clone, Deserialize)]
pub struct Selectors {
    #[serde(default = "default_username_field")]
    pub username_field: String,
    #[serde(default = "default_password_field")]
    pub password_field: String,
    #[serde(default = "default_submit")]
    pub submit: String,
    #[serde(default = "default_login_marker")]
    pub login_marker: String,
    #[serde(default = "default_notification_list")]
    pub notification_list: String,
    #[serde(default = "default_notification_item")]
    pub notification_item: String,
    #[serde(default = "default_entry_timestamp")]
    pub entry_timestamp: String,
    #[serde(default = "default_entry_link")]
    pub entry_link: String,
    #[serde(default = "default_rent_control")]
    pub rent_control: String,
    #[serde(default = "default_confirm_control")]
    pub confirm_control: String,
}

/// Notification filtering knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    /// Entries older than this many hours are ignored.
    #[serde(default = "default_window_hours")]
    pub window_hours: i64,
    /// Only links containing this substring are rented.
    #[serde(default = "default_content_marker")]
    pub content_marker: String,
}

/// Wait deadlines and deliberate delays, in seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct PacingConfig {
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,
    #[serde(default = "default_post_rent_delay_secs")]
    pub post_rent_delay_secs: u64,
    #[serde(default = "default_confirm_wait_secs")]
    pub confirm_wait_secs: u64,
}

/// Optional Telegram run notifications.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

fn default_webdriver_url() -> String {
    "http://localhost:9515".into()
}
fn default_true() -> bool {
    true
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36"
        .into()
}
fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_login_url() -> String {
    "https://ridibooks.com/account/login".into()
}
fn default_notifications_url() -> String {
    "https://ridibooks.com/notification?tab=3".into()
}
fn default_username_field() -> String {
    "#id".into()
}
fn default_password_field() -> String {
    "#password".into()
}
fn default_submit() -> String {
    "button[type=submit]".into()
}
fn default_login_marker() -> String {
    "#user_profile".into()
}
fn default_notification_list() -> String {
    ".notification_container".into()
}
fn default_notification_item() -> String {
    ".notification_item".into()
}
fn default_entry_timestamp() -> String {
    ".timestamp".into()
}
fn default_entry_link() -> String {
    "a".into()
}
fn default_rent_control() -> String {
    "//button[contains(text(), \"대여\")]".into()
}
fn default_confirm_control() -> String {
    ".confirm-btn, .modal-confirm".into()
}
fn default_window_hours() -> i64 {
    24
}
fn default_content_marker() -> String {
    "webnovel".into()
}
fn default_wait_timeout_secs() -> u64 {
    10
}
fn default_post_rent_delay_secs() -> u64 {
    2
}
fn default_confirm_wait_secs() -> u64 {
    2
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            headless: true,
            user_agent: default_user_agent(),
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            login_url: default_login_url(),
            notifications_url: default_notifications_url(),
            selectors: Selectors::default(),
        }
    }
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            username_field: default_username_field(),
            password_field: default_password_field(),
            submit: default_submit(),
            login_marker: default_login_marker(),
            notification_list: default_notification_list(),
            notification_item: default_notification_item(),
            entry_timestamp: default_entry_timestamp(),
            entry_link: default_entry_link(),
            rent_control: default_rent_control(),
            confirm_control: default_confirm_control(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            window_hours: default_window_hours(),
            content_marker: default_content_marker(),
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            wait_timeout_secs: default_wait_timeout_secs(),
            post_rent_delay_secs: default_post_rent_delay_secs(),
            confirm_wait_secs: default_confirm_wait_secs(),
        }
    }
}

impl RentalConfig {
    /// Check the loaded configuration before any browser work starts.
    ///
    /// A credential is "unset" when it is blank or when its `${VAR}`
    /// placeholder survived expansion because the variable is absent from
    /// the environment — both are fatal preconditions.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if is_unset(&self.account.username) {
            return Err(ConfigError::Message(
                "account.username is empty (set RIDIBOOKS_USERNAME)".into(),
            ));
        }
        if is_unset(&self.account.password) {
            return Err(ConfigError::Message(
                "account.password is empty (set RIDIBOOKS_PASSWORD)".into(),
            ));
        }
        if self.scan.window_hours < 1 {
            return Err(ConfigError::Message(
                "scan.window_hours must be at least 1".into(),
            ));
        }
        if let Some(telegram) = &self.telegram {
            if is_unset(&telegram.bot_token) || is_unset(&telegram.chat_id) {
                return Err(ConfigError::Message(
                    "telegram.bot_token/chat_id are set but empty".into(),
                ));
            }
        }
        Ok(())
    }
}

fn is_unset(value: &str) -> bool {
    value.trim().is_empty() || value.contains("${")
}

fn expand_str(s: &str) -> String {
    let mut cur = s.to_string();
    for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
        let expanded = match shellexpand::env(&cur) {
            Ok(cow) => cow.into_owned(),
            Err(_) => cur.clone(),
        };
        if expanded == cur {
            break;
        }
        cur = expanded;
    }
    cur
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                *s = expand_str(s);
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (YAML file + env overrides).
pub struct GidamuConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for GidamuConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl GidamuConfigLoader {
    /// Start with the defaults: `GIDAMU`-prefixed env overrides on top of
    /// whatever file or inline sources are attached afterwards.
    pub fn new() -> Self {
        let builder =
            Config::builder().add_source(Environment::with_prefix("GIDAMU").separator("__"));
        Self { builder }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by
    /// suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Merge an inline YAML snippet (tests, CLI overrides).
    ///
    /// ```
    /// use gidamu_config::GidamuConfigLoader;
    ///
    /// let cfg = GidamuConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// account:
    ///   username: "reader"
    ///   password: "secret"
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.account.username, "reader");
    /// assert_eq!(cfg.scan.window_hours, 24);
    /// assert_eq!(cfg.scan.content_marker, "webnovel");
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources, expanding
    /// `${VAR}` placeholders before materialising the typed config.
    pub fn load(self) -> Result<RentalConfig, ConfigError> {
        let cfg = self.builder.build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: RentalConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal(username: &str, password: &str) -> RentalConfig {
        GidamuConfigLoader::new()
            .with_yaml_str(&format!(
                "account:\n  username: \"{username}\"\n  password: \"{password}\"\n"
            ))
            .load()
            .expect("minimal config loads")
    }

    #[test]
    fn expands_placeholders_in_nested_values() {
        temp_env::with_var("GIDAMU_TEST_MARKER", Some("comic"), || {
            let mut v = json!({
                "scan": { "content_marker": "${GIDAMU_TEST_MARKER}" },
                "untouched": 24,
            });
            expand_env_in_value(&mut v);
            assert_eq!(v["scan"]["content_marker"], json!("comic"));
            assert_eq!(v["untouched"], json!(24));
        });
    }

    #[test]
    fn unknown_placeholders_are_left_as_is() {
        let mut v = json!("x-${GIDAMU_TEST_DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("x-${GIDAMU_TEST_DOES_NOT_EXIST}"));
    }

    #[test]
    fn expansion_terminates_on_reference_cycles() {
        temp_env::with_vars(
            [
                ("GIDAMU_TEST_A", Some("${GIDAMU_TEST_B}")),
                ("GIDAMU_TEST_B", Some("${GIDAMU_TEST_A}")),
            ],
            || {
                let out = expand_str("v=${GIDAMU_TEST_A}");
                assert!(out.starts_with("v="));
                assert!(out.contains("${"));
            },
        );
    }

    #[test]
    fn defaults_cover_site_scan_and_pacing() {
        let cfg = minimal("reader", "secret");
        assert_eq!(cfg.site.login_url, "https://ridibooks.com/account/login");
        assert_eq!(cfg.site.selectors.login_marker, "#user_profile");
        assert!(cfg.site.selectors.rent_control.starts_with("//button"));
        assert_eq!(cfg.pacing.wait_timeout_secs, 10);
        assert_eq!(cfg.pacing.post_rent_delay_secs, 2);
        assert!(cfg.browser.headless);
        assert!(cfg.telegram.is_none());
    }

    #[test]
    fn blank_credentials_fail_validation() {
        assert!(minimal("", "secret").validate().is_err());
        assert!(minimal("reader", "   ").validate().is_err());
        assert!(minimal("reader", "secret").validate().is_ok());
    }

    #[test]
    fn unexpanded_placeholder_counts_as_unset() {
        let cfg = minimal("${RIDIBOOKS_USERNAME}", "secret");
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn window_hours_must_be_positive() {
        let cfg = GidamuConfigLoader::new()
            .with_yaml_str(
                r#"
account:
  username: "reader"
  password: "secret"
scan:
  window_hours: 0
"#,
            )
            .load()
            .unwrap();
        assert!(cfg.validate().is_err());
    }
}
