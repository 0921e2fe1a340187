use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::cart_controller::DEFAULT_STORAGE_KEY;
use super::SystemError;

/// Configuration file read when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "cart.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub inventory_url: String,
    pub store_dir: PathBuf,
    pub storage_key: String,
    pub request_timeout_secs: u64,
    pub mailbox_size: usize,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            inventory_url: "http://localhost:3333/".into(),
            store_dir: PathBuf::from(".cart"),
            storage_key: DEFAULT_STORAGE_KEY.into(),
            request_timeout_secs: 5,
            mailbox_size: 32,
            log_filter: "info".into(),
        }
    }
}

/// Loads settings from defaults, then the TOML file, then `CART_*`
/// environment variables.
///
/// A missing default file is fine; a missing explicit file or a malformed one
/// is an error.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, SystemError> {
    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    let mut settings = read_settings_file(&path, required)?;
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

/// Reads settings from a TOML file without applying environment overrides.
///
/// When `required` is false a missing file yields the defaults.
pub fn read_settings_file(path: &Path, required: bool) -> Result<Settings, SystemError> {
    match fs::read_to_string(path) {
        Ok(raw) => parse_settings(&raw).map_err(|e| SystemError::Config(format!("{}: {}", path.display(), e))),
        Err(e) if e.kind() == io::ErrorKind::NotFound && !required => {
            debug!(path = %path.display(), "No config file, using defaults");
            Ok(Settings::default())
        }
        Err(e) => Err(SystemError::Config(format!("{}: {}", path.display(), e))),
    }
}

pub fn parse_settings(raw: &str) -> Result<Settings, toml::de::Error> {
    toml::from_str(raw)
}

/// Overrides fields from variables returned by `lookup`.
pub fn apply_env_overrides(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), SystemError> {
    if let Some(v) = lookup("CART_INVENTORY_URL") {
        settings.inventory_url = v;
    }
    if let Some(v) = lookup("CART_STORE_DIR") {
        settings.store_dir = PathBuf::from(v);
    }
    if let Some(v) = lookup("CART_STORAGE_KEY") {
        settings.storage_key = v;
    }
    if let Some(v) = lookup("CART_REQUEST_TIMEOUT_SECS") {
        settings.request_timeout_secs = parse_number("CART_REQUEST_TIMEOUT_SECS", &v)?;
    }
    if let Some(v) = lookup("CART_MAILBOX_SIZE") {
        settings.mailbox_size = parse_number("CART_MAILBOX_SIZE", &v)?;
    }
    if let Some(v) = lookup("CART_LOG") {
        settings.log_filter = v;
    }

    if settings.mailbox_size == 0 {
        return Err(SystemError::Config("mailbox_size must be at least 1".into()));
    }
    Ok(())
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, SystemError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| SystemError::Config(format!("{}={:?}: {}", key, value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = parse_settings("inventory_url = \"http://catalog:8080/api/\"\nmailbox_size = 4\n").unwrap();
        assert_eq!(settings.inventory_url, "http://catalog:8080/api/");
        assert_eq!(settings.mailbox_size, 4);
        assert_eq!(settings.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(settings.request_timeout_secs, 5);
    }

    #[test]
    fn test_malformed_file_is_error() {
        assert!(parse_settings("mailbox_size = \"many\"").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("CART_STORE_DIR", "/tmp/carts"),
            ("CART_REQUEST_TIMEOUT_SECS", "12"),
            ("CART_LOG", "debug"),
        ]);
        let mut settings = Settings::default();
        apply_env_overrides(&mut settings, |k| vars.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(settings.store_dir, PathBuf::from("/tmp/carts"));
        assert_eq!(settings.request_timeout_secs, 12);
        assert_eq!(settings.log_filter, "debug");
        assert_eq!(settings.inventory_url, Settings::default().inventory_url);
    }

    #[test]
    fn test_env_override_rejects_bad_numbers() {
        let mut settings = Settings::default();
        let result = apply_env_overrides(&mut settings, |k| (k == "CART_MAILBOX_SIZE").then(|| "0".to_string()));
        assert!(matches!(result, Err(SystemError::Config(_))));

        let result = apply_env_overrides(&mut settings, |k| (k == "CART_REQUEST_TIMEOUT_SECS").then(|| "soon".to_string()));
        assert!(matches!(result, Err(SystemError::Config(_))));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_settings(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(SystemError::Config(_))));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.toml");
        fs::write(&path, "storage_key = \"session:42\"\n").unwrap();

        let mut settings = read_settings_file(&path, true).unwrap();
        assert_eq!(settings.storage_key, "session:42");
        assert_eq!(settings.mailbox_size, 32);

        apply_env_overrides(&mut settings, |_| None).unwrap();
        assert_eq!(settings.storage_key, "session:42");
    }

    #[test]
    fn test_missing_optional_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = read_settings_file(&dir.path().join("cart.toml"), false).unwrap();
        assert_eq!(settings, Settings::default());
    }
}
