//! Page configuration, supplied by the host page as a JS object or JSON.
//!
//! Every field has a default, so `{}` (or no object at all) reproduces the
//! stock behavior: key `dark` in `localStorage`, toggle `#darkToggle`, class
//! `dark` on `<body>`, and 2.5 second toasts.

use tracing::Level;
use wasm_bindgen::prelude::*;

use crate::error::Error;

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// One of `trace`, `debug`, `info`, `warn`, `error`.
    pub log_level: String,
    pub theme: ThemeConfig,
    pub toast: ToastConfig,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeConfig {
    pub storage_key: String,
    pub toggle_id: String,
    pub dark_class: String,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToastConfig {
    pub duration_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: "info".to_string(),
            theme: ThemeConfig::default(),
            toast: ToastConfig::default(),
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        ThemeConfig {
            storage_key: "dark".to_string(),
            toggle_id: "darkToggle".to_string(),
            dark_class: "dark".to_string(),
        }
    }
}

impl Default for ToastConfig {
    fn default() -> Self {
        ToastConfig {
            duration_ms: crate::toast::DEFAULT_DURATION_MS,
        }
    }
}

impl Config {
    pub fn from_json(s: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_js(value: &JsValue) -> Result<Self, Error> {
        Ok(crate::interop::from_js(value)?.unwrap_or_default())
    }

    pub fn level(&self) -> Level {
        self.log_level.parse().unwrap_or(Level::INFO)
    }
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[test]
fn test_config_defaults() {
    let config = Config::from_json("{}").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.theme.storage_key, "dark");
    assert_eq!(config.theme.toggle_id, "darkToggle");
    assert_eq!(config.theme.dark_class, "dark");
    assert_eq!(config.toast.duration_ms, 2500);
    assert_eq!(config.level(), Level::INFO);
}

#[test]
fn test_config_partial_override() {
    let config = Config::from_json(
        r#"{ "logLevel": "debug", "theme": { "toggleId": "themeButton" } }"#,
    )
    .unwrap();
    assert_eq!(config.level(), Level::DEBUG);
    assert_eq!(config.theme.toggle_id, "themeButton");
    assert_eq!(config.theme.storage_key, "dark");
    assert_eq!(config.toast, ToastConfig::default());
}

#[test]
fn test_config_unknown_level() {
    let config = Config::from_json(r#"{ "logLevel": "loud" }"#).unwrap();
    assert_eq!(config.level(), Level::INFO);
}

#[test]
fn test_config_rejects_bad_types() {
    assert!(matches!(
        Config::from_json(r#"{ "toast": { "durationMs": "soon" } }"#),
        Err(Error::Config(_))
    ));
}
