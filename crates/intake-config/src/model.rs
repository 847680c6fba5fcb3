use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::ConfigError;

/// Stores user-configurable shell preferences and metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    /// Drops colour and decorative glyphs from shell output.
    #[serde(default)]
    pub screen_reader_mode: bool,
    #[serde(default = "Config::default_redirect_delay_ms")]
    pub redirect_delay_ms: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for stored cases. Defaults to `<base>/cases`.
    pub case_store_root: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_case_id: Option<Uuid>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            screen_reader_mode: false,
            redirect_delay_ms: Self::default_redirect_delay_ms(),
            case_store_root: None,
            last_case_id: None,
        }
    }
}

impl Config {
    /// Keys accepted by [`Config::set_value`].
    pub const KEYS: [&'static str; 5] = [
        "locale",
        "ui_color_enabled",
        "screen_reader_mode",
        "redirect_delay_ms",
        "case_store_root",
    ];

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_redirect_delay_ms() -> u64 {
        2000
    }

    pub fn resolve_case_store_root(&self, base: &Path) -> PathBuf {
        self.case_store_root
            .clone()
            .unwrap_or_else(|| base.join("cases"))
    }

    /// Key/value pairs for display, in declaration order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("locale", self.locale.clone()),
            ("ui_color_enabled", self.ui_color_enabled.to_string()),
            ("screen_reader_mode", self.screen_reader_mode.to_string()),
            ("redirect_delay_ms", self.redirect_delay_ms.to_string()),
            (
                "case_store_root",
                self.case_store_root
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "(default)".into()),
            ),
            (
                "last_case_id",
                self.last_case_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "(none)".into()),
            ),
        ]
    }

    /// Updates a single preference from its textual form.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let trimmed = value.trim();
        match key.trim().to_ascii_lowercase().as_str() {
            "locale" => {
                if trimmed.is_empty() {
                    return Err(invalid(key, value, "locale cannot be empty"));
                }
                self.locale = trimmed.to_string();
            }
            "ui_color_enabled" => self.ui_color_enabled = parse_bool(key, trimmed)?,
            "screen_reader_mode" => self.screen_reader_mode = parse_bool(key, trimmed)?,
            "redirect_delay_ms" => {
                self.redirect_delay_ms = trimmed
                    .parse()
                    .map_err(|_| invalid(key, value, "expected milliseconds"))?;
            }
            "case_store_root" => {
                self.case_store_root = match trimmed {
                    "" | "default" | "none" => None,
                    path => Some(PathBuf::from(path)),
                };
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(invalid(key, value, "expected true or false")),
    }
}

fn invalid(key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
