use std::fmt;
use std::io::stdout;
use std::sync::RwLock;

use colored::Colorize;
use crossterm::tty::IsTty;
use intake_config::Config;
use once_cell::sync::Lazy;

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Detail,
    Success,
    Warning,
    Error,
    Prompt,
    Section,
    Separator,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputPreferences {
    pub color_enabled: bool,
    /// Plain labels, no glyphs, no colour, no decorative rules.
    pub screen_reader_mode: bool,
}

impl Default for OutputPreferences {
    fn default() -> Self {
        Self {
            color_enabled: true,
            screen_reader_mode: false,
        }
    }
}

impl OutputPreferences {
    pub fn from_config(config: &Config) -> Self {
        Self {
            color_enabled: config.ui_color_enabled,
            screen_reader_mode: config.screen_reader_mode,
        }
    }
}

static PREFERENCES: Lazy<RwLock<OutputPreferences>> =
    Lazy::new(|| RwLock::new(OutputPreferences::default()));

static STDOUT_IS_TTY: Lazy<bool> = Lazy::new(|| stdout().is_tty());

pub fn set_preferences(prefs: OutputPreferences) {
    if let Ok(mut guard) = PREFERENCES.write() {
        *guard = prefs;
    }
}

pub fn current_preferences() -> OutputPreferences {
    PREFERENCES.read().map(|guard| *guard).unwrap_or_default()
}

fn build_label(kind: MessageKind) -> (&'static str, &'static str) {
    match kind {
        MessageKind::Info => ("INFO", "[i]"),
        MessageKind::Success => ("SUCCESS", "[ok]"),
        MessageKind::Warning => ("WARNING", "[!]"),
        MessageKind::Error => ("ERROR", "[x]"),
        MessageKind::Prompt => ("PROMPT", ">"),
        MessageKind::Detail | MessageKind::Section | MessageKind::Separator => ("", ""),
    }
}

/// Text of a message before colouring.
pub fn plain_text(kind: MessageKind, message: impl fmt::Display, prefs: &OutputPreferences) -> String {
    let text = message.to_string();
    match kind {
        MessageKind::Section if prefs.screen_reader_mode => format!("Section: {}", text.trim()),
        MessageKind::Section => format!("=== {} ===", text.trim()),
        MessageKind::Separator if prefs.screen_reader_mode => String::new(),
        MessageKind::Separator => "-".repeat(40),
        MessageKind::Detail => text,
        _ => {
            let (label, icon) = build_label(kind);
            if prefs.screen_reader_mode || icon.is_empty() {
                format!("{label}: {text}")
            } else {
                format!("{label}: {icon} {text}")
            }
        }
    }
}

fn apply_style(kind: MessageKind, message: impl fmt::Display, prefs: &OutputPreferences) -> String {
    let formatted = plain_text(kind, message, prefs);
    if prefs.screen_reader_mode || !prefs.color_enabled || !*STDOUT_IS_TTY {
        return formatted;
    }

    match kind {
        MessageKind::Success => formatted.bright_green().to_string(),
        MessageKind::Warning => formatted.bright_yellow().to_string(),
        MessageKind::Error => formatted.bright_red().to_string(),
        MessageKind::Prompt => formatted.bright_cyan().to_string(),
        MessageKind::Section => formatted.bold().to_string(),
        MessageKind::Detail => formatted.dimmed().to_string(),
        MessageKind::Info | MessageKind::Separator => formatted,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let prefs = current_preferences();
    if kind == MessageKind::Separator && prefs.screen_reader_mode {
        return;
    }
    let formatted = apply_style(kind, message, &prefs);
    match kind {
        MessageKind::Section | MessageKind::Separator => println!("\n{}", formatted),
        _ => println!("{}", formatted),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn detail(message: impl fmt::Display) {
    print(MessageKind::Detail, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn prompt(message: impl fmt::Display) {
    print(MessageKind::Prompt, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

pub fn separator() {
    print(MessageKind::Separator, "");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_carry_icons_by_default() {
        let prefs = OutputPreferences::default();
        assert_eq!(
            plain_text(MessageKind::Success, "Saved.", &prefs),
            "SUCCESS: [ok] Saved."
        );
        assert_eq!(plain_text(MessageKind::Section, " Review ", &prefs), "=== Review ===");
        assert_eq!(plain_text(MessageKind::Detail, "  Step 1", &prefs), "  Step 1");
    }

    #[test]
    fn screen_reader_mode_drops_decoration() {
        let prefs = OutputPreferences {
            color_enabled: true,
            screen_reader_mode: true,
        };
        assert_eq!(plain_text(MessageKind::Error, "Nope", &prefs), "ERROR: Nope");
        assert_eq!(plain_text(MessageKind::Section, "Review", &prefs), "Section: Review");
        assert!(plain_text(MessageKind::Separator, "", &prefs).is_empty());
        assert_eq!(
            apply_style(MessageKind::Warning, "Careful", &prefs),
            "WARNING: Careful"
        );
    }

    #[test]
    fn preferences_follow_config() {
        let mut config = Config::default();
        config.ui_color_enabled = false;
        config.screen_reader_mode = true;
        let prefs = OutputPreferences::from_config(&config);
        assert!(!prefs.color_enabled);
        assert!(prefs.screen_reader_mode);
    }
}
