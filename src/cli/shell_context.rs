//! Shared runtime state for CLI interactions and command execution.

use std::{collections::VecDeque, sync::Arc};

use dialoguer::theme::ColorfulTheme;
use intake_config::{Config, ConfigManager};
use intake_core::Clock;
use intake_storage_json::JsonCaseStore;

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// Lines of a script still waiting to be read. Commands that need more input
/// (the intake wizard, pickers) consume from the same queue as the shell loop.
#[derive(Debug, Default)]
pub struct ScriptFeed {
    lines: VecDeque<String>,
}

impl ScriptFeed {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push_back(line.into());
    }

    /// Next non-blank line that is not a `#` comment.
    pub fn next_line(&mut self) -> Option<String> {
        while let Some(line) = self.lines.pop_front() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            return Some(trimmed.to_string());
        }
        None
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub store: JsonCaseStore,
    pub clock: Arc<dyn Clock>,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub script: ScriptFeed,
    pub last_command: Option<String>,
    pub running: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_feed_skips_blank_lines_and_comments() {
        let mut feed = ScriptFeed::new(["", "# start", "  new billing  ", "exit"]);
        assert_eq!(feed.next_line().as_deref(), Some("new billing"));
        feed.push("cases");
        assert_eq!(feed.next_line().as_deref(), Some("exit"));
        assert_eq!(feed.next_line().as_deref(), Some("cases"));
        assert!(feed.is_empty());
        assert_eq!(feed.next_line(), None);
    }
}
