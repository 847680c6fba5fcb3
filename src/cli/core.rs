//! Core CLI loop, dispatch, and shell context helpers.

use std::{io, path::Path, sync::Arc};

use dialoguer::theme::ColorfulTheme;
use intake_config::{Config, ConfigError, ConfigManager};
use intake_core::{CaseRepository, CoreError};
use intake_domain::{case_route, CaseRecord};
use intake_storage_json::JsonCaseStore;
use rustyline::error::ReadlineError;
use thiserror::Error;
use uuid::Uuid;

use super::commands;
use super::io as cli_io;
use super::registry::{CommandEntry, CommandRegistry};
use super::system_clock::SystemClock;
use super::views;
pub use crate::cli::shell_context::{CliMode, ScriptFeed, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

const CASE_ROUTE_PREFIX: &str = "/cases/";

impl ShellContext {
    /// Builds a shell rooted at `CASE_INTAKE_HOME` (or `~/.case_intake`).
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::from_env()?;
        Self::with_config_manager(mode, config_manager)
    }

    pub fn with_config_manager(
        mode: CliMode,
        config_manager: ConfigManager,
    ) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config = config_manager.load()?;
        cli_io::apply_config(&config);

        let clock: Arc<dyn intake_core::Clock> = Arc::new(SystemClock);
        let cases_dir = config.resolve_case_store_root(config_manager.base_dir());
        let store = JsonCaseStore::new(cases_dir, Arc::clone(&clock))?;
        tracing::debug!(cases_dir = %store.cases_dir().display(), mode = ?mode, "shell context ready");

        Ok(ShellContext {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            store,
            clock,
            config_manager,
            config,
            script: ScriptFeed::default(),
            last_command: None,
            running: true,
        })
    }

    pub(crate) fn prompt(&self) -> String {
        match self.config.last_case_id {
            Some(id) => format!("case-intake [{}]> ", short_id(id)),
            None => "case-intake> ".to_string(),
        }
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            tracing::debug!(command, args = args.len(), "dispatching command");
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.print_warning(&err.to_string());
                return Ok(LoopControl::Continue);
            }
        };

        if tokens.is_empty() {
            return Ok(LoopControl::Continue);
        }

        let command = tokens[0].to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.dispatch(&command, &tokens[0], &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        if let Some(best) = self.registry.closest(input) {
            cli_io::print_info(format!("Suggestion: `{}`?", best));
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action(&self.theme, "Exit shell?", true)?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Core(CoreError::CaseNotFound(reference)) => {
                self.print_error(&format!("No case matches `{}`.", reference));
                cli_io::print_hint("Use `cases` to list stored cases.");
                Ok(())
            }
            other => {
                tracing::warn!(command = ?self.last_command, error = %other, "command failed");
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        cli_io::print_error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    /// Opens the store `updated` points at, saves it, then swaps both in.
    /// Nothing is written when the case store root cannot be opened.
    pub(crate) fn commit_config(&mut self, updated: Config) -> CommandResult {
        let cases_dir = updated.resolve_case_store_root(self.config_manager.base_dir());
        let store = if cases_dir.as_path() != self.store.cases_dir() {
            Some(JsonCaseStore::new(cases_dir, Arc::clone(&self.clock))?)
        } else {
            None
        };
        self.config_manager.save(&updated)?;
        self.config = updated;
        if let Some(store) = store {
            self.store = store;
        }
        cli_io::apply_config(&self.config);
        Ok(())
    }

    pub(crate) fn remember_case(&mut self, id: Uuid) -> CommandResult {
        self.config.last_case_id = Some(id);
        self.persist_config()
    }

    /// Renders the view a wizard navigation target points at.
    pub(crate) fn open_route(&mut self, route: &str) -> CommandResult {
        let reference = route.strip_prefix(CASE_ROUTE_PREFIX).ok_or_else(|| {
            CommandError::Message(format!("Cannot open `{}` in the terminal.", route))
        })?;
        let id = Uuid::parse_str(reference)
            .map_err(|_| CommandError::Message(format!("Malformed case route `{}`.", route)))?;
        let record = self.store.load_case(id)?;
        self.show_case(&record);
        Ok(())
    }

    pub(crate) fn show_case(&self, record: &CaseRecord) {
        views::print_case_detail(record, &case_route(record.id));
    }

    pub(crate) fn show_config(&self) -> CommandResult {
        cli_io::print_info(format!(
            "Configuration file: {}",
            self.config_manager.config_path().display()
        ));
        for (key, value) in self.config.entries() {
            cli_io::print_info(format!("  {:<20} {}", key, value));
        }
        cli_io::print_detail(format!("Cases stored in {}", self.store.cases_dir().display()));
        Ok(())
    }

    pub(crate) fn set_config_value(&mut self, key: &str, value: &str) -> CommandResult {
        let mut updated = self.config.clone();
        updated.set_value(key, value)?;
        self.commit_config(updated)?;
        cli_io::print_success("Configuration updated.");
        Ok(())
    }

    pub(crate) fn backup_config(&self, note: Option<&str>) -> CommandResult {
        let file_name = self.config_manager.backup(&self.config, note)?;
        cli_io::print_success(format!("Configuration backup saved: {}", file_name));
        Ok(())
    }

    pub(crate) fn list_config_backups(&self) -> CommandResult {
        let backups = self.config_manager.list_backups()?;
        if backups.is_empty() {
            cli_io::print_warning("No configuration backups found.");
            return Ok(());
        }
        cli_io::print_info("Available configuration backups:");
        for (idx, name) in backups.iter().enumerate() {
            cli_io::print_info(format!("  {:>2}. {}", idx + 1, name));
        }
        Ok(())
    }

    /// Restores a backup by 1-based index (newest first) or by name fragment.
    pub(crate) fn restore_config_by_reference(&mut self, reference: &str) -> CommandResult {
        let backups = self.config_manager.list_backups()?;
        if backups.is_empty() {
            return Err(CommandError::InvalidArguments(
                "no configuration backups available".into(),
            ));
        }
        let target = match reference.parse::<usize>() {
            Ok(index) => index
                .checked_sub(1)
                .and_then(|idx| backups.get(idx))
                .cloned()
                .ok_or_else(|| {
                    CommandError::InvalidArguments(format!(
                        "configuration backup index {} out of range",
                        reference
                    ))
                })?,
            Err(_) => {
                let mut matches = backups.iter().filter(|name| name.contains(reference));
                match (matches.next(), matches.next()) {
                    (Some(name), None) => name.clone(),
                    (Some(_), Some(_)) => {
                        return Err(CommandError::InvalidArguments(format!(
                            "`{}` matches more than one backup",
                            reference
                        )))
                    }
                    (None, _) => {
                        return Err(CommandError::InvalidArguments(format!(
                            "no configuration backup matches `{}`",
                            reference
                        )))
                    }
                }
            }
        };

        let restored = self.config_manager.read_backup(&target)?;
        self.commit_config(restored)?;
        cli_io::print_success(format!("Configuration restored from {}.", target));
        Ok(())
    }

    pub(crate) fn base_dir(&self) -> &Path {
        self.config_manager.base_dir()
    }
}

/// First block of a uuid, enough to reference a case in this shell.
pub(crate) fn short_id(id: Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Input error: {0}")]
    Input(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Command(#[from] CommandError),
}

impl From<ReadlineError> for CliError {
    fn from(err: ReadlineError) -> Self {
        CliError::Input(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}
