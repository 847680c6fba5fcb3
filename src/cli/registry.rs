use std::collections::HashMap;

use strsim::levenshtein;

use crate::cli::core::CommandResult;
use crate::cli::shell_context::ShellContext;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

const SUGGESTION_MAX_DISTANCE: usize = 3;

pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

/// Commands in registration order, looked up by lowercase name.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandEntry>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `entry`; a later entry with the same name replaces the earlier one.
    pub fn register(&mut self, entry: CommandEntry) {
        let name = entry.name;
        if self.commands.insert(name, entry).is_none() {
            self.order.push(name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.commands.get(name)
    }

    pub fn list(&self) -> Vec<&CommandEntry> {
        self.order
            .iter()
            .filter_map(|name| self.commands.get(name))
            .collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.commands.get(name).map(|entry| entry.handler)
    }

    /// Closest registered name to `input`, if any is near enough to be a typo.
    pub fn closest(&self, input: &str) -> Option<&'static str> {
        let needle = input.to_ascii_lowercase();
        self.names()
            .map(|name| (levenshtein(name, &needle), name))
            .filter(|(distance, _)| *distance <= SUGGESTION_MAX_DISTANCE)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, name)| name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut ShellContext, _: &[&str]) -> CommandResult {
        Ok(())
    }

    fn registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        registry.register(CommandEntry::new("new", "Start", "new", noop));
        registry.register(CommandEntry::new("cases", "List", "cases", noop));
        registry.register(CommandEntry::new("config", "Prefs", "config", noop));
        registry
    }

    #[test]
    fn keeps_registration_order() {
        let registry = registry();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["new", "cases", "config"]);
        assert_eq!(registry.list().len(), 3);
        assert!(registry.handler("cases").is_some());
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn re_registering_replaces_without_duplicating() {
        let mut registry = registry();
        registry.register(CommandEntry::new("new", "Start again", "new [category]", noop));
        assert_eq!(registry.names().count(), 3);
        assert_eq!(registry.get("new").map(|entry| entry.usage), Some("new [category]"));
    }

    #[test]
    fn closest_tolerates_small_typos() {
        let registry = registry();
        assert_eq!(registry.closest("CASSE"), Some("cases"));
        assert_eq!(registry.closest("confg"), Some("config"));
        assert_eq!(registry.closest("completely-different"), None);
    }
}
