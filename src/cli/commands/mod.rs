//! Shell command definitions, grouped by concern.

pub mod case;
pub mod config;
pub mod system;

use crate::cli::registry::CommandRegistry;

/// Registers every shell command in help order.
pub(crate) fn register_all(registry: &mut CommandRegistry) {
    for entry in case::definitions()
        .into_iter()
        .chain(config::definitions())
        .chain(system::definitions())
    {
        registry.register(entry);
    }
}
