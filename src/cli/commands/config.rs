use intake_config::Config;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and manage shell preferences",
        "config [show|set <key> <value>|backup [note]|backups|restore <index|name>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        return context.show_config();
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: config set <{}> <value>",
                    Config::KEYS.join("|")
                )));
            }
            let key = args[1];
            let value = args[2..].join(" ");
            context.set_config_value(key, value.trim())
        }
        "backup" => {
            let note = if args.len() > 1 {
                Some(args[1..].join(" "))
            } else {
                None
            };
            context.backup_config(note.as_deref())
        }
        "backups" => context.list_config_backups(),
        "restore" => match args.get(1) {
            Some(reference) => context.restore_config_by_reference(reference),
            None => Err(CommandError::InvalidArguments(
                "usage: config restore <index|name>; see `config backups`".into(),
            )),
        },
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config subcommand `{}`",
            other
        ))),
    }
}
