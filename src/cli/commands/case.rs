use intake_core::{CaseRepository, WizardOptions};
use intake_domain::Category;

use crate::cli::core::{short_id, CommandError, CommandResult, ShellContext};
use crate::cli::forms::{FormResult, IntakeInteraction, IntakeOutcome, IntakeRunner};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::prompts::DialoguerInteraction;
use crate::cli::registry::CommandEntry;
use crate::cli::script::ScriptInteraction;
use crate::cli::shell_context::CliMode;
use crate::cli::views;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "new",
            "Start a new support request",
            "new [category]",
            cmd_new,
        ),
        CommandEntry::new(
            "categories",
            "List the request types",
            "categories",
            cmd_categories,
        ),
        CommandEntry::new("cases", "List submitted cases", "cases", cmd_cases),
        CommandEntry::new(
            "case",
            "Show a submitted case",
            "case [id|prefix] [--json]",
            cmd_case,
        ),
    ]
}

fn cmd_new(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let requested = if args.is_empty() {
        None
    } else {
        Some(resolve_category(&args.join(" "))?)
    };
    let options = WizardOptions::with_redirect_delay_ms(context.config.redirect_delay_ms);
    let runner = IntakeRunner::new(&context.store, context.clock.as_ref(), options);

    let result = match context.mode {
        CliMode::Interactive => {
            let mut interaction = DialoguerInteraction::new(&context.theme);
            start_intake(&runner, &mut interaction, requested)?
        }
        CliMode::Script => {
            if requested.is_none() {
                io::print_info("What can we help you with?");
                for line in views::category_lines() {
                    io::print_info(line);
                }
            }
            let mut interaction = ScriptInteraction::new(&mut context.script);
            start_intake(&runner, &mut interaction, requested)?
        }
    };

    match result {
        FormResult::Completed(IntakeOutcome { receipt, route }) => {
            context.remember_case(receipt.id)?;
            match route {
                Some(route) => context.open_route(&route),
                None => {
                    io::print_info(format!(
                        "Use `case {}` to view it later.",
                        short_id(receipt.id)
                    ));
                    Ok(())
                }
            }
        }
        FormResult::Cancelled => Ok(()),
    }
}

fn start_intake<I: IntakeInteraction>(
    runner: &IntakeRunner<'_>,
    interaction: &mut I,
    requested: Option<Category>,
) -> Result<FormResult<IntakeOutcome>, CommandError> {
    let category = match requested {
        Some(category) => category,
        None => match interaction.pick_category()? {
            Some(category) => category,
            None => {
                io::print_info("Request cancelled. Nothing was submitted.");
                return Ok(FormResult::Cancelled);
            }
        },
    };
    runner.run(interaction, category)
}

fn resolve_category(input: &str) -> Result<Category, CommandError> {
    Category::resolve_fuzzy(input).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "unknown request type `{}`; use `categories` to list them",
            input
        ))
    })
}

fn cmd_categories(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output_section("Request types");
    for line in views::category_lines() {
        io::print_info(line);
    }
    io::print_detail("Start one with `new <number|id>`.");
    Ok(())
}

fn cmd_cases(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let records = context.store.list_cases()?;
    if records.is_empty() {
        io::print_info("No cases yet.");
        io::print_detail("Start a request with `new`.");
        return Ok(());
    }
    output_section(format!("Cases ({})", records.len()));
    for line in views::case_list_lines(&records) {
        io::print_info(line);
    }
    Ok(())
}

fn cmd_case(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let as_json = args.iter().any(|arg| *arg == "--json");
    let reference = match args.iter().find(|arg| **arg != "--json") {
        Some(reference) => reference.to_string(),
        None => context
            .config
            .last_case_id
            .map(|id| id.to_string())
            .ok_or_else(|| {
                CommandError::InvalidArguments("usage: case <id|prefix> [--json]".into())
            })?,
    };

    let record = context.store.find_case(&reference)?;
    if as_json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        context.show_case(&record);
    }
    Ok(())
}
