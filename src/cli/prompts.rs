use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect, Select};
use intake_core::{
    field_group, reduce, ChoiceOption, FieldKind, FieldSpec, FormAction, PageView, ReviewSummary,
};
use intake_domain::{Category, FormData};

use crate::cli::core::CommandError;
use crate::cli::forms::{IntakeInteraction, PageCommand, PageInput, ReviewCommand};
use crate::cli::io;

const NO_ANSWER: &str = "(no answer)";
const PAGE_COMMANDS: [(&str, PageCommand); 4] = [
    ("Continue", PageCommand::Next),
    ("Skip this step", PageCommand::Skip),
    ("Back", PageCommand::Back),
    ("Cancel request", PageCommand::Cancel),
];
const REVIEW_COMMANDS: [(&str, ReviewCommand); 4] = [
    ("Submit request", ReviewCommand::Submit),
    ("Edit answers", ReviewCommand::Edit),
    ("Back", ReviewCommand::Back),
    ("Cancel request", ReviewCommand::Cancel),
];

/// Prompts the member field by field on the terminal.
pub struct DialoguerInteraction<'a> {
    theme: &'a ColorfulTheme,
}

impl<'a> DialoguerInteraction<'a> {
    pub fn new(theme: &'a ColorfulTheme) -> Self {
        Self { theme }
    }

    fn ask_field(
        &self,
        spec: &'static FieldSpec,
        draft: &FormData,
    ) -> Result<Vec<FormAction>, CommandError> {
        if let Some(help) = spec.help {
            io::print_hint(help);
        }
        let label = spec.display_label();
        match spec.kind {
            FieldKind::Text | FieldKind::LongText => {
                let current = draft.text(spec.key).unwrap_or_default().to_string();
                let answer: String = Input::with_theme(self.theme)
                    .with_prompt(label)
                    .with_initial_text(current.clone())
                    .allow_empty(true)
                    .interact_text()?;
                Ok(if answer == current {
                    Vec::new()
                } else {
                    vec![FormAction::set_text(spec.key, answer)]
                })
            }
            FieldKind::Choice(options) => {
                let current = draft.text(spec.key).unwrap_or_default();
                let mut labels = vec![NO_ANSWER];
                labels.extend(options.iter().map(|option| option.label));
                let picked = Select::with_theme(self.theme)
                    .with_prompt(label)
                    .items(&labels)
                    .default(choice_default(options, current))
                    .interact_opt()?;
                Ok(picked
                    .and_then(|index| choice_action(spec, options, current, index))
                    .into_iter()
                    .collect())
            }
            FieldKind::MultiChoice(options) => {
                let current = draft.list(spec.key).unwrap_or_default();
                let labels: Vec<_> = options.iter().map(|option| option.label).collect();
                let defaults: Vec<bool> = options
                    .iter()
                    .map(|option| current.iter().any(|value| value == option.value))
                    .collect();
                let picked = MultiSelect::with_theme(self.theme)
                    .with_prompt(label)
                    .items(&labels)
                    .defaults(&defaults)
                    .interact_opt()?;
                Ok(picked
                    .map(|indices| toggle_actions(spec, options, current, &indices))
                    .unwrap_or_default())
            }
            FieldKind::Flag => {
                let current = draft.flag(spec.key).unwrap_or_default();
                let answer = Confirm::with_theme(self.theme)
                    .with_prompt(label)
                    .default(current)
                    .interact_opt()?;
                Ok(match answer {
                    Some(value) if value != current => vec![FormAction::set_flag(spec.key, value)],
                    _ => Vec::new(),
                })
            }
        }
    }
}

impl IntakeInteraction for DialoguerInteraction<'_> {
    fn pick_category(&mut self) -> Result<Option<Category>, CommandError> {
        let labels: Vec<_> = Category::catalog().iter().map(|entry| entry.label).collect();
        let picked = Select::with_theme(self.theme)
            .with_prompt("What can we help you with?")
            .items(&labels)
            .default(0)
            .interact_opt()?;
        Ok(picked.and_then(|index| Category::catalog().get(index).map(|entry| entry.category)))
    }

    fn prompt_page(
        &mut self,
        view: &PageView,
        form: &FormData,
    ) -> Result<PageInput, CommandError> {
        // Answers land on a draft so conditional fields appear as soon as
        // their trigger is answered.
        let mut draft = form.clone();
        let mut actions = Vec::new();
        for spec in field_group(view.page) {
            if !spec.is_visible(&draft) {
                continue;
            }
            for action in self.ask_field(spec, &draft)? {
                match reduce(&mut draft, &action) {
                    Ok(()) => actions.push(action),
                    Err(err) => io::print_warning(err),
                }
            }
        }

        let labels: Vec<_> = PAGE_COMMANDS.iter().map(|(label, _)| *label).collect();
        let picked = Select::with_theme(self.theme)
            .items(&labels)
            .default(0)
            .interact_opt()?;
        let command = picked
            .and_then(|index| PAGE_COMMANDS.get(index))
            .map(|(_, command)| *command)
            .unwrap_or(PageCommand::Cancel);
        Ok(PageInput { actions, command })
    }

    fn review(&mut self, _summary: &ReviewSummary) -> Result<ReviewCommand, CommandError> {
        let labels: Vec<_> = REVIEW_COMMANDS.iter().map(|(label, _)| *label).collect();
        let picked = Select::with_theme(self.theme)
            .items(&labels)
            .default(0)
            .interact_opt()?;
        Ok(picked
            .and_then(|index| REVIEW_COMMANDS.get(index))
            .map(|(_, command)| *command)
            .unwrap_or(ReviewCommand::Cancel))
    }
}

/// Index into `[NO_ANSWER, options..]` for the stored value.
fn choice_default(options: &[ChoiceOption], current: &str) -> usize {
    options
        .iter()
        .position(|option| option.value == current)
        .map(|idx| idx + 1)
        .unwrap_or(0)
}

fn choice_action(
    spec: &FieldSpec,
    options: &[ChoiceOption],
    current: &str,
    index: usize,
) -> Option<FormAction> {
    let value = match index {
        0 => "",
        _ => options.get(index - 1)?.value,
    };
    (value != current).then(|| FormAction::set_text(spec.key, value))
}

/// Toggles that turn `current` into the picked set.
fn toggle_actions(
    spec: &FieldSpec,
    options: &[ChoiceOption],
    current: &[String],
    picked: &[usize],
) -> Vec<FormAction> {
    options
        .iter()
        .enumerate()
        .filter(|(idx, option)| {
            let was = current.iter().any(|value| value == option.value);
            was != picked.contains(idx)
        })
        .map(|(_, option)| FormAction::toggle(spec.key, option.value))
        .collect()
}
