//! Wizard answers read from a script.
//!
//! Directives, one per line:
//!
//! ```text
//! set <field> <value>      text, choice or yes/no fields
//! toggle <field> <value>   multi-select fields
//! next | skip | back | cancel
//! submit | edit            on the review screen
//! ```
//!
//! Choice values may be given as the option value or its label.

use intake_core::{field_spec, ChoiceOption, FormAction, PageView, ReviewSummary};
use intake_domain::{Category, FieldKey, FieldSlot, FormData};
use shell_words::split;
use thiserror::Error;

use crate::cli::core::CommandError;
use crate::cli::forms::{IntakeInteraction, PageCommand, PageInput, ReviewCommand};
use crate::cli::io;
use crate::cli::shell_context::ScriptFeed;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Set { key: FieldKey, value: String },
    Toggle { key: FieldKey, value: String },
    Next,
    Skip,
    Back,
    Submit,
    Edit,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectiveError {
    #[error("{0}")]
    Syntax(String),
    #[error("Unknown directive `{0}`. Use set, toggle, next, skip, back, submit, edit or cancel.")]
    Unknown(String),
    #[error("Unknown field `{input}`{}", suggestion_hint(.suggestion))]
    UnknownField {
        input: String,
        suggestion: Option<FieldKey>,
    },
    #[error("`{0}` needs a field and a value")]
    MissingValue(&'static str),
    #[error("`{key}` does not accept `{value}`; choose one of: {options}")]
    InvalidOption {
        key: FieldKey,
        value: String,
        options: String,
    },
    #[error("`{key}` expects yes or no, got `{value}`")]
    InvalidFlag { key: FieldKey, value: String },
    #[error("`{0}` holds several values; use `toggle {0} <value>`")]
    ListField(FieldKey),
    #[error("`{0}` holds a single value; use `set {0} <value>`")]
    NotAList(FieldKey),
}

fn suggestion_hint(suggestion: &Option<FieldKey>) -> String {
    suggestion
        .map(|key| format!(". Did you mean `{}`?", key))
        .unwrap_or_default()
}

impl Directive {
    pub fn parse(line: &str) -> Result<Self, DirectiveError> {
        let tokens = split(line).map_err(|err| DirectiveError::Syntax(err.to_string()))?;
        let Some((verb, rest)) = tokens.split_first() else {
            return Err(DirectiveError::Syntax("empty directive".into()));
        };
        match verb.to_ascii_lowercase().as_str() {
            "set" => {
                let (key, value) = field_and_value("set", rest)?;
                Ok(Directive::Set { key, value })
            }
            "toggle" => {
                let (key, value) = field_and_value("toggle", rest)?;
                Ok(Directive::Toggle { key, value })
            }
            "next" => Ok(Directive::Next),
            "skip" => Ok(Directive::Skip),
            "back" => Ok(Directive::Back),
            "submit" => Ok(Directive::Submit),
            "edit" => Ok(Directive::Edit),
            "cancel" => Ok(Directive::Cancel),
            _ => Err(DirectiveError::Unknown(verb.clone())),
        }
    }

    /// Reducer action for `set`/`toggle`, checked against the field's shape.
    pub fn to_action(&self) -> Result<Option<FormAction>, DirectiveError> {
        match self {
            Directive::Set { key, value } => match key.slot() {
                FieldSlot::List => Err(DirectiveError::ListField(*key)),
                FieldSlot::Flag => parse_flag(*key, value)
                    .map(|flag| Some(FormAction::set_flag(*key, flag))),
                FieldSlot::Text | FieldSlot::Choice => {
                    let value = resolve_option(*key, value)?;
                    Ok(Some(FormAction::set_text(*key, value)))
                }
            },
            Directive::Toggle { key, value } => {
                if key.slot() != FieldSlot::List {
                    return Err(DirectiveError::NotAList(*key));
                }
                let value = resolve_option(*key, value)?;
                Ok(Some(FormAction::toggle(*key, value)))
            }
            _ => Ok(None),
        }
    }
}

fn field_and_value(
    verb: &'static str,
    rest: &[String],
) -> Result<(FieldKey, String), DirectiveError> {
    let Some((field, value)) = rest.split_first() else {
        return Err(DirectiveError::MissingValue(verb));
    };
    let key = field
        .parse::<FieldKey>()
        .map_err(|_| DirectiveError::UnknownField {
            input: field.clone(),
            suggestion: FieldKey::suggest(field),
        })?;
    if value.is_empty() && verb == "toggle" {
        return Err(DirectiveError::MissingValue(verb));
    }
    Ok((key, value.join(" ")))
}

fn parse_flag(key: FieldKey, value: &str) -> Result<bool, DirectiveError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "on" | "1" => Ok(true),
        "no" | "n" | "false" | "off" | "0" => Ok(false),
        _ => Err(DirectiveError::InvalidFlag {
            key,
            value: value.to_string(),
        }),
    }
}

/// Maps an option label to its value; free-text fields pass through.
fn resolve_option(key: FieldKey, value: &str) -> Result<String, DirectiveError> {
    let options: &[ChoiceOption] = field_spec(key)
        .map(|spec| spec.kind.options())
        .unwrap_or_default();
    let trimmed = value.trim();
    if options.is_empty() || trimmed.is_empty() {
        return Ok(value.to_string());
    }
    options
        .iter()
        .find(|option| {
            option.value.eq_ignore_ascii_case(trimmed) || option.label.eq_ignore_ascii_case(trimmed)
        })
        .map(|option| option.value.to_string())
        .ok_or_else(|| DirectiveError::InvalidOption {
            key,
            value: trimmed.to_string(),
            options: options
                .iter()
                .map(|option| option.value)
                .collect::<Vec<_>>()
                .join(", "),
        })
}

/// Reads wizard answers from the remaining script lines. Running out of
/// lines cancels the request.
pub struct ScriptInteraction<'a> {
    feed: &'a mut ScriptFeed,
}

impl<'a> ScriptInteraction<'a> {
    pub fn new(feed: &'a mut ScriptFeed) -> Self {
        Self { feed }
    }

    fn next_directive(&mut self) -> Option<Directive> {
        loop {
            let line = self.feed.next_line()?;
            io::print_detail(format!("> {}", line));
            match Directive::parse(&line) {
                Ok(directive) => return Some(directive),
                Err(err) => io::print_warning(err),
            }
        }
    }
}

impl IntakeInteraction for ScriptInteraction<'_> {
    fn pick_category(&mut self) -> Result<Option<Category>, CommandError> {
        while let Some(line) = self.feed.next_line() {
            io::print_detail(format!("> {}", line));
            if line.eq_ignore_ascii_case("cancel") {
                return Ok(None);
            }
            match Category::resolve_fuzzy(&line) {
                Some(category) => return Ok(Some(category)),
                None => io::print_warning(format!(
                    "Unknown request type `{}`. Use `categories` to list them.",
                    line
                )),
            }
        }
        Ok(None)
    }

    fn prompt_page(
        &mut self,
        _view: &PageView,
        _form: &FormData,
    ) -> Result<PageInput, CommandError> {
        let mut actions = Vec::new();
        while let Some(directive) = self.next_directive() {
            let command = match directive {
                Directive::Next => PageCommand::Next,
                Directive::Skip => PageCommand::Skip,
                Directive::Back => PageCommand::Back,
                Directive::Cancel => PageCommand::Cancel,
                Directive::Submit | Directive::Edit => {
                    io::print_warning("`submit` and `edit` are only available on the review screen.");
                    continue;
                }
                Directive::Set { .. } | Directive::Toggle { .. } => {
                    match directive.to_action() {
                        Ok(Some(action)) => actions.push(action),
                        Ok(None) => {}
                        Err(err) => io::print_warning(err),
                    }
                    continue;
                }
            };
            return Ok(PageInput { actions, command });
        }
        Ok(PageInput {
            actions,
            command: PageCommand::Cancel,
        })
    }

    fn review(&mut self, _summary: &ReviewSummary) -> Result<ReviewCommand, CommandError> {
        while let Some(directive) = self.next_directive() {
            match directive {
                Directive::Submit => return Ok(ReviewCommand::Submit),
                Directive::Edit => return Ok(ReviewCommand::Edit),
                Directive::Back => return Ok(ReviewCommand::Back),
                Directive::Cancel => return Ok(ReviewCommand::Cancel),
                _ => io::print_warning("On the review screen use submit, edit, back or cancel."),
            }
        }
        Ok(ReviewCommand::Cancel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_core::{render_page, FormErrors, PageId};

    #[test]
    fn parses_quoted_values() {
        assert_eq!(
            Directive::parse(r#"set briefDescription "Need a refill, please""#),
            Ok(Directive::Set {
                key: FieldKey::BriefDescription,
                value: "Need a refill, please".into()
            })
        );
        assert_eq!(
            Directive::parse("SET location   Home address on file"),
            Ok(Directive::Set {
                key: FieldKey::Location,
                value: "Home address on file".into()
            })
        );
        assert_eq!(Directive::parse("Next"), Ok(Directive::Next));
    }

    #[test]
    fn unknown_fields_get_a_suggestion() {
        let err = Directive::parse("set briefDescripton hello").expect_err("typo");
        assert_eq!(
            err.to_string(),
            "Unknown field `briefDescripton`. Did you mean `briefDescription`?"
        );
        assert!(matches!(
            Directive::parse("teleport"),
            Err(DirectiveError::Unknown(_))
        ));
        assert_eq!(
            Directive::parse("toggle contactMethod"),
            Err(DirectiveError::MissingValue("toggle"))
        );
    }

    #[test]
    fn actions_respect_field_shapes() {
        let flag = Directive::parse("set leaveVoicemail yes").expect("parse");
        assert_eq!(
            flag.to_action(),
            Ok(Some(FormAction::set_flag(FieldKey::LeaveVoicemail, true)))
        );

        let by_label = Directive::parse("toggle contactMethod \"Text message\"").expect("parse");
        assert_eq!(
            by_label.to_action(),
            Ok(Some(FormAction::toggle(FieldKey::ContactMethod, "text")))
        );

        let list_set = Directive::parse("set contactMethod phone").expect("parse");
        assert_eq!(
            list_set.to_action(),
            Err(DirectiveError::ListField(FieldKey::ContactMethod))
        );

        let bad_option = Directive::parse("toggle contactMethod pigeon").expect("parse");
        assert!(matches!(
            bad_option.to_action(),
            Err(DirectiveError::InvalidOption { .. })
        ));

        let scalar_toggle = Directive::parse("toggle urgency routine").expect("parse");
        assert_eq!(
            scalar_toggle.to_action(),
            Err(DirectiveError::NotAList(FieldKey::Urgency))
        );
    }

    #[test]
    fn pages_collect_answers_until_navigation() {
        let mut feed = ScriptFeed::new([
            "set briefDescription \"Lost card\"",
            "submit",
            "set nonsense 1",
            "toggle contactMethod email",
            "next",
            "submit",
        ]);
        let mut interaction = ScriptInteraction::new(&mut feed);
        let form = FormData::new(Category::Question);
        let view = render_page(PageId::Universal, 0, 3, &form, &FormErrors::new());

        let input = interaction.prompt_page(&view, &form).expect("page");
        assert_eq!(input.command, PageCommand::Next);
        assert_eq!(
            input.actions,
            vec![
                FormAction::set_text(FieldKey::BriefDescription, "Lost card"),
                FormAction::toggle(FieldKey::ContactMethod, "email"),
            ]
        );

        let summary = ReviewSummary::build(&form);
        assert_eq!(
            interaction.review(&summary).expect("review"),
            ReviewCommand::Submit
        );
        assert_eq!(
            interaction.review(&summary).expect("exhausted"),
            ReviewCommand::Cancel
        );
    }

    #[test]
    fn picker_accepts_labels_and_numbers() {
        let mut feed = ScriptFeed::new(["nowhere", "Billing & Claims", "7", "cancel"]);
        let mut interaction = ScriptInteraction::new(&mut feed);
        assert_eq!(
            interaction.pick_category().expect("pick"),
            Some(Category::Billing)
        );
        assert_eq!(
            interaction.pick_category().expect("pick"),
            Some(Category::Question)
        );
        assert_eq!(interaction.pick_category().expect("pick"), None);
    }
}
