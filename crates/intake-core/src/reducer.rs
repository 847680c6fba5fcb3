//! State container for the intake form.
//!
//! Every mutation of [`FormData`] goes through a [`FormAction`], so edits can
//! be replayed, logged, and tested without any rendering involved.

use intake_domain::{Category, FieldKey, FieldSlot, FieldValue, FormData};

use crate::CoreError;

/// Mutations accepted by the form reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    /// Replace a scalar field.
    SetField { key: FieldKey, value: FieldValue },
    /// Insert the value into a list field when absent, remove it when present.
    ToggleArrayField { key: FieldKey, value: String },
    SetCategory(Category),
    Reset,
}

impl FormAction {
    pub fn set_text(key: FieldKey, value: impl Into<String>) -> Self {
        FormAction::SetField {
            key,
            value: FieldValue::Text(value.into()),
        }
    }

    pub fn set_flag(key: FieldKey, value: bool) -> Self {
        FormAction::SetField {
            key,
            value: FieldValue::Flag(value),
        }
    }

    pub fn toggle(key: FieldKey, value: impl Into<String>) -> Self {
        FormAction::ToggleArrayField {
            key,
            value: value.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FormAction::SetField { .. } => "SET_FIELD",
            FormAction::ToggleArrayField { .. } => "TOGGLE_ARRAY_FIELD",
            FormAction::SetCategory(_) => "SET_CATEGORY",
            FormAction::Reset => "RESET",
        }
    }

    pub fn key(&self) -> Option<FieldKey> {
        match self {
            FormAction::SetField { key, .. } | FormAction::ToggleArrayField { key, .. } => {
                Some(*key)
            }
            FormAction::SetCategory(_) | FormAction::Reset => None,
        }
    }
}

/// Applies `action` to `form`. The form is left untouched when an error is returned.
pub fn reduce(form: &mut FormData, action: &FormAction) -> Result<(), CoreError> {
    match action {
        FormAction::SetField { key, value } => set_field(form, *key, value),
        FormAction::ToggleArrayField { key, value } => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(CoreError::BlankValue(*key));
            }
            let list = form.list_mut(*key).ok_or(CoreError::SlotMismatch {
                key: *key,
                action: "toggling",
            })?;
            toggle_member(list, trimmed);
            Ok(())
        }
        FormAction::SetCategory(category) => {
            form.category = Some(*category);
            Ok(())
        }
        FormAction::Reset => {
            *form = FormData::default();
            Ok(())
        }
    }
}

fn set_field(form: &mut FormData, key: FieldKey, value: &FieldValue) -> Result<(), CoreError> {
    match (key.slot(), value) {
        (FieldSlot::Text, FieldValue::Text(text)) => {
            let slot = form.text_mut(key).ok_or(CoreError::SlotMismatch {
                key,
                action: "text",
            })?;
            *slot = text.clone();
            Ok(())
        }
        (FieldSlot::Choice, FieldValue::Text(text)) => {
            form.set_choice(key, text)?;
            Ok(())
        }
        (FieldSlot::Flag, FieldValue::Flag(flag)) => {
            let slot = form.flag_mut(key).ok_or(CoreError::SlotMismatch {
                key,
                action: "a yes/no value",
            })?;
            *slot = *flag;
            Ok(())
        }
        (FieldSlot::List, _) => Err(CoreError::SlotMismatch {
            key,
            action: "a single value (toggle its options instead)",
        }),
        (_, FieldValue::Flag(_)) => Err(CoreError::SlotMismatch {
            key,
            action: "a yes/no value",
        }),
        (FieldSlot::Flag, FieldValue::Text(_)) => Err(CoreError::SlotMismatch {
            key,
            action: "text",
        }),
    }
}

/// Set-toggle preserving the order of the remaining members.
pub fn toggle_member(list: &mut Vec<String>, value: &str) {
    if let Some(position) = list.iter().position(|existing| existing == value) {
        list.remove(position);
    } else {
        list.push(value.to_string());
    }
}

/// Owns the form record and journals every applied action.
#[derive(Debug, Clone, Default)]
pub struct FormStore {
    form: FormData,
    journal: Vec<FormAction>,
}

impl FormStore {
    pub fn new(form: FormData) -> Self {
        Self {
            form,
            journal: Vec::new(),
        }
    }

    pub fn dispatch(&mut self, action: FormAction) -> Result<(), CoreError> {
        match reduce(&mut self.form, &action) {
            Ok(()) => {
                tracing::debug!(
                    action = action.kind(),
                    field = ?action.key(),
                    "form action applied"
                );
                self.journal.push(action);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(action = action.kind(), error = %err, "form action rejected");
                Err(err)
            }
        }
    }

    pub fn form(&self) -> &FormData {
        &self.form
    }

    pub fn journal(&self) -> &[FormAction] {
        &self.journal
    }
}
