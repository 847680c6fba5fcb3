//! Central declaration of the fields that block navigation or submission.
//!
//! Labels elsewhere may carry a `*` marker, but only the rules registered here
//! are enforced.

use std::{collections::BTreeMap, fmt};

use intake_domain::{FieldKey, FormData};
use thiserror::Error;

use crate::page_plan::PageId;

/// Field-level validation failure shown next to the offending input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Please enter a brief description of your request.")]
    MissingBriefDescription,
    #[error("Please select at least one contact method.")]
    MissingContactMethod,
    /// Reported by the case service for a specific field.
    #[error("{0}")]
    Rejected(String),
}

/// When a rule is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleScope {
    /// Checked before leaving the given page.
    Page(PageId),
    /// Checked before the review step submits.
    Submission,
}

type Predicate = fn(&FormData) -> bool;

/// A required-field predicate bound to a field and a scope.
#[derive(Clone)]
pub struct FieldRule {
    pub key: FieldKey,
    pub scope: RuleScope,
    pub satisfied: Predicate,
    pub error: FieldError,
}

impl fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRule")
            .field("key", &self.key)
            .field("scope", &self.scope)
            .field("error", &self.error)
            .finish()
    }
}

/// Errors keyed by field, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    entries: BTreeMap<FieldKey, FieldError>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: FieldKey, error: FieldError) {
        self.entries.insert(key, error);
    }

    pub fn get(&self, key: FieldKey) -> Option<&FieldError> {
        self.entries.get(&key)
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &FieldError)> + '_ {
        self.entries.iter().map(|(key, error)| (*key, error))
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, error) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", key, error)?;
            first = false;
        }
        Ok(())
    }
}

/// The declared rule set.
#[derive(Debug, Clone)]
pub struct ValidationRules {
    rules: Vec<FieldRule>,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self::standard()
    }
}

impl ValidationRules {
    /// Description is required to leave the first page; one contact method is
    /// required to submit.
    pub fn standard() -> Self {
        Self {
            rules: vec![
                FieldRule {
                    key: FieldKey::BriefDescription,
                    scope: RuleScope::Page(PageId::Universal),
                    satisfied: |form| !form.brief_description.trim().is_empty(),
                    error: FieldError::MissingBriefDescription,
                },
                FieldRule {
                    key: FieldKey::ContactMethod,
                    scope: RuleScope::Submission,
                    satisfied: |form| !form.contact_method.is_empty(),
                    error: FieldError::MissingContactMethod,
                },
            ],
        }
    }

    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_rule(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    pub fn is_enforced(&self, key: FieldKey) -> bool {
        self.rules.iter().any(|rule| rule.key == key)
    }

    pub fn check_page(&self, page: PageId, form: &FormData) -> FormErrors {
        self.check(form, |scope| scope == RuleScope::Page(page))
    }

    pub fn check_submission(&self, form: &FormData) -> FormErrors {
        self.check(form, |scope| scope == RuleScope::Submission)
    }

    fn check(&self, form: &FormData, in_scope: impl Fn(RuleScope) -> bool) -> FormErrors {
        let mut errors = FormErrors::new();
        for rule in self.rules.iter().filter(|rule| in_scope(rule.scope)) {
            if !(rule.satisfied)(form) && !errors.contains(rule.key) {
                errors.insert(rule.key, rule.error.clone());
            }
        }
        errors
    }
}
