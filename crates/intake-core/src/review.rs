//! Review-screen assembly and the confirmation text.

use intake_domain::{Category, FormData};

use crate::{
    field_groups::{field_group, ChoiceOption, FieldKind, BEST_TIME_OPTIONS, CONTACT_METHOD_OPTIONS},
    page_plan::{pages_for, PageId},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSection {
    pub page: PageId,
    pub title: &'static str,
    pub entries: Vec<(String, String)>,
}

/// Everything the member entered, grouped by the page it was entered on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSummary {
    pub category: Option<Category>,
    pub sections: Vec<ReviewSection>,
}

impl ReviewSummary {
    pub fn build(form: &FormData) -> Self {
        let sections = pages_for(form.category)
            .iter()
            .map(|page| ReviewSection {
                page: *page,
                title: page.title(),
                entries: field_group(*page)
                    .iter()
                    .filter(|spec| spec.is_visible(form))
                    .filter(|spec| matches!(spec.kind, FieldKind::Flag) || form.is_filled(spec.key))
                    .map(|spec| (spec.label.to_string(), spec.display_value(form)))
                    .collect(),
            })
            .collect();
        Self {
            category: form.category,
            sections,
        }
    }

    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec!["Review your entries:".to_string()];
        if let Some(category) = self.category {
            lines.push(format!("  Request type: {}", category.label()));
        }
        for section in &self.sections {
            lines.push(String::new());
            lines.push(section.title.to_string());
            if section.entries.is_empty() {
                lines.push("  (nothing entered)".into());
            }
            for (label, value) in &section.entries {
                lines.push(format!("  {}: {}", label, value));
            }
        }
        lines
    }
}

/// Text shown on the confirmation step.
pub fn confirmation_message(form: &FormData) -> String {
    let methods = spoken_list(&form.contact_method, CONTACT_METHOD_OPTIONS);
    let mut message = String::from("Thank you! Your request has been submitted.");

    if methods.is_empty() {
        message.push_str(" A member of our care team will be in touch");
    } else {
        message.push_str(&format!(
            " A member of our care team will contact you by {}",
            join_with(&methods, "or")
        ));
    }

    let times = spoken_list(&form.best_time, BEST_TIME_OPTIONS);
    if times.is_empty() {
        message.push('.');
    } else {
        message.push_str(&format!(" in the {}.", join_with(&times, "or")));
    }

    if form.leave_voicemail {
        message.push_str(" You've given us permission to leave a voicemail if we miss you.");
    }
    message
}

fn spoken_list(values: &[String], options: &[ChoiceOption]) -> Vec<String> {
    values
        .iter()
        .map(|value| {
            options
                .iter()
                .find(|option| option.value == value.as_str())
                .map(|option| option.label.to_ascii_lowercase())
                .unwrap_or_else(|| value.clone())
        })
        .collect()
}

fn join_with(items: &[String], conjunction: &str) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{} {} {}", first, conjunction, second),
        [init @ .., last] => format!("{}, {} {}", init.join(", "), conjunction, last),
    }
}
