//! Text renderings of wizard pages, the review screen and stored cases.

use intake_core::{field_spec, FormErrors, PageView, ReviewSummary};
use intake_domain::{CaseRecord, Category, FieldKey};
use serde_json::Value;

use crate::cli::core::short_id;
use crate::cli::io;
use crate::cli::output::{section, separator};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

pub fn category_lines() -> Vec<String> {
    Category::catalog()
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            format!(
                "  {}. {:<26} ({})",
                idx + 1,
                entry.label,
                entry.category.id()
            )
        })
        .collect()
}

/// Page header, one line per visible field and its error, if any.
pub fn page_lines(view: &PageView) -> Vec<String> {
    let mut lines = Vec::new();
    for field in &view.fields {
        let value = if field.value.is_empty() {
            "(empty)"
        } else {
            field.value.as_str()
        };
        lines.push(format!(
            "  {} [{}]: {}",
            field.spec.display_label(),
            field.spec.key,
            value
        ));
        if let Some(help) = field.spec.help {
            lines.push(format!("      {}", help));
        }
        let options = field.spec.kind.options();
        if !options.is_empty() {
            let values: Vec<_> = options.iter().map(|option| option.value).collect();
            lines.push(format!("      options: {}", values.join(", ")));
        }
        if let Some(error) = &field.error {
            lines.push(format!("      ! {}", error));
        }
    }
    lines
}

pub fn print_page(view: &PageView) {
    section(format!(
        "Step {} of {}: {}",
        view.index + 1,
        view.total,
        view.title
    ));
    for line in page_lines(view) {
        io::print_info(line);
    }
}

pub fn print_review(summary: &ReviewSummary, banner: Option<&str>, errors: &FormErrors) {
    section("Review your request");
    if let Some(banner) = banner {
        io::print_error(banner);
    }
    for line in summary.summary_lines() {
        io::print_info(line);
    }
    for (key, error) in errors.iter() {
        io::print_warning(format!("{}: {}", label_for(key), error));
    }
    separator();
}

pub fn case_list_lines(records: &[CaseRecord]) -> Vec<String> {
    records
        .iter()
        .map(|record| {
            format!(
                "  {}  {:<11} {}  {}",
                short_id(record.id),
                record.status.to_string(),
                record.created_at.format("%Y-%m-%d"),
                record.title
            )
        })
        .collect()
}

/// Labelled answers of a stored case, in payload order.
pub fn case_detail_lines(record: &CaseRecord, route: &str) -> Vec<String> {
    let mut lines = vec![
        format!("  Title: {}", record.title),
        format!("  Status: {}", record.status),
        format!("  Opened: {}", record.created_at.format(DATE_FORMAT)),
        format!("  Route: {}", route),
    ];
    match serde_json::to_value(&record.payload) {
        Ok(Value::Object(payload)) => {
            for (key, value) in &payload {
                match (key.as_str(), value) {
                    ("details" | "communication", Value::Object(nested)) => {
                        for (inner_key, inner_value) in nested {
                            push_answer(&mut lines, inner_key, inner_value);
                        }
                    }
                    _ => push_answer(&mut lines, key, value),
                }
            }
        }
        Ok(_) | Err(_) => lines.push("  (answers unavailable)".into()),
    }
    lines
}

pub fn print_case_detail(record: &CaseRecord, route: &str) {
    section(format!("Case {}", short_id(record.id)));
    for line in case_detail_lines(record, route) {
        io::print_info(line);
    }
}

fn push_answer(lines: &mut Vec<String>, key: &str, value: &Value) {
    let Ok(field) = key.parse::<FieldKey>() else {
        return;
    };
    let options = field_spec(field)
        .map(|spec| spec.kind.options())
        .unwrap_or_default();
    let rendered = match value {
        Value::String(text) if text.is_empty() => return,
        Value::String(text) => option_label(options, text),
        Value::Array(items) if items.is_empty() => return,
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|item| option_label(options, item))
            .collect::<Vec<_>>()
            .join(", "),
        Value::Bool(true) => "Yes".to_string(),
        Value::Bool(false) => "No".to_string(),
        Value::Null => return,
        other => other.to_string(),
    };
    lines.push(format!("  {}: {}", label_for(field), rendered));
}

fn label_for(key: FieldKey) -> &'static str {
    field_spec(key).map(|spec| spec.label).unwrap_or(key.name())
}

fn option_label(options: &[intake_core::ChoiceOption], value: &str) -> String {
    options
        .iter()
        .find(|option| option.value == value)
        .map(|option| option.label.to_string())
        .unwrap_or_else(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use intake_core::{render_page, FieldError, PageId};
    use intake_domain::{case_route, CasePayload, FormData};
    use uuid::Uuid;

    fn record() -> CaseRecord {
        let mut form = FormData::new(Category::Billing);
        form.brief_description = "Charged twice".into();
        form.has_bill = "yes-no-upload".parse().expect("has bill");
        form.billing_concerns = vec!["duplicate-charge".into()];
        form.contact_method = vec!["phone".into(), "email".into()];
        form.leave_voicemail = true;
        let payload = CasePayload::from_form(&form).expect("payload");
        CaseRecord::new(
            Uuid::from_u128(0x1b4e28ba_2fa1_11d2_883f_0016d3cca427),
            payload,
            Utc.with_ymd_and_hms(2024, 5, 6, 14, 30, 0).unwrap(),
        )
    }

    #[test]
    fn catalog_is_numbered_in_order() {
        let lines = category_lines();
        assert_eq!(lines.len(), 7);
        assert!(lines[0].starts_with("  1. Find a Provider"));
        assert!(lines[6].ends_with("(question)"));
    }

    #[test]
    fn page_lines_show_markers_options_and_errors() {
        let form = FormData::new(Category::Question);
        let mut errors = FormErrors::new();
        errors.insert(FieldKey::BriefDescription, FieldError::MissingBriefDescription);
        let view = render_page(PageId::Universal, 0, 3, &form, &errors);
        let lines = page_lines(&view);

        assert!(lines.iter().any(|line| {
            line.starts_with("  Briefly describe what you need * [briefDescription]")
                && line.ends_with("(empty)")
        }));
        assert!(lines.iter().any(|line| line.contains("options: self, dependent")));
        assert!(lines
            .iter()
            .any(|line| line == "      ! Please enter a brief description of your request."));
    }

    #[test]
    fn case_detail_uses_field_labels() {
        let record = record();
        let lines = case_detail_lines(&record, &case_route(record.id));
        let text = lines
            .iter()
            .map(|line| line.trim_start())
            .collect::<Vec<_>>()
            .join("\n");
        insta::assert_snapshot!(text, @r###"
        Title: Billing & Claims: Charged twice
        Status: Open
        Opened: 2024-05-06 14:30 UTC
        Route: /cases/1b4e28ba-2fa1-11d2-883f-0016d3cca427
        Who is this request for?: Myself
        Briefly describe what you need: Charged twice
        Do you have the bill?: Yes, but I can't upload it
        What concerns you about this bill?: Charged more than once
        How should we contact you?: Phone, Email
        OK to leave a voicemail: Yes
        "###);
    }

    #[test]
    fn case_list_shows_short_ids() {
        let lines = case_list_lines(&[record()]);
        assert_eq!(
            lines,
            vec!["  1b4e28ba  Open        2024-05-06  Billing & Claims: Charged twice"]
        );
    }
}
