//! Submission payloads and persisted case records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::form::non_blank;
use crate::{Category, FormData, HasBill, RequestFor};

const TITLE_MAX_CHARS: usize = 60;

/// Category-specific answers. Only the active category's variant is ever built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum CategoryDetails {
    #[serde(rename_all = "camelCase")]
    Provider {
        care_type: Option<String>,
        specialty: Option<String>,
        urgency: Option<String>,
        max_distance: Option<String>,
        provider_preferences: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    Billing {
        has_bill: HasBill,
        bill_attachment: Option<String>,
        billing_provider: Option<String>,
        date_of_service: Option<String>,
        billed_amount: Option<String>,
        billing_concerns: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    Medication {
        medication_name: Option<String>,
        dosage: Option<String>,
        prescriber_name: Option<String>,
        pharmacy_type: Option<String>,
        medication_concerns: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    Service {
        service_type: Option<String>,
        service_urgency: Option<String>,
        preferred_days: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    Benefits {
        coverage_question: Option<String>,
        benefit_topics: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    Plan {
        current_plan: Option<String>,
        plan_situation: Option<String>,
        plan_priorities: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    Question {
        question_topic: Option<String>,
        question_details: Option<String>,
    },
}

impl CategoryDetails {
    pub fn from_form(category: Category, form: &FormData) -> Self {
        match category {
            Category::Provider => CategoryDetails::Provider {
                care_type: non_blank(&form.care_type),
                specialty: non_blank(&form.specialty),
                urgency: non_blank(&form.urgency),
                max_distance: non_blank(&form.max_distance),
                provider_preferences: form.provider_preferences.clone(),
            },
            Category::Billing => CategoryDetails::Billing {
                has_bill: form.has_bill,
                bill_attachment: if form.has_bill == HasBill::YesUpload {
                    non_blank(&form.bill_attachment)
                } else {
                    None
                },
                billing_provider: non_blank(&form.billing_provider),
                date_of_service: non_blank(&form.date_of_service),
                billed_amount: non_blank(&form.billed_amount),
                billing_concerns: form.billing_concerns.clone(),
            },
            Category::Medication => CategoryDetails::Medication {
                medication_name: non_blank(&form.medication_name),
                dosage: non_blank(&form.dosage),
                prescriber_name: non_blank(&form.prescriber_name),
                pharmacy_type: non_blank(&form.pharmacy_type),
                medication_concerns: form.medication_concerns.clone(),
            },
            Category::Service => CategoryDetails::Service {
                service_type: non_blank(&form.service_type),
                service_urgency: non_blank(&form.service_urgency),
                preferred_days: form.preferred_days.clone(),
            },
            Category::Benefits => CategoryDetails::Benefits {
                coverage_question: non_blank(&form.coverage_question),
                benefit_topics: form.benefit_topics.clone(),
            },
            Category::Plan => CategoryDetails::Plan {
                current_plan: non_blank(&form.current_plan),
                plan_situation: non_blank(&form.plan_situation),
                plan_priorities: form.plan_priorities.clone(),
            },
            Category::Question => CategoryDetails::Question {
                question_topic: non_blank(&form.question_topic),
                question_details: non_blank(&form.question_details),
            },
        }
    }

    pub fn category(&self) -> Category {
        match self {
            CategoryDetails::Provider { .. } => Category::Provider,
            CategoryDetails::Billing { .. } => Category::Billing,
            CategoryDetails::Medication { .. } => Category::Medication,
            CategoryDetails::Service { .. } => Category::Service,
            CategoryDetails::Benefits { .. } => Category::Benefits,
            CategoryDetails::Plan { .. } => Category::Plan,
            CategoryDetails::Question { .. } => Category::Question,
        }
    }
}

/// How and when the member wants to be reached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationPreferences {
    pub contact_method: Vec<String>,
    pub best_time: Vec<String>,
    pub leave_voicemail: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_notes: Option<String>,
}

/// Body sent to the case-creation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CasePayload {
    pub request_for: RequestFor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependent_name: Option<String>,
    pub brief_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub details: CategoryDetails,
    pub communication: CommunicationPreferences,
}

impl CasePayload {
    /// Projects the active category's answers out of a form. Returns `None`
    /// while no category has been chosen.
    pub fn from_form(form: &FormData) -> Option<Self> {
        let category = form.category?;
        let dependent_name = match form.request_for {
            RequestFor::Dependent => non_blank(&form.dependent_name),
            RequestFor::Myself => None,
        };
        Some(Self {
            request_for: form.request_for,
            dependent_name,
            brief_description: form.brief_description.trim().to_string(),
            location: form.effective_location(),
            details: CategoryDetails::from_form(category, form),
            communication: CommunicationPreferences {
                contact_method: form.contact_method.clone(),
                best_time: form.best_time.clone(),
                leave_voicemail: form.leave_voicemail,
                additional_notes: non_blank(&form.additional_notes),
            },
        })
    }

    pub fn category(&self) -> Category {
        self.details.category()
    }

    /// Short headline used in case listings.
    pub fn title(&self) -> String {
        let headline = format!("{}: {}", self.category().label(), self.brief_description);
        if headline.chars().count() <= TITLE_MAX_CHARS {
            headline
        } else {
            let mut truncated: String = headline.chars().take(TITLE_MAX_CHARS - 1).collect();
            truncated.push('…');
            truncated
        }
    }
}

/// Lifecycle of a case after creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CaseStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CaseStatus::Open => "Open",
            CaseStatus::InProgress => "In progress",
            CaseStatus::Resolved => "Resolved",
        };
        f.write_str(label)
    }
}

/// A case as stored by the case service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub status: CaseStatus,
    pub created_at: DateTime<Utc>,
    pub payload: CasePayload,
}

impl CaseRecord {
    pub fn new(id: Uuid, payload: CasePayload, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: payload.title(),
            status: CaseStatus::Open,
            created_at,
            payload,
        }
    }

    pub fn receipt(&self) -> CaseReceipt {
        CaseReceipt {
            id: self.id,
            created_at: self.created_at,
        }
    }
}

/// Response of a successful case creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseReceipt {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl CaseReceipt {
    /// Route of the case detail view.
    pub fn route(&self) -> String {
        case_route(self.id)
    }
}

pub fn case_route(id: Uuid) -> String {
    format!("/cases/{}", id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn billing_form() -> FormData {
        let mut form = FormData::new(Category::Billing);
        form.brief_description = "  Charged twice for an MRI ".into();
        form.has_bill = HasBill::YesNoUpload;
        form.bill_attachment = "scan.pdf".into();
        form.billing_concerns = vec!["duplicate-charge".into()];
        form.medication_name = "Atorvastatin".into();
        form.contact_method = vec!["email".into()];
        form
    }

    #[test]
    fn payload_only_carries_active_category_details() {
        let payload = CasePayload::from_form(&billing_form()).unwrap();
        assert_eq!(payload.category(), Category::Billing);
        assert_eq!(payload.brief_description, "Charged twice for an MRI");
        match &payload.details {
            CategoryDetails::Billing {
                bill_attachment,
                billing_concerns,
                ..
            } => {
                assert!(bill_attachment.is_none(), "attachment only kept for yes-upload");
                assert_eq!(billing_concerns, &vec!["duplicate-charge".to_string()]);
            }
            other => panic!("unexpected details: {:?}", other),
        }
        let json = serde_json::to_string(&payload).unwrap();
        assert!(!json.contains("Atorvastatin"));
        assert!(json.contains("\"category\":\"billing\""));
    }

    #[test]
    fn payload_requires_a_category() {
        assert!(CasePayload::from_form(&FormData::default()).is_none());
    }

    #[test]
    fn dependent_name_dropped_for_self_requests() {
        let mut form = billing_form();
        form.dependent_name = "Sam".into();
        assert!(CasePayload::from_form(&form)
            .unwrap()
            .dependent_name
            .is_none());
        form.request_for = RequestFor::Dependent;
        assert_eq!(
            CasePayload::from_form(&form).unwrap().dependent_name.as_deref(),
            Some("Sam")
        );
    }

    #[test]
    fn long_titles_are_truncated() {
        let mut form = billing_form();
        form.brief_description = "x".repeat(200);
        let title = CasePayload::from_form(&form).unwrap().title();
        assert_eq!(title.chars().count(), TITLE_MAX_CHARS);
        assert!(title.ends_with('…'));
    }

    #[test]
    fn receipt_route_points_at_case_detail() {
        let payload = CasePayload::from_form(&billing_form()).unwrap();
        let record = CaseRecord::new(Uuid::nil(), payload, Utc::now());
        assert_eq!(
            record.receipt().route(),
            "/cases/00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(record.status, CaseStatus::Open);
    }
}
