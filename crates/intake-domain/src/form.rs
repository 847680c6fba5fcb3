//! The flat form record shared by every intake page.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use strsim::levenshtein;

use crate::{Category, ParseValueError};

/// Who the request is being made for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum RequestFor {
    #[default]
    #[serde(rename = "self")]
    Myself,
    #[serde(rename = "dependent")]
    Dependent,
}

impl RequestFor {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestFor::Myself => "self",
            RequestFor::Dependent => "dependent",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RequestFor::Myself => "Myself",
            RequestFor::Dependent => "A dependent",
        }
    }
}

impl FromStr for RequestFor {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "self" | "myself" => Ok(RequestFor::Myself),
            "dependent" => Ok(RequestFor::Dependent),
            other => Err(ParseValueError::new("request target", other)),
        }
    }
}

/// Whether the member has a bill for a billing request, and if they are attaching it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum HasBill {
    #[default]
    #[serde(rename = "")]
    Unanswered,
    #[serde(rename = "yes-upload")]
    YesUpload,
    #[serde(rename = "yes-no-upload")]
    YesNoUpload,
    #[serde(rename = "no")]
    No,
}

impl HasBill {
    pub fn as_str(self) -> &'static str {
        match self {
            HasBill::Unanswered => "",
            HasBill::YesUpload => "yes-upload",
            HasBill::YesNoUpload => "yes-no-upload",
            HasBill::No => "no",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HasBill::Unanswered => "",
            HasBill::YesUpload => "Yes, I'll upload it",
            HasBill::YesNoUpload => "Yes, but I can't upload it",
            HasBill::No => "No",
        }
    }
}

impl FromStr for HasBill {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" => Ok(HasBill::Unanswered),
            "yes-upload" => Ok(HasBill::YesUpload),
            "yes-no-upload" => Ok(HasBill::YesNoUpload),
            "no" => Ok(HasBill::No),
            other => Err(ParseValueError::new("bill answer", other)),
        }
    }
}

/// Storage shape of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSlot {
    Text,
    Flag,
    List,
    /// Text input restricted to a typed enum.
    Choice,
}

/// Value carried by a scalar update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }
}

/// Every addressable field in [`FormData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKey {
    RequestFor,
    DependentName,
    BriefDescription,
    Location,
    UseCustomLocation,
    CustomLocation,
    CareType,
    Specialty,
    Urgency,
    MaxDistance,
    ProviderPreferences,
    HasBill,
    BillAttachment,
    BillingProvider,
    DateOfService,
    BilledAmount,
    BillingConcerns,
    MedicationName,
    Dosage,
    PrescriberName,
    PharmacyType,
    MedicationConcerns,
    ServiceType,
    ServiceUrgency,
    PreferredDays,
    CoverageQuestion,
    BenefitTopics,
    CurrentPlan,
    PlanSituation,
    PlanPriorities,
    QuestionTopic,
    QuestionDetails,
    ContactMethod,
    BestTime,
    LeaveVoicemail,
    AdditionalNotes,
}

impl FieldKey {
    pub const ALL: [FieldKey; 36] = [
        FieldKey::RequestFor,
        FieldKey::DependentName,
        FieldKey::BriefDescription,
        FieldKey::Location,
        FieldKey::UseCustomLocation,
        FieldKey::CustomLocation,
        FieldKey::CareType,
        FieldKey::Specialty,
        FieldKey::Urgency,
        FieldKey::MaxDistance,
        FieldKey::ProviderPreferences,
        FieldKey::HasBill,
        FieldKey::BillAttachment,
        FieldKey::BillingProvider,
        FieldKey::DateOfService,
        FieldKey::BilledAmount,
        FieldKey::BillingConcerns,
        FieldKey::MedicationName,
        FieldKey::Dosage,
        FieldKey::PrescriberName,
        FieldKey::PharmacyType,
        FieldKey::MedicationConcerns,
        FieldKey::ServiceType,
        FieldKey::ServiceUrgency,
        FieldKey::PreferredDays,
        FieldKey::CoverageQuestion,
        FieldKey::BenefitTopics,
        FieldKey::CurrentPlan,
        FieldKey::PlanSituation,
        FieldKey::PlanPriorities,
        FieldKey::QuestionTopic,
        FieldKey::QuestionDetails,
        FieldKey::ContactMethod,
        FieldKey::BestTime,
        FieldKey::LeaveVoicemail,
        FieldKey::AdditionalNotes,
    ];

    /// Stable camelCase name, identical to the serialized field name.
    pub fn name(self) -> &'static str {
        match self {
            FieldKey::RequestFor => "requestFor",
            FieldKey::DependentName => "dependentName",
            FieldKey::BriefDescription => "briefDescription",
            FieldKey::Location => "location",
            FieldKey::UseCustomLocation => "useCustomLocation",
            FieldKey::CustomLocation => "customLocation",
            FieldKey::CareType => "careType",
            FieldKey::Specialty => "specialty",
            FieldKey::Urgency => "urgency",
            FieldKey::MaxDistance => "maxDistance",
            FieldKey::ProviderPreferences => "providerPreferences",
            FieldKey::HasBill => "hasBill",
            FieldKey::BillAttachment => "billAttachment",
            FieldKey::BillingProvider => "billingProvider",
            FieldKey::DateOfService => "dateOfService",
            FieldKey::BilledAmount => "billedAmount",
            FieldKey::BillingConcerns => "billingConcerns",
            FieldKey::MedicationName => "medicationName",
            FieldKey::Dosage => "dosage",
            FieldKey::PrescriberName => "prescriberName",
            FieldKey::PharmacyType => "pharmacyType",
            FieldKey::MedicationConcerns => "medicationConcerns",
            FieldKey::ServiceType => "serviceType",
            FieldKey::ServiceUrgency => "serviceUrgency",
            FieldKey::PreferredDays => "preferredDays",
            FieldKey::CoverageQuestion => "coverageQuestion",
            FieldKey::BenefitTopics => "benefitTopics",
            FieldKey::CurrentPlan => "currentPlan",
            FieldKey::PlanSituation => "planSituation",
            FieldKey::PlanPriorities => "planPriorities",
            FieldKey::QuestionTopic => "questionTopic",
            FieldKey::QuestionDetails => "questionDetails",
            FieldKey::ContactMethod => "contactMethod",
            FieldKey::BestTime => "bestTime",
            FieldKey::LeaveVoicemail => "leaveVoicemail",
            FieldKey::AdditionalNotes => "additionalNotes",
        }
    }

    pub fn slot(self) -> FieldSlot {
        match self {
            FieldKey::RequestFor | FieldKey::HasBill => FieldSlot::Choice,
            FieldKey::UseCustomLocation | FieldKey::LeaveVoicemail => FieldSlot::Flag,
            FieldKey::ProviderPreferences
            | FieldKey::BillingConcerns
            | FieldKey::MedicationConcerns
            | FieldKey::PreferredDays
            | FieldKey::BenefitTopics
            | FieldKey::PlanPriorities
            | FieldKey::ContactMethod
            | FieldKey::BestTime => FieldSlot::List,
            _ => FieldSlot::Text,
        }
    }

    /// Closest known field name, for "did you mean" hints.
    pub fn suggest(input: &str) -> Option<FieldKey> {
        let needle = input.trim().to_ascii_lowercase();
        FieldKey::ALL
            .iter()
            .map(|key| (levenshtein(&key.name().to_ascii_lowercase(), &needle), *key))
            .filter(|(distance, _)| *distance <= 3)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, key)| key)
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldKey {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        FieldKey::ALL
            .iter()
            .copied()
            .find(|key| key.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseValueError::new("field", trimmed))
    }
}

/// Mutable record edited by the intake pages. Fields of categories other
/// than the active one keep their defaults and never reach a submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
    pub category: Option<Category>,
    pub request_for: RequestFor,
    pub dependent_name: String,
    pub brief_description: String,
    pub location: String,
    pub use_custom_location: bool,
    pub custom_location: String,

    pub care_type: String,
    pub specialty: String,
    pub urgency: String,
    pub max_distance: String,
    pub provider_preferences: Vec<String>,

    pub has_bill: HasBill,
    pub bill_attachment: String,
    pub billing_provider: String,
    pub date_of_service: String,
    pub billed_amount: String,
    pub billing_concerns: Vec<String>,

    pub medication_name: String,
    pub dosage: String,
    pub prescriber_name: String,
    pub pharmacy_type: String,
    pub medication_concerns: Vec<String>,

    pub service_type: String,
    pub service_urgency: String,
    pub preferred_days: Vec<String>,

    pub coverage_question: String,
    pub benefit_topics: Vec<String>,

    pub current_plan: String,
    pub plan_situation: String,
    pub plan_priorities: Vec<String>,

    pub question_topic: String,
    pub question_details: String,

    pub contact_method: Vec<String>,
    pub best_time: Vec<String>,
    pub leave_voicemail: bool,
    pub additional_notes: String,
}

impl FormData {
    pub fn new(category: Category) -> Self {
        Self {
            category: Some(category),
            ..Self::default()
        }
    }

    pub fn text(&self, key: FieldKey) -> Option<&str> {
        let value: &str = match key {
            FieldKey::RequestFor => self.request_for.as_str(),
            FieldKey::HasBill => self.has_bill.as_str(),
            FieldKey::DependentName => &self.dependent_name,
            FieldKey::BriefDescription => &self.brief_description,
            FieldKey::Location => &self.location,
            FieldKey::CustomLocation => &self.custom_location,
            FieldKey::CareType => &self.care_type,
            FieldKey::Specialty => &self.specialty,
            FieldKey::Urgency => &self.urgency,
            FieldKey::MaxDistance => &self.max_distance,
            FieldKey::BillAttachment => &self.bill_attachment,
            FieldKey::BillingProvider => &self.billing_provider,
            FieldKey::DateOfService => &self.date_of_service,
            FieldKey::BilledAmount => &self.billed_amount,
            FieldKey::MedicationName => &self.medication_name,
            FieldKey::Dosage => &self.dosage,
            FieldKey::PrescriberName => &self.prescriber_name,
            FieldKey::PharmacyType => &self.pharmacy_type,
            FieldKey::ServiceType => &self.service_type,
            FieldKey::ServiceUrgency => &self.service_urgency,
            FieldKey::CoverageQuestion => &self.coverage_question,
            FieldKey::CurrentPlan => &self.current_plan,
            FieldKey::PlanSituation => &self.plan_situation,
            FieldKey::QuestionTopic => &self.question_topic,
            FieldKey::QuestionDetails => &self.question_details,
            FieldKey::AdditionalNotes => &self.additional_notes,
            _ => return None,
        };
        Some(value)
    }

    /// Mutable access to free-text fields. Choice fields are excluded because
    /// they must go through [`FormData::set_choice`].
    pub fn text_mut(&mut self, key: FieldKey) -> Option<&mut String> {
        let slot = match key {
            FieldKey::DependentName => &mut self.dependent_name,
            FieldKey::BriefDescription => &mut self.brief_description,
            FieldKey::Location => &mut self.location,
            FieldKey::CustomLocation => &mut self.custom_location,
            FieldKey::CareType => &mut self.care_type,
            FieldKey::Specialty => &mut self.specialty,
            FieldKey::Urgency => &mut self.urgency,
            FieldKey::MaxDistance => &mut self.max_distance,
            FieldKey::BillAttachment => &mut self.bill_attachment,
            FieldKey::BillingProvider => &mut self.billing_provider,
            FieldKey::DateOfService => &mut self.date_of_service,
            FieldKey::BilledAmount => &mut self.billed_amount,
            FieldKey::MedicationName => &mut self.medication_name,
            FieldKey::Dosage => &mut self.dosage,
            FieldKey::PrescriberName => &mut self.prescriber_name,
            FieldKey::PharmacyType => &mut self.pharmacy_type,
            FieldKey::ServiceType => &mut self.service_type,
            FieldKey::ServiceUrgency => &mut self.service_urgency,
            FieldKey::CoverageQuestion => &mut self.coverage_question,
            FieldKey::CurrentPlan => &mut self.current_plan,
            FieldKey::PlanSituation => &mut self.plan_situation,
            FieldKey::QuestionTopic => &mut self.question_topic,
            FieldKey::QuestionDetails => &mut self.question_details,
            FieldKey::AdditionalNotes => &mut self.additional_notes,
            _ => return None,
        };
        Some(slot)
    }

    pub fn set_choice(&mut self, key: FieldKey, raw: &str) -> Result<bool, ParseValueError> {
        match key {
            FieldKey::RequestFor => {
                self.request_for = raw.parse()?;
                Ok(true)
            }
            FieldKey::HasBill => {
                self.has_bill = raw.parse()?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub fn flag(&self, key: FieldKey) -> Option<bool> {
        match key {
            FieldKey::UseCustomLocation => Some(self.use_custom_location),
            FieldKey::LeaveVoicemail => Some(self.leave_voicemail),
            _ => None,
        }
    }

    pub fn flag_mut(&mut self, key: FieldKey) -> Option<&mut bool> {
        match key {
            FieldKey::UseCustomLocation => Some(&mut self.use_custom_location),
            FieldKey::LeaveVoicemail => Some(&mut self.leave_voicemail),
            _ => None,
        }
    }

    pub fn list(&self, key: FieldKey) -> Option<&[String]> {
        let values = match key {
            FieldKey::ProviderPreferences => &self.provider_preferences,
            FieldKey::BillingConcerns => &self.billing_concerns,
            FieldKey::MedicationConcerns => &self.medication_concerns,
            FieldKey::PreferredDays => &self.preferred_days,
            FieldKey::BenefitTopics => &self.benefit_topics,
            FieldKey::PlanPriorities => &self.plan_priorities,
            FieldKey::ContactMethod => &self.contact_method,
            FieldKey::BestTime => &self.best_time,
            _ => return None,
        };
        Some(values.as_slice())
    }

    pub fn list_mut(&mut self, key: FieldKey) -> Option<&mut Vec<String>> {
        match key {
            FieldKey::ProviderPreferences => Some(&mut self.provider_preferences),
            FieldKey::BillingConcerns => Some(&mut self.billing_concerns),
            FieldKey::MedicationConcerns => Some(&mut self.medication_concerns),
            FieldKey::PreferredDays => Some(&mut self.preferred_days),
            FieldKey::BenefitTopics => Some(&mut self.benefit_topics),
            FieldKey::PlanPriorities => Some(&mut self.plan_priorities),
            FieldKey::ContactMethod => Some(&mut self.contact_method),
            FieldKey::BestTime => Some(&mut self.best_time),
            _ => None,
        }
    }

    /// Whether the member has entered anything for `key`.
    pub fn is_filled(&self, key: FieldKey) -> bool {
        match key.slot() {
            FieldSlot::Flag => self.flag(key).unwrap_or(false),
            FieldSlot::List => self.list(key).map(|v| !v.is_empty()).unwrap_or(false),
            FieldSlot::Text | FieldSlot::Choice => self
                .text(key)
                .map(|v| !v.trim().is_empty())
                .unwrap_or(false),
        }
    }

    /// Resolved location: the custom entry when requested, otherwise the picked one.
    pub fn effective_location(&self) -> Option<String> {
        let raw = if self.use_custom_location {
            &self.custom_location
        } else {
            &self.location
        };
        non_blank(raw)
    }
}

pub(crate) fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_key_has_exactly_one_accessor() {
        let mut form = FormData::default();
        for key in FieldKey::ALL {
            let text = form.text(key).is_some();
            let flag = form.flag(key).is_some();
            let list = form.list(key).is_some();
            let hits = [text, flag, list].iter().filter(|hit| **hit).count();
            assert_eq!(hits, 1, "{key} should resolve through one accessor");
            match key.slot() {
                FieldSlot::Text => assert!(form.text_mut(key).is_some()),
                FieldSlot::Choice => assert!(form.text_mut(key).is_none()),
                FieldSlot::Flag => assert!(form.flag_mut(key).is_some()),
                FieldSlot::List => assert!(form.list_mut(key).is_some()),
            }
        }
    }

    #[test]
    fn field_names_round_trip_through_from_str() {
        for key in FieldKey::ALL {
            assert_eq!(key.name().parse::<FieldKey>().unwrap(), key);
        }
        assert_eq!(
            "BRIEFDESCRIPTION".parse::<FieldKey>().unwrap(),
            FieldKey::BriefDescription
        );
        assert!("shoeSize".parse::<FieldKey>().is_err());
    }

    #[test]
    fn suggest_finds_near_misses() {
        assert_eq!(
            FieldKey::suggest("contactMethd"),
            Some(FieldKey::ContactMethod)
        );
        assert_eq!(FieldKey::suggest("zzzzzzzzzzzz"), None);
    }

    #[test]
    fn serialized_names_match_field_key_names() {
        let value = serde_json::to_value(FormData::default()).unwrap();
        let object = value.as_object().unwrap();
        for key in FieldKey::ALL {
            assert!(object.contains_key(key.name()), "missing {}", key.name());
        }
        assert_eq!(object["requestFor"], "self");
        assert_eq!(object["hasBill"], "");
    }

    #[test]
    fn effective_location_prefers_custom_entry_when_requested() {
        let mut form = FormData::new(Category::Provider);
        form.location = "Home address".into();
        form.custom_location = "  Springfield, IL ".into();
        assert_eq!(form.effective_location().as_deref(), Some("Home address"));
        form.use_custom_location = true;
        assert_eq!(form.effective_location().as_deref(), Some("Springfield, IL"));
        form.custom_location.clear();
        assert_eq!(form.effective_location(), None);
    }
}
