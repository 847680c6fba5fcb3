//! Declarative field groups for every wizard page.
//!
//! A group is a static list of [`FieldSpec`]s; [`render_page`] turns it into a
//! [`PageView`] for the current form without touching any state.

use intake_domain::{FieldKey, FieldSlot, FormData, HasBill, RequestFor};

use crate::{
    page_plan::PageId,
    validation::{FieldError, FormErrors},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceOption {
    pub value: &'static str,
    pub label: &'static str,
}

const fn opt(value: &'static str, label: &'static str) -> ChoiceOption {
    ChoiceOption { value, label }
}

/// Input widget for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    LongText,
    Choice(&'static [ChoiceOption]),
    MultiChoice(&'static [ChoiceOption]),
    Flag,
}

impl FieldKind {
    pub fn options(&self) -> &'static [ChoiceOption] {
        match self {
            FieldKind::Choice(options) | FieldKind::MultiChoice(options) => options,
            _ => &[],
        }
    }
}

type VisibleWhen = fn(&FormData) -> bool;

/// Declarative description of a single input bound to a form field.
#[derive(Clone, Copy)]
pub struct FieldSpec {
    pub key: FieldKey,
    pub label: &'static str,
    pub kind: FieldKind,
    /// Renders a `*` after the label. Not enforced; see [`crate::ValidationRules`].
    pub required_marker: bool,
    pub help: Option<&'static str>,
    pub visible_when: Option<VisibleWhen>,
}

impl std::fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSpec")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("required_marker", &self.required_marker)
            .finish()
    }
}

impl FieldSpec {
    const fn new(key: FieldKey, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            required_marker: false,
            help: None,
            visible_when: None,
        }
    }

    const fn marked(mut self) -> Self {
        self.required_marker = true;
        self
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }

    const fn shown_when(mut self, predicate: VisibleWhen) -> Self {
        self.visible_when = Some(predicate);
        self
    }

    pub fn is_visible(&self, form: &FormData) -> bool {
        self.visible_when.map(|predicate| predicate(form)).unwrap_or(true)
    }

    pub fn display_label(&self) -> String {
        if self.required_marker {
            format!("{} *", self.label)
        } else {
            self.label.to_string()
        }
    }

    /// Human readable value of the field, empty when unanswered.
    pub fn display_value(&self, form: &FormData) -> String {
        match self.kind {
            FieldKind::Flag => {
                if form.flag(self.key).unwrap_or(false) {
                    "Yes".into()
                } else {
                    "No".into()
                }
            }
            FieldKind::MultiChoice(options) => form
                .list(self.key)
                .unwrap_or_default()
                .iter()
                .map(|value| option_label(options, value))
                .collect::<Vec<_>>()
                .join(", "),
            FieldKind::Choice(options) => {
                let raw = form.text(self.key).unwrap_or_default().trim();
                if raw.is_empty() {
                    String::new()
                } else {
                    option_label(options, raw)
                }
            }
            FieldKind::Text | FieldKind::LongText => {
                form.text(self.key).unwrap_or_default().trim().to_string()
            }
        }
    }
}

fn option_label(options: &[ChoiceOption], value: &str) -> String {
    options
        .iter()
        .find(|option| option.value == value)
        .map(|option| option.label.to_string())
        .unwrap_or_else(|| value.to_string())
}

const REQUEST_FOR_OPTIONS: &[ChoiceOption] = &[
    opt("self", "Myself"),
    opt("dependent", "A dependent"),
];
const LOCATION_OPTIONS: &[ChoiceOption] = &[
    opt("home", "Home address on file"),
    opt("work", "Work address on file"),
];
const URGENCY_OPTIONS: &[ChoiceOption] = &[
    opt("routine", "Routine"),
    opt("soon", "Within a week"),
    opt("urgent", "Urgent"),
];

const CARE_TYPE_OPTIONS: &[ChoiceOption] = &[
    opt("primary-care", "Primary care"),
    opt("specialist", "Specialist"),
    opt("mental-health", "Mental health"),
    opt("urgent-care", "Urgent care"),
];

const MAX_DISTANCE_OPTIONS: &[ChoiceOption] = &[
    opt("5", "5 miles"),
    opt("10", "10 miles"),
    opt("25", "25 miles"),
    opt("50", "50 miles"),
];

const PROVIDER_PREFERENCE_OPTIONS: &[ChoiceOption] = &[
    opt("accepting-new-patients", "Accepting new patients"),
    opt("female-provider", "Female provider"),
    opt("male-provider", "Male provider"),
    opt("telehealth", "Offers telehealth"),
    opt("evening-hours", "Evening hours"),
    opt("spanish-speaking", "Spanish speaking"),
];

const HAS_BILL_OPTIONS: &[ChoiceOption] = &[
    opt("yes-upload", "Yes, I'll upload it"),
    opt("yes-no-upload", "Yes, but I can't upload it"),
    opt("no", "No"),
];

const BILLING_CONCERN_OPTIONS: &[ChoiceOption] = &[
    opt("unexpected-charge", "Unexpected charge"),
    opt("duplicate-charge", "Charged more than once"),
    opt("denied-claim", "Claim was denied"),
    opt("out-of-network", "Out-of-network charge"),
    opt("payment-plan", "Need a payment plan"),
];

const PHARMACY_TYPE_OPTIONS: &[ChoiceOption] = &[
    opt("retail", "Retail pharmacy"),
    opt("mail-order", "Mail order"),
    opt("specialty", "Specialty pharmacy"),
];

const MEDICATION_CONCERN_OPTIONS: &[ChoiceOption] = &[
    opt("cost", "Cost"),
    opt("coverage", "Coverage"),
    opt("prior-authorization", "Prior authorization"),
    opt("side-effects", "Side effects"),
    opt("refill", "Refills"),
];

const SERVICE_TYPE_OPTIONS: &[ChoiceOption] = &[
    opt("lab-work", "Lab work"),
    opt("imaging", "Imaging"),
    opt("physical-therapy", "Physical therapy"),
    opt("preventive-screening", "Preventive screening"),
    opt("other", "Other"),
];

const PREFERRED_DAY_OPTIONS: &[ChoiceOption] = &[
    opt("monday", "Monday"),
    opt("tuesday", "Tuesday"),
    opt("wednesday", "Wednesday"),
    opt("thursday", "Thursday"),
    opt("friday", "Friday"),
    opt("saturday", "Saturday"),
];

const BENEFIT_TOPIC_OPTIONS: &[ChoiceOption] = &[
    opt("deductible", "Deductible"),
    opt("copays", "Copays"),
    opt("out-of-pocket-max", "Out-of-pocket maximum"),
    opt("covered-services", "Covered services"),
    opt("hsa-fsa", "HSA / FSA"),
];

const PLAN_SITUATION_OPTIONS: &[ChoiceOption] = &[
    opt("open-enrollment", "Open enrollment"),
    opt("new-job", "New job"),
    opt("marriage", "Marriage"),
    opt("new-baby", "New baby"),
    opt("moving", "Moving"),
    opt("losing-coverage", "Losing other coverage"),
];

const PLAN_PRIORITY_OPTIONS: &[ChoiceOption] = &[
    opt("low-premium", "Low monthly premium"),
    opt("low-deductible", "Low deductible"),
    opt("keep-my-doctor", "Keep my doctor"),
    opt("broad-network", "Broad network"),
    opt("prescription-coverage", "Prescription coverage"),
];

const QUESTION_TOPIC_OPTIONS: &[ChoiceOption] = &[
    opt("coverage", "Coverage"),
    opt("claims", "Claims"),
    opt("id-card", "ID card"),
    opt("account", "My account"),
    opt("other", "Something else"),
];

const UNIVERSAL: &[FieldSpec] = &[
    FieldSpec::new(
        FieldKey::RequestFor,
        "Who is this request for?",
        FieldKind::Choice(REQUEST_FOR_OPTIONS),
    )
    .marked(),
    FieldSpec::new(FieldKey::DependentName, "Dependent's name", FieldKind::Text)
        .marked()
        .shown_when(|form| form.request_for == RequestFor::Dependent),
    FieldSpec::new(
        FieldKey::BriefDescription,
        "Briefly describe what you need",
        FieldKind::LongText,
    )
    .marked()
    .with_help("A sentence or two is enough; you can add details on the next pages."),
    FieldSpec::new(
        FieldKey::Location,
        "Location",
        FieldKind::Choice(LOCATION_OPTIONS),
    )
    .shown_when(|form| !form.use_custom_location),
    FieldSpec::new(
        FieldKey::UseCustomLocation,
        "Use a different location",
        FieldKind::Flag,
    ),
    FieldSpec::new(
        FieldKey::CustomLocation,
        "City, state or ZIP",
        FieldKind::Text,
    )
    .shown_when(|form| form.use_custom_location),
];

const PROVIDER_NEEDS: &[FieldSpec] = &[
    FieldSpec::new(
        FieldKey::CareType,
        "Type of care",
        FieldKind::Choice(CARE_TYPE_OPTIONS),
    )
    .marked(),
    FieldSpec::new(FieldKey::Specialty, "Specialty", FieldKind::Text)
        .shown_when(|form| form.care_type == "specialist"),
    FieldSpec::new(
        FieldKey::Urgency,
        "How soon do you need care?",
        FieldKind::Choice(URGENCY_OPTIONS),
    ),
];

const PROVIDER_PREFERENCES: &[FieldSpec] = &[
    FieldSpec::new(
        FieldKey::MaxDistance,
        "Maximum distance",
        FieldKind::Choice(MAX_DISTANCE_OPTIONS),
    ),
    FieldSpec::new(
        FieldKey::ProviderPreferences,
        "Provider preferences",
        FieldKind::MultiChoice(PROVIDER_PREFERENCE_OPTIONS),
    ),
];

const BILLING_DETAILS: &[FieldSpec] = &[
    FieldSpec::new(
        FieldKey::HasBill,
        "Do you have the bill?",
        FieldKind::Choice(HAS_BILL_OPTIONS),
    )
    .marked(),
    FieldSpec::new(FieldKey::BillAttachment, "Upload bill", FieldKind::Text)
        .marked()
        .with_help("File name of the bill you are attaching.")
        .shown_when(|form| form.has_bill == HasBill::YesUpload),
    FieldSpec::new(
        FieldKey::BillingProvider,
        "Provider or facility on the bill",
        FieldKind::Text,
    ),
    FieldSpec::new(FieldKey::DateOfService, "Date of service", FieldKind::Text),
    FieldSpec::new(FieldKey::BilledAmount, "Amount billed", FieldKind::Text),
];

const BILLING_CONCERNS: &[FieldSpec] = &[FieldSpec::new(
    FieldKey::BillingConcerns,
    "What concerns you about this bill?",
    FieldKind::MultiChoice(BILLING_CONCERN_OPTIONS),
)];

const MEDICATION_DETAILS: &[FieldSpec] = &[
    FieldSpec::new(FieldKey::MedicationName, "Medication name", FieldKind::Text).marked(),
    FieldSpec::new(FieldKey::Dosage, "Dosage", FieldKind::Text),
    FieldSpec::new(FieldKey::PrescriberName, "Prescribing doctor", FieldKind::Text),
];

const PHARMACY_PREFERENCES: &[FieldSpec] = &[
    FieldSpec::new(
        FieldKey::PharmacyType,
        "Preferred pharmacy",
        FieldKind::Choice(PHARMACY_TYPE_OPTIONS),
    ),
    FieldSpec::new(
        FieldKey::MedicationConcerns,
        "What can we help with?",
        FieldKind::MultiChoice(MEDICATION_CONCERN_OPTIONS),
    ),
];

const SERVICE_DETAILS: &[FieldSpec] = &[
    FieldSpec::new(
        FieldKey::ServiceType,
        "Service needed",
        FieldKind::Choice(SERVICE_TYPE_OPTIONS),
    )
    .marked(),
    FieldSpec::new(
        FieldKey::ServiceUrgency,
        "How soon?",
        FieldKind::Choice(URGENCY_OPTIONS),
    ),
];

const SERVICE_SCHEDULING: &[FieldSpec] = &[FieldSpec::new(
    FieldKey::PreferredDays,
    "Preferred days",
    FieldKind::MultiChoice(PREFERRED_DAY_OPTIONS),
)];

const BENEFITS: &[FieldSpec] = &[
    FieldSpec::new(
        FieldKey::BenefitTopics,
        "Topics",
        FieldKind::MultiChoice(BENEFIT_TOPIC_OPTIONS),
    ),
    FieldSpec::new(
        FieldKey::CoverageQuestion,
        "What would you like to know?",
        FieldKind::LongText,
    )
    .marked(),
];

const PLAN_SITUATION: &[FieldSpec] = &[
    FieldSpec::new(FieldKey::CurrentPlan, "Current plan", FieldKind::Text),
    FieldSpec::new(
        FieldKey::PlanSituation,
        "What's prompting the change?",
        FieldKind::Choice(PLAN_SITUATION_OPTIONS),
    )
    .marked(),
];

const PLAN_PRIORITIES: &[FieldSpec] = &[FieldSpec::new(
    FieldKey::PlanPriorities,
    "What matters most?",
    FieldKind::MultiChoice(PLAN_PRIORITY_OPTIONS),
)];

const QUESTION: &[FieldSpec] = &[
    FieldSpec::new(
        FieldKey::QuestionTopic,
        "Topic",
        FieldKind::Choice(QUESTION_TOPIC_OPTIONS),
    ),
    FieldSpec::new(FieldKey::QuestionDetails, "Your question", FieldKind::LongText).marked(),
];

/// Contact method options; labels are reused in confirmation text.
pub const CONTACT_METHOD_OPTIONS: &[ChoiceOption] = &[
    opt("phone", "Phone"),
    opt("email", "Email"),
    opt("text", "Text message"),
    opt("portal", "Portal message"),
];

pub const BEST_TIME_OPTIONS: &[ChoiceOption] = &[
    opt("morning", "Morning"),
    opt("afternoon", "Afternoon"),
    opt("evening", "Evening"),
];

const COMMUNICATION: &[FieldSpec] = &[
    FieldSpec::new(
        FieldKey::ContactMethod,
        "How should we contact you?",
        FieldKind::MultiChoice(CONTACT_METHOD_OPTIONS),
    )
    .marked(),
    FieldSpec::new(
        FieldKey::BestTime,
        "Best time to reach you",
        FieldKind::MultiChoice(BEST_TIME_OPTIONS),
    ),
    FieldSpec::new(
        FieldKey::LeaveVoicemail,
        "OK to leave a voicemail",
        FieldKind::Flag,
    ),
    FieldSpec::new(
        FieldKey::AdditionalNotes,
        "Anything else we should know?",
        FieldKind::LongText,
    ),
];

/// Fields rendered on `page`.
pub fn field_group(page: PageId) -> &'static [FieldSpec] {
    match page {
        PageId::Universal => UNIVERSAL,
        PageId::ProviderNeeds => PROVIDER_NEEDS,
        PageId::ProviderPreferences => PROVIDER_PREFERENCES,
        PageId::BillingDetails => BILLING_DETAILS,
        PageId::BillingConcerns => BILLING_CONCERNS,
        PageId::MedicationDetails => MEDICATION_DETAILS,
        PageId::PharmacyPreferences => PHARMACY_PREFERENCES,
        PageId::ServiceDetails => SERVICE_DETAILS,
        PageId::ServiceScheduling => SERVICE_SCHEDULING,
        PageId::Benefits => BENEFITS,
        PageId::PlanSituation => PLAN_SITUATION,
        PageId::PlanPriorities => PLAN_PRIORITIES,
        PageId::Question => QUESTION,
        PageId::Communication => COMMUNICATION,
    }
}

/// Looks up the spec for `key` on any page.
pub fn field_spec(key: FieldKey) -> Option<&'static FieldSpec> {
    ALL_PAGES
        .iter()
        .flat_map(|page| field_group(*page).iter())
        .find(|spec| spec.key == key)
}

const ALL_PAGES: [PageId; 14] = [
    PageId::Universal,
    PageId::ProviderNeeds,
    PageId::ProviderPreferences,
    PageId::BillingDetails,
    PageId::BillingConcerns,
    PageId::MedicationDetails,
    PageId::PharmacyPreferences,
    PageId::ServiceDetails,
    PageId::ServiceScheduling,
    PageId::Benefits,
    PageId::PlanSituation,
    PageId::PlanPriorities,
    PageId::Question,
    PageId::Communication,
];

/// A visible field together with its current value and error.
#[derive(Debug, Clone)]
pub struct FieldView {
    pub spec: &'static FieldSpec,
    pub value: String,
    pub selected: Vec<String>,
    pub error: Option<FieldError>,
}

/// Render output for one page.
#[derive(Debug, Clone)]
pub struct PageView {
    pub page: PageId,
    pub title: &'static str,
    pub index: usize,
    pub total: usize,
    pub fields: Vec<FieldView>,
}

impl PageView {
    pub fn field(&self, key: FieldKey) -> Option<&FieldView> {
        self.fields.iter().find(|view| view.spec.key == key)
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.total
    }
}

/// Pure projection of `form` onto `page`; hidden conditional fields are omitted.
pub fn render_page(
    page: PageId,
    index: usize,
    total: usize,
    form: &FormData,
    errors: &FormErrors,
) -> PageView {
    let fields = field_group(page)
        .iter()
        .filter(|spec| spec.is_visible(form))
        .map(|spec| FieldView {
            spec,
            value: spec.display_value(form),
            selected: match spec.key.slot() {
                FieldSlot::List => form.list(spec.key).unwrap_or_default().to_vec(),
                _ => Vec::new(),
            },
            error: errors.get(spec.key).cloned(),
        })
        .collect();
    PageView {
        page,
        title: page.title(),
        index,
        total,
        fields,
    }
}
