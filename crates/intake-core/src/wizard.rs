//! Intake wizard controller.
//!
//! Owns the current step, the form store, field errors, the submission banner,
//! and the session liveness guard. Hosts drive it through the `handle_*`
//! operations and receive navigation requests through [`WizardHost`].

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use intake_domain::{CasePayload, CaseReceipt, Category, FormData};
use uuid::Uuid;

use crate::{
    field_groups::{render_page, PageView},
    gateway::{CaseGateway, SubmissionError},
    page_plan::{get_total_pages, page_at, PageId},
    redirect::{RedirectTimer, SessionGuard},
    reducer::{FormAction, FormStore},
    review::{confirmation_message, ReviewSummary},
    time::Clock,
    validation::{FieldError, FormErrors, ValidationRules},
    CoreError,
};

pub const DEFAULT_REDIRECT_DELAY_MS: u64 = 2000;

/// Collaborators the wizard calls out to but never implements.
pub trait WizardHost {
    /// Back was pressed on the first page.
    fn return_to_category_picker(&mut self);
    /// The wizard surface should be dismissed.
    fn close(&mut self);
    fn navigate(&mut self, route: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Details { page: usize },
    Review,
    Confirmation { case_id: Uuid },
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WizardStep::Details { page } => write!(f, "details page {}", page + 1),
            WizardStep::Review => f.write_str("review"),
            WizardStep::Confirmation { case_id } => write!(f, "confirmation of case {}", case_id),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WizardOptions {
    pub redirect_delay: Duration,
    pub rules: ValidationRules,
}

impl Default for WizardOptions {
    fn default() -> Self {
        Self::with_redirect_delay_ms(DEFAULT_REDIRECT_DELAY_MS)
    }
}

impl WizardOptions {
    pub fn with_redirect_delay_ms(delay_ms: u64) -> Self {
        Self {
            redirect_delay: Duration::milliseconds(i64::try_from(delay_ms).unwrap_or(i64::MAX)),
            rules: ValidationRules::standard(),
        }
    }

    pub fn with_rules(mut self, rules: ValidationRules) -> Self {
        self.rules = rules;
        self
    }
}

/// Proof that a submission was started; hand it back to
/// [`WizardController::complete_submit`] with the gateway result.
#[derive(Debug, Clone)]
pub struct SubmissionTicket {
    serial: u64,
    payload: CasePayload,
}

impl SubmissionTicket {
    pub fn payload(&self) -> &CasePayload {
        &self.payload
    }
}

pub struct WizardController {
    step: WizardStep,
    store: FormStore,
    errors: FormErrors,
    banner: Option<&'static str>,
    options: WizardOptions,
    guard: SessionGuard,
    submitting: bool,
    submission_serial: u64,
    redirect: Option<RedirectTimer>,
}

impl fmt::Debug for WizardController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WizardController")
            .field("step", &self.step)
            .field("category", &self.store.form().category)
            .field("errors", &self.errors)
            .field("submitting", &self.submitting)
            .field("open", &self.is_open())
            .finish()
    }
}

impl WizardController {
    /// Starts a session on the first page with a fresh form for `category`.
    pub fn open(category: Category, options: WizardOptions) -> Self {
        tracing::info!(category = category.id(), "intake session opened");
        Self {
            step: WizardStep::Details { page: 0 },
            store: FormStore::new(FormData::new(category)),
            errors: FormErrors::new(),
            banner: None,
            options,
            guard: SessionGuard::new(),
            submitting: false,
            submission_serial: 0,
            redirect: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn form(&self) -> &FormData {
        self.store.form()
    }

    pub fn journal(&self) -> &[FormAction] {
        self.store.journal()
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn banner(&self) -> Option<&'static str> {
        self.banner
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_open(&self) -> bool {
        self.guard.is_alive()
    }

    pub fn category(&self) -> Option<Category> {
        self.form().category
    }

    pub fn total_pages(&self) -> usize {
        get_total_pages(self.category())
    }

    pub fn current_page(&self) -> Option<PageId> {
        match self.step {
            WizardStep::Details { page } => page_at(self.category(), page),
            _ => None,
        }
    }

    pub fn pending_redirect(&self) -> Option<&RedirectTimer> {
        self.redirect.as_ref().filter(|timer| timer.is_pending())
    }

    /// Applies a reducer action. Choosing a category restarts at the first page.
    pub fn dispatch(&mut self, action: FormAction) -> Result<(), CoreError> {
        self.ensure_open()?;
        if let WizardStep::Confirmation { .. } = self.step {
            return Err(self.invalid("edit the form"));
        }
        if self.submitting {
            return Err(CoreError::SubmissionInFlight);
        }
        let restarts = matches!(action, FormAction::SetCategory(_) | FormAction::Reset);
        self.store.dispatch(action)?;
        if restarts {
            self.step = WizardStep::Details { page: 0 };
            self.errors.clear();
            self.banner = None;
        }
        Ok(())
    }

    /// Validates the current page and advances, moving to review after the last page.
    pub fn handle_next(&mut self) -> Result<WizardStep, CoreError> {
        self.ensure_open()?;
        let WizardStep::Details { page } = self.step else {
            return Err(self.invalid("advance"));
        };
        let total = self.total_pages();
        if let Some(page_id) = page_at(self.category(), page) {
            let errors = self.options.rules.check_page(page_id, self.store.form());
            if !errors.is_empty() {
                tracing::warn!(page = %page_id, errors = %errors, "page validation failed");
                self.errors = errors.clone();
                return Err(CoreError::Validation(errors));
            }
        }
        self.errors.clear();
        self.step = if page + 1 < total {
            WizardStep::Details { page: page + 1 }
        } else {
            WizardStep::Review
        };
        tracing::debug!(step = %self.step, "wizard advanced");
        Ok(self.step)
    }

    /// Same as [`Self::handle_next`], page gates included.
    pub fn handle_skip(&mut self) -> Result<WizardStep, CoreError> {
        self.handle_next()
    }

    pub fn handle_back<H: WizardHost + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> Result<WizardStep, CoreError> {
        self.ensure_open()?;
        match self.step {
            WizardStep::Details { page: 0 } => {
                self.errors.clear();
                tracing::debug!("returning to category picker");
                host.return_to_category_picker();
                Ok(self.step)
            }
            WizardStep::Details { page } => {
                self.errors.clear();
                self.step = WizardStep::Details { page: page - 1 };
                tracing::debug!(step = %self.step, "wizard moved back");
                Ok(self.step)
            }
            WizardStep::Review => self.handle_edit(),
            WizardStep::Confirmation { .. } => Err(self.invalid("go back")),
        }
    }

    /// Leaves review for the last details page, keeping every answer.
    pub fn handle_edit(&mut self) -> Result<WizardStep, CoreError> {
        self.ensure_open()?;
        if self.step != WizardStep::Review {
            return Err(self.invalid("edit"));
        }
        if self.submitting {
            return Err(CoreError::SubmissionInFlight);
        }
        self.errors.clear();
        self.banner = None;
        self.step = WizardStep::Details {
            page: self.total_pages().saturating_sub(1),
        };
        tracing::debug!(step = %self.step, "editing from review");
        Ok(self.step)
    }

    /// Runs the whole submission against `gateway` synchronously.
    pub fn handle_submit<G: CaseGateway + ?Sized>(
        &mut self,
        gateway: &G,
        clock: &dyn Clock,
    ) -> Result<CaseReceipt, CoreError> {
        let ticket = self.begin_submit()?;
        let result = gateway.create_case(ticket.payload());
        self.complete_submit(ticket, result, clock)
    }

    /// Validates the review and marks a submission in flight.
    pub fn begin_submit(&mut self) -> Result<SubmissionTicket, CoreError> {
        self.ensure_open()?;
        if self.step != WizardStep::Review {
            return Err(self.invalid("submit"));
        }
        if self.submitting {
            return Err(CoreError::SubmissionInFlight);
        }
        let errors = self.options.rules.check_submission(self.store.form());
        if !errors.is_empty() {
            tracing::warn!(errors = %errors, "submission validation failed");
            self.errors = errors.clone();
            return Err(CoreError::Validation(errors));
        }
        let payload = CasePayload::from_form(self.store.form()).ok_or(CoreError::NoCategory)?;

        self.errors.clear();
        self.banner = None;
        self.submitting = true;
        self.submission_serial += 1;
        tracing::info!(category = payload.category().id(), "submitting case");
        Ok(SubmissionTicket {
            serial: self.submission_serial,
            payload,
        })
    }

    /// Finishes the submission started by `ticket`. Failures keep the review step.
    pub fn complete_submit(
        &mut self,
        ticket: SubmissionTicket,
        result: Result<CaseReceipt, SubmissionError>,
        clock: &dyn Clock,
    ) -> Result<CaseReceipt, CoreError> {
        if !self.submitting || ticket.serial != self.submission_serial {
            return Err(self.invalid("complete a submission"));
        }
        self.submitting = false;
        self.ensure_open()?;

        match result {
            Ok(receipt) => {
                self.step = WizardStep::Confirmation {
                    case_id: receipt.id,
                };
                self.redirect = Some(RedirectTimer::arm(
                    clock.now(),
                    self.options.redirect_delay,
                    receipt.route(),
                    self.guard.token(),
                ));
                tracing::info!(case_id = %receipt.id, "case created");
                Ok(receipt)
            }
            Err(err) => {
                tracing::warn!(error = %err, retryable = err.is_retryable(), "case submission failed");
                self.banner = Some(err.banner());
                if let SubmissionError::Rejected(fields) = &err {
                    for (key, message) in fields {
                        self.errors.insert(*key, FieldError::Rejected(message.clone()));
                    }
                }
                Err(CoreError::Submission(err))
            }
        }
    }

    /// Fires the post-submission redirect once it is due: closes the host,
    /// navigates to the case, and resets the form.
    pub fn poll_redirect<H: WizardHost + ?Sized>(
        &mut self,
        now: DateTime<Utc>,
        host: &mut H,
    ) -> Option<String> {
        let route = self.redirect.as_mut()?.take_if_due(now)?;
        self.redirect = None;
        tracing::info!(route = %route, "redirecting to case");
        host.close();
        host.navigate(&route);
        self.finish();
        Some(route)
    }

    /// Closes the session. A pending redirect never fires afterwards.
    pub fn dismiss<H: WizardHost + ?Sized>(&mut self, host: &mut H) {
        if !self.is_open() {
            return;
        }
        tracing::info!(step = %self.step, "intake session dismissed");
        self.redirect = None;
        self.finish();
        host.close();
    }

    pub fn page_view(&self) -> Option<PageView> {
        let WizardStep::Details { page } = self.step else {
            return None;
        };
        let page_id = page_at(self.category(), page)?;
        Some(render_page(
            page_id,
            page,
            self.total_pages(),
            self.store.form(),
            &self.errors,
        ))
    }

    pub fn review_summary(&self) -> ReviewSummary {
        ReviewSummary::build(self.store.form())
    }

    /// Confirmation text, available while on the confirmation step.
    pub fn confirmation_message(&self) -> Option<String> {
        match self.step {
            WizardStep::Confirmation { .. } => Some(confirmation_message(self.store.form())),
            _ => None,
        }
    }

    fn finish(&mut self) {
        self.guard.invalidate();
        self.store = FormStore::default();
        self.errors.clear();
        self.banner = None;
        self.submitting = false;
    }

    fn ensure_open(&self) -> Result<(), CoreError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(CoreError::SessionClosed)
        }
    }

    fn invalid(&self, action: &'static str) -> CoreError {
        CoreError::InvalidTransition {
            step: self.step.to_string(),
            action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use intake_domain::{FieldKey, HasBill};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingHost {
        calls: Vec<String>,
    }

    impl WizardHost for RecordingHost {
        fn return_to_category_picker(&mut self) {
            self.calls.push("picker".into());
        }

        fn close(&mut self) {
            self.calls.push("close".into());
        }

        fn navigate(&mut self, route: &str) {
            self.calls.push(format!("navigate {}", route));
        }
    }

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2024, 6, 3, 10, 0, 0).unwrap())
    }

    struct ScriptedGateway {
        results: Mutex<Vec<Result<CaseReceipt, SubmissionError>>>,
        seen: Mutex<Vec<CasePayload>>,
    }

    impl ScriptedGateway {
        fn new(results: Vec<Result<CaseReceipt, SubmissionError>>) -> Self {
            Self {
                results: Mutex::new(results),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl CaseGateway for ScriptedGateway {
        fn create_case(&self, payload: &CasePayload) -> Result<CaseReceipt, SubmissionError> {
            self.seen.lock().unwrap().push(payload.clone());
            self.results.lock().unwrap().remove(0)
        }
    }

    fn receipt() -> CaseReceipt {
        CaseReceipt {
            id: Uuid::parse_str("6f1c2d4e-8a8b-4c1d-9e2f-0a1b2c3d4e5f").unwrap(),
            created_at: clock().0,
        }
    }

    fn open(category: Category) -> WizardController {
        WizardController::open(category, WizardOptions::default())
    }

    fn set(wizard: &mut WizardController, key: FieldKey, value: &str) {
        wizard.dispatch(FormAction::set_text(key, value)).unwrap();
    }

    fn to_review(wizard: &mut WizardController) {
        while wizard.step() != WizardStep::Review {
            wizard.handle_next().unwrap();
        }
    }

    #[test]
    fn page_zero_gate_blocks_blank_descriptions() {
        let mut wizard = open(Category::Provider);
        for blank in ["", "   ", "\n\t"] {
            set(&mut wizard, FieldKey::BriefDescription, blank);
            assert!(matches!(wizard.handle_next(), Err(CoreError::Validation(_))));
            assert_eq!(wizard.step(), WizardStep::Details { page: 0 });
            assert_eq!(
                wizard.errors().get(FieldKey::BriefDescription),
                Some(&FieldError::MissingBriefDescription)
            );
        }

        set(&mut wizard, FieldKey::BriefDescription, "Need a dermatologist");
        assert_eq!(wizard.handle_next().unwrap(), WizardStep::Details { page: 1 });
        assert!(wizard.errors().is_empty());
    }

    #[test]
    fn skip_keeps_the_page_zero_gate() {
        let mut wizard = open(Category::Question);
        assert!(wizard.handle_skip().is_err());
        set(&mut wizard, FieldKey::BriefDescription, "ID card");
        assert_eq!(wizard.handle_skip().unwrap(), WizardStep::Details { page: 1 });
    }

    #[test]
    fn navigation_never_mutates_fields() {
        let mut wizard = open(Category::Medication);
        let mut host = RecordingHost::default();
        set(&mut wizard, FieldKey::BriefDescription, "Refill");
        wizard.handle_next().unwrap();
        set(&mut wizard, FieldKey::MedicationName, "Atorvastatin");
        wizard
            .dispatch(FormAction::toggle(FieldKey::MedicationConcerns, "cost"))
            .unwrap();
        let snapshot = wizard.form().clone();

        to_review(&mut wizard);
        for _ in 0..5 {
            wizard.handle_back(&mut host).unwrap();
        }
        assert_eq!(wizard.step(), WizardStep::Details { page: 0 });
        assert_eq!(wizard.form(), &snapshot);
        to_review(&mut wizard);
        wizard.handle_back(&mut host).unwrap();

        assert_eq!(wizard.form(), &snapshot);
        assert_eq!(host.calls, vec!["picker".to_string()]);
    }

    #[test]
    fn edit_from_review_lands_on_last_page() {
        for entry in Category::catalog() {
            let mut wizard = open(entry.category);
            set(&mut wizard, FieldKey::BriefDescription, "Help");
            to_review(&mut wizard);
            let before = wizard.form().clone();
            let step = wizard.handle_edit().unwrap();
            assert_eq!(
                step,
                WizardStep::Details {
                    page: wizard.total_pages() - 1
                }
            );
            assert_eq!(wizard.current_page(), Some(PageId::Communication));
            assert_eq!(wizard.form(), &before);
        }
    }

    #[test]
    fn benefits_walks_three_pages() {
        let mut wizard = open(Category::Benefits);
        set(&mut wizard, FieldKey::BriefDescription, "Acupuncture");
        let mut visited = vec![wizard.current_page().unwrap()];
        while let WizardStep::Details { .. } = wizard.handle_next().unwrap() {
            visited.push(wizard.current_page().unwrap());
        }
        assert_eq!(
            visited,
            vec![PageId::Universal, PageId::Benefits, PageId::Communication]
        );
    }

    #[test]
    fn bill_upload_is_not_enforced() {
        let mut wizard = open(Category::Billing);
        set(&mut wizard, FieldKey::BriefDescription, "Surprise bill");
        wizard.handle_next().unwrap();
        set(&mut wizard, FieldKey::HasBill, "yes-upload");
        assert_eq!(wizard.form().has_bill, HasBill::YesUpload);
        assert_eq!(wizard.handle_next().unwrap(), WizardStep::Details { page: 2 });
    }

    #[test]
    fn submission_requires_a_contact_method() {
        let mut wizard = open(Category::Service);
        set(&mut wizard, FieldKey::BriefDescription, "MRI");
        to_review(&mut wizard);
        let gateway = ScriptedGateway::new(vec![Ok(receipt())]);

        let err = wizard.handle_submit(&gateway, &clock()).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(wizard.errors().contains(FieldKey::ContactMethod));
        assert_eq!(wizard.step(), WizardStep::Review);
        assert!(gateway.seen.lock().unwrap().is_empty());

        wizard
            .dispatch(FormAction::toggle(FieldKey::ContactMethod, "phone"))
            .unwrap();
        wizard
            .dispatch(FormAction::toggle(FieldKey::ContactMethod, "email"))
            .unwrap();
        let created = wizard.handle_submit(&gateway, &clock()).unwrap();
        assert_eq!(wizard.step(), WizardStep::Confirmation { case_id: created.id });
    }

    #[test]
    fn confirmation_mentions_phone_and_voicemail() {
        let mut wizard = open(Category::Provider);
        set(&mut wizard, FieldKey::BriefDescription, "Find a PCP");
        wizard
            .dispatch(FormAction::toggle(FieldKey::ContactMethod, "phone"))
            .unwrap();
        wizard
            .dispatch(FormAction::set_flag(FieldKey::LeaveVoicemail, true))
            .unwrap();
        to_review(&mut wizard);
        assert_eq!(wizard.confirmation_message(), None);

        let gateway = ScriptedGateway::new(vec![Ok(receipt())]);
        wizard.handle_submit(&gateway, &clock()).unwrap();
        let message = wizard.confirmation_message().unwrap();
        assert!(message.contains("phone"));
        assert!(message.contains("voicemail"));
    }

    #[test]
    fn failures_stay_on_review() {
        let mut wizard = open(Category::Question);
        set(&mut wizard, FieldKey::BriefDescription, "Claims address");
        wizard
            .dispatch(FormAction::toggle(FieldKey::ContactMethod, "email"))
            .unwrap();
        to_review(&mut wizard);
        let gateway = ScriptedGateway::new(vec![
            Err(SubmissionError::Network("connection refused".into())),
            Err(SubmissionError::Rejected(vec![(
                FieldKey::BriefDescription,
                "Too vague".into(),
            )])),
            Err(SubmissionError::Unexpected("500".into())),
            Ok(receipt()),
        ]);

        let err = wizard.handle_submit(&gateway, &clock()).unwrap_err();
        assert!(matches!(err, CoreError::Submission(ref e) if e.is_retryable()));
        assert_eq!(wizard.step(), WizardStep::Review);
        assert!(wizard.banner().unwrap().contains("try again"));
        assert!(!wizard.is_submitting());

        wizard.handle_submit(&gateway, &clock()).unwrap_err();
        assert_eq!(wizard.step(), WizardStep::Review);
        assert_eq!(
            wizard.errors().get(FieldKey::BriefDescription),
            Some(&FieldError::Rejected("Too vague".into()))
        );

        wizard.handle_submit(&gateway, &clock()).unwrap_err();
        assert_eq!(wizard.step(), WizardStep::Review);
        assert!(wizard.pending_redirect().is_none());

        wizard.handle_submit(&gateway, &clock()).unwrap();
        assert!(wizard.banner().is_none());
        assert!(wizard.errors().is_empty());
    }

    #[test]
    fn in_flight_submission_blocks_a_second_one() {
        let mut wizard = open(Category::Plan);
        set(&mut wizard, FieldKey::BriefDescription, "Switch plans");
        wizard
            .dispatch(FormAction::toggle(FieldKey::ContactMethod, "portal"))
            .unwrap();
        to_review(&mut wizard);

        let ticket = wizard.begin_submit().unwrap();
        assert!(wizard.is_submitting());
        assert!(matches!(wizard.begin_submit(), Err(CoreError::SubmissionInFlight)));
        assert!(matches!(wizard.handle_edit(), Err(CoreError::SubmissionInFlight)));
        assert_eq!(ticket.payload().category(), Category::Plan);

        wizard.complete_submit(ticket.clone(), Ok(receipt()), &clock()).unwrap();
        assert!(!wizard.is_submitting());
        assert!(wizard.complete_submit(ticket, Ok(receipt()), &clock()).is_err());
    }

    #[test]
    fn redirect_fires_once_then_resets() {
        let mut wizard = open(Category::Benefits);
        let mut host = RecordingHost::default();
        set(&mut wizard, FieldKey::BriefDescription, "Deductible");
        wizard
            .dispatch(FormAction::toggle(FieldKey::ContactMethod, "email"))
            .unwrap();
        to_review(&mut wizard);
        let gateway = ScriptedGateway::new(vec![Ok(receipt())]);
        wizard.handle_submit(&gateway, &clock()).unwrap();

        let start = clock().0;
        assert_eq!(
            wizard.poll_redirect(start + Duration::milliseconds(1500), &mut host),
            None
        );
        let route = wizard
            .poll_redirect(start + Duration::milliseconds(2000), &mut host)
            .unwrap();
        assert_eq!(route, receipt().route());
        assert_eq!(
            host.calls,
            vec!["close".to_string(), format!("navigate {}", route)]
        );
        assert_eq!(wizard.poll_redirect(start + Duration::seconds(60), &mut host), None);
        assert_eq!(wizard.form(), &FormData::default());
        assert!(!wizard.is_open());
        assert!(matches!(wizard.handle_next(), Err(CoreError::SessionClosed)));
    }

    #[test]
    fn dismissed_sessions_never_redirect() {
        let mut wizard = open(Category::Question);
        let mut host = RecordingHost::default();
        set(&mut wizard, FieldKey::BriefDescription, "Hi");
        wizard
            .dispatch(FormAction::toggle(FieldKey::ContactMethod, "text"))
            .unwrap();
        to_review(&mut wizard);
        let gateway = ScriptedGateway::new(vec![Ok(receipt())]);
        wizard.handle_submit(&gateway, &clock()).unwrap();

        let mut detached = wizard.pending_redirect().cloned().unwrap();
        wizard.dismiss(&mut host);
        assert_eq!(host.calls, vec!["close".to_string()]);
        assert_eq!(
            wizard.poll_redirect(clock().0 + Duration::seconds(5), &mut host),
            None
        );
        assert_eq!(detached.take_if_due(clock().0 + Duration::seconds(5)), None);
        assert_eq!(wizard.form(), &FormData::default());
    }

    #[test]
    fn dropping_the_controller_cancels_the_redirect() {
        let mut wizard = open(Category::Question);
        set(&mut wizard, FieldKey::BriefDescription, "Hi");
        wizard
            .dispatch(FormAction::toggle(FieldKey::ContactMethod, "phone"))
            .unwrap();
        to_review(&mut wizard);
        let gateway = ScriptedGateway::new(vec![Ok(receipt())]);
        wizard.handle_submit(&gateway, &clock()).unwrap();

        let mut detached = wizard.pending_redirect().cloned().unwrap();
        drop(wizard);
        assert_eq!(detached.take_if_due(clock().0 + Duration::seconds(5)), None);
    }

    #[test]
    fn choosing_a_category_restarts_the_plan() {
        let mut wizard = open(Category::Provider);
        set(&mut wizard, FieldKey::BriefDescription, "Knee pain");
        wizard.handle_next().unwrap();
        wizard
            .dispatch(FormAction::SetCategory(Category::Service))
            .unwrap();
        assert_eq!(wizard.step(), WizardStep::Details { page: 0 });
        assert_eq!(wizard.total_pages(), 4);
        assert_eq!(wizard.form().brief_description, "Knee pain");
    }

    #[test]
    fn page_view_tracks_current_page() {
        let mut wizard = open(Category::Billing);
        assert!(wizard.handle_next().is_err());
        let view = wizard.page_view().unwrap();
        assert_eq!(view.page, PageId::Universal);
        assert_eq!(
            view.field(FieldKey::BriefDescription).unwrap().error,
            Some(FieldError::MissingBriefDescription)
        );
        assert_eq!(view.total, 4);

        set(&mut wizard, FieldKey::BriefDescription, "Bill");
        wizard.handle_next().unwrap();
        assert_eq!(wizard.page_view().unwrap().title, "Bill details");
        to_review(&mut wizard);
        assert!(wizard.page_view().is_none());
        assert_eq!(wizard.review_summary().sections.len(), 4);
    }

    #[test]
    fn payload_sent_to_gateway_excludes_other_categories() {
        let mut wizard = open(Category::Medication);
        set(&mut wizard, FieldKey::BriefDescription, "Refill");
        set(&mut wizard, FieldKey::MedicationName, "Metformin");
        set(&mut wizard, FieldKey::CareType, "specialist");
        wizard
            .dispatch(FormAction::toggle(FieldKey::ContactMethod, "phone"))
            .unwrap();
        to_review(&mut wizard);
        let gateway = ScriptedGateway::new(vec![Ok(receipt())]);
        wizard.handle_submit(&gateway, &clock()).unwrap();

        let seen = gateway.seen.lock().unwrap();
        let debug = format!("{:?}", seen[0]);
        assert!(debug.contains("Metformin"));
        assert!(!debug.contains("specialist"));
    }
}
