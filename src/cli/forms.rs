//! Terminal driver for the intake wizard.
//!
//! [`IntakeRunner`] owns the loop around a [`WizardController`]: it renders the
//! current page or review screen, asks an [`IntakeInteraction`] for the
//! member's answers, feeds them to the controller, and waits out the redirect
//! after a successful submission. Interactive prompts and script directives
//! are two implementations of the same interaction contract.

use std::{thread, time::Duration as StdDuration};

use intake_core::{
    CaseGateway, Clock, CoreError, FormAction, PageView, ReviewSummary, WizardController,
    WizardHost, WizardOptions, WizardStep,
};
use intake_domain::{CaseReceipt, Category, FormData};

use crate::cli::core::CommandError;
use crate::cli::io;
use crate::cli::views;

const REDIRECT_POLL_CAP: StdDuration = StdDuration::from_millis(100);

/// High-level lifecycle states emitted by the form runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormResult<T> {
    Completed(T),
    Cancelled,
}

/// What the member asked for after answering a details page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageCommand {
    Next,
    Skip,
    Back,
    Cancel,
}

/// Answers collected on one page, applied in order before `command` runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInput {
    pub actions: Vec<FormAction>,
    pub command: PageCommand,
}

impl PageInput {
    pub fn command(command: PageCommand) -> Self {
        Self {
            actions: Vec::new(),
            command,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewCommand {
    Submit,
    Edit,
    Back,
    Cancel,
}

/// Source of the member's answers.
pub trait IntakeInteraction {
    /// `None` abandons the request.
    fn pick_category(&mut self) -> Result<Option<Category>, CommandError>;

    fn prompt_page(
        &mut self,
        view: &PageView,
        form: &FormData,
    ) -> Result<PageInput, CommandError>;

    fn review(&mut self, summary: &ReviewSummary) -> Result<ReviewCommand, CommandError>;
}

/// Records what the wizard asked of the terminal.
#[derive(Debug, Default)]
pub struct TerminalHost {
    picker_requested: bool,
    closed: bool,
    route: Option<String>,
}

impl TerminalHost {
    fn take_picker_request(&mut self) -> bool {
        std::mem::take(&mut self.picker_requested)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }
}

impl WizardHost for TerminalHost {
    fn return_to_category_picker(&mut self) {
        self.picker_requested = true;
    }

    fn close(&mut self) {
        self.closed = true;
    }

    fn navigate(&mut self, route: &str) {
        self.route = Some(route.to_string());
    }
}

/// A submitted request and the route the wizard navigated to, if the
/// redirect fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeOutcome {
    pub receipt: CaseReceipt,
    pub route: Option<String>,
}

pub struct IntakeRunner<'a> {
    gateway: &'a dyn CaseGateway,
    clock: &'a dyn Clock,
    options: WizardOptions,
}

impl<'a> IntakeRunner<'a> {
    pub fn new(
        gateway: &'a dyn CaseGateway,
        clock: &'a dyn Clock,
        options: WizardOptions,
    ) -> Self {
        Self {
            gateway,
            clock,
            options,
        }
    }

    pub fn run<I: IntakeInteraction + ?Sized>(
        &self,
        interaction: &mut I,
        category: Category,
    ) -> Result<FormResult<IntakeOutcome>, CommandError> {
        let mut wizard = WizardController::open(category, self.options.clone());
        let mut host = TerminalHost::default();
        let mut submitted: Option<CaseReceipt> = None;
        io::print_info(format!("Starting a new request: {}.", category.label()));

        loop {
            match wizard.step() {
                WizardStep::Details { .. } => {
                    if !self.details_step(&mut wizard, &mut host, interaction)? {
                        return Ok(self.cancel(&mut wizard, &mut host));
                    }
                }
                WizardStep::Review => {
                    let summary = wizard.review_summary();
                    views::print_review(&summary, wizard.banner(), wizard.errors());
                    match interaction.review(&summary)? {
                        ReviewCommand::Submit => {
                            if let Some(receipt) = self.submit(&mut wizard)? {
                                submitted = Some(receipt);
                            }
                        }
                        ReviewCommand::Edit => {
                            wizard.handle_edit()?;
                        }
                        ReviewCommand::Back => {
                            wizard.handle_back(&mut host)?;
                        }
                        ReviewCommand::Cancel => return Ok(self.cancel(&mut wizard, &mut host)),
                    }
                }
                WizardStep::Confirmation { case_id } => {
                    if let Some(message) = wizard.confirmation_message() {
                        io::print_success(message);
                    }
                    let receipt = submitted.unwrap_or(CaseReceipt {
                        id: case_id,
                        created_at: self.clock.now(),
                    });
                    let route = self.await_redirect(&mut wizard, &mut host);
                    return Ok(FormResult::Completed(IntakeOutcome { receipt, route }));
                }
            }
        }
    }

    /// Runs one details page. Returns `false` when the request was abandoned.
    fn details_step<I: IntakeInteraction + ?Sized>(
        &self,
        wizard: &mut WizardController,
        host: &mut TerminalHost,
        interaction: &mut I,
    ) -> Result<bool, CommandError> {
        let view = wizard
            .page_view()
            .ok_or(CommandError::Core(CoreError::NoCategory))?;
        views::print_page(&view);

        let input = interaction.prompt_page(&view, wizard.form())?;
        for action in input.actions {
            if let Err(err) = wizard.dispatch(action) {
                io::print_warning(err);
            }
        }

        match input.command {
            PageCommand::Next | PageCommand::Skip => {
                let moved = if input.command == PageCommand::Skip {
                    wizard.handle_skip()
                } else {
                    wizard.handle_next()
                };
                match moved {
                    Ok(_) => {}
                    Err(CoreError::Validation(_)) => {
                        io::print_warning("Please complete the highlighted fields to continue.");
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            PageCommand::Back => {
                wizard.handle_back(host)?;
                if host.take_picker_request() {
                    io::print_info("Choose a different request type.");
                    match interaction.pick_category()? {
                        Some(category) => wizard.dispatch(FormAction::SetCategory(category))?,
                        None => return Ok(false),
                    }
                }
            }
            PageCommand::Cancel => return Ok(false),
        }
        Ok(true)
    }

    /// Submits from review. Failures leave the wizard on review and return `None`.
    fn submit(&self, wizard: &mut WizardController) -> Result<Option<CaseReceipt>, CommandError> {
        match wizard.handle_submit(self.gateway, self.clock) {
            Ok(receipt) => {
                tracing::info!(case_id = %receipt.id, "request submitted from terminal");
                Ok(Some(receipt))
            }
            Err(CoreError::Validation(_)) => {
                io::print_warning("Your request is missing required answers.");
                Ok(None)
            }
            Err(CoreError::Submission(err)) => {
                if err.is_retryable() {
                    io::print_detail("Nothing was saved. Submit again when ready.");
                }
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn cancel(
        &self,
        wizard: &mut WizardController,
        host: &mut TerminalHost,
    ) -> FormResult<IntakeOutcome> {
        wizard.dismiss(host);
        io::print_info("Request cancelled. Nothing was submitted.");
        FormResult::Cancelled
    }

    fn await_redirect(
        &self,
        wizard: &mut WizardController,
        host: &mut TerminalHost,
    ) -> Option<String> {
        loop {
            let now = self.clock.now();
            if let Some(route) = wizard.poll_redirect(now, host) {
                return Some(route);
            }
            let timer = wizard.pending_redirect()?;
            if !timer.is_pending() {
                return None;
            }
            let wait = (timer.due_at() - now)
                .to_std()
                .unwrap_or_default()
                .min(REDIRECT_POLL_CAP);
            thread::sleep(wait);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use chrono::{DateTime, TimeZone, Utc};
    use intake_core::SubmissionError;
    use intake_domain::{CasePayload, FieldKey};
    use uuid::Uuid;

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap())
    }

    #[derive(Default)]
    struct ScriptedGateway {
        failures: Mutex<VecDeque<SubmissionError>>,
        created: Mutex<Vec<CasePayload>>,
    }

    impl CaseGateway for ScriptedGateway {
        fn create_case(&self, payload: &CasePayload) -> Result<CaseReceipt, SubmissionError> {
            if let Some(failure) = self.failures.lock().unwrap().pop_front() {
                return Err(failure);
            }
            let mut created = self.created.lock().unwrap();
            created.push(payload.clone());
            Ok(CaseReceipt {
                id: Uuid::from_u128(created.len() as u128),
                created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            })
        }
    }

    #[derive(Default)]
    struct MockInteraction {
        pages: VecDeque<PageInput>,
        reviews: VecDeque<ReviewCommand>,
        categories: VecDeque<Option<Category>>,
        seen_pages: Vec<String>,
    }

    impl IntakeInteraction for MockInteraction {
        fn pick_category(&mut self) -> Result<Option<Category>, CommandError> {
            Ok(self.categories.pop_front().flatten())
        }

        fn prompt_page(
            &mut self,
            view: &PageView,
            _form: &FormData,
        ) -> Result<PageInput, CommandError> {
            self.seen_pages.push(view.title.to_string());
            Ok(self
                .pages
                .pop_front()
                .unwrap_or(PageInput::command(PageCommand::Cancel)))
        }

        fn review(&mut self, _summary: &ReviewSummary) -> Result<ReviewCommand, CommandError> {
            Ok(self.reviews.pop_front().unwrap_or(ReviewCommand::Cancel))
        }
    }

    fn answers(actions: Vec<FormAction>) -> PageInput {
        PageInput {
            actions,
            command: PageCommand::Next,
        }
    }

    fn immediate() -> WizardOptions {
        WizardOptions::with_redirect_delay_ms(0)
    }

    #[test]
    fn completes_and_follows_the_redirect() {
        let gateway = ScriptedGateway::default();
        let clock = clock();
        let runner = IntakeRunner::new(&gateway, &clock, immediate());
        let mut interaction = MockInteraction {
            pages: VecDeque::from(vec![
                answers(vec![FormAction::set_text(FieldKey::BriefDescription, "Deductible?")]),
                PageInput::command(PageCommand::Skip),
                answers(vec![FormAction::toggle(FieldKey::ContactMethod, "email")]),
            ]),
            reviews: VecDeque::from(vec![ReviewCommand::Submit]),
            ..Default::default()
        };

        let result = runner
            .run(&mut interaction, Category::Benefits)
            .expect("run");
        let FormResult::Completed(outcome) = result else {
            panic!("expected completion");
        };
        assert_eq!(outcome.receipt.id, Uuid::from_u128(1));
        assert_eq!(outcome.receipt.created_at, clock.now());
        assert_eq!(outcome.route, Some(format!("/cases/{}", Uuid::from_u128(1))));
        assert_eq!(interaction.seen_pages.len(), 3);
        assert_eq!(gateway.created.lock().unwrap().len(), 1);
    }

    #[test]
    fn blocked_pages_are_shown_again() {
        let gateway = ScriptedGateway::default();
        let clock = clock();
        let runner = IntakeRunner::new(&gateway, &clock, immediate());
        let mut interaction = MockInteraction {
            pages: VecDeque::from(vec![
                PageInput::command(PageCommand::Next),
                answers(vec![FormAction::set_text(FieldKey::BriefDescription, "   ")]),
            ]),
            ..Default::default()
        };

        let result = runner.run(&mut interaction, Category::Plan).expect("run");
        assert_eq!(result, FormResult::Cancelled);
        let first_page = interaction.seen_pages[0].clone();
        assert!(interaction.seen_pages.iter().all(|title| *title == first_page));
        assert_eq!(interaction.seen_pages.len(), 3);
        assert!(gateway.created.lock().unwrap().is_empty());
    }

    #[test]
    fn back_from_the_first_page_switches_category() {
        let gateway = ScriptedGateway::default();
        let clock = clock();
        let runner = IntakeRunner::new(&gateway, &clock, immediate());
        let mut interaction = MockInteraction {
            pages: VecDeque::from(vec![
                PageInput::command(PageCommand::Back),
                answers(vec![FormAction::set_text(FieldKey::BriefDescription, "Question")]),
                PageInput::command(PageCommand::Next),
                answers(vec![FormAction::toggle(FieldKey::ContactMethod, "phone")]),
            ]),
            reviews: VecDeque::from(vec![ReviewCommand::Submit]),
            categories: VecDeque::from(vec![Some(Category::Question)]),
            ..Default::default()
        };

        runner
            .run(&mut interaction, Category::Provider)
            .expect("run");
        let created = gateway.created.lock().unwrap();
        assert_eq!(created[0].category(), Category::Question);
    }

    #[test]
    fn failed_submissions_stay_on_review() {
        let gateway = ScriptedGateway::default();
        gateway
            .failures
            .lock()
            .unwrap()
            .push_back(SubmissionError::Network("offline".into()));
        let clock = clock();
        let runner = IntakeRunner::new(&gateway, &clock, immediate());
        let mut interaction = MockInteraction {
            pages: VecDeque::from(vec![
                answers(vec![
                    FormAction::set_text(FieldKey::BriefDescription, "Refill"),
                    FormAction::toggle(FieldKey::ContactMethod, "text"),
                ]),
                PageInput::command(PageCommand::Next),
                PageInput::command(PageCommand::Next),
                PageInput::command(PageCommand::Next),
            ]),
            reviews: VecDeque::from(vec![ReviewCommand::Submit, ReviewCommand::Submit]),
            ..Default::default()
        };

        let result = runner
            .run(&mut interaction, Category::Medication)
            .expect("run");
        assert!(matches!(result, FormResult::Completed(_)));
        assert_eq!(gateway.created.lock().unwrap().len(), 1);
        assert!(gateway.failures.lock().unwrap().is_empty());
    }

    #[test]
    fn cancelling_from_review_closes_the_host() {
        let gateway = ScriptedGateway::default();
        let clock = clock();
        let runner = IntakeRunner::new(&gateway, &clock, immediate());
        let mut interaction = MockInteraction {
            pages: VecDeque::from(vec![
                answers(vec![FormAction::set_text(FieldKey::BriefDescription, "Hi")]),
                PageInput::command(PageCommand::Next),
                PageInput::command(PageCommand::Next),
            ]),
            reviews: VecDeque::from(vec![ReviewCommand::Edit, ReviewCommand::Cancel]),
            ..Default::default()
        };

        let result = runner.run(&mut interaction, Category::Question).expect("run");
        assert_eq!(result, FormResult::Cancelled);
        assert_eq!(interaction.seen_pages.len(), 4);
        assert!(gateway.created.lock().unwrap().is_empty());
    }

    #[test]
    fn terminal_host_records_requests() {
        let mut host = TerminalHost::default();
        host.return_to_category_picker();
        host.navigate("/cases/abc");
        host.close();
        assert!(host.take_picker_request());
        assert!(!host.take_picker_request());
        assert!(host.is_closed());
        assert_eq!(host.route(), Some("/cases/abc"));
    }
}
