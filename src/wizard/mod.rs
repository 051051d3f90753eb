//! Budget/transaction wizard
//!
//! The wizard walks the user through one of two workflows, keeps the drafts
//! they type, and hands the finished state to the workflow executor (or to
//! the caller, for a handoff completion). Every mutation is written to the
//! draft store so an interrupted wizard can be resumed.

pub mod completion;
pub mod draft;
pub mod state;
pub mod step;

use chrono::{Local, NaiveDate};

use crate::error::{WizardError, WizardResult};
use crate::models::{Budget, BudgetId, TransactionKind};
use crate::services::backend::Backend;
use crate::services::executor::{SubmissionContext, WorkflowExecutor, WorkflowOutcome};
use crate::services::impact::{calculate_impact, BudgetWarning, ImpactConfig};
use crate::services::period::default_start_month;
use crate::storage::draft_store::{keys, DraftStore};
use crate::validation::{
    parse_transaction_date, validate_budget_data, validate_transaction_data, ValidationErrors,
};

pub use completion::Completion;
pub use draft::{BudgetDraft, BudgetDraftPatch, TransactionDraft, TransactionDraftPatch};
pub use state::WizardState;
pub use step::{ExperienceLevel, WizardStep, WorkflowChoice, WorkflowType};

/// The wizard state machine
pub struct Wizard<S: DraftStore> {
    store: S,
    state: WizardState,
    completion: Completion,
    today: NaiveDate,
    budget_step_valid: bool,
    transaction_step_valid: bool,
}

impl<S: DraftStore> Wizard<S> {
    /// Open the wizard, resuming any drafts in `store`
    pub fn open(store: S, completion: Completion) -> Self {
        Self::open_at(store, Local::now().date_naive(), completion)
    }

    /// Open the wizard as of `today`
    pub fn open_at(store: S, today: NaiveDate, completion: Completion) -> Self {
        let mut state = WizardState::new(today);

        state.workflow_choice = store.load(keys::WORKFLOW_CHOICE, None::<WorkflowChoice>);
        state.allow_workflow_change = state.workflow_choice.is_none();
        state.budget_draft = store.load(keys::BUDGET_DRAFT, BudgetDraft::new(today));
        state.transaction_draft = store.load(keys::TRANSACTION_DRAFT, TransactionDraft::new(today));
        state.current_step = store.load(keys::CURRENT_STEP, WizardStep::WorkflowChoice);

        // A resumed draft never starts in a month that has already begun
        state.budget_draft.start_date = default_start_month(today);
        state.progress_percentage = state.current_step.progress(state.workflow_type());
        state.is_open = true;

        tracing::debug!(step = %state.current_step, resumed = !state.allow_workflow_change, "wizard opened");

        let mut wizard = Self {
            store,
            state,
            completion,
            today,
            budget_step_valid: false,
            transaction_step_valid: false,
        };
        wizard.refresh_budget_validity();
        wizard.refresh_transaction_validity();
        wizard.persist();
        wizard
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn is_budget_step_valid(&self) -> bool {
        self.budget_step_valid
    }

    pub fn is_transaction_step_valid(&self) -> bool {
        self.transaction_step_valid
    }

    /// Pick the workflow; locked until `reset`
    pub fn choose_workflow(
        &mut self,
        workflow_type: WorkflowType,
        experience_level: ExperienceLevel,
        reason: Option<String>,
    ) -> WizardResult<()> {
        if !self.state.allow_workflow_change {
            return Err(WizardError::WorkflowLocked);
        }

        self.state.workflow_choice = Some(WorkflowChoice {
            workflow_type,
            experience_level,
            reason,
        });
        self.state.allow_workflow_change = false;

        if workflow_type == WorkflowType::BudgetFirst {
            self.state.transaction_draft.kind = TransactionKind::Expense;
            self.refresh_transaction_validity();
        }

        tracing::info!(workflow = %workflow_type, "workflow chosen");
        self.navigate(workflow_type.entry_step());
        Ok(())
    }

    /// Jump to `target` unconditionally
    pub fn navigate(&mut self, target: WizardStep) {
        self.state.current_step = target;
        self.state.progress_percentage = target.progress(self.state.workflow_type());
        self.persist();
    }

    /// Move to the next step of the chosen workflow
    pub fn next(&mut self) -> WizardStep {
        let target = self
            .state
            .workflow_type()
            .and_then(|wf| wf.step_after(self.state.current_step))
            .unwrap_or(self.state.current_step);
        self.navigate(target);
        target
    }

    /// Move to the previous step of the chosen workflow
    pub fn back(&mut self) -> WizardStep {
        let target = self
            .state
            .workflow_type()
            .and_then(|wf| wf.step_before(self.state.current_step))
            .unwrap_or(self.state.current_step);
        self.navigate(target);
        target
    }

    pub fn update_budget_draft(&mut self, patch: BudgetDraftPatch) {
        if patch.is_empty() {
            return;
        }
        self.state.budget_draft.apply(patch);
        self.refresh_budget_validity();
        self.persist();
    }

    pub fn update_transaction_draft(&mut self, patch: TransactionDraftPatch) {
        if patch.is_empty() {
            return;
        }
        self.state.transaction_draft.apply(patch);
        if self.state.workflow_type() == Some(WorkflowType::BudgetFirst) {
            self.state.transaction_draft.kind = TransactionKind::Expense;
        }
        self.refresh_transaction_validity();
        self.persist();
    }

    /// Validate whatever the current step collects
    pub fn validate_current_step(&mut self) -> &ValidationErrors {
        let workflow = self.state.workflow_type();
        let mut errors = ValidationErrors::new();

        match self.state.current_step {
            WizardStep::WorkflowChoice => {
                if workflow.is_none() {
                    errors.insert("workflow", "Choose how you want to start");
                }
            }
            WizardStep::BudgetConfig => errors = validate_budget_data(&self.state.budget_draft),
            WizardStep::TransactionSetup | WizardStep::TransactionReview => {
                errors = validate_transaction_data(&self.state.transaction_draft)
            }
            WizardStep::TransactionCreate => {
                if let Some(draft) = self.budget_first_transaction() {
                    errors = validate_transaction_data(&draft);
                }
            }
            WizardStep::FinalConfirmation => match workflow {
                Some(WorkflowType::BudgetFirst) => {
                    errors = validate_budget_data(&self.state.budget_draft);
                    if let Some(draft) = self.budget_first_transaction() {
                        errors.extend(validate_transaction_data(&draft));
                    }
                }
                Some(WorkflowType::TransactionFirst) => {
                    errors = validate_transaction_data(&self.state.transaction_draft);
                    if self.state.budget_draft.is_populated() {
                        let mut budget = self.state.budget_draft.clone();
                        if budget.category_id.is_none() {
                            budget.category_id = self.state.transaction_draft.category_id;
                        }
                        errors.extend(validate_budget_data(&budget));
                    }
                }
                None => errors.insert("workflow", "Choose how you want to start"),
            },
        }

        self.state.validation_errors = errors;
        &self.state.validation_errors
    }

    /// Advisory warnings for the transaction being entered
    ///
    /// Uses `selected` when given, otherwise the budget whose category and
    /// coverage match the transaction. Only expenses count against a budget.
    pub fn impact_warnings(
        &self,
        budgets: &[Budget],
        selected: Option<&BudgetId>,
        today: NaiveDate,
        config: &ImpactConfig,
    ) -> Vec<BudgetWarning> {
        let draft = &self.state.transaction_draft;
        if draft.kind != TransactionKind::Expense || !draft.amount.is_positive() {
            return Vec::new();
        }

        let budget = match selected {
            Some(id) => budgets.iter().find(|b| b.id == *id),
            None => {
                let date = parse_transaction_date(&draft.date).unwrap_or(today);
                draft.category_id.and_then(|category_id| {
                    budgets
                        .iter()
                        .find(|b| b.category_id == category_id && b.covers(date))
                })
            }
        };

        budget
            .map(|b| calculate_impact(b, draft.amount, today, config))
            .unwrap_or_default()
    }

    /// Finish the wizard through its completion handler
    ///
    /// On success the draft store is cleared and the wizard resets and
    /// closes. On failure the state and drafts are kept so the user can fix
    /// the problem and try again.
    pub async fn submit<B: Backend>(
        &mut self,
        backend: &B,
        ctx: &SubmissionContext,
    ) -> WizardResult<Option<WorkflowOutcome>> {
        if self.state.is_submitting {
            return Err(WizardError::SubmissionInProgress);
        }

        let outcome = if self.completion.writes() {
            self.state.is_submitting = true;
            let result = WorkflowExecutor::new(backend).execute(&self.state, ctx).await;
            self.state.is_submitting = false;

            let outcome = result.map_err(|e| {
                tracing::warn!(error = %e, "submission failed, keeping drafts");
                e
            })?;
            if let Completion::Execute(callback) = &mut self.completion {
                callback(&outcome);
            }
            Some(outcome)
        } else {
            let errors = {
                let previous = self.state.current_step;
                self.state.current_step = WizardStep::FinalConfirmation;
                let errors = self.validate_current_step().clone();
                self.state.current_step = previous;
                errors
            };
            errors.into_result()?;

            if let Completion::Handoff(callback) = &mut self.completion {
                callback(&self.state);
            }
            None
        };

        self.reset();
        self.state.is_open = false;
        Ok(outcome)
    }

    /// Close the wizard, keeping drafts for next time
    pub fn close(&mut self) -> WizardResult<()> {
        if self.state.is_submitting {
            return Err(WizardError::SubmissionInProgress);
        }
        self.state.is_open = false;
        self.persist();
        Ok(())
    }

    /// Drop all drafts and unlock the workflow choice
    pub fn reset(&mut self) {
        let is_open = self.state.is_open;
        self.state = WizardState::new(self.today);
        self.state.is_open = is_open;
        self.refresh_budget_validity();
        self.refresh_transaction_validity();
        self.store.clear_all();
        tracing::debug!("wizard reset");
    }

    /// The transaction draft as the budget-first path will submit it, if any
    fn budget_first_transaction(&self) -> Option<TransactionDraft> {
        let draft = &self.state.transaction_draft;
        if !draft.amount.is_positive() {
            return None;
        }
        let mut draft = draft.clone();
        draft.kind = TransactionKind::Expense;
        if draft.category_id.is_none() {
            draft.category_id = self.state.budget_draft.category_id;
        }
        Some(draft)
    }

    fn refresh_budget_validity(&mut self) {
        self.budget_step_valid = validate_budget_data(&self.state.budget_draft).is_empty();
    }

    fn refresh_transaction_validity(&mut self) {
        self.transaction_step_valid =
            validate_transaction_data(&self.state.transaction_draft).is_empty();
    }

    fn persist(&mut self) {
        self.store.save(keys::MODAL_STATE, &self.state.is_open);
        self.store.save(keys::WORKFLOW_CHOICE, &self.state.workflow_choice);
        self.store.save(keys::BUDGET_DRAFT, &self.state.budget_draft);
        self.store.save(keys::TRANSACTION_DRAFT, &self.state.transaction_draft);
        self.store.save(keys::CURRENT_STEP, &self.state.current_step);
    }
}
