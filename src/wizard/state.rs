//! Wizard state snapshot

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::draft::{BudgetDraft, TransactionDraft};
use super::step::{WizardStep, WorkflowChoice, WorkflowType};
use crate::validation::ValidationErrors;

/// Everything the wizard knows at one moment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardState {
    pub current_step: WizardStep,
    pub workflow_choice: Option<WorkflowChoice>,
    /// False once a workflow has been chosen, until reset
    pub allow_workflow_change: bool,
    pub budget_draft: BudgetDraft,
    pub transaction_draft: TransactionDraft,
    /// Errors from the most recent validation of the current step
    pub validation_errors: ValidationErrors,
    pub is_submitting: bool,
    pub progress_percentage: u8,
    pub is_open: bool,
}

impl WizardState {
    /// Initial state for a wizard opened on `today`
    pub fn new(today: NaiveDate) -> Self {
        Self {
            current_step: WizardStep::WorkflowChoice,
            workflow_choice: None,
            allow_workflow_change: true,
            budget_draft: BudgetDraft::new(today),
            transaction_draft: TransactionDraft::new(today),
            validation_errors: ValidationErrors::new(),
            is_submitting: false,
            progress_percentage: WizardStep::WorkflowChoice.progress(None),
            is_open: false,
        }
    }

    pub fn workflow_type(&self) -> Option<WorkflowType> {
        self.workflow_choice.as_ref().map(|c| c.workflow_type)
    }
}
