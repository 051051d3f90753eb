//! Workflow executor
//!
//! Turns a finished wizard state into ordered writes against the backend.
//! Budget-first creates the budget and then, optionally, an expense against
//! it. Transaction-first creates the transaction and then, optionally, an
//! auto budget for its category. Every remote call is awaited before the
//! next one starts.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::backend::{Backend, GoalProgress};
use super::naming::{has_collision, resolve_unique_name, sanitize_budget_name};
use super::period::{end_date_for, parse_start_month};
use super::transactions::{create_transaction, TransactionReceipt};
use crate::error::{WizardError, WizardResult};
use crate::models::{
    Account, Budget, BudgetStatus, Category, CategoryId, Goal, Money, NewBudget, Transaction,
    TransactionKind, UserId,
};
use crate::validation::{validate_budget_data, validate_transaction_data};
use crate::wizard::draft::{BudgetDraft, TransactionDraft};
use crate::wizard::state::WizardState;
use crate::wizard::step::WorkflowType;

/// Listings and identity supplied by the surrounding application
#[derive(Debug, Clone)]
pub struct SubmissionContext {
    pub user_id: Option<UserId>,
    pub expense_categories: Vec<Category>,
    pub income_categories: Vec<Category>,
    pub accounts: Vec<Account>,
    pub goals: Vec<Goal>,
    pub today: NaiveDate,
}

impl SubmissionContext {
    fn owns_category(&self, kind: TransactionKind, id: &CategoryId) -> bool {
        let list = match kind {
            TransactionKind::Income => &self.income_categories,
            TransactionKind::Expense | TransactionKind::Contribution => &self.expense_categories,
        };
        list.iter().any(|c| c.id == *id)
    }
}

/// Cached data a caller must refresh after a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheScope {
    Budgets,
    Transactions,
    Accounts,
    Goals,
}

impl fmt::Display for CacheScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Budgets => write!(f, "budgets"),
            Self::Transactions => write!(f, "transactions"),
            Self::Accounts => write!(f, "accounts"),
            Self::Goals => write!(f, "goals"),
        }
    }
}

/// What a successful submission wrote
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowOutcome {
    pub budget: Option<Budget>,
    pub transaction: Option<Transaction>,
    pub balance: Option<Money>,
    pub goal_progress: Option<GoalProgress>,
    /// Non-fatal problems, such as an optional record that was skipped
    pub warnings: Vec<String>,
    pub invalidated: BTreeSet<CacheScope>,
}

impl WorkflowOutcome {
    fn record_budget(&mut self, budget: Budget) {
        self.budget = Some(budget);
        self.invalidated.insert(CacheScope::Budgets);
    }

    fn record_receipt(&mut self, receipt: TransactionReceipt) {
        self.transaction = Some(receipt.transaction);
        self.balance = Some(receipt.balance);
        self.invalidated.insert(CacheScope::Transactions);
        self.invalidated.insert(CacheScope::Accounts);
        // Expenses can land in a budget's category, so budget views go stale too
        self.invalidated.insert(CacheScope::Budgets);
        if let Some(progress) = receipt.goal_progress {
            self.goal_progress = Some(progress);
            self.invalidated.insert(CacheScope::Goals);
        }
    }
}

/// Runs one workflow against a backend
pub struct WorkflowExecutor<'a, B> {
    backend: &'a B,
}

impl<'a, B: Backend> WorkflowExecutor<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Execute the workflow chosen in `state`
    pub async fn execute(
        &self,
        state: &WizardState,
        ctx: &SubmissionContext,
    ) -> WizardResult<WorkflowOutcome> {
        let user_id = ctx.user_id.ok_or(WizardError::AuthenticationRequired)?;
        let workflow = state.workflow_type().ok_or_else(|| {
            WizardError::Validation("Choose a workflow before submitting".into())
        })?;

        tracing::debug!(%workflow, user = %user_id, "executing workflow");
        match workflow {
            WorkflowType::BudgetFirst => self.budget_first(state, ctx, &user_id).await,
            WorkflowType::TransactionFirst => self.transaction_first(state, ctx, &user_id).await,
        }
    }

    async fn budget_first(
        &self,
        state: &WizardState,
        ctx: &SubmissionContext,
        user_id: &UserId,
    ) -> WizardResult<WorkflowOutcome> {
        let draft = &state.budget_draft;
        validate_budget_data(draft).into_result()?;
        let record = build_budget_record(draft)?;

        if !ctx.expense_categories.iter().any(|c| c.id == record.category_id) {
            return Err(WizardError::invalid_category(record.category_id.to_string()));
        }

        let existing = self.backend.list_budgets(user_id).await?;
        if has_collision(&record.name, existing.iter().map(|b| b.name.as_str())) {
            let warning = WizardError::DuplicateName(record.name.clone());
            tracing::warn!(%warning, "creating budget anyway");
        }

        let budget = self.backend.create_budget(record, user_id).await?;
        tracing::info!(budget = %budget.id, name = %budget.name, "budget created");

        let mut outcome = WorkflowOutcome::default();
        let budget_id = budget.id;
        let category_id = budget.category_id;
        outcome.record_budget(budget);

        if !state.transaction_draft.amount.is_positive() {
            return Ok(outcome);
        }

        let mut txn = state.transaction_draft.clone();
        txn.kind = TransactionKind::Expense;
        if txn.category_id.is_none() {
            txn.category_id = Some(category_id);
        }

        let errors = validate_transaction_data(&txn);
        if !errors.is_empty() {
            tracing::warn!(%errors, "skipping transaction after budget creation");
            outcome
                .warnings
                .push(format!("Transaction was not created: {}", errors));
            return Ok(outcome);
        }

        let receipt = async {
            check_transaction_ownership(&txn, ctx)?;
            create_transaction(self.backend, &txn, user_id, &ctx.goals).await
        }
        .await
        .map_err(|e| WizardError::partially_applied("Budget", budget_id.to_string(), e))?;
        outcome.record_receipt(receipt);

        Ok(outcome)
    }

    async fn transaction_first(
        &self,
        state: &WizardState,
        ctx: &SubmissionContext,
        user_id: &UserId,
    ) -> WizardResult<WorkflowOutcome> {
        let draft = &state.transaction_draft;
        validate_transaction_data(draft).into_result()?;
        check_transaction_ownership(draft, ctx)?;

        let receipt = create_transaction(self.backend, draft, user_id, &ctx.goals).await?;
        let category_id = receipt.transaction.category_id();

        let mut outcome = WorkflowOutcome::default();
        outcome.record_receipt(receipt);

        if !state.budget_draft.is_populated() {
            return Ok(outcome);
        }

        let mut budget_draft = state.budget_draft.clone();
        if budget_draft.category_id.is_none() {
            budget_draft.category_id = category_id;
        }

        match self.create_auto_budget(&budget_draft, ctx, user_id).await {
            Ok(budget) => {
                tracing::info!(budget = %budget.id, name = %budget.name, "auto budget created");
                outcome.record_budget(budget);
            }
            Err(e) => {
                tracing::warn!(error = %e, "auto budget was not created");
                outcome
                    .warnings
                    .push(format!("Budget was not created: {}", e));
            }
        }

        Ok(outcome)
    }

    /// Create a budget, renaming it to the next free `"Name (N)"` on collision
    async fn create_auto_budget(
        &self,
        draft: &BudgetDraft,
        ctx: &SubmissionContext,
        user_id: &UserId,
    ) -> WizardResult<Budget> {
        validate_budget_data(draft).into_result()?;
        let mut record = build_budget_record(draft)?;

        if !ctx.expense_categories.iter().any(|c| c.id == record.category_id) {
            return Err(WizardError::invalid_category(record.category_id.to_string()));
        }

        let existing = self.backend.list_budgets(user_id).await?;
        let names: Vec<&str> = existing.iter().map(|b| b.name.as_str()).collect();
        let unique = resolve_unique_name(&record.name, &names);
        if unique != record.name {
            tracing::info!(requested = %record.name, used = %unique, "renamed auto budget");
            record.name = unique;
        }

        self.backend.create_budget(record, user_id).await
    }
}

/// Check the draft's references against the supplied listings
fn check_transaction_ownership(draft: &TransactionDraft, ctx: &SubmissionContext) -> WizardResult<()> {
    if let Some(category_id) = &draft.category_id {
        if !ctx.owns_category(draft.kind, category_id) {
            return Err(WizardError::invalid_category(category_id.to_string()));
        }
    }

    if let Some(account_id) = &draft.account_id {
        if !ctx.accounts.iter().any(|a| a.id == *account_id) {
            return Err(WizardError::invalid_account(account_id.to_string()));
        }
    }

    if let Some(goal_id) = &draft.goal_id {
        if !ctx.goals.iter().any(|g| g.id == *goal_id) {
            return Err(WizardError::invalid_goal(goal_id.to_string()));
        }
    }

    Ok(())
}

/// Build the budget record that will be written
///
/// Runs before any remote call so range and date problems never leave
/// partial writes behind.
pub fn build_budget_record(draft: &BudgetDraft) -> WizardResult<NewBudget> {
    let name = sanitize_budget_name(&draft.budget_name);
    if name.is_empty() {
        return Err(WizardError::Validation("Budget name is required".into()));
    }

    let category_id = draft
        .category_id
        .ok_or_else(|| WizardError::Validation("Select a category for this budget".into()))?;

    if draft.amount < Money::MIN_BUDGET || draft.amount > Money::MAX_BUDGET {
        return Err(WizardError::Range(format!(
            "Budget amount must be between {} and {}, got {}",
            Money::MIN_BUDGET,
            Money::MAX_BUDGET,
            draft.amount
        )));
    }

    let start_date = parse_start_month(&draft.start_date)?;
    let end_date = end_date_for(start_date, draft.period)?;

    Ok(NewBudget {
        name,
        category_id,
        amount: draft.amount,
        spent: Money::zero(),
        period: draft.period,
        start_date,
        end_date,
        alert_threshold: draft.alert_threshold,
        status: BudgetStatus::Active,
    })
}
