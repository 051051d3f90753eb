//! Collaborator interfaces consumed by the workflow executor
//!
//! The executor never touches storage directly; it talks to these traits and
//! awaits every call in order. `storage::ledger::Ledger` implements them over
//! JSON files, tests implement them in memory.

#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WizardResult;
use crate::models::{
    Account, AccountId, Budget, Goal, GoalId, GoalStatus, Money, NewBudget, NewTransaction,
    Transaction, UserId,
};

/// Goal progress after an update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub goal_id: GoalId,
    pub current_amount: Money,
    pub status: GoalStatus,
}

/// Budget listing and creation
pub trait BudgetBackend {
    /// All budgets owned by `user_id`
    async fn list_budgets(&self, user_id: &UserId) -> WizardResult<Vec<Budget>>;

    /// Persist a new budget for `user_id`
    async fn create_budget(&self, record: NewBudget, user_id: &UserId) -> WizardResult<Budget>;
}

/// Transaction creation
pub trait TransactionBackend {
    async fn create_transaction(&self, record: NewTransaction) -> WizardResult<Transaction>;
}

/// Account lookups and balance updates
pub trait AccountBackend {
    /// Accounts owned by `user_id`
    async fn fetch_accounts(&self, user_id: &UserId) -> WizardResult<Vec<Account>>;

    /// Whether `account_id` exists and belongs to `user_id`
    async fn validate_ownership(&self, account_id: &AccountId, user_id: &UserId)
        -> WizardResult<bool>;

    /// Apply `delta` to the balance in one remote step; returns the new balance
    async fn adjust_balance_atomic(&self, account_id: &AccountId, delta: Money)
        -> WizardResult<Money>;

    /// Read one account, scoped to both its id and owner
    async fn fetch_account_scoped(
        &self,
        account_id: &AccountId,
        user_id: &UserId,
    ) -> WizardResult<Option<Account>>;

    /// Overwrite the balance, scoped to both id and owner
    async fn write_balance_scoped(
        &self,
        account_id: &AccountId,
        user_id: &UserId,
        balance: Money,
        updated_at: DateTime<Utc>,
    ) -> WizardResult<Money>;
}

/// Goal progress updates
pub trait GoalBackend {
    /// Add `delta` to the goal's progress in one remote step
    async fn adjust_goal_atomic(&self, goal_id: &GoalId, delta: Money)
        -> WizardResult<GoalProgress>;

    /// Read one goal, scoped to both its id and owner
    async fn fetch_goal_scoped(
        &self,
        goal_id: &GoalId,
        user_id: &UserId,
    ) -> WizardResult<Option<Goal>>;

    /// Overwrite progress and status, scoped to both id and owner
    async fn write_goal_scoped(
        &self,
        goal_id: &GoalId,
        user_id: &UserId,
        current_amount: Money,
        status: GoalStatus,
        updated_at: DateTime<Utc>,
    ) -> WizardResult<GoalProgress>;
}

/// Everything the executor needs from the outside world
pub trait Backend: BudgetBackend + TransactionBackend + AccountBackend + GoalBackend {}

impl<T> Backend for T where T: BudgetBackend + TransactionBackend + AccountBackend + GoalBackend {}
