//! Atomic update with read-modify-write fallback
//!
//! Balance and goal updates first try a single remote adjustment. When that
//! fails, the same change is applied by reading the record (scoped to its
//! owner), computing the new value locally and writing it back. The guards
//! are re-applied on the fallback path because its starting value may differ
//! from what the caller checked.

#![allow(async_fn_in_trait)]

use chrono::Utc;

use super::backend::{AccountBackend, GoalBackend, GoalProgress};
use crate::error::{WizardError, WizardResult};
use crate::models::{AccountId, GoalId, GoalStatus, Money, TransactionKind, UserId};

/// One update that can be applied atomically or by read-modify-write
pub trait AtomicUpdate {
    type Output;

    /// Entity name used in logs
    fn entity(&self) -> &'static str;

    async fn atomic(&self) -> WizardResult<Self::Output>;

    async fn read_modify_write(&self) -> WizardResult<Self::Output>;
}

/// Try the atomic path, falling back to read-modify-write on any failure
pub async fn apply_with_fallback<U: AtomicUpdate>(update: &U) -> WizardResult<U::Output> {
    match update.atomic().await {
        Ok(output) => Ok(output),
        Err(e) => {
            tracing::warn!(
                entity = update.entity(),
                error = %e,
                "atomic update failed, falling back to read-modify-write"
            );
            update.read_modify_write().await
        }
    }
}

/// Account balance change caused by one transaction
pub struct BalanceUpdate<'a, A> {
    pub backend: &'a A,
    pub account_id: AccountId,
    pub user_id: UserId,
    pub kind: TransactionKind,
    pub amount: Money,
}

impl<A: AccountBackend> AtomicUpdate for BalanceUpdate<'_, A> {
    type Output = Money;

    fn entity(&self) -> &'static str {
        "account"
    }

    async fn atomic(&self) -> WizardResult<Money> {
        self.backend
            .adjust_balance_atomic(&self.account_id, self.kind.balance_delta(self.amount))
            .await
    }

    async fn read_modify_write(&self) -> WizardResult<Money> {
        let account = self
            .backend
            .fetch_account_scoped(&self.account_id, &self.user_id)
            .await?
            .ok_or_else(|| WizardError::invalid_account(self.account_id.to_string()))?;

        let new_balance = account
            .balance
            .checked_add(self.kind.balance_delta(self.amount))
            .ok_or_else(|| {
                WizardError::Range(format!("Balance of '{}' would overflow", account.name))
            })?;
        if self.kind == TransactionKind::Contribution && new_balance.is_negative() {
            return Err(WizardError::InsufficientFunds {
                account: account.name,
                available: account.balance,
                required: self.amount,
            });
        }

        self.backend
            .write_balance_scoped(&self.account_id, &self.user_id, new_balance, Utc::now())
            .await
    }
}

/// Goal progress change caused by one transaction
pub struct GoalProgressUpdate<'a, G> {
    pub backend: &'a G,
    pub goal_id: GoalId,
    pub user_id: UserId,
    pub amount: Money,
}

impl<G: GoalBackend> AtomicUpdate for GoalProgressUpdate<'_, G> {
    type Output = GoalProgress;

    fn entity(&self) -> &'static str {
        "goal"
    }

    async fn atomic(&self) -> WizardResult<GoalProgress> {
        self.backend.adjust_goal_atomic(&self.goal_id, self.amount).await
    }

    async fn read_modify_write(&self) -> WizardResult<GoalProgress> {
        let goal = self
            .backend
            .fetch_goal_scoped(&self.goal_id, &self.user_id)
            .await?
            .ok_or_else(|| WizardError::invalid_goal(self.goal_id.to_string()))?;

        let new_amount = goal.current_amount.checked_add(self.amount).ok_or_else(|| {
            WizardError::Range(format!("Progress of goal '{}' would overflow", goal.name))
        })?;
        if new_amount.is_negative() {
            return Err(WizardError::Validation(format!(
                "Goal '{}' progress cannot go below zero",
                goal.name
            )));
        }

        let status = GoalStatus::for_progress(new_amount, goal.target_amount);
        self.backend
            .write_goal_scoped(&self.goal_id, &self.user_id, new_amount, status, Utc::now())
            .await
    }
}
