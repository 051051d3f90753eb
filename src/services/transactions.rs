//! Transaction creation with balance and goal side effects
//!
//! Writes happen strictly in order: transaction row, account balance, goal
//! progress. A failure stops the remaining steps; whatever was already
//! written stays written and the error says so.

use serde::{Deserialize, Serialize};

use super::backend::{Backend, GoalProgress};
use super::fallback::{apply_with_fallback, BalanceUpdate, GoalProgressUpdate};
use crate::error::{WizardError, WizardResult};
use crate::models::{Goal, Money, NewTransaction, Transaction, TransactionKind, UserId};
use crate::validation::parse_transaction_date;
use crate::wizard::draft::TransactionDraft;

/// Everything written for one transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub transaction: Transaction,
    /// Account balance after the update
    pub balance: Money,
    /// Goal progress after the update, when a goal was credited
    pub goal_progress: Option<GoalProgress>,
}

/// Create a transaction from a draft and apply its side effects
///
/// `goals` is the caller's listing of the user's goals; it is only used to
/// warn when a contribution overshoots what the goal still needs.
pub async fn create_transaction<B: Backend>(
    backend: &B,
    draft: &TransactionDraft,
    user_id: &UserId,
    goals: &[Goal],
) -> WizardResult<TransactionReceipt> {
    let account_id = draft
        .account_id
        .ok_or_else(|| WizardError::Validation("Select an account".into()))?;

    if !backend.validate_ownership(&account_id, user_id).await? {
        return Err(WizardError::invalid_account(account_id.to_string()));
    }

    let amount = draft.amount;
    if !amount.is_positive() {
        return Err(WizardError::Validation(
            "Amount must be greater than zero".into(),
        ));
    }
    if amount > Money::MAX_TRANSACTION {
        return Err(WizardError::Range(format!(
            "Amount must not exceed {}, got {}",
            Money::MAX_TRANSACTION,
            amount
        )));
    }
    let date = parse_transaction_date(&draft.date)
        .ok_or_else(|| WizardError::Validation(format!("Invalid date: {}", draft.date)))?;

    if draft.kind == TransactionKind::Contribution {
        let account = backend
            .fetch_accounts(user_id)
            .await?
            .into_iter()
            .find(|a| a.id == account_id)
            .ok_or_else(|| WizardError::invalid_account(account_id.to_string()))?;

        if amount > account.balance {
            return Err(WizardError::InsufficientFunds {
                account: account.name,
                available: account.balance,
                required: amount,
            });
        }
    }

    let record = NewTransaction::routed(
        *user_id,
        account_id,
        draft.kind,
        amount,
        date,
        draft.description.trim(),
        draft.category_id,
        draft.goal_id,
    );
    let transaction = backend.create_transaction(record).await?;
    tracing::info!(transaction = %transaction.id, kind = %transaction.kind, amount = %amount, "transaction created");

    let committed = |e: WizardError| {
        WizardError::partially_applied("Transaction", transaction.id.to_string(), e)
    };

    let balance = apply_with_fallback(&BalanceUpdate {
        backend,
        account_id,
        user_id: *user_id,
        kind: draft.kind,
        amount,
    })
    .await
    .map_err(committed)?;

    let goal_progress = match draft.goal_id {
        Some(goal_id) if draft.kind.advances_goal() => {
            if let Some(goal) = goals.iter().find(|g| g.id == goal_id) {
                if amount > goal.remaining() {
                    tracing::warn!(
                        goal = %goal.name,
                        remaining = %goal.remaining(),
                        amount = %amount,
                        "transaction exceeds what the goal still needs"
                    );
                }
            }

            let progress = apply_with_fallback(&GoalProgressUpdate {
                backend,
                goal_id,
                user_id: *user_id,
                amount,
            })
            .await
            .map_err(committed)?;
            Some(progress)
        }
        _ => None,
    };

    Ok(TransactionReceipt {
        transaction,
        balance,
        goal_progress,
    })
}
