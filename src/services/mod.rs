//! Service layer for the wizard engine
//!
//! Pure calculations (periods, impact, naming) plus the write orchestration
//! that runs against the collaborator traits in `backend`.

pub mod backend;
pub mod executor;
pub mod fallback;
pub mod impact;
pub mod naming;
pub mod period;
pub mod transactions;

#[cfg(test)]
pub(crate) mod test_support;

pub use backend::{AccountBackend, Backend, BudgetBackend, GoalBackend, GoalProgress, TransactionBackend};
pub use executor::{CacheScope, SubmissionContext, WorkflowExecutor, WorkflowOutcome};
pub use impact::{calculate_impact, BudgetWarning, ImpactConfig};
pub use transactions::{create_transaction, TransactionReceipt};
