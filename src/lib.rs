//! envelope-wizard - guided budget and transaction creation
//!
//! This library implements a multi-step wizard that creates a budget and/or
//! a transaction in one of two orders, and keeps the budget, transaction,
//! account balance and goal progress records consistent even though they are
//! written one after another.
//!
//! # Architecture
//!
//! - `wizard`: the step state machine, drafts, and completion handling
//! - `validation`: field-level checks on drafts
//! - `services`: period arithmetic, impact warnings, name handling, and the
//!   workflow executor that performs the ordered writes
//! - `storage`: the draft store and a JSON ledger implementing the
//!   collaborator traits
//! - `audit`: JSONL log of ledger writes
//! - `config`: paths and settings
//! - `cli`: command handlers for the `envelope-wizard` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use envelope_wizard::storage::{JsonDraftStore, Ledger};
//! use envelope_wizard::wizard::{Completion, ExperienceLevel, Wizard, WorkflowType};
//!
//! let mut wizard = Wizard::open(JsonDraftStore::open(paths.drafts_file()), Completion::execute());
//! wizard.choose_workflow(WorkflowType::BudgetFirst, ExperienceLevel::Beginner, None)?;
//! let outcome = wizard.submit(&ledger, &ctx).await?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;
pub mod validation;
pub mod wizard;

pub use error::{WizardError, WizardResult};
