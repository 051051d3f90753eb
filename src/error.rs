//! Custom error types for the wizard engine
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions. Every operation in the engine returns a
//! typed result so validation failures, ownership violations and insufficient
//! funds can be told apart without inspecting messages.

use thiserror::Error;

use crate::models::Money;

/// The main error type for wizard operations
#[derive(Error, Debug)]
pub enum WizardError {
    /// Field-level validation failed; recoverable by editing the draft
    #[error("Validation error: {0}")]
    Validation(String),

    /// No acting user is available
    #[error("Authentication required: sign in before submitting")]
    AuthenticationRequired,

    /// An account, category or goal does not belong to the acting user
    #[error("{entity_type} is not owned by the current user: {identifier}")]
    Ownership {
        entity_type: &'static str,
        identifier: String,
    },

    /// Contribution would overdraw the source account
    #[error(
        "Insufficient funds in account '{account}': available {available}, required {required}"
    )]
    InsufficientFunds {
        account: String,
        available: Money,
        required: Money,
    },

    /// Budget amount outside the accepted range
    #[error("Range error: {0}")]
    Range(String),

    /// A remote operation (atomic update, create, listing) failed
    #[error("Remote operation failed: {0}")]
    Remote(String),

    /// A budget with the same name already exists
    #[error("A budget named '{0}' already exists")]
    DuplicateName(String),

    /// Unknown budget cadence
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    /// Unparseable month or date
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// The workflow was already chosen and is locked until reset
    #[error("Workflow already chosen; reset the wizard to change it")]
    WorkflowLocked,

    /// The wizard is busy submitting
    #[error("A submission is in progress")]
    SubmissionInProgress,

    /// Some writes were committed before a later step failed
    #[error("{committed} {identifier} was saved, but a later step failed: {source}")]
    PartiallyApplied {
        committed: &'static str,
        identifier: String,
        #[source]
        source: Box<WizardError>,
    },

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl WizardError {
    /// Create an ownership error for accounts
    pub fn invalid_account(identifier: impl Into<String>) -> Self {
        Self::Ownership {
            entity_type: "Account",
            identifier: identifier.into(),
        }
    }

    /// Create an ownership error for categories
    pub fn invalid_category(identifier: impl Into<String>) -> Self {
        Self::Ownership {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Create an ownership error for goals
    pub fn invalid_goal(identifier: impl Into<String>) -> Self {
        Self::Ownership {
            entity_type: "Goal",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for accounts
    pub fn account_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Account",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for goals
    pub fn goal_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Goal",
            identifier: identifier.into(),
        }
    }

    /// Wrap a failure that happened after `committed` was already written
    pub fn partially_applied(
        committed: &'static str,
        identifier: impl Into<String>,
        source: WizardError,
    ) -> Self {
        Self::PartiallyApplied {
            committed,
            identifier: identifier.into(),
            source: Box::new(source),
        }
    }

    /// The innermost error, looking through `PartiallyApplied`
    pub fn root_cause(&self) -> &WizardError {
        match self {
            Self::PartiallyApplied { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is an ownership error
    pub fn is_ownership(&self) -> bool {
        matches!(self, Self::Ownership { .. })
    }

    /// Check if this error, or its root cause, is an insufficient-funds error
    pub fn is_insufficient_funds(&self) -> bool {
        matches!(self.root_cause(), Self::InsufficientFunds { .. })
    }

    /// Check if some writes were already committed
    pub fn is_partially_applied(&self) -> bool {
        matches!(self, Self::PartiallyApplied { .. })
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for WizardError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for WizardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for wizard operations
pub type WizardResult<T> = Result<T, WizardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WizardError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_ownership_error() {
        let err = WizardError::invalid_account("Checking");
        assert_eq!(
            err.to_string(),
            "Account is not owned by the current user: Checking"
        );
        assert!(err.is_ownership());
    }

    #[test]
    fn test_insufficient_funds_error() {
        let err = WizardError::InsufficientFunds {
            account: "Savings".into(),
            available: Money::from_cents(40000),
            required: Money::from_cents(50000),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient funds in account 'Savings': available $400.00, required $500.00"
        );
        assert!(err.is_insufficient_funds());
    }

    #[test]
    fn test_partially_applied_root_cause() {
        let err = WizardError::partially_applied(
            "Transaction",
            "txn-1234abcd",
            WizardError::InsufficientFunds {
                account: "Savings".into(),
                available: Money::zero(),
                required: Money::from_cents(100),
            },
        );
        assert!(err.is_partially_applied());
        assert!(err.is_insufficient_funds());
        assert!(err.to_string().starts_with("Transaction txn-1234abcd was saved"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let wizard_err: WizardError = io_err.into();
        assert!(matches!(wizard_err, WizardError::Io(_)));
    }
}
