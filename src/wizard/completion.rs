//! What happens when the wizard is finished

use std::fmt;

use super::state::WizardState;
use crate::services::executor::WorkflowOutcome;

/// Completion behaviour, chosen once when the wizard is built
pub enum Completion {
    /// Run the workflow executor, then report its outcome
    Execute(Box<dyn FnMut(&WorkflowOutcome) + Send>),
    /// Give the finished state to the caller without writing anything
    Handoff(Box<dyn FnMut(&WizardState) + Send>),
}

impl Completion {
    /// Execute and ignore the outcome
    pub fn execute() -> Self {
        Self::Execute(Box::new(|_| {}))
    }

    pub fn on_outcome(callback: impl FnMut(&WorkflowOutcome) + Send + 'static) -> Self {
        Self::Execute(Box::new(callback))
    }

    pub fn handoff(callback: impl FnMut(&WizardState) + Send + 'static) -> Self {
        Self::Handoff(Box::new(callback))
    }

    pub fn writes(&self) -> bool {
        matches!(self, Self::Execute(_))
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Execute(_) => f.write_str("Completion::Execute"),
            Self::Handoff(_) => f.write_str("Completion::Handoff"),
        }
    }
}
