//! Wizard steps, workflows and progress

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::WizardError;

/// One screen of the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    WorkflowChoice,
    BudgetConfig,
    TransactionSetup,
    TransactionCreate,
    TransactionReview,
    FinalConfirmation,
}

impl WizardStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WorkflowChoice => "workflow_choice",
            Self::BudgetConfig => "budget_config",
            Self::TransactionSetup => "transaction_setup",
            Self::TransactionCreate => "transaction_create",
            Self::TransactionReview => "transaction_review",
            Self::FinalConfirmation => "final_confirmation",
        }
    }

    /// Progress shown for this step under `workflow`
    ///
    /// Table driven: the first step of each workflow only counts as 50% when
    /// it belongs to the workflow actually chosen.
    pub fn progress(&self, workflow: Option<WorkflowType>) -> u8 {
        match self {
            Self::WorkflowChoice => 25,
            Self::BudgetConfig if workflow == Some(WorkflowType::BudgetFirst) => 50,
            Self::BudgetConfig => 25,
            Self::TransactionSetup if workflow == Some(WorkflowType::TransactionFirst) => 50,
            Self::TransactionSetup => 25,
            Self::TransactionCreate | Self::TransactionReview => 75,
            Self::FinalConfirmation => 100,
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WizardStep {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "workflow_choice" => Ok(Self::WorkflowChoice),
            "budget_config" => Ok(Self::BudgetConfig),
            "transaction_setup" => Ok(Self::TransactionSetup),
            "transaction_create" => Ok(Self::TransactionCreate),
            "transaction_review" => Ok(Self::TransactionReview),
            "final_confirmation" => Ok(Self::FinalConfirmation),
            other => Err(WizardError::Validation(format!("Unknown step: {}", other))),
        }
    }
}

/// Order in which the budget and transaction are created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowType {
    BudgetFirst,
    TransactionFirst,
}

impl WorkflowType {
    /// Steps visited by this workflow, in order
    pub fn sequence(&self) -> &'static [WizardStep] {
        match self {
            Self::BudgetFirst => &[
                WizardStep::WorkflowChoice,
                WizardStep::BudgetConfig,
                WizardStep::TransactionCreate,
                WizardStep::FinalConfirmation,
            ],
            Self::TransactionFirst => &[
                WizardStep::WorkflowChoice,
                WizardStep::TransactionSetup,
                WizardStep::TransactionReview,
                WizardStep::FinalConfirmation,
            ],
        }
    }

    /// Step the wizard jumps to once this workflow is chosen
    pub fn entry_step(&self) -> WizardStep {
        self.sequence()[1]
    }

    /// Step after `step`, if any
    pub fn step_after(&self, step: WizardStep) -> Option<WizardStep> {
        let seq = self.sequence();
        seq.iter()
            .position(|s| *s == step)
            .and_then(|i| seq.get(i + 1))
            .copied()
    }

    /// Step before `step`, if any
    pub fn step_before(&self, step: WizardStep) -> Option<WizardStep> {
        let seq = self.sequence();
        seq.iter()
            .position(|s| *s == step)
            .and_then(|i| i.checked_sub(1))
            .map(|i| seq[i])
    }
}

impl fmt::Display for WorkflowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BudgetFirst => write!(f, "budget first"),
            Self::TransactionFirst => write!(f, "transaction first"),
        }
    }
}

impl FromStr for WorkflowType {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "budget_first" | "budget" => Ok(Self::BudgetFirst),
            "transaction_first" | "transaction" => Ok(Self::TransactionFirst),
            other => Err(WizardError::Validation(format!(
                "Unknown workflow: {}",
                other
            ))),
        }
    }
}

/// How much guidance the user asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl FromStr for ExperienceLevel {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            other => Err(WizardError::Validation(format!(
                "Unknown experience level: {}",
                other
            ))),
        }
    }
}

/// The workflow the user picked on the first screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowChoice {
    pub workflow_type: WorkflowType,
    pub experience_level: ExperienceLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_table() {
        let tf = Some(WorkflowType::TransactionFirst);
        let bf = Some(WorkflowType::BudgetFirst);

        assert_eq!(WizardStep::WorkflowChoice.progress(None), 25);
        assert_eq!(WizardStep::TransactionSetup.progress(tf), 50);
        assert_eq!(WizardStep::TransactionSetup.progress(bf), 25);
        assert_eq!(WizardStep::BudgetConfig.progress(bf), 50);
        assert_eq!(WizardStep::BudgetConfig.progress(tf), 25);
        assert_eq!(WizardStep::TransactionCreate.progress(bf), 75);
        assert_eq!(WizardStep::TransactionReview.progress(tf), 75);
        assert_eq!(WizardStep::FinalConfirmation.progress(None), 100);
    }

    #[test]
    fn test_sequence_walk() {
        let wf = WorkflowType::BudgetFirst;
        assert_eq!(wf.entry_step(), WizardStep::BudgetConfig);
        assert_eq!(
            wf.step_after(WizardStep::BudgetConfig),
            Some(WizardStep::TransactionCreate)
        );
        assert_eq!(wf.step_after(WizardStep::FinalConfirmation), None);
        assert_eq!(wf.step_before(WizardStep::WorkflowChoice), None);
        // A step outside the workflow has no neighbours
        assert_eq!(wf.step_after(WizardStep::TransactionReview), None);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(
            "transaction-first".parse::<WorkflowType>().unwrap(),
            WorkflowType::TransactionFirst
        );
        assert_eq!(
            "final_confirmation".parse::<WizardStep>().unwrap(),
            WizardStep::FinalConfirmation
        );
        assert!("sideways".parse::<WizardStep>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&WizardStep::TransactionSetup).unwrap();
        assert_eq!(json, "\"transaction_setup\"");
    }
}
