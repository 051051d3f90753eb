//! Budget cadence representation
//!
//! A budget covers one, three or twelve calendar months starting at the first
//! day of its start month.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::WizardError;

/// How long a budget runs before it expires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BudgetCadence {
    /// One calendar month (default)
    #[default]
    Month,
    /// Three calendar months
    Quarter,
    /// Twelve calendar months
    Year,
}

impl BudgetCadence {
    /// Number of calendar months covered by one period
    pub const fn months(&self) -> u32 {
        match self {
            Self::Month => 1,
            Self::Quarter => 3,
            Self::Year => 12,
        }
    }

    /// Wire name as stored in records and drafts
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for BudgetCadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BudgetCadence {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "month" | "monthly" => Ok(Self::Month),
            "quarter" | "quarterly" => Ok(Self::Quarter),
            "year" | "yearly" | "annual" => Ok(Self::Year),
            other => Err(WizardError::InvalidPeriod(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_months() {
        assert_eq!(BudgetCadence::Month.months(), 1);
        assert_eq!(BudgetCadence::Quarter.months(), 3);
        assert_eq!(BudgetCadence::Year.months(), 12);
    }

    #[test]
    fn test_parse() {
        assert_eq!("month".parse::<BudgetCadence>().unwrap(), BudgetCadence::Month);
        assert_eq!("Quarterly".parse::<BudgetCadence>().unwrap(), BudgetCadence::Quarter);
        assert_eq!(" year ".parse::<BudgetCadence>().unwrap(), BudgetCadence::Year);
    }

    #[test]
    fn test_parse_unknown_is_invalid_period() {
        let err = "fortnight".parse::<BudgetCadence>().unwrap_err();
        assert!(matches!(err, WizardError::InvalidPeriod(ref p) if p == "fortnight"));
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&BudgetCadence::Quarter).unwrap();
        assert_eq!(json, "\"quarter\"");
        assert!(serde_json::from_str::<BudgetCadence>("\"weekly\"").is_err());
    }
}
