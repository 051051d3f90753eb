//! Strongly-typed ID wrappers for all entity types
//!
//! Using newtype wrappers prevents accidentally passing a goal ID where an
//! account ID is expected, which matters here because ownership checks are
//! made per entity type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Short prefixed form used in messages and audit entries
            pub fn short(&self) -> String {
                format!("{}{}", $display_prefix, &self.0.to_string()[..8])
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.short())
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(UserId, "usr-");
define_id!(AccountId, "acc-");
define_id!(BudgetId, "bud-");
define_id!(CategoryId, "cat-");
define_id!(GoalId, "goal-");
define_id!(TransactionId, "txn-");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        let id = AccountId::new();
        let display = format!("{}", id);
        assert!(display.starts_with("acc-"));
        assert_eq!(display.len(), 12);
    }

    #[test]
    fn test_id_parse_full_and_prefixed() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id: GoalId = uuid_str.parse().unwrap();
        assert_eq!(id.as_uuid().to_string(), uuid_str);

        let prefixed: GoalId = format!("goal-{}", uuid_str).parse().unwrap();
        assert_eq!(id, prefixed);
    }

    #[test]
    fn test_short_prefix_alone_is_not_an_id() {
        assert!("acc-550e8400".parse::<AccountId>().is_err());
    }

    #[test]
    fn test_id_serialization() {
        let id = BudgetId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: BudgetId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
