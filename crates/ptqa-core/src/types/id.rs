//! Newtype wrappers for the identifiers of remote collection rows.
//!
//! Identifiers are opaque strings owned by the backend. Rows created
//! locally get a time-ordered UUIDv7 rendered without hyphens. Numeric
//! identifiers coming back from the backend are accepted and kept as text.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Macro to define a newtype ID wrapper around `String`.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Generate a fresh time-ordered identifier.
            pub fn generate() -> Self {
                Self(Uuid::now_v7().simple().to_string())
            }

            /// Return the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                string_or_number(deserializer).map(Self)
            }
        }
    };
}

define_id!(
    /// Identifier of a row in `users`.
    UserId
);
define_id!(
    /// Identifier of a row in `audit_logs`.
    AuditLogId
);
define_id!(
    /// Identifier of a row in `transactions`.
    TransactionId
);
define_id!(
    /// Identifier of a row in `students`.
    StudentId
);
define_id!(
    /// Identifier of a row in `student_bills`.
    BillId
);
define_id!(
    /// Identifier of a row in `fund_budgets`.
    BudgetId
);
define_id!(
    /// Identifier of a row in `fund_disbursements`.
    DisbursementId
);

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Signed(n) => n.to_string(),
        Raw::Unsigned(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique_and_hyphenless() {
        let a = BudgetId::generate();
        let b = BudgetId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
        assert!(!a.as_str().contains('-'));
    }

    #[test]
    fn test_numeric_ids_deserialize_as_text() {
        let id: UserId = serde_json::from_str("42").unwrap();
        assert_eq!(id.as_str(), "42");
        let id: UserId = serde_json::from_str("\"lq3x9\"").unwrap();
        assert_eq!(id.to_string(), "lq3x9");
    }
}
