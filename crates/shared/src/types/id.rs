//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing an `AgentId` where a `ProductId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(ShopId, "Unique identifier for a shop.");
typed_id!(ProductId, "Unique identifier for a product.");
typed_id!(AgentId, "Unique identifier for a selling agent.");
typed_id!(UserId, "Unique identifier for a user (shop owner or staff).");
typed_id!(StockPoolId, "Unique identifier for a product stock pool.");
typed_id!(AssignmentId, "Unique identifier for a stock assignment record.");
typed_id!(ContractId, "Unique identifier for an installment contract.");
typed_id!(CustomerId, "Unique identifier for a customer.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_new_ids_are_unique() {
        let a = AssignmentId::new();
        let b = AssignmentId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_roundtrip_through_uuid() {
        let id = ContractId::new();
        let uuid = id.into_inner();
        assert_eq!(ContractId::from_uuid(uuid), id);
    }

    #[test]
    fn test_display_and_parse() {
        let id = ProductId::new();
        let parsed = ProductId::from_str(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(AgentId::from_str("not-a-uuid").is_err());
    }
}
