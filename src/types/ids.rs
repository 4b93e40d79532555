//! Strongly-typed identifiers.
//!
//! All IDs are validated at construction time and implement common traits.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to define a strongly-typed ID newtype wrapper.
///
/// Generates: struct, `from_string()`, `as_str()`, Display, Serialize, Deserialize.
/// Optionally generates `new()` (UUID v4) and `Default` if `uuid` flag is passed.
macro_rules! define_id {
    ($name:ident, uuid) => {
        define_id!($name);

        impl $name {
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
        pub struct $name(String);

        impl $name {
            pub fn from_string(s: String) -> Result<Self, &'static str> {
                if s.is_empty() {
                    return Err(concat!(stringify!($name), " cannot be empty"));
                }
                Ok(Self(s))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// Connected account a call acts on behalf of (`acct_...`).
define_id!(AccountId);
// Default customer bound to a session (`cus_...`).
define_id!(CustomerId);
define_id!(RequestId, uuid);
