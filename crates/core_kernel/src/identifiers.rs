//! Identifiers of catalog and scoring records
//!
//! Each record kind has its own UUID newtype, displayed with a short kind
//! prefix (`AST-0190…`). Parsing accepts the prefixed form or a bare UUID,
//! and rejects an id carrying another kind's prefix.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::CoreError;

/// Splits `KIND-uuid` into its prefix and UUID text; bare UUIDs have no prefix
fn split_prefixed(s: &str) -> (Option<&str>, &str) {
    match s.split_once('-') {
        Some((head, rest)) if head.len() == 3 && head.chars().all(|c| c.is_ascii_uppercase()) => {
            (Some(head), rest)
        }
        _ => (None, s),
    }
}

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident => $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Random identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Time-ordered identifier; records created later sort later
            pub fn new_v7() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            pub fn prefix() -> &'static str {
                $prefix
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let (prefix, rest) = split_prefixed(s.trim());
                if let Some(found) = prefix {
                    if found != $prefix {
                        return Err(CoreError::invalid_identifier(format!(
                            "expected a {} id, got {}",
                            $prefix, s
                        )));
                    }
                }
                Uuid::parse_str(rest)
                    .map(Self)
                    .map_err(|e| CoreError::invalid_identifier(format!("{s}: {e}")))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }
    };
}

record_id!(
    /// A cataloged data asset
    AssetId => "AST"
);
record_id!(TagId => "TAG");
record_id!(
    /// A directed lineage edge between two assets
    LineageEdgeId => "LIN"
);
record_id!(
    /// One persisted scoring of a claim
    ScoredClaimId => "SCL"
);
record_id!(UserId => "USR");
