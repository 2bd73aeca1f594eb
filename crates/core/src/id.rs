//! Strongly-typed identifiers and their generators.
//!
//! Identifiers are opaque strings: snapshots written by older clients carry ids
//! such as `"1"` or `"auto-1700000000000-x1y2"`, and those must round-trip
//! untouched. Newly minted ids come from an [`IdGenerator`].

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of an inventory item (stable for the item's lifetime).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

/// Identifier of a single ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryEntryId(String);

macro_rules! impl_string_id {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Wrap an existing identifier. Rejects empty or whitespace-only input.
            pub fn parse(value: impl Into<String>) -> Result<Self, DomainError> {
                let value = value.into();
                if value.trim().is_empty() {
                    return Err(DomainError::invalid_id(format!("{}: empty", $name)));
                }
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }
    };
}

impl_string_id!(ItemId, "ItemId");
impl_string_id!(HistoryEntryId, "HistoryEntryId");

/// Source of fresh, process-unique identifiers.
///
/// Uniqueness must not depend on the clock: a reconciliation batch may mint
/// dozens of ids within the same millisecond.
pub trait IdGenerator {
    /// Produce the next raw identifier.
    fn next_raw(&mut self) -> String;

    fn item_id(&mut self) -> ItemId {
        ItemId(self.next_raw())
    }

    fn entry_id(&mut self) -> HistoryEntryId {
        HistoryEntryId(self.next_raw())
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for &mut G {
    fn next_raw(&mut self) -> String {
        (**self).next_raw()
    }
}

/// UUIDv7 (time-ordered) identifiers. The default for production use.
#[derive(Debug, Default, Copy, Clone)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_raw(&mut self) -> String {
        Uuid::now_v7().to_string()
    }
}

/// Namespace + monotonic counter: `"{namespace}-{n}"`.
///
/// Deterministic, so tests can assert on exact ids.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    namespace: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_raw(&mut self) -> String {
        let n = self.next;
        self.next += 1;
        format!("{}-{}", self.namespace, n)
    }
}
