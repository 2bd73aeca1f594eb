//! `stocksnap-core`: identifiers, clock and domain error shared by the other crates.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers and their generators, a millisecond clock, and the domain error.

pub mod clock;
pub mod error;
pub mod id;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{DomainError, DomainResult};
pub use id::{HistoryEntryId, IdGenerator, ItemId, SequentialIds, UuidIds};
