//! Millisecond clock used to stamp ledger entries.
//!
//! Reconciliation reads the clock exactly once per batch, so everything else
//! in the domain stays a pure function of its inputs.

use chrono::Utc;

/// Source of "now" as epoch milliseconds.
pub trait Clock {
    fn now_millis(&self) -> i64;
}

/// Wall clock (UTC).
#[derive(Debug, Default, Copy, Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A clock frozen at a fixed instant. Prefer this in tests for determinism.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_millis(&self) -> i64 {
        (**self).now_millis()
    }
}
