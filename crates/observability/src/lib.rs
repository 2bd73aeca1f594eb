//! Process-wide tracing setup shared by the `stocksnap` binaries.

/// Install the default subscriber: JSON lines on stderr, `info` unless
/// `RUST_LOG` says otherwise.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::LogFormat::Json);
}

/// Subscriber construction (filters, output format).
pub mod tracing;

pub use crate::tracing::LogFormat;
