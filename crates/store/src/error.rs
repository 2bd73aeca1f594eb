use thiserror::Error;

/// Local persistence failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("stored snapshot is corrupt: {0}")]
    Corrupt(String),

    #[error("failed to serialize snapshot: {0}")]
    Serialize(String),
}

impl StoreError {
    /// Flatten an `anyhow` chain (with context) into a backend error.
    pub(crate) fn backend(err: anyhow::Error) -> Self {
        Self::Backend(format!("{err:#}"))
    }
}

/// Remote sync failure. Always recoverable: reads fall back to the local
/// cache and writes are only logged.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("remote sync is not configured")]
    Disabled,
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({0}): {1}")]
    Api(u16, String),
    #[error("parse error: {0}")]
    Parse(String),
}
