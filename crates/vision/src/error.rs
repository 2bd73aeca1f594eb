use thiserror::Error;

/// Failure to turn an image into scan guesses.
///
/// Always fatal to the current scan: nothing is reconciled and nothing is
/// retried.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("invalid extractor input: {0}")]
    InvalidInput(String),

    #[error("extractor failed: {0}")]
    ExtractorFailed(String),

    #[error("extractor returned no data")]
    EmptyResponse,

    #[error("malformed extractor response: {0}")]
    Malformed(String),
}
