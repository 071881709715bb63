use thiserror::Error;

/// User-facing text shown whenever a batch cannot be loaded.
///
/// Every `LoadFailure` collapses to this message on screen; the variant is kept for logs.
pub const LOAD_FAILURE_MESSAGE: &str = "Failed to fetch questions. Please check your connection.";

/// Reasons a question batch could not become playable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LoadFailure {
    #[error("question bank request failed: {0}")]
    Fetch(String),

    #[error("question bank returned no questions")]
    Empty,

    #[error("question {index} is missing `{field}`")]
    Malformed { index: usize, field: &'static str },
}
