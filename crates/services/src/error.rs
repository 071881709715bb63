//! Shared error types for the services crate.

use std::fmt;

use thiserror::Error;

use storage::sqlite::SqliteInitError;
use trivia_core::LoadFailure;

/// Non-success `response_code` values reported by Open Trivia DB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderCode {
    InvalidParameter,
    TokenNotFound,
    TokenEmpty,
    RateLimited,
    Unknown(u8),
}

impl ProviderCode {
    #[must_use]
    pub fn from_code(code: u8) -> Self {
        match code {
            2 => Self::InvalidParameter,
            3 => Self::TokenNotFound,
            4 => Self::TokenEmpty,
            5 => Self::RateLimited,
            other => Self::Unknown(other),
        }
    }
}

impl fmt::Display for ProviderCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderCode::InvalidParameter => f.write_str("invalid parameter"),
            ProviderCode::TokenNotFound => f.write_str("session token not found"),
            ProviderCode::TokenEmpty => f.write_str("session token exhausted"),
            ProviderCode::RateLimited => f.write_str("rate limited"),
            ProviderCode::Unknown(code) => write!(f, "unknown response code {code}"),
        }
    }
}

/// Errors emitted by question bank clients.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionBankError {
    #[error("question bank request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("question bank response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("question bank rejected the request: {0}")]
    Provider(ProviderCode),
}

impl From<QuestionBankError> for LoadFailure {
    fn from(err: QuestionBankError) -> Self {
        LoadFailure::Fetch(err.to_string())
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    QuestionBank(#[from] QuestionBankError),
}
