use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use trivia_core::model::{BatchRequest, RawQuestion};

use crate::error::{ProviderCode, QuestionBankError};

/// Fetch boundary for question batches.
#[async_trait]
pub trait QuestionBank: Send + Sync {
    /// Fetch up to `request.amount()` raw questions.
    ///
    /// A provider with nothing to offer returns `Ok` with an empty list.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError` for transport, status, decode, or provider failures.
    async fn fetch(&self, request: &BatchRequest) -> Result<Vec<RawQuestion>, QuestionBankError>;
}

#[derive(Clone, Debug)]
pub struct OpenTdbConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for OpenTdbConfig {
    fn default() -> Self {
        Self {
            base_url: "https://opentdb.com".into(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl OpenTdbConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let base_url = env::var("TRIVIA_API_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(defaults.base_url);
        let timeout = env::var("TRIVIA_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
            .map_or(defaults.timeout, Duration::from_secs);
        Self { base_url, timeout }
    }
}

/// HTTP client for the Open Trivia DB `api.php` endpoint.
#[derive(Clone)]
pub struct OpenTdbClient {
    client: Client,
    config: OpenTdbConfig,
}

impl OpenTdbClient {
    /// # Errors
    ///
    /// Returns `QuestionBankError::Http` if the HTTP client cannot be built.
    pub fn new(config: OpenTdbConfig) -> Result<Self, QuestionBankError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// # Errors
    ///
    /// Returns `QuestionBankError::Http` if the HTTP client cannot be built.
    pub fn from_env() -> Result<Self, QuestionBankError> {
        Self::new(OpenTdbConfig::from_env())
    }

    fn endpoint(&self) -> String {
        format!("{}/api.php", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl QuestionBank for OpenTdbClient {
    async fn fetch(&self, request: &BatchRequest) -> Result<Vec<RawQuestion>, QuestionBankError> {
        let response = self
            .client
            .get(self.endpoint())
            .query(&query_params(request))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(QuestionBankError::HttpStatus(response.status()));
        }

        let body = response.text().await?;
        parse_response(&body)
    }
}

/// Query string for a batch request.
#[must_use]
pub fn query_params(request: &BatchRequest) -> Vec<(&'static str, String)> {
    let mut params = vec![("amount", request.amount().to_string())];
    if let Some(category) = request.category() {
        params.push(("category", category.to_string()));
    }
    if let Some(difficulty) = request.difficulty() {
        params.push(("difficulty", difficulty.as_str().to_owned()));
    }
    params.push(("type", request.kind().as_str().to_owned()));
    params
}

#[derive(Debug, Deserialize)]
struct OpenTdbResponse {
    response_code: u8,
    #[serde(default)]
    results: Vec<RawQuestion>,
}

/// Decode an `api.php` response body.
///
/// Code 1 ("no results") yields an empty batch so the caller can report it as such.
///
/// # Errors
///
/// Returns `QuestionBankError::Decode` for malformed JSON and
/// `QuestionBankError::Provider` for codes 2 and above.
pub fn parse_response(body: &str) -> Result<Vec<RawQuestion>, QuestionBankError> {
    let response: OpenTdbResponse = serde_json::from_str(body)?;
    match response.response_code {
        0 => Ok(response.results),
        1 => Ok(Vec::new()),
        code => Err(QuestionBankError::Provider(ProviderCode::from_code(code))),
    }
}
