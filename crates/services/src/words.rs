use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use quiz_core::model::{WordDraft, WordRecord};

use crate::error::FetchError;

pub const DEFAULT_API_URL: &str = "https://learnirula.azurewebsites.net/api/";
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of the vocabulary a session is built from.
#[async_trait]
pub trait WordProvider: Send + Sync {
    /// Fetch the full word list.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` when the list cannot be retrieved or decoded.
    async fn fetch_words(&self) -> Result<Vec<WordRecord>, FetchError>;
}

/// Decode a word API response body and validate every record.
///
/// # Errors
///
/// Returns `FetchError::Decode` for malformed JSON and `FetchError::InvalidRecord`
/// for the first record that fails validation.
pub fn parse_words(body: &[u8]) -> Result<Vec<WordRecord>, FetchError> {
    let drafts: Vec<WordDraft> = serde_json::from_slice(body)?;
    drafts
        .into_iter()
        .enumerate()
        .map(|(index, draft)| {
            draft
                .validate()
                .map_err(|source| FetchError::InvalidRecord { index, source })
        })
        .collect()
}

//
// ─── HTTP ──────────────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordProviderConfig {
    pub api_url: String,
    pub timeout: Duration,
}

impl Default for WordProviderConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

impl WordProviderConfig {
    /// Read `QUIZ_API_URL` and `QUIZ_FETCH_TIMEOUT_SECS`, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let api_url = env::var("QUIZ_API_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(defaults.api_url);
        let timeout = env::var("QUIZ_FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map_or(defaults.timeout, Duration::from_secs);
        Self { api_url, timeout }
    }
}

/// Fetches the word list with a single GET request.
#[derive(Clone)]
pub struct HttpWordProvider {
    client: Client,
    config: WordProviderConfig,
}

impl HttpWordProvider {
    /// Build a provider whose requests give up after `config.timeout`.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be initialised.
    pub fn new(config: WordProviderConfig) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &WordProviderConfig {
        &self.config
    }
}

#[async_trait]
impl WordProvider for HttpWordProvider {
    async fn fetch_words(&self) -> Result<Vec<WordRecord>, FetchError> {
        info!(url = %self.config.api_url, "fetching word list");
        let response = self.client.get(&self.config.api_url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status()));
        }

        let body = response.bytes().await?;
        let words = parse_words(&body)?;
        debug!(count = words.len(), "word list decoded");
        Ok(words)
    }
}

//
// ─── IN MEMORY ─────────────────────────────────────────────────────────────────
//

/// Serves a fixed word list, e.g. one loaded from a local JSON file.
#[derive(Clone, Debug, Default)]
pub struct StaticWordProvider {
    words: Vec<WordRecord>,
}

impl StaticWordProvider {
    #[must_use]
    pub fn new(words: Vec<WordRecord>) -> Self {
        Self { words }
    }

    /// Build a provider from a JSON body in the word API format.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the body does not decode into valid words.
    pub fn from_json(body: &[u8]) -> Result<Self, FetchError> {
        Ok(Self::new(parse_words(body)?))
    }
}

#[async_trait]
impl WordProvider for StaticWordProvider {
    async fn fetch_words(&self) -> Result<Vec<WordRecord>, FetchError> {
        Ok(self.words.clone())
    }
}
