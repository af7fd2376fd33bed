//! Blocking client for the remote definition-generation endpoint.
//!
//! One POST per word, fixed timeout, no retries. A non-success status
//! or an explicit `error` field in the body is fatal to the calling
//! flow.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Meaning, Suggestion};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("could not reach definition API: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("definition API request failed ({status}): {body}")]
    Status { status: StatusCode, body: String },

    #[error("definition API error: {0}")]
    Api(String),

    #[error("could not parse definition API response: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct DefinitionRequest<'a> {
    word: &'a str,
    #[serde(rename = "apiKey")]
    api_key: &'a str,
}

/// Wire shape of the endpoint's reply. `meanings` arrives either as an
/// ordered list or as a mapping keyed by stringified indices; both are
/// normalized before the payload leaves this module.
#[derive(Deserialize)]
struct SuggestionResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    pronunciation: Option<String>,
    #[serde(default)]
    meanings: Option<MeaningsPayload>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MeaningsPayload {
    List(Vec<Meaning>),
    Map(HashMap<String, Meaning>),
}

/// Client for the definition endpoint. Holds the base URL and API key
/// so callers only ever pass the word.
pub struct DefinitionClient {
    http: Client,
    url: String,
    api_key: String,
}

impl DefinitionClient {
    pub fn new(url: &str, api_key: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Fetch the suggestion for `word`. Blocks for at most the
    /// configured timeout.
    pub fn fetch(&self, word: &str) -> Result<Suggestion, ApiError> {
        log::info!("requesting definition for {word:?}");
        let response = self
            .http
            .post(self.url.as_str())
            .json(&DefinitionRequest {
                word,
                api_key: &self.api_key,
            })
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(ApiError::Status { status, body });
        }

        parse_suggestion(&body)
    }
}

/// Decode a response body into a [`Suggestion`], surfacing the
/// endpoint's `error` field when present.
fn parse_suggestion(body: &str) -> Result<Suggestion, ApiError> {
    let response: SuggestionResponse = serde_json::from_str(body)?;
    if let Some(message) = response.error {
        return Err(ApiError::Api(message));
    }

    Ok(Suggestion {
        pronunciation: response.pronunciation.filter(|p| !p.is_empty()),
        meanings: normalize_meanings(response.meanings),
    })
}

/// Collapse both wire forms into one ordered sequence. Map keys are
/// ordered by parsed numeric value so "10" sorts after "2"; keys that
/// fail to parse sort after the numeric ones, lexicographically.
fn normalize_meanings(payload: Option<MeaningsPayload>) -> Vec<Meaning> {
    match payload {
        None => Vec::new(),
        Some(MeaningsPayload::List(meanings)) => meanings,
        Some(MeaningsPayload::Map(map)) => {
            let mut entries: Vec<(String, Meaning)> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| match (a.parse::<u64>(), b.parse::<u64>()) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                (Ok(_), Err(_)) => std::cmp::Ordering::Less,
                (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
                (Err(_), Err(_)) => a.cmp(b),
            });
            entries.into_iter().map(|(_, meaning)| meaning).collect()
        }
    }
}
