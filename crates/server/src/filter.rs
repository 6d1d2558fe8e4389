// Content Filter Client.
//
// Every block body passes through an external filter service before it is
// persisted. The call is synchronous from the request's point of view: no
// timeout, no retry — a stalled filter service stalls the handling request.
//
// The filter is a capability with swappable backends so the service layer
// and its tests never need a live network dependency.

use quire_common::types::{FilterRequest, FilterResponse};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("filter service request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("filter service returned status {0}")]
    Status(u16),
    #[error("filter service returned an empty body")]
    EmptyBody,
    #[error("filter service returned an undecodable body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("filter service is unavailable")]
    Unavailable,
}

/// Outbound client for the content-filter service.
#[derive(Debug, Clone)]
pub struct HttpFilterClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFilterClient {
    /// One client per process; reqwest pools connections internally.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self { client: reqwest::Client::new(), base_url: base_url.trim_end_matches('/').to_owned() }
    }

    async fn filter(&self, text: &str) -> Result<Option<String>, FilterError> {
        let url = format!("{}/filter", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&FilterRequest { text: text.to_owned() })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FilterError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        if body.is_empty() {
            return Err(FilterError::EmptyBody);
        }

        let parsed: FilterResponse = serde_json::from_slice(&body)?;
        debug!(valid = parsed.valid, "content filter responded");

        // An absent payload means "no filtering occurred" and is passed
        // through as-is, never substituted with the unfiltered input.
        Ok(parsed.filtered_text)
    }
}

/// The filter capability. Handlers hold one of these and never know which
/// backend is behind it.
#[derive(Debug, Clone)]
pub enum ContentFilter {
    /// Real outbound call to the configured filter service.
    Http(HttpFilterClient),
    /// Returns the input unchanged. Test backend.
    #[cfg_attr(not(test), allow(dead_code))]
    Passthrough,
    /// Returns a fixed payload, including `None` for the null-passthrough
    /// case. Test backend.
    #[cfg_attr(not(test), allow(dead_code))]
    Canned(Option<String>),
    /// Always fails. Test backend.
    #[cfg_attr(not(test), allow(dead_code))]
    Unavailable,
}

impl ContentFilter {
    pub async fn filter(&self, text: &str) -> Result<Option<String>, FilterError> {
        match self {
            Self::Http(client) => client.filter(text).await,
            Self::Passthrough => Ok(Some(text.to_owned())),
            Self::Canned(payload) => Ok(payload.clone()),
            Self::Unavailable => Err(FilterError::Unavailable),
        }
    }
}
