use crate::domain::{SubmitError, SubmitResult};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use thiserror::Error;

/// Delivers one JSON form body to an endpoint.
///
/// Only the response status matters; the body is never read.
pub trait Transport: Send + Sync {
    fn post_json(&self, url: &str, body: &serde_json::Value) -> SubmitResult;
}

/// The HTTP client could not be constructed. Raised once, at startup.
#[derive(Debug, Error)]
#[error("could not build http client: {0}")]
pub struct ClientBuildError(#[from] reqwest::Error);

/// Blocking HTTP transport. Meant to be called from a worker thread.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(timeout: Option<Duration>) -> Result<Self, ClientBuildError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn post_json(&self, url: &str, body: &serde_json::Value) -> SubmitResult {
        let bytes = serde_json::to_vec(body)?;
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(bytes)
            .send()
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(SubmitError::Rejected { status: status.as_u16() })
        }
    }
}
