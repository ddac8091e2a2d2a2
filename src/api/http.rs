//! reqwest-backed implementation of [`RemoteClient`]

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::{RemoteClient, RemoteFailure};
use crate::config::Credentials;

/// Header carrying the client id
const CLIENT_ID_HEADER: &str = "client_id";

/// Header carrying the client secret
const CLIENT_SECRET_HEADER: &str = "client_secret";

/// HTTP client for the production data API
///
/// Certificate verification is disabled: the API is served from an internal
/// endpoint without a trusted chain.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a client with the given request timeout
    pub fn new(timeout: Duration) -> Result<Self, RemoteFailure> {
        let client = Client::builder()
            .danger_accept_invalid_certs(true)
            .timeout(timeout)
            .build()
            .map_err(transport_failure)?;
        Ok(Self { client })
    }
}

/// Converts a reqwest error, dropping the URL so credentials never reach logs
fn transport_failure(error: reqwest::Error) -> RemoteFailure {
    let error = error.without_url();
    match error.status() {
        Some(status) => RemoteFailure::Status {
            status: status.as_u16(),
            message: error.to_string(),
        },
        None => RemoteFailure::Transport {
            message: error.to_string(),
        },
    }
}

#[async_trait]
impl RemoteClient for HttpClient {
    async fn fetch(&self, url: &str, credentials: &Credentials) -> Result<Value, RemoteFailure> {
        let response = self
            .client
            .get(url)
            .header(CLIENT_ID_HEADER, credentials.client_id.as_str())
            .header(CLIENT_SECRET_HEADER, credentials.client_secret.as_str())
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(RemoteFailure::Status {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string(),
            });
        }

        let body = response.text().await.map_err(transport_failure)?;
        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::debug!(error = %e, "response body is not valid JSON");
                Ok(Value::Null)
            }
        }
    }
}
