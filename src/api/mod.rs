//! Remote client for the production data API
//!
//! The [`RemoteClient`] trait is the transport seam: an authenticated GET that
//! yields either a parsed JSON body or a typed [`RemoteFailure`]. [`HttpClient`]
//! is the reqwest implementation used in production.

mod http;

pub use http::HttpClient;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::config::Credentials;

/// Status code reported for failures that never produced an HTTP response
pub const TRANSPORT_FAILURE_STATUS: u16 = 0;

/// A failed request to the remote API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteFailure {
    /// The server answered with a 4xx or 5xx status
    #[error("HTTP status {status}: {message}")]
    Status { status: u16, message: String },

    /// The request never completed (connection, TLS, timeout, ...)
    #[error("transport error: {message}")]
    Transport { message: String },
}

impl RemoteFailure {
    /// HTTP status of the failure, or [`TRANSPORT_FAILURE_STATUS`]
    pub fn status_code(&self) -> u16 {
        match self {
            RemoteFailure::Status { status, .. } => *status,
            RemoteFailure::Transport { .. } => TRANSPORT_FAILURE_STATUS,
        }
    }

    /// Human-readable failure message without the status prefix
    pub fn message(&self) -> &str {
        match self {
            RemoteFailure::Status { message, .. } | RemoteFailure::Transport { message } => message,
        }
    }
}

/// Authenticated GET capability
///
/// Implementations must not panic or surface transport errors in any other way
/// than a [`RemoteFailure`]. A body that is not valid JSON is reported as
/// `Value::Null`, which callers treat as an empty response.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Performs a GET on `url`, sending the client identity as headers
    async fn fetch(&self, url: &str, credentials: &Credentials) -> Result<Value, RemoteFailure>;
}

#[async_trait]
impl<T: RemoteClient + ?Sized> RemoteClient for std::sync::Arc<T> {
    async fn fetch(&self, url: &str, credentials: &Credentials) -> Result<Value, RemoteFailure> {
        (**self).fetch(url, credentials).await
    }
}

/// Percent-encodes commas so they never reach the path segment unescaped
pub fn escape_path(path: &str) -> String {
    path.replace(',', "%2C")
}

/// Builds `https://{endpoint}/{path}` with leading slashes on `path` removed
///
/// `endpoint` is the `auth@host` authority from the configuration.
pub fn build_url(endpoint: &str, path: &str) -> String {
    format!("https://{}/{}", endpoint, escape_path(path).trim_start_matches('/'))
}
