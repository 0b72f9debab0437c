//! How the explorer reaches the relay.
//!
//! The `QueryTransport` trait returns boxed futures so it stays
//! dyn-compatible; `HttpTransport` is the real implementation.

use std::future::Future;
use std::pin::Pin;

use protocol::{ErrorEnvelope, QueryParams, QueryResultRecord, QueryRows, QUERY_PATH};

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Error type for a failed query round trip.
#[derive(Debug)]
pub struct FetchError {
    pub message: String,
    /// HTTP status from the relay, if it answered at all.
    pub status: Option<u16>,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (HTTP {status})", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as _)
    }
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            status: None,
            source: Some(Box::new(source)),
        }
    }

    pub fn http(status: u16, envelope: ErrorEnvelope) -> Self {
        let message = match envelope.status_text.filter(|s| !s.is_empty()) {
            Some(text) => format!("{}: {text}", envelope.error),
            None => envelope.error,
        };
        Self {
            message,
            status: Some(status),
            source: None,
        }
    }
}

pub trait QueryTransport: Send + Sync {
    fn query(&self, params: QueryParams)
        -> BoxFuture<'_, Result<Vec<QueryResultRecord>, FetchError>>;
}

/// Posts queries to a relay over HTTP.
pub struct HttpTransport {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpTransport {
    /// `base_url` is the relay origin, e.g. `http://127.0.0.1:9200`.
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl AsRef<str>, client: reqwest::Client) -> Self {
        Self {
            endpoint: format!("{}{QUERY_PATH}", base_url.as_ref().trim_end_matches('/')),
            client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl QueryTransport for HttpTransport {
    fn query(
        &self,
        params: QueryParams,
    ) -> BoxFuture<'_, Result<Vec<QueryResultRecord>, FetchError>> {
        Box::pin(async move {
            let resp = self
                .client
                .post(&self.endpoint)
                .json(&params)
                .send()
                .await
                .map_err(|e| FetchError::with_source("relay request failed", e))?;

            let status = resp.status();
            if !status.is_success() {
                let envelope = match resp.json::<ErrorEnvelope>().await {
                    Ok(env) => env,
                    Err(_) => ErrorEnvelope::new(
                        status.canonical_reason().unwrap_or("relay error").to_string(),
                    ),
                };
                return Err(FetchError::http(status.as_u16(), envelope));
            }

            let rows: QueryRows = resp
                .json()
                .await
                .map_err(|e| FetchError::with_source("malformed relay response", e))?;
            Ok(rows.rows)
        })
    }
}
