//! Upstream fetch with a bounded deadline.
//!
//! # Responsibilities
//! - Own the shared connection pool used by every request
//! - Issue the single GET per request against the resolved URL
//! - Turn transport failures, timeouts and non-200 statuses into `UpstreamError`
//!
//! # Design Decisions
//! - Uses Tokio's timeout around send, so the deadline covers connect and
//!   response headers but not the relayed body stream
//! - Non-200 bodies are drained before the error is returned so the
//!   connection goes back to the pool in a clean state
//! - No retries: one attempt per request

use std::time::Duration;

use reqwest::{Response, StatusCode};
use thiserror::Error;

use crate::config::{TimeoutConfig, UpstreamConfig};

/// Errors from fetching an upstream resource.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// No response headers within the configured deadline.
    #[error("upstream timed out after {0:?}")]
    Timeout(Duration),

    /// DNS, connect, TLS or protocol failure.
    #[error("upstream transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream answered with something other than 200.
    #[error("unexpected status code: {0}")]
    Status(StatusCode),
}

impl UpstreamError {
    /// Short label for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            UpstreamError::Timeout(_) => "timeout",
            UpstreamError::Transport(_) => "transport",
            UpstreamError::Status(_) => "status",
        }
    }
}

/// HTTP client shared by all in-flight requests.
///
/// Cloning is cheap; clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    timeout: Duration,
}

impl UpstreamClient {
    /// Build the client from upstream and timeout settings.
    pub fn new(upstreams: &UpstreamConfig, timeouts: &TimeoutConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder().connect_timeout(timeouts.connect());
        if !upstreams.system_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            http: builder.build()?,
            timeout: timeouts.upstream(),
        })
    }

    /// The fetch deadline applied to each request.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET `url`, returning the open response only when the status is 200.
    ///
    /// The caller owns the returned body stream.
    pub async fn fetch(&self, url: &str) -> Result<Response, UpstreamError> {
        let attempt = async {
            let mut response = self.http.get(url).send().await?;
            let status = response.status();
            if status != StatusCode::OK {
                // Drain chunk by chunk so the pooled connection can be reused.
                if let Err(e) = drain(&mut response).await {
                    tracing::debug!(error = %e, "Failed to drain upstream error body");
                }
                return Err(UpstreamError::Status(status));
            }
            Ok::<_, UpstreamError>(response)
        };

        tokio::time::timeout(self.timeout, attempt)
            .await
            .map_err(|_| UpstreamError::Timeout(self.timeout))?
    }
}

/// Read and discard the rest of `response` without buffering it.
async fn drain(response: &mut Response) -> Result<u64, reqwest::Error> {
    let mut discarded = 0;
    while let Some(chunk) = response.chunk().await? {
        discarded += chunk.len() as u64;
    }
    Ok(discarded)
}
