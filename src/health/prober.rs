//! Single-request endpoint probing.
//!
//! # Responsibilities
//! - Issue one GET per endpoint per round with a per-request timeout
//! - Classify the outcome (success, HTTP error, transport error)
//! - Record elapsed time for every outcome
//!
//! # Design Decisions
//! - Probing never fails: every error becomes part of the [`ProbeResult`]
//! - Any transport-level failure reports status code 0, regardless of cause
//! - Only 2xx responses count as healthy

use std::time::{Duration, Instant, SystemTime};

use crate::config::ProbeConfig;
use crate::observability::metrics;

/// How a probe ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// A 2xx response was received.
    Success,
    /// A response was received with a non-2xx status.
    HttpError,
    /// No response: connection refused, DNS failure, timeout, invalid URL...
    TransportError,
}

impl ProbeOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeOutcome::Success => "success",
            ProbeOutcome::HttpError => "http_error",
            ProbeOutcome::TransportError => "transport_error",
        }
    }
}

/// Result of probing one endpoint once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub url: String,
    pub healthy: bool,
    /// HTTP status code, 0 when no response was obtained.
    pub response_code: u16,
    pub response_time_ms: u64,
    pub outcome: ProbeOutcome,
    /// Wall-clock time the probe finished.
    pub checked_at: SystemTime,
}

impl ProbeResult {
    /// Build a result from a received HTTP status.
    pub fn from_status(
        url: impl Into<String>,
        status: u16,
        elapsed: Duration,
        checked_at: SystemTime,
    ) -> Self {
        let healthy = (200..300).contains(&status);
        Self {
            url: url.into(),
            healthy,
            response_code: status,
            response_time_ms: elapsed.as_millis() as u64,
            outcome: if healthy { ProbeOutcome::Success } else { ProbeOutcome::HttpError },
            checked_at,
        }
    }

    /// Build a result for a probe that never got a response.
    pub fn transport_failure(
        url: impl Into<String>,
        elapsed: Duration,
        checked_at: SystemTime,
    ) -> Self {
        Self {
            url: url.into(),
            healthy: false,
            response_code: 0,
            response_time_ms: elapsed.as_millis() as u64,
            outcome: ProbeOutcome::TransportError,
            checked_at,
        }
    }
}

/// HTTP prober shared by every round.
#[derive(Debug, Clone)]
pub struct Prober {
    client: reqwest::Client,
}

impl Prober {
    /// Create a prober with the configured timeout and user agent.
    pub fn new(config: &ProbeConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self::with_client(client))
    }

    /// Use a pre-built client. The client's own timeout applies to every probe.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Probe `url` once.
    pub async fn probe(&self, url: &str) -> ProbeResult {
        let start = Instant::now();
        let response = self.client.get(url).send().await;
        let elapsed = start.elapsed();
        let checked_at = SystemTime::now();

        let result = match response {
            Ok(response) => {
                let status = response.status();
                if !status.is_success() {
                    tracing::warn!(url = %url, status = %status, "Probe failed: non-success status");
                }
                ProbeResult::from_status(url, status.as_u16(), elapsed, checked_at)
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, timeout = e.is_timeout(), "Probe failed: no response");
                ProbeResult::transport_failure(url, elapsed, checked_at)
            }
        };

        metrics::record_probe(result.outcome.as_str(), elapsed);
        result
    }
}
