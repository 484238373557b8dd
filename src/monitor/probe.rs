//! HTTP probing of monitored services.
//!
//! # Responsibilities
//! - Issue a GET against the service URL with the service's own timeout
//! - Measure wall-clock latency regardless of outcome
//! - Classify the outcome: transport success with status < 500 is healthy
//!
//! 4xx responses count as healthy: the service answered, even if it
//! disliked the request. Connection errors, DNS failures and timeouts are
//! always unhealthy.

use std::time::{Duration, Instant};

/// Result of a single probe.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    /// Classified outcome.
    pub healthy: bool,
    /// Wall-clock time the probe took, including failed attempts.
    pub latency: Duration,
    /// HTTP status, when the transport round-trip completed.
    pub status: Option<u16>,
}

/// Issues health-check requests.
pub struct Prober {
    client: reqwest::Client,
}

impl Prober {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Probe `url`, bounding the whole request by `timeout`.
    pub async fn probe(&self, name: &str, url: &str, timeout: Duration) -> ProbeResult {
        let start = Instant::now();
        let outcome = self.client.get(url).timeout(timeout).send().await;
        let latency = start.elapsed();

        match outcome {
            Ok(response) => {
                let status = response.status().as_u16();
                let healthy = status < 500;
                if !healthy {
                    tracing::warn!(
                        service = %name,
                        status,
                        "Health check failed: server error status"
                    );
                }
                ProbeResult {
                    healthy,
                    latency,
                    status: Some(status),
                }
            }
            Err(e) => {
                tracing::warn!(
                    service = %name,
                    error = %e,
                    "Health check failed: transport error"
                );
                ProbeResult {
                    healthy: false,
                    latency,
                    status: None,
                }
            }
        }
    }
}

impl Default for Prober {
    fn default() -> Self {
        Self::new()
    }
}
