//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the monitor.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the monitoring daemon.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MonitorConfig {
    /// Seconds between polling ticks.
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,

    /// Optional email alert channel. When absent, state transitions are
    /// logged but no notification is attempted.
    pub email: Option<EmailConfig>,

    /// Services to probe, in declared order.
    pub services: Vec<ServiceConfig>,
}

impl MonitorConfig {
    /// Poll interval as a [`Duration`].
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}

fn default_interval_seconds() -> u64 {
    10
}

/// A single service to monitor.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Unique service identifier, used as the metric label.
    pub name: String,

    /// Probe target URL.
    pub url: String,

    /// Consecutive failures before the service is marked down.
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,

    /// Consecutive successes before a down service is marked up again.
    #[serde(default = "default_recovery_threshold")]
    pub recovery_threshold: u32,

    /// Per-probe timeout in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl ServiceConfig {
    /// Probe timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn default_failure_threshold() -> u32 {
    3
}

fn default_recovery_threshold() -> u32 {
    1
}

fn default_timeout_seconds() -> u64 {
    3
}

/// SMTP alert channel configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,

    /// SMTP server port.
    pub smtp_port: u16,

    /// `true` upgrades a plain connection via STARTTLS; `false` expects the
    /// connection to be TLS-wrapped from the start.
    #[serde(default = "default_use_tls")]
    pub use_tls: bool,

    /// SMTP auth username.
    pub username: String,

    /// SMTP auth password.
    pub password: String,

    /// RFC 5322 "From" address.
    pub from_email: String,

    /// Recipient list; must be non-empty.
    pub to_emails: Vec<String>,
}

fn default_use_tls() -> bool {
    true
}
