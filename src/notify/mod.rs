//! Alert notification subsystem.
//!
//! A [`Notifier`] is an outbound-only channel the monitor hands transition
//! alerts to. Delivery is best-effort per alert: failures are logged by the
//! caller and never retried, and a failed delivery must never stall the
//! polling loop.

use async_trait::async_trait;
use thiserror::Error;

pub mod email;

pub use email::EmailNotifier;

/// Error type for alert delivery.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// SMTP transport-level failure (connection, authentication).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// A sender or recipient address could not be parsed.
    #[error("email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The message could not be assembled.
    #[error("email build error: {0}")]
    Build(String),
}

/// An alert delivery channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Channel name for logging.
    fn name(&self) -> &str;

    /// Attempt one delivery of the given alert.
    async fn notify(&self, subject: &str, body: &str) -> Result<(), NotifyError>;
}
