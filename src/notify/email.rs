//! Email alert delivery via SMTP.
//!
//! Wraps the `lettre` async SMTP transport. `use_tls = true` opens a plain
//! connection and upgrades it with STARTTLS; `false` expects the server to
//! speak TLS from the first byte. The transport is opened and closed per
//! delivery; alert volume is bounded by state transitions, not by check
//! frequency.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::EmailConfig;
use crate::notify::{Notifier, NotifyError};

/// Sends alert emails to a fixed recipient list.
pub struct EmailNotifier {
    config: EmailConfig,
}

impl EmailNotifier {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn build_message(&self, subject: &str, body: &str) -> Result<Message, NotifyError> {
        let mut builder = Message::builder()
            .from(self.config.from_email.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN);

        for to in &self.config.to_emails {
            builder = builder.to(to.parse()?);
        }

        builder
            .body(body.to_string())
            .map_err(|e| NotifyError::Build(e.to_string()))
    }

    fn build_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, NotifyError> {
        let builder = if self.config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)?
        };

        Ok(builder
            .port(self.config.smtp_port)
            .credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.clone(),
            ))
            .build())
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    fn name(&self) -> &str {
        "email"
    }

    async fn notify(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        let message = self.build_message(subject, body)?;
        let mailer = self.build_transport()?;

        mailer.send(message).await?;

        tracing::info!(
            subject,
            recipients = self.config.to_emails.len(),
            "Alert email sent"
        );
        Ok(())
    }
}
