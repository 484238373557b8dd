//! Configuration validation.
//!
//! Semantic checks on top of what serde already enforces syntactically:
//! unique service names (the name is the sole service identity and metric
//! label), thresholds of at least 1, parseable probe URLs, and a usable
//! alert channel when one is declared.
//!
//! Validation is a pure function and reports all errors, not just the first.

use std::collections::HashSet;

use thiserror::Error;
use url::Url;

use crate::config::schema::MonitorConfig;

/// A single semantic configuration error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("interval_seconds must be at least 1")]
    ZeroInterval,

    #[error("duplicate service name '{0}'")]
    DuplicateServiceName(String),

    #[error("service '{service}': {field} must be at least 1")]
    ZeroThreshold { service: String, field: &'static str },

    #[error("service '{service}': invalid url '{url}'")]
    InvalidUrl { service: String, url: String },

    #[error("email channel declared with an empty recipient list")]
    NoRecipients,
}

/// Validate a parsed configuration.
pub fn validate_config(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.interval_seconds == 0 {
        errors.push(ValidationError::ZeroInterval);
    }

    let mut seen = HashSet::new();
    for svc in &config.services {
        if !seen.insert(svc.name.as_str()) {
            errors.push(ValidationError::DuplicateServiceName(svc.name.clone()));
        }
        if svc.failure_threshold == 0 {
            errors.push(ValidationError::ZeroThreshold {
                service: svc.name.clone(),
                field: "failure_threshold",
            });
        }
        if svc.recovery_threshold == 0 {
            errors.push(ValidationError::ZeroThreshold {
                service: svc.name.clone(),
                field: "recovery_threshold",
            });
        }
        if Url::parse(&svc.url).is_err() {
            errors.push(ValidationError::InvalidUrl {
                service: svc.name.clone(),
                url: svc.url.clone(),
            });
        }
    }

    if let Some(email) = &config.email {
        if email.to_emails.is_empty() {
            errors.push(ValidationError::NoRecipients);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
