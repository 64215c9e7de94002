//! Outbound mail delivery.
//!
//! The relay only knows the `Mailer` trait. Two backends implement it:
//! `HttpMailer` for a JSON email API and `SmtpMailer` for plain SMTP
//! submission. `build_mailer` picks one from configuration.

mod http;
mod smtp;

use std::sync::Arc;

use async_trait::async_trait;
use contact_core::{ApiError, EmailReceipt, OutboundEmail};
use thiserror::Error;

use crate::config::{MailBackend, MailConfig};
use crate::error::{Error, Result};

pub use http::HttpMailer;
pub use smtp::SmtpMailer;

/// Why a message could not be handed off. The display text is what the
/// relay puts in the `details` field of a 500.
#[derive(Debug, Error)]
pub enum MailError {
    #[error(transparent)]
    Provider(#[from] ApiError),

    #[error("could not reach email provider: {0}")]
    Transport(String),

    #[error("invalid message: {0}")]
    Message(String),

    #[error("SMTP delivery failed: {0}")]
    Smtp(String),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Hand one message to the delivery service.
    async fn send(&self, email: &OutboundEmail) -> std::result::Result<EmailReceipt, MailError>;
}

/// Construct the backend selected by `config.backend`.
///
/// # Errors
///
/// Returns an error if the backend's credentials are missing or its client
/// cannot be built.
pub fn build_mailer(config: &MailConfig) -> Result<Arc<dyn Mailer>> {
    match config.backend {
        MailBackend::Http => {
            let key = config
                .api_key
                .as_deref()
                .ok_or_else(|| Error::config("mail.api_key is required for the http backend"))?;
            let mailer = HttpMailer::new(&config.api_base_url, key, config.timeout())
                .map_err(|e| Error::MailerSetup(e.to_string()))?;
            Ok(Arc::new(mailer))
        }
        MailBackend::Smtp => {
            let (Some(user), Some(pass)) = (
                config.smtp_username.as_deref(),
                config.smtp_password.as_deref(),
            ) else {
                return Err(Error::config(
                    "mail.smtp_username and mail.smtp_password are required",
                ));
            };
            let mailer = SmtpMailer::new(
                &config.smtp_host,
                config.smtp_port,
                user,
                pass,
                config.timeout(),
            )
            .map_err(|e| Error::MailerSetup(e.to_string()))?;
            Ok(Arc::new(mailer))
        }
    }
}
