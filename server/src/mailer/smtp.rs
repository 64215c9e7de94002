//! SMTP submission backend (STARTTLS, usually port 587).

use std::time::Duration;

use async_trait::async_trait;
use contact_core::{EmailReceipt, OutboundEmail};
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, warn};

use super::{MailError, Mailer};

pub struct SmtpMailer {
    host: String,
    port: u16,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}

impl SmtpMailer {
    /// # Errors
    ///
    /// Returns an error if the relay host cannot be used for TLS.
    pub fn new(
        host: &str,
        port: u16,
        username: &str,
        password: &str,
        timeout: Duration,
    ) -> Result<Self, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| MailError::Smtp(e.to_string()))?
            .port(port)
            .credentials(Credentials::new(username.to_string(), password.to_string()))
            .timeout(Some(timeout))
            .build();
        Ok(Self {
            host: host.to_string(),
            port,
            transport,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<EmailReceipt, MailError> {
        let message = build_message(email)?;
        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| MailError::Smtp(e.to_string()))?;
        let id = response.message().collect::<Vec<_>>().join(" ");
        debug!(to = %email.to, reply = %id, "smtp server accepted message");
        Ok(EmailReceipt { id })
    }
}

fn build_message(email: &OutboundEmail) -> Result<Message, MailError> {
    let from = email
        .from
        .parse::<Mailbox>()
        .map_err(|e| MailError::Message(format!("from address {:?}: {e}", email.from)))?;
    let to = email
        .to
        .parse::<Mailbox>()
        .map_err(|e| MailError::Message(format!("to address {:?}: {e}", email.to)))?;

    let mut builder = Message::builder()
        .from(from)
        .to(to)
        .subject(email.subject.as_str())
        .header(ContentType::TEXT_HTML);
    // The visitor's address passes the form check but may still be outside
    // RFC 5322. The owner notification goes out without Reply-To then.
    if let Some(reply_to) = &email.reply_to {
        match reply_to.parse::<Mailbox>() {
            Ok(mailbox) => builder = builder.reply_to(mailbox),
            Err(e) => warn!(reply_to = %reply_to, error = %e, "dropping unparseable reply-to"),
        }
    }

    builder
        .body(email.html.clone())
        .map_err(|e| MailError::Message(e.to_string()))
}
