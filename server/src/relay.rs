//! The contact flow: validate, notify the owner, confirm to the visitor.
//!
//! Sends are sequential and never retried. The owner notification is the
//! message that matters; if only the confirmation fails the submission still
//! counts, reported as a partial success.

use contact_core::templates::{owner_notification, sender_confirmation};
use contact_core::{validate, ContactRequest, EmailReceipt, Sender, ValidationError};
use tracing::{error, info, warn};

use crate::mailer::Mailer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Rejected before any email was attempted.
    Invalid(ValidationError),
    /// Both messages accepted by the provider.
    Delivered { owner: EmailReceipt, sender: EmailReceipt },
    /// Owner notified; the confirmation could not be sent.
    PartialSuccess { owner: EmailReceipt, reason: String },
    /// The owner notification failed.
    Failed(String),
}

pub async fn relay(mailer: &dyn Mailer, sender: &Sender, request: ContactRequest) -> RelayOutcome {
    let request = request.normalized();
    info!(name = %request.name, email = %request.email, "processing contact request");

    if let Err(err) = validate(&request) {
        warn!(
            reason = %err,
            message_len = request.message.len(),
            "rejecting contact request"
        );
        return RelayOutcome::Invalid(err);
    }

    let owner = match mailer.send(&owner_notification(&request, sender)).await {
        Ok(receipt) => receipt,
        Err(err) => {
            error!(error = %err, "owner notification failed");
            return RelayOutcome::Failed(err.to_string());
        }
    };
    info!(id = %owner.id, "owner notification sent");

    match mailer.send(&sender_confirmation(&request, sender)).await {
        Ok(confirmation) => {
            info!(id = %confirmation.id, "sender confirmation sent");
            RelayOutcome::Delivered {
                owner,
                sender: confirmation,
            }
        }
        Err(err) => {
            error!(error = %err, to = %request.email, "sender confirmation failed");
            RelayOutcome::PartialSuccess {
                owner,
                reason: err.to_string(),
            }
        }
    }
}
