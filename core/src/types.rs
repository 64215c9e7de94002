//! Wire types shared by the relay endpoint, its clients and the provider.
//!
//! # Design
//! `ContactRequest` fields default to empty strings so a body that omits a
//! key is reported as a missing field rather than a malformed payload.
//! `ContactResponse` is a single envelope for all three outcomes; absent
//! fields are skipped so each outcome serializes to its minimal shape.

use serde::{Deserialize, Serialize};

/// Body of a contact form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

impl ContactRequest {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    /// Copy with surrounding whitespace removed from every field.
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }
}

/// One message handed to the email provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
}

/// Provider acknowledgement of an accepted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailReceipt {
    pub id: String,
}

/// Response body of the relay endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub success: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub partial_success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<EmailReceipt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_email: Option<EmailReceipt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ContactResponse {
    pub fn delivered(owner: EmailReceipt, sender: EmailReceipt) -> Self {
        Self {
            success: true,
            owner_email: Some(owner),
            sender_email: Some(sender),
            ..Self::default()
        }
    }

    pub fn partial(owner: EmailReceipt, details: impl Into<String>) -> Self {
        Self {
            success: true,
            partial_success: true,
            owner_email: Some(owner),
            details: Some(details.into()),
            ..Self::default()
        }
    }

    pub fn failure(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            details: Some(details.into()),
            ..Self::default()
        }
    }
}
