//! Error types for the contact core.
//!
//! # Design
//! `ApiError` covers everything that can go wrong between building a request
//! and interpreting its response, for both the email provider and the relay
//! endpoint. Its `Display` text is meant to be shown to a person: provider
//! failures surface the provider's own message, relay rejections surface the
//! server's `details` string.

use thiserror::Error;

/// Errors returned by `ProviderClient` and `ContactClient` methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The email provider refused or failed to accept a message.
    #[error("{message}")]
    Provider { status: u16, message: String },

    /// The relay endpoint answered with an `{error, details}` body.
    #[error("{}", rejection_text(.error, .details))]
    Rejected {
        status: u16,
        error: String,
        details: Option<String>,
    },

    /// A non-2xx status with no recognizable error body.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

fn rejection_text(error: &str, details: &Option<String>) -> String {
    match details.as_deref() {
        Some(d) if !d.is_empty() => d.to_string(),
        _ => error.to_string(),
    }
}

/// A contact request that failed field validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name, email, and message are required")]
    MissingFields,

    #[error("Please provide a valid email address")]
    InvalidEmail,
}

impl ValidationError {
    /// Short error label used in the `error` field of a 400 response.
    pub fn label(self) -> &'static str {
        match self {
            ValidationError::MissingFields => "Missing required data",
            ValidationError::InvalidEmail => "Invalid data",
        }
    }
}
