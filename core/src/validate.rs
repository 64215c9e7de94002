//! Field validation for contact submissions.
//!
//! The same rules run in the browser form and in the relay endpoint, so a
//! request that passes the form never bounces off the server for shape.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;
use crate::types::ContactRequest;

/// Something, an `@`, something, a dot, something. No whitespace anywhere.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Check a request after trimming. Missing fields are reported before a
/// malformed address.
pub fn validate(request: &ContactRequest) -> Result<(), ValidationError> {
    let request = request.normalized();
    if request.name.is_empty() || request.email.is_empty() || request.message.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if !is_valid_email(&request.email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}
