//! Client-side state of the contact form.
//!
//! # Design
//! `ContactForm` is the view model behind the form: the three inputs, the
//! in-flight flag that disables the submit control, and the error and
//! success banners. It performs no I/O. A host calls `begin_submit`, sends
//! the returned payload through `ContactClient`, and reports the result via
//! `finish`, which hands back the toast to display.

use std::time::Duration;

use crate::client::SubmitOutcome;
use crate::error::ApiError;
use crate::types::ContactRequest;
use crate::validate::is_valid_email;

/// How long the success banner stays up before `dismiss_success`.
pub const SUCCESS_BANNER_TTL: Duration = Duration::from_secs(5);

const FALLBACK_ERROR: &str = "Failed to send message. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    Default,
    Destructive,
}

/// Transient notification shown after a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
}

impl Toast {
    fn info(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            variant: ToastVariant::Default,
        }
    }

    fn error(description: &str) -> Self {
        Self {
            title: "Error".to_string(),
            description: description.to_string(),
            variant: ToastVariant::Destructive,
        }
    }
}

/// Why `begin_submit` did not produce a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormRejection {
    /// A submission is already outstanding.
    InFlight,
    MissingFields,
    InvalidEmail,
}

impl FormRejection {
    /// The toast to show, if any. An in-flight click is silently ignored.
    pub fn toast(self) -> Option<Toast> {
        match self {
            FormRejection::InFlight => None,
            FormRejection::MissingFields => Some(Toast::error("Please fill in all fields")),
            FormRejection::InvalidEmail => Some(Toast::error("Please enter a valid email address")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
    is_submitting: bool,
    error: Option<String>,
    submit_success: bool,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn submit_success(&self) -> bool {
        self.submit_success
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_submitting {
            "Sending..."
        } else {
            "Send Message"
        }
    }

    pub fn begin_submit(&mut self) -> Result<ContactRequest, FormRejection> {
        if self.is_submitting {
            return Err(FormRejection::InFlight);
        }
        self.error = None;
        self.submit_success = false;

        if self.name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.message.trim().is_empty()
        {
            return Err(FormRejection::MissingFields);
        }
        if !is_valid_email(self.email.trim()) {
            return Err(FormRejection::InvalidEmail);
        }

        self.is_submitting = true;
        Ok(ContactRequest::new(&self.name, &self.email, &self.message).normalized())
    }

    pub fn finish(&mut self, result: Result<SubmitOutcome, ApiError>) -> Toast {
        self.is_submitting = false;
        match result {
            Ok(SubmitOutcome::Delivered) => {
                self.reset();
                Toast::info(
                    "Success!",
                    "Your message has been sent. You'll receive a confirmation email shortly!",
                )
            }
            Ok(SubmitOutcome::PartialSuccess) => {
                self.reset();
                Toast::info(
                    "Message Received",
                    "Your message was sent, but the confirmation email could not be delivered. \
                     Please check your email address.",
                )
            }
            Err(err) => {
                let text = err.to_string();
                let text = if text.trim().is_empty() { FALLBACK_ERROR.to_string() } else { text };
                let toast = Toast::error(&text);
                self.error = Some(text);
                toast
            }
        }
    }

    pub fn dismiss_success(&mut self) {
        self.submit_success = false;
    }

    fn reset(&mut self) {
        self.name.clear();
        self.email.clear();
        self.message.clear();
        self.submit_success = true;
    }
}
