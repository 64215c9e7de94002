//! Core of the portfolio contact relay.
//!
//! # Overview
//! Everything about a contact submission that does not need a socket: the
//! wire types, field validation, the two email templates, a request
//! builder/parser for the email provider and one for the relay endpoint,
//! and the view model of the contact form.
//!
//! # Design
//! - Host-does-IO: `ProviderClient` and `ContactClient` build `HttpRequest`
//!   values and parse `HttpResponse` values; callers own the transport.
//! - Validation is shared so the form and the server agree on what a valid
//!   submission is.

pub mod client;
pub mod error;
pub mod form;
pub mod http;
pub mod provider;
pub mod templates;
pub mod types;
pub mod validate;

pub use client::{ContactClient, SubmitOutcome};
pub use error::{ApiError, ValidationError};
pub use form::{ContactForm, FormRejection, Toast, ToastVariant};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use provider::ProviderClient;
pub use templates::Sender;
pub use types::{ContactRequest, ContactResponse, EmailReceipt, OutboundEmail};
pub use validate::{is_valid_email, validate};
