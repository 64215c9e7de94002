//! Stateless request builder and response parser for the relay endpoint.
//!
//! # Design
//! `ContactClient` is what a front end uses to submit the form. It follows
//! the same host-does-IO split as `ProviderClient`: `build_submit` produces
//! the request, the host executes it, `parse_submit` classifies the answer.
//! An `error` field in the body wins over the status code, so a 200 that
//! carries an error is still a failure.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ContactRequest, ContactResponse};

/// How a submission ended, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The owner was notified and the visitor got a confirmation.
    Delivered,
    /// The owner was notified but the confirmation bounced.
    PartialSuccess,
}

#[derive(Debug, Clone)]
pub struct ContactClient {
    endpoint: String,
}

impl ContactClient {
    /// `endpoint` is the full URL of the relay, e.g.
    /// `https://example.com/send-contact-email`.
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_submit(&self, request: &ContactRequest) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(request)
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.endpoint.clone(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn parse_submit(&self, response: HttpResponse) -> Result<SubmitOutcome, ApiError> {
        let parsed = serde_json::from_str::<ContactResponse>(&response.body);

        if let Ok(ContactResponse { error: Some(error), details, .. }) = &parsed {
            return Err(ApiError::Rejected {
                status: response.status,
                error: error.clone(),
                details: details.clone(),
            });
        }
        if !response.is_success() {
            return Err(ApiError::HttpError {
                status: response.status,
                body: response.body,
            });
        }

        let body = parsed.map_err(|e| ApiError::DeserializationError(e.to_string()))?;
        if body.partial_success {
            Ok(SubmitOutcome::PartialSuccess)
        } else if body.success {
            Ok(SubmitOutcome::Delivered)
        } else {
            Err(ApiError::DeserializationError(
                "response reports neither success nor an error".to_string(),
            ))
        }
    }
}
