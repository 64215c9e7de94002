//! Stateless request builder and response parser for the email provider.
//!
//! # Design
//! `ProviderClient` holds only a `base_url` and the API key. Sending is split
//! into `build_send`, which produces an `HttpRequest`, and `parse_send`,
//! which consumes the `HttpResponse`. The caller executes the round-trip,
//! keeping this module deterministic and free of I/O.
//!
//! The provider speaks a small JSON API: `POST /emails` with a bearer token
//! answers `{ "id": ... }` on acceptance and `{ "message": ... }` (sometimes
//! `{ "error": ... }`) otherwise.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{EmailReceipt, OutboundEmail};

/// JSON body of `POST /emails`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendEmailBody {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

impl From<&OutboundEmail> for SendEmailBody {
    fn from(email: &OutboundEmail) -> Self {
        Self {
            from: email.from.clone(),
            to: vec![email.to.clone()],
            subject: email.subject.clone(),
            html: email.html.clone(),
            reply_to: email.reply_to.clone(),
        }
    }
}

#[derive(Deserialize)]
struct ProviderErrorBody {
    message: Option<String>,
    error: Option<String>,
}

#[derive(Clone)]
pub struct ProviderClient {
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for ProviderClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl ProviderClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn build_send(&self, email: &OutboundEmail) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(&SendEmailBody::from(email))
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/emails", self.base_url),
            headers: vec![
                ("authorization".to_string(), format!("Bearer {}", self.api_key)),
                ("content-type".to_string(), "application/json".to_string()),
            ],
            body: Some(body),
        })
    }

    pub fn parse_send(&self, response: HttpResponse) -> Result<EmailReceipt, ApiError> {
        if response.status == 200 || response.status == 201 {
            return serde_json::from_str(&response.body)
                .map_err(|e| ApiError::DeserializationError(e.to_string()));
        }
        Err(ApiError::Provider {
            status: response.status,
            message: provider_message(&response),
        })
    }
}

/// Pull a human-readable reason out of a provider error response.
fn provider_message(response: &HttpResponse) -> String {
    if let Ok(body) = serde_json::from_str::<ProviderErrorBody>(&response.body) {
        if let Some(msg) = body.message.or(body.error).filter(|m| !m.is_empty()) {
            return msg;
        }
    }
    let raw = response.body.trim();
    if raw.is_empty() {
        format!("email provider returned HTTP {}", response.status)
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ProviderClient {
        ProviderClient::new("https://mail.example.com", "key-123")
    }

    fn email() -> OutboundEmail {
        OutboundEmail {
            from: "site@example.com".to_string(),
            to: "owner@example.com".to_string(),
            reply_to: Some("ada@example.com".to_string()),
            subject: "Hi".to_string(),
            html: "<p>Hi</p>".to_string(),
        }
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_send_produces_correct_request() {
        let req = client().build_send(&email()).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "https://mail.example.com/emails");
        assert_eq!(req.header("authorization"), Some("Bearer key-123"));
        assert_eq!(req.header("content-type"), Some("application/json"));
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["from"], "site@example.com");
        assert_eq!(body["to"], serde_json::json!(["owner@example.com"]));
        assert_eq!(body["reply_to"], "ada@example.com");
    }

    #[test]
    fn build_send_omits_absent_reply_to() {
        let mut e = email();
        e.reply_to = None;
        let req = client().build_send(&e).unwrap();
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert!(body.get("reply_to").is_none());
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let req = ProviderClient::new("https://mail.example.com/", "k")
            .build_send(&email())
            .unwrap();
        assert_eq!(req.url, "https://mail.example.com/emails");
    }

    #[test]
    fn parse_send_success() {
        let receipt = client().parse_send(response(200, r#"{"id":"msg_1"}"#)).unwrap();
        assert_eq!(receipt.id, "msg_1");
    }

    #[test]
    fn parse_send_uses_provider_message() {
        let body = r#"{"name":"validation_error","message":"Invalid `to` field."}"#;
        let err = client().parse_send(response(422, body)).unwrap_err();
        assert!(matches!(err, ApiError::Provider { status: 422, .. }));
        assert_eq!(err.to_string(), "Invalid `to` field.");
    }

    #[test]
    fn parse_send_falls_back_to_error_field() {
        let err = client().parse_send(response(401, r#"{"error":"bad key"}"#)).unwrap_err();
        assert_eq!(err.to_string(), "bad key");
    }

    #[test]
    fn parse_send_falls_back_to_raw_body() {
        let err = client().parse_send(response(502, "upstream down")).unwrap_err();
        assert_eq!(err.to_string(), "upstream down");
    }

    #[test]
    fn parse_send_empty_error_body() {
        let err = client().parse_send(response(503, "")).unwrap_err();
        assert_eq!(err.to_string(), "email provider returned HTTP 503");
    }

    #[test]
    fn parse_send_bad_json() {
        let err = client().parse_send(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn debug_redacts_api_key() {
        let shown = format!("{:?}", client());
        assert!(!shown.contains("key-123"));
    }
}
