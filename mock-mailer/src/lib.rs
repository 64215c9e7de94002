//! Fake email-delivery provider.
//!
//! Speaks the same small JSON API as the real provider: `POST /emails` with a
//! bearer token accepts a message and answers `{ "id": ... }`. Accepted
//! messages are kept in memory and listed by `GET /emails`. Recipients in
//! `MockOptions::failing_recipients` are refused with a 422, which is how
//! tests simulate a bounced confirmation or an unreachable owner inbox.

use std::{collections::HashSet, sync::Arc};

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SentEmail {
    pub id: Uuid,
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

#[derive(Deserialize)]
pub struct SendEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    #[serde(default)]
    pub reply_to: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct MockOptions {
    /// Bearer token required on `POST /emails`. `None` accepts any token.
    pub api_key: Option<String>,
    /// Messages addressed to any of these are refused.
    pub failing_recipients: HashSet<String>,
}

impl MockOptions {
    pub fn with_api_key(mut self, key: &str) -> Self {
        self.api_key = Some(key.to_string());
        self
    }

    pub fn failing(mut self, recipient: &str) -> Self {
        self.failing_recipients.insert(recipient.to_string());
        self
    }
}

#[derive(Clone)]
struct MockState {
    options: Arc<MockOptions>,
    outbox: Arc<RwLock<Vec<SentEmail>>>,
}

type ApiError = (StatusCode, Json<serde_json::Value>);

pub fn app() -> Router {
    app_with(MockOptions::default())
}

pub fn app_with(options: MockOptions) -> Router {
    let state = MockState {
        options: Arc::new(options),
        outbox: Arc::new(RwLock::new(Vec::new())),
    };
    Router::new()
        .route("/emails", get(list_emails).post(send_email))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, MockOptions::default()).await
}

pub async fn run_with(listener: TcpListener, options: MockOptions) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(options)).await
}

async fn list_emails(State(state): State<MockState>) -> Json<Vec<SentEmail>> {
    Json(state.outbox.read().await.clone())
}

async fn send_email(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(input): Json<SendEmail>,
) -> Result<Json<serde_json::Value>, ApiError> {
    authorize(&state.options, &headers)?;

    if input.to.is_empty() {
        return Err(refuse(
            StatusCode::UNPROCESSABLE_ENTITY,
            "validation_error",
            "Missing `to` field.",
        ));
    }
    if let Some(bad) = input.to.iter().find(|r| state.options.failing_recipients.contains(*r)) {
        tracing::debug!(recipient = %bad, "refusing message");
        return Err(refuse(
            StatusCode::UNPROCESSABLE_ENTITY,
            "validation_error",
            &format!("Recipient {bad} is not deliverable."),
        ));
    }

    let sent = SentEmail {
        id: Uuid::new_v4(),
        from: input.from,
        to: input.to,
        subject: input.subject,
        html: input.html,
        reply_to: input.reply_to,
    };
    let id = sent.id;
    state.outbox.write().await.push(sent);
    Ok(Json(json!({ "id": id })))
}

fn authorize(options: &MockOptions, headers: &HeaderMap) -> Result<(), ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    match (token, options.api_key.as_deref()) {
        (None, _) => Err(refuse(
            StatusCode::UNAUTHORIZED,
            "missing_api_key",
            "Missing API key in the authorization header.",
        )),
        (Some(got), Some(want)) if got != want => {
            Err(refuse(StatusCode::FORBIDDEN, "invalid_api_key", "API key is invalid."))
        }
        _ => Ok(()),
    }
}

fn refuse(status: StatusCode, name: &str, message: &str) -> ApiError {
    (status, Json(json!({ "statusCode": status.as_u16(), "name": name, "message": message })))
}
