//! HTTP surface of the relay.
//!
//! # Design
//! CORS is handled by one middleware: preflight `OPTIONS` requests are
//! answered directly, and every other response gets the allow headers added
//! on the way out. Error bodies always use the `{error, details}` shape so
//! the form can show `details` verbatim.

use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use contact_core::{ContactRequest, ContactResponse};
use serde_json::json;
use tracing::warn;

use crate::relay::{relay, RelayOutcome};
use crate::AppState;

pub const CONTACT_PATH: &str = "/send-contact-email";

const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";
const ALLOW_METHODS: &str = "POST, OPTIONS";

pub fn app(state: AppState) -> Router {
    Router::new()
        .route(CONTACT_PATH, post(send_contact_email))
        .route("/health", get(health))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), cors))
        .with_state(state)
}

async fn cors(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let preflight = request.method() == Method::OPTIONS;
    let mut response = if preflight {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, state.allow_origin.clone());
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS));
    if preflight {
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
    }
    response
}

async fn send_contact_email(
    State(state): State<AppState>,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let details = rejection.body_text();
            warn!(%details, "unreadable contact request body");
            return (
                StatusCode::BAD_REQUEST,
                Json(ContactResponse::failure("Invalid data", details)),
            )
                .into_response();
        }
    };

    relay(state.mailer.as_ref(), &state.sender, request).await.into_response()
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn not_found() -> (StatusCode, Json<ContactResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ContactResponse::failure("Not found", "No such endpoint")),
    )
}

impl IntoResponse for RelayOutcome {
    fn into_response(self) -> Response {
        match self {
            RelayOutcome::Invalid(err) => (
                StatusCode::BAD_REQUEST,
                Json(ContactResponse::failure(err.label(), err.to_string())),
            )
                .into_response(),
            RelayOutcome::Delivered { owner, sender } => {
                (StatusCode::OK, Json(ContactResponse::delivered(owner, sender))).into_response()
            }
            RelayOutcome::PartialSuccess { owner, reason } => {
                (StatusCode::OK, Json(ContactResponse::partial(owner, reason))).into_response()
            }
            RelayOutcome::Failed(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ContactResponse::failure("Failed to send email", details)),
            )
                .into_response(),
        }
    }
}
