//! `contact-server` - relay endpoint for the portfolio contact form.
//!
//! Receives `{name, email, message}` submissions, notifies the site owner
//! and confirms to the visitor through the configured `Mailer`.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod mailer;
pub mod relay;
pub mod routes;

use std::sync::Arc;

use axum::http::HeaderValue;
use contact_core::Sender;
use tokio::net::TcpListener;
use tracing::{error, info};

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use mailer::{build_mailer, MailError, Mailer};
pub use relay::{relay, RelayOutcome};
pub use routes::{app, CONTACT_PATH};

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub mailer: Arc<dyn Mailer>,
    pub sender: Arc<Sender>,
    pub allow_origin: HeaderValue,
}

impl AppState {
    /// State that allows any origin.
    pub fn new(mailer: Arc<dyn Mailer>, sender: Sender) -> Self {
        Self {
            mailer,
            sender: Arc::new(sender),
            allow_origin: HeaderValue::from_static("*"),
        }
    }

    /// # Errors
    ///
    /// Returns an error if `origin` is not a valid header value.
    pub fn with_allowed_origin(mut self, origin: &str) -> Result<Self> {
        self.allow_origin = HeaderValue::from_str(origin)
            .map_err(|_| Error::config(format!("invalid allowed origin: {origin:?}")))?;
        Ok(self)
    }

    /// Build the mailer and identity described by a validated config.
    ///
    /// # Errors
    ///
    /// Returns an error if the mail backend cannot be constructed.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mailer = build_mailer(&config.mail)?;
        Self::new(mailer, config.sender()).with_allowed_origin(&config.server.allowed_origin)
    }
}

/// Serve the relay until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the server fails while accepting connections.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(err) => {
            error!(error = %err, "cannot listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
