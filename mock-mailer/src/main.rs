//! Standalone fake email API for local development.
//!
//! `PORT` (default 3001) picks the port, `MOCK_MAILER_API_KEY` turns on the
//! bearer check and `MOCK_MAILER_FAIL` is a comma-separated list of
//! recipients to refuse.

use std::env;

use mock_mailer::MockOptions;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn parse_options(api_key: Option<&str>, failing: Option<&str>) -> MockOptions {
    let mut options = MockOptions::default();
    if let Some(key) = api_key.map(str::trim).filter(|k| !k.is_empty()) {
        options = options.with_api_key(key);
    }
    for recipient in failing
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
    {
        options = options.failing(recipient);
    }
    options
}

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mock_mailer=info")),
        )
        .init();

    let port = env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("127.0.0.1:{port}");
    let api_key = env::var("MOCK_MAILER_API_KEY").ok();
    let failing = env::var("MOCK_MAILER_FAIL").ok();
    let options = parse_options(api_key.as_deref(), failing.as_deref());
    let listener = TcpListener::bind(&addr).await?;
    info!(
        %addr,
        auth = options.api_key.is_some(),
        failing = options.failing_recipients.len(),
        "mock mailer listening"
    );
    mock_mailer::run_with(listener, options).await
}
