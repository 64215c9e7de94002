//! JSON email API backend.
//!
//! `ProviderClient` decides what goes on the wire; this module only moves
//! the bytes with reqwest.

use std::time::Duration;

use async_trait::async_trait;
use contact_core::{
    EmailReceipt, HttpMethod, HttpRequest, HttpResponse, OutboundEmail, ProviderClient,
};
use tracing::debug;

use super::{MailError, Mailer};

#[derive(Debug, Clone)]
pub struct HttpMailer {
    client: ProviderClient,
    http: reqwest::Client,
}

impl HttpMailer {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, MailError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MailError::Transport(e.to_string()))?;
        Ok(Self {
            client: ProviderClient::new(base_url, api_key),
            http,
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<EmailReceipt, MailError> {
        let request = self.client.build_send(email)?;
        let response = execute(&self.http, request).await?;
        debug!(status = response.status, to = %email.to, "provider answered");
        Ok(self.client.parse_send(response)?)
    }
}

async fn execute(http: &reqwest::Client, request: HttpRequest) -> Result<HttpResponse, MailError> {
    let method = match request.method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
    };

    let mut builder = http.request(method, &request.url);
    for (name, value) in &request.headers {
        builder = builder.header(name, value);
    }
    if let Some(body) = request.body {
        builder = builder.body(body);
    }

    let response = builder.send().await.map_err(|e| MailError::Transport(e.to_string()))?;
    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
        .collect();
    let body = response.text().await.map_err(|e| MailError::Transport(e.to_string()))?;

    Ok(HttpResponse { status, headers, body })
}
