//! Configuration for the relay server.
//!
//! Loaded with figment, later sources overriding earlier ones:
//! 1. Default values
//! 2. Optional TOML file passed with `--config`
//! 3. Environment variables prefixed with `CONTACT_`, nested on `__`
//!    (`CONTACT_MAIL__API_KEY`, `CONTACT_OWNER__EMAIL`, ...)
//! 4. The bare credential variables `EMAIL_API_KEY`, `SMTP_USERNAME` and
//!    `SMTP_PASSWORD`, which hosting platforms usually inject as secrets

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use axum::http::HeaderValue;
use contact_core::{is_valid_email, Sender};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const ENV_PREFIX: &str = "CONTACT_";

/// Unprefixed secrets and the config key each one fills.
const CREDENTIAL_ENV: &[(&str, &str)] = &[
    ("EMAIL_API_KEY", "mail.api_key"),
    ("SMTP_USERNAME", "mail.smtp_username"),
    ("SMTP_PASSWORD", "mail.smtp_password"),
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub mail: MailConfig,
    pub owner: OwnerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub bind: String,
    /// Value of `Access-Control-Allow-Origin`.
    pub allowed_origin: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailBackend {
    /// JSON email API over HTTPS.
    #[default]
    Http,
    /// SMTP submission with STARTTLS.
    Smtp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub backend: MailBackend,
    pub api_base_url: String,
    pub api_key: Option<String>,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    /// `From` address. Falls back to the SMTP username.
    pub from: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwnerConfig {
    /// Inbox that receives new submissions.
    pub email: String,
    /// Name used to sign confirmation emails.
    pub name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            allowed_origin: "*".to_string(),
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            backend: MailBackend::Http,
            api_base_url: "https://api.resend.com".to_string(),
            api_key: None,
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            smtp_username: None,
            smtp_password: None,
            from: None,
            timeout_secs: 10,
        }
    }
}

impl Default for OwnerConfig {
    fn default() -> Self {
        Self {
            email: String::new(),
            name: "Site Owner".to_string(),
        }
    }
}

impl MailConfig {
    /// Resolved `From` address, if any.
    #[must_use]
    pub fn from_address(&self) -> Option<&str> {
        self.from
            .as_deref()
            .or(self.smtp_username.as_deref())
            .filter(|s| !s.trim().is_empty())
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from all sources and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed or the result is invalid.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        Self::from_figment(Self::figment(config_path))
    }

    /// The layered provider stack, exposed so tests can inspect it.
    #[must_use]
    pub fn figment(config_path: Option<PathBuf>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }
        let names: Vec<&str> = CREDENTIAL_ENV.iter().map(|(name, _)| *name).collect();
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(Env::raw().only(&names).map(|key| credential_key(key.as_str()).into()))
    }

    /// # Errors
    ///
    /// Returns an error if extraction or validation fails.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;

        if HeaderValue::from_str(&self.server.allowed_origin).is_err() {
            return Err(Error::config(format!(
                "server.allowed_origin is not a valid header value: {:?}",
                self.server.allowed_origin
            )));
        }

        if !is_valid_email(self.owner.email.trim()) {
            return Err(Error::config("owner.email must be a valid email address"));
        }

        match self.mail.backend {
            MailBackend::Http => {
                if is_blank(self.mail.api_key.as_deref()) {
                    return Err(Error::config(
                        "mail.api_key is required for the http backend (set EMAIL_API_KEY)",
                    ));
                }
                if self.mail.api_base_url.trim().is_empty() {
                    return Err(Error::config("mail.api_base_url must not be empty"));
                }
            }
            MailBackend::Smtp => {
                if is_blank(self.mail.smtp_username.as_deref())
                    || is_blank(self.mail.smtp_password.as_deref())
                {
                    return Err(Error::config(
                        "mail.smtp_username and mail.smtp_password are required \
                         for the smtp backend",
                    ));
                }
            }
        }

        if self.mail.from_address().is_none() {
            return Err(Error::config("mail.from is required"));
        }

        if self.mail.timeout_secs == 0 {
            return Err(Error::config("mail.timeout_secs must be greater than 0"));
        }

        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if `server.bind` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .map_err(|_| {
                Error::config(format!(
                    "server.bind is not a socket address: {}",
                    self.server.bind
                ))
            })
    }

    /// Identity for outgoing mail. Only meaningful on a validated config.
    #[must_use]
    pub fn sender(&self) -> Sender {
        Sender {
            from: self.mail.from_address().unwrap_or_default().to_string(),
            owner_email: self.owner.email.trim().to_string(),
            owner_name: self.owner.name.clone(),
        }
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

fn credential_key(name: &str) -> String {
    CREDENTIAL_ENV
        .iter()
        .find(|(env, _)| env.eq_ignore_ascii_case(name))
        .map_or_else(|| name.to_string(), |(_, key)| (*key).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    fn valid() -> Config {
        let mut config = Config::default();
        config.owner.email = "owner@example.com".to_string();
        config.mail.api_key = Some("key".to_string());
        config.mail.from = Some("site@example.com".to_string());
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.server.allowed_origin, "*");
        assert_eq!(config.mail.backend, MailBackend::Http);
        assert_eq!(config.mail.smtp_port, 587);
        assert_eq!(config.mail.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_default_is_incomplete() {
        assert!(Config::default().validate().is_err());
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_validate_requires_api_key_for_http() {
        let mut config = valid();
        config.mail.api_key = Some("  ".to_string());
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("mail.api_key"));
    }

    #[test]
    fn test_validate_requires_smtp_credentials() {
        let mut config = valid();
        config.mail.backend = MailBackend::Smtp;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("smtp_username"));

        config.mail.smtp_username = Some("me@gmail.com".to_string());
        config.mail.smtp_password = Some("app-password".to_string());
        assert!(config.validate().is_ok());

        config.mail.smtp_password = Some("  ".to_string());
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("smtp_password"));
    }

    #[test]
    fn test_from_falls_back_to_smtp_username() {
        let mut config = valid();
        config.mail.from = None;
        config.mail.smtp_username = Some("me@gmail.com".to_string());
        assert_eq!(config.mail.from_address(), Some("me@gmail.com"));
        assert_eq!(config.sender().from, "me@gmail.com");
    }

    #[test]
    fn test_validate_rejects_bad_owner_email() {
        let mut config = valid();
        config.owner.email = "owner".to_string();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("owner.email"));
    }

    #[test]
    fn test_validate_rejects_bad_bind() {
        let mut config = valid();
        config.server.bind = "localhost".to_string();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("server.bind"));
    }

    #[test]
    fn test_validate_rejects_bad_origin() {
        let mut config = valid();
        config.server.allowed_origin = "bad\norigin".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sender_uses_owner_settings() {
        let mut config = valid();
        config.owner.name = "Sam Owner".to_string();
        let sender = config.sender();
        assert_eq!(sender.owner_email, "owner@example.com");
        assert_eq!(sender.owner_name, "Sam Owner");
        assert_eq!(sender.from, "site@example.com");
    }

    #[test]
    fn test_credential_key_mapping() {
        assert_eq!(credential_key("email_api_key"), "mail.api_key");
        assert_eq!(credential_key("SMTP_PASSWORD"), "mail.smtp_password");
    }

    #[test]
    fn test_load_layers_file_and_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "contact.toml",
                r#"
                [server]
                bind = "0.0.0.0:9000"

                [mail]
                from = "site@example.com"
                api_key = "from-file"

                [owner]
                email = "owner@example.com"
                name = "Sam Owner"
                "#,
            )?;
            jail.set_env("CONTACT_SERVER__ALLOWED_ORIGIN", "https://example.com");
            jail.set_env("EMAIL_API_KEY", "from-env");

            let config =
                Config::load_from(Some(PathBuf::from("contact.toml"))).expect("config loads");
            assert_eq!(config.server.bind, "0.0.0.0:9000");
            assert_eq!(config.server.allowed_origin, "https://example.com");
            assert_eq!(config.mail.api_key.as_deref(), Some("from-env"));
            assert_eq!(config.owner.name, "Sam Owner");
            Ok(())
        });
    }

    #[test]
    fn test_load_selects_smtp_backend_from_env() {
        Jail::expect_with(|jail| {
            jail.set_env("CONTACT_MAIL__BACKEND", "smtp");
            jail.set_env("CONTACT_OWNER__EMAIL", "owner@example.com");
            jail.set_env("SMTP_USERNAME", "me@gmail.com");
            jail.set_env("SMTP_PASSWORD", "app-password");

            let config = Config::load_from(None).expect("config loads");
            assert_eq!(config.mail.backend, MailBackend::Smtp);
            assert_eq!(config.mail.from_address(), Some("me@gmail.com"));
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_empty_smtp_password() {
        Jail::expect_with(|jail| {
            jail.set_env("CONTACT_MAIL__BACKEND", "smtp");
            jail.set_env("CONTACT_OWNER__EMAIL", "owner@example.com");
            jail.set_env("SMTP_USERNAME", "me@gmail.com");
            jail.set_env("SMTP_PASSWORD", "");

            let err = Config::load_from(None).unwrap_err();
            assert!(matches!(err, Error::ConfigValidation { .. }));
            Ok(())
        });
    }

    #[test]
    fn test_load_reports_missing_owner() {
        Jail::expect_with(|jail| {
            jail.set_env("EMAIL_API_KEY", "k");
            jail.set_env("CONTACT_MAIL__FROM", "site@example.com");
            let err = Config::load_from(None).unwrap_err();
            assert!(matches!(err, Error::ConfigValidation { .. }));
            Ok(())
        });
    }
}
