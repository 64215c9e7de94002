//! Error types for the relay server.
//!
//! Delivery failures during a request are not errors at this level; they
//! become a `RelayOutcome`. `Error` covers what stops the server from
//! starting: configuration and socket problems.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// The configured mail backend could not be constructed.
    #[error("failed to set up mail backend: {0}")]
    MailerSetup(String),

    /// Socket or file system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }
}
