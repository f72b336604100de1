//! Centralized error types using thiserror.
//!
//! Every stage (configuration, argument validation, template rendering,
//! SMTP transport) reports a typed error. The binary drivers map the
//! terminal error to a process exit code at the boundary only; the
//! `Display` output of each error is the exact diagnostic printed to
//! standard output.

use thiserror::Error;

/// Errors related to configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load config file: {0}")]
    LoadError(String),
    #[error("invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors related to notification argument validation.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// One or more required notification fields are missing or empty.
    /// The message text is part of the observable contract.
    #[error("Missing required parameters!")]
    MissingParameters,
}

/// Errors related to HTML template rendering.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("template render failed: {0}")]
    RenderFailed(String),
}

/// Errors related to SMTP delivery.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The SMTP server could not be reached. Carries the OS errno when the
    /// underlying socket error exposes one, so the process can exit with it.
    #[error("Unable to connect to SMTP server '{server}': {message}")]
    Connect {
        server: String,
        message: String,
        errno: Option<i32>,
    },
    /// The server was reached but refused the message (authentication,
    /// recipient rejection, ...).
    #[error("Cannot send mail using SMTP: {0}")]
    Send(String),
}

/// Top-level error for one notification run.
#[derive(Error, Debug)]
pub enum NotificationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("failed to build email message: {0}")]
    Message(String),
}

impl NotificationError {
    /// Process exit code for this error.
    ///
    /// Missing parameters exit with 2, an unreachable SMTP server exits
    /// with the OS errno of the socket failure, everything else exits 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            NotificationError::Validation(_) => 2,
            NotificationError::Transport(TransportError::Connect { errno, .. }) => {
                errno.unwrap_or(1)
            }
            _ => 1,
        }
    }
}
