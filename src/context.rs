//! Notification context: the validated, immutable view of one monitoring
//! event.
//!
//! Constructed once from the CLI arguments at startup and read-only
//! afterwards. The host and service variants share the structure; the
//! scope decides which fields are required and how the subject line and
//! body rows are phrased.

use crate::cli::NotificationCli;
use crate::error::ValidationError;

/// Which notification binary is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationScope {
    Host,
    Service,
}

/// Validated fields of one host or service state-change event.
#[derive(Debug, Clone)]
pub struct NotificationContext {
    pub scope: NotificationScope,
    pub notification_type: String,
    pub long_date_time: String,
    pub host_name: String,
    pub host_display_name: String,
    /// Defaults to the host name when `--hostaddress` is absent or empty.
    pub host_address: String,
    pub host_address6: Option<String>,
    /// Service object name; optional for the host variant.
    pub service_name: Option<String>,
    /// Service display name; required for the service variant.
    pub service_display_name: Option<String>,
    pub state: String,
    pub output: String,
    pub author: Option<String>,
    pub comment: Option<String>,
    /// Raw performance data string, untouched until composition.
    pub perfdata: Option<String>,
    pub recipient: String,
    pub verbose: bool,
}

/// A present, non-empty field; anything else is a validation failure.
fn required(value: &Option<String>) -> Result<String, ValidationError> {
    match value {
        Some(s) if !s.is_empty() => Ok(s.clone()),
        _ => Err(ValidationError::MissingParameters),
    }
}

/// Empty strings collapse to `None` for the optional fields.
fn optional(value: &Option<String>) -> Option<String> {
    value.clone().filter(|s| !s.is_empty())
}

impl NotificationContext {
    /// Validate the CLI arguments for the given scope.
    ///
    /// # Errors
    /// Returns [`ValidationError::MissingParameters`] when any required
    /// field is absent or empty.
    pub fn from_cli(
        scope: NotificationScope,
        cli: &NotificationCli,
    ) -> Result<Self, ValidationError> {
        let notification_type = required(&cli.notificationtype)?;
        let long_date_time = required(&cli.longdatetime)?;
        let host_name = required(&cli.hostname)?;
        let host_display_name = required(&cli.hostdisplayname)?;
        let output = required(&cli.serviceoutput)?;
        let recipient = required(&cli.useremail)?;
        let state = required(&cli.servicestate)?;

        let (service_name, service_display_name) = match scope {
            NotificationScope::Service => (
                Some(required(&cli.servicename)?),
                Some(required(&cli.servicedisplayname)?),
            ),
            NotificationScope::Host => (optional(&cli.servicename), optional(&cli.servicedisplayname)),
        };

        let host_address = optional(&cli.hostaddress).unwrap_or_else(|| host_name.clone());

        Ok(Self {
            scope,
            notification_type,
            long_date_time,
            host_name,
            host_display_name,
            host_address,
            host_address6: optional(&cli.hostaddress6),
            service_name,
            service_display_name,
            state,
            output,
            author: optional(&cli.notificationauthorname),
            comment: optional(&cli.notificationcomment),
            perfdata: optional(&cli.serviceperfdata),
            recipient,
            verbose: cli.verbose.as_deref() == Some("true"),
        })
    }

    /// Subject line for the assembled email.
    pub fn subject(&self) -> String {
        match self.scope {
            NotificationScope::Host => format!(
                "{} - HOST {} is {}",
                self.notification_type, self.host_display_name, self.state
            ),
            NotificationScope::Service => format!(
                "{} - {} - {} is {}",
                self.notification_type,
                self.host_display_name,
                self.service_display_name.as_deref().unwrap_or_default(),
                self.state
            ),
        }
    }

    /// Comment row contents, present only when both author and comment are
    /// non-empty.
    pub fn comment_pair(&self) -> Option<(&str, &str)> {
        match (self.author.as_deref(), self.comment.as_deref()) {
            (Some(author), Some(comment)) => Some((author, comment)),
            _ => None,
        }
    }
}
