//! HTML mail notifications for Icinga 2 with embedded Graphite charts.
//!
//! Two binaries, `mail-host-notification` and `mail-service-notification`,
//! share this library: parse the notification parameters Icinga 2 passes
//! on the command line, compose plain-text and HTML bodies, fetch chart
//! images from a Graphite render endpoint, and deliver the result as a
//! multipart email over SMTP.

pub mod app;
pub mod cli;
pub mod compose;
pub mod config;
pub mod context;
pub mod error;
pub mod graphite;
pub mod mail;
pub mod perfdata;
pub mod template;

// Re-export commonly used types
pub use cli::NotificationCli;
pub use compose::{compose, ComposedMessage};
pub use config::{Config, SecretString};
pub use context::{NotificationContext, NotificationScope};
pub use error::NotificationError;
pub use graphite::{ChartRequest, ChartSource, GraphiteClient};
pub use mail::{build_message, EmailParts, EmailTransport, SmtpMailer};
pub use perfdata::{parse_perfdata, PerfDataPoint};
pub use template::{ChartRow, HtmlContext, MessageRenderer};
