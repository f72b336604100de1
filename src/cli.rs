//! Command-line interface using clap.
//!
//! Icinga 2 invokes the notification binaries with named parameters; every
//! monitoring field is optional at the parser layer and checked in
//! [`crate::context::NotificationContext`], so an incomplete invocation
//! produces the monitoring-friendly diagnostic and exit code 2 instead of a
//! clap usage error.

use clap::Parser;
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_PATH;

/// Mail notification parameters passed by Icinga 2.
#[derive(Parser, Debug, Default)]
#[command(version)]
#[command(about = "HTML mail notifications for Icinga 2 with embedded Graphite charts")]
pub struct NotificationCli {
    /// Icinga long date/time of the event.
    #[arg(short = 'd', long = "longdatetime")]
    pub longdatetime: Option<String>,

    /// Host object name.
    #[arg(short = 'l', long = "hostname")]
    pub hostname: Option<String>,

    /// Host display name.
    #[arg(short = 'n', long = "hostdisplayname")]
    pub hostdisplayname: Option<String>,

    /// Check plugin output.
    #[arg(short = 'o', long = "serviceoutput")]
    pub serviceoutput: Option<String>,

    /// Recipient email address.
    #[arg(short = 'r', long = "useremail")]
    pub useremail: Option<String>,

    /// Host or service state.
    #[arg(short = 's', long = "servicestate")]
    pub servicestate: Option<String>,

    /// Notification type (PROBLEM, RECOVERY, ...).
    #[arg(short = 't', long = "notificationtype")]
    pub notificationtype: Option<String>,

    /// Host IPv4 address; defaults to the host name when unset.
    #[arg(short = '4', long = "hostaddress")]
    pub hostaddress: Option<String>,

    /// Host IPv6 address.
    #[arg(short = '6', long = "hostaddress6")]
    pub hostaddress6: Option<String>,

    /// Author of a manual notification comment.
    #[arg(short = 'b', long = "notificationauthorname")]
    pub notificationauthorname: Option<String>,

    /// Manual notification comment.
    #[arg(short = 'c', long = "notificationcomment")]
    pub notificationcomment: Option<String>,

    /// Icinga Web 2 base URL override.
    #[arg(short = 'i', long = "icingaweb2url")]
    pub icingaweb2url: Option<String>,

    /// Sender address override.
    #[arg(short = 'f', long = "mailfrom")]
    pub mailfrom: Option<String>,

    /// Print the generated HTML to stdout when set to the literal "true".
    #[arg(short = 'v', long = "verbose")]
    pub verbose: Option<String>,

    /// Raw performance data string.
    #[arg(short = 'p', long = "serviceperfdata")]
    pub serviceperfdata: Option<String>,

    /// Service object name.
    #[arg(short = 'e', long = "servicename")]
    pub servicename: Option<String>,

    /// Service display name (required by the service variant).
    #[arg(short = 'u', long = "servicedisplayname")]
    pub servicedisplayname: Option<String>,

    /// Path to configuration file.
    #[arg(long = "config", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
}
