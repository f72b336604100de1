//! Top-level driver shared by the two notification binaries.
//!
//! Control flow is strictly linear: load config, validate arguments, fetch
//! charts, compose bodies, assemble the MIME message, send. Every stage
//! returns a typed error; this module prints the diagnostic to standard
//! output and maps the error to the process exit code at the boundary.

use lettre::message::Mailbox;
use tracing::info;

use crate::cli::NotificationCli;
use crate::compose::compose;
use crate::config::Config;
use crate::context::{NotificationContext, NotificationScope};
use crate::error::NotificationError;
use crate::graphite::GraphiteClient;
use crate::mail::{build_message, load_logo, EmailParts, EmailTransport, SmtpMailer};

/// Initialize the tracing subscriber.
///
/// Diagnostics that are part of the observable contract go to stdout via
/// `println!`; tracing carries supplementary detail on stderr and stays
/// quiet unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

/// Run one notification end to end and return the process exit code.
pub async fn run(scope: NotificationScope, cli: NotificationCli) -> i32 {
    match run_notification(scope, &cli).await {
        Ok(()) => 0,
        Err(e) => {
            println!("{e}");
            e.exit_code()
        }
    }
}

async fn run_notification(
    scope: NotificationScope,
    cli: &NotificationCli,
) -> Result<(), NotificationError> {
    let mut config = Config::load(&cli.config)?;
    config.apply_cli_overrides(cli);

    let context = NotificationContext::from_cli(scope, cli)?;

    let charts = GraphiteClient::new(reqwest::Client::new(), config.graphite_url.clone());
    let logo = load_logo(&config.logo_path);

    let composed = compose(&context, &config.icingaweb2_url, &charts, logo.is_some()).await?;

    if context.verbose {
        println!("{}", composed.html);
    }

    let from: Mailbox = config
        .mail_from
        .parse()
        .map_err(|e| NotificationError::Message(format!("invalid sender address: {e}")))?;
    let to: Mailbox = context
        .recipient
        .parse()
        .map_err(|e| NotificationError::Message(format!("invalid recipient address: {e}")))?;

    let message = build_message(&EmailParts {
        subject: composed.subject,
        from,
        to,
        text: composed.text,
        html: composed.html,
        logo,
    })?;

    let mailer = SmtpMailer::from_config(&config);
    mailer.send_email(message).await?;
    info!(recipient = %context.recipient, "Notification sent");

    Ok(())
}
