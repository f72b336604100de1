//! Host notification entry point.

use clap::Parser;

use icinga_mail_graphite::app;
use icinga_mail_graphite::cli::NotificationCli;
use icinga_mail_graphite::context::NotificationScope;

#[tokio::main]
async fn main() {
    app::init_logging();
    let cli = NotificationCli::parse();
    let code = app::run(NotificationScope::Host, cli).await;
    std::process::exit(code);
}
