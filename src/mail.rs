//! MIME assembly and SMTP delivery.
//!
//! The message is a `multipart/related` container holding the
//! `multipart/alternative` pair (plain text + HTML) and, when the Icinga
//! Web 2 logo exists on disk, one inline PNG bound to the content-id the
//! HTML references. Chart images live inside the HTML as data URIs and are
//! never separate MIME parts.
//!
//! The [`EmailTransport`] trait abstracts delivery so tests can capture
//! messages without an SMTP server.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::path::Path;

use crate::config::Config;
use crate::error::{NotificationError, TransportError};
use crate::template::LOGO_CONTENT_ID;

/// Everything needed to assemble one outgoing message.
#[derive(Debug, Clone)]
pub struct EmailParts {
    pub subject: String,
    pub from: Mailbox,
    pub to: Mailbox,
    pub text: String,
    pub html: String,
    /// Raw PNG bytes of the logo, when the asset exists.
    pub logo: Option<Vec<u8>>,
}

/// Read the logo asset. Absence is not an error, it just omits the inline
/// image; any other read failure is logged and treated the same way.
pub fn load_logo(path: &Path) -> Option<Vec<u8>> {
    match std::fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read logo image");
            None
        }
    }
}

/// Assemble the nested MIME structure.
pub fn build_message(parts: &EmailParts) -> Result<Message, NotificationError> {
    let alternative = MultiPart::alternative_plain_html(parts.text.clone(), parts.html.clone());

    let body = match &parts.logo {
        Some(bytes) => {
            let png = ContentType::parse("image/png")
                .map_err(|e| NotificationError::Message(e.to_string()))?;
            MultiPart::related().multipart(alternative).singlepart(
                Attachment::new_inline(LOGO_CONTENT_ID.to_string()).body(bytes.clone(), png),
            )
        }
        None => MultiPart::related().multipart(alternative),
    };

    Message::builder()
        .from(parts.from.clone())
        .to(parts.to.clone())
        .subject(parts.subject.clone())
        .multipart(body)
        .map_err(|e| NotificationError::Message(e.to_string()))
}

/// Async email transport abstraction for testability.
#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn send_email(&self, message: Message) -> Result<(), TransportError>;
}

/// Production SMTP transport.
///
/// The relay is a plain (non-TLS) connection as used with a localhost
/// submission relay; credentials are attached only when the configuration
/// carries both a username and a password.
pub struct SmtpMailer {
    inner: AsyncSmtpTransport<Tokio1Executor>,
    server: String,
}

impl SmtpMailer {
    pub fn from_config(config: &Config) -> Self {
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp.host)
                .port(config.smtp.port);

        if let Some((username, password)) = config.smtp_credentials() {
            builder = builder.credentials(Credentials::new(username, password));
        }

        Self {
            inner: builder.build(),
            server: config.smtp.host.clone(),
        }
    }
}

/// Walk the error source chain for the first `std::io::Error`.
fn find_io_error<'a>(err: &'a (dyn std::error::Error + 'static)) -> Option<&'a std::io::Error> {
    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(io) = cause.downcast_ref::<std::io::Error>() {
            return Some(io);
        }
        source = cause.source();
    }
    None
}

/// Whether the I/O error means the connection to the relay could not be
/// established. A socket that drops mid-session (broken pipe, unexpected
/// EOF) is a send failure, not a connect failure.
fn is_connect_failure(kind: std::io::ErrorKind) -> bool {
    use std::io::ErrorKind;
    matches!(
        kind,
        ErrorKind::ConnectionRefused
            | ErrorKind::TimedOut
            | ErrorKind::HostUnreachable
            | ErrorKind::NetworkUnreachable
            | ErrorKind::AddrNotAvailable
    )
}

#[async_trait]
impl EmailTransport for SmtpMailer {
    async fn send_email(&self, message: Message) -> Result<(), TransportError> {
        match self.inner.send(message).await {
            Ok(response) => {
                tracing::debug!(code = %response.code(), "SMTP accepted message");
                Ok(())
            }
            Err(e) => match find_io_error(&e) {
                Some(io) if is_connect_failure(io.kind()) => Err(TransportError::Connect {
                    server: self.server.clone(),
                    message: e.to_string(),
                    errno: io.raw_os_error(),
                }),
                _ => Err(TransportError::Send(e.to_string())),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock transport recording every message handed to it.
    pub struct MockEmailTransport {
        sent: Mutex<Vec<Message>>,
        fail_with: Mutex<Option<TransportError>>,
    }

    impl MockEmailTransport {
        pub fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail_with: Mutex::new(None),
            }
        }

        pub fn fail_with(&self, error: TransportError) {
            *self.fail_with.lock().unwrap() = Some(error);
        }

        pub fn sent(&self) -> Vec<Message> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EmailTransport for MockEmailTransport {
        async fn send_email(&self, message: Message) -> Result<(), TransportError> {
            if let Some(err) = self.fail_with.lock().unwrap().take() {
                return Err(err);
            }
            self.sent.lock().unwrap().push(message);
            Ok(())
        }
    }

    fn parts(logo: Option<Vec<u8>>) -> EmailParts {
        EmailParts {
            subject: "PROBLEM - HOST web01 is DOWN".to_string(),
            from: "icinga@icinga2.fqdn.here".parse().unwrap(),
            to: "ops@example.org".parse().unwrap(),
            text: "***** Icinga  *****".to_string(),
            html: "<html><body>alert</body></html>".to_string(),
            logo,
        }
    }

    #[test]
    fn message_without_logo_has_no_inline_part() {
        let message = build_message(&parts(None)).unwrap();
        let raw = String::from_utf8_lossy(&message.formatted()).to_string();

        assert!(raw.contains("multipart/related"));
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("text/plain"));
        assert!(raw.contains("text/html"));
        assert!(!raw.contains("Content-ID"));
        assert!(!raw.contains("image/png"));
    }

    #[test]
    fn message_with_logo_binds_content_id() {
        let message = build_message(&parts(Some(vec![0x89, b'P', b'N', b'G']))).unwrap();
        let raw = String::from_utf8_lossy(&message.formatted()).to_string();

        assert!(raw.contains("image/png"));
        assert!(raw.contains("<icinga2_logo>"));
        assert!(raw.contains("inline"));
    }

    #[test]
    fn message_headers_carry_subject_and_addresses() {
        let message = build_message(&parts(None)).unwrap();
        let raw = String::from_utf8_lossy(&message.formatted()).to_string();

        assert!(raw.contains("Subject: PROBLEM - HOST web01 is DOWN"));
        assert!(raw.contains("icinga@icinga2.fqdn.here"));
        assert!(raw.contains("ops@example.org"));
    }

    #[test]
    fn load_logo_missing_file_is_none() {
        assert!(load_logo(Path::new("/nonexistent/icinga-logo.png")).is_none());
    }

    #[test]
    fn load_logo_reads_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        std::fs::write(&path, b"png-bytes").unwrap();
        assert_eq!(load_logo(&path), Some(b"png-bytes".to_vec()));
    }

    #[tokio::test]
    async fn mock_transport_records_messages() {
        let transport = MockEmailTransport::new();
        let message = build_message(&parts(None)).unwrap();
        transport.send_email(message).await.unwrap();
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn mock_transport_reports_failure() {
        let transport = MockEmailTransport::new();
        transport.fail_with(TransportError::Send("552 too big".to_string()));
        let message = build_message(&parts(None)).unwrap();
        let err = transport.send_email(message).await.unwrap_err();
        assert!(matches!(err, TransportError::Send(_)));
    }

    #[derive(Debug)]
    struct Wrapper(std::io::Error);
    impl std::fmt::Display for Wrapper {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "wrapped: {}", self.0)
        }
    }
    impl std::error::Error for Wrapper {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn find_io_error_walks_the_source_chain() {
        // ECONNREFUSED
        let err = Wrapper(std::io::Error::from_raw_os_error(111));
        let io = find_io_error(&err).unwrap();
        assert_eq!(io.raw_os_error(), Some(111));

        let plain = std::fmt::Error;
        assert!(find_io_error(&plain).is_none());
    }

    #[test]
    fn connection_refused_counts_as_connect_failure() {
        let io = std::io::Error::from_raw_os_error(111);
        assert_eq!(io.kind(), std::io::ErrorKind::ConnectionRefused);
        assert!(is_connect_failure(io.kind()));
        assert!(is_connect_failure(std::io::ErrorKind::TimedOut));
    }

    #[test]
    fn mid_session_socket_errors_are_send_failures() {
        // EPIPE: the relay was reached, the session broke afterwards
        let io = std::io::Error::from_raw_os_error(32);
        assert_eq!(io.kind(), std::io::ErrorKind::BrokenPipe);
        assert!(!is_connect_failure(io.kind()));
        assert!(!is_connect_failure(std::io::ErrorKind::UnexpectedEof));
        assert!(!is_connect_failure(std::io::ErrorKind::ConnectionReset));
    }
}
