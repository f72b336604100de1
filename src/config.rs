//! Deployment configuration: sender address, SMTP relay, base URLs.
//!
//! Loaded once at startup from a YAML file and passed down explicitly.
//! A missing file is not an error: the compiled-in defaults match a
//! standard single-box Icinga 2 deployment with a local relay.

use crate::cli::NotificationCli;
use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/icinga2/mail-graphite.yaml";

/// Icinga Web 2 ships its logo here; absence silently omits the logo row.
pub const DEFAULT_LOGO_PATH: &str = "/usr/share/icingaweb2/public/img/icinga-logo.png";

/// Wrapper for secrets that never appears in logs.
///
/// `Debug` and `Display` always show `[REDACTED]` instead of the value.
#[derive(Clone)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(s: String) -> Self {
        SecretString(s)
    }

    /// Exposes the underlying secret value. Never pass the result to
    /// logging functions.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl std::fmt::Display for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(SecretString::new(s))
    }
}

/// SMTP relay settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    /// Relay host name.
    pub host: String,
    /// Relay port.
    pub port: u16,
    /// Optional login; authentication happens only when both username and
    /// password are configured non-empty.
    pub username: Option<String>,
    pub password: Option<SecretString>,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 25,
            username: None,
            password: None,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Envelope and header sender address.
    pub mail_from: String,
    /// SMTP relay settings.
    pub smtp: SmtpConfig,
    /// Icinga Web 2 base URL for the clickable links in the HTML body.
    pub icingaweb2_url: String,
    /// Graphite render endpoint base URL.
    pub graphite_url: String,
    /// Logo image attached inline when the file exists.
    pub logo_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mail_from: "icinga@icinga2.fqdn.here".to_string(),
            smtp: SmtpConfig::default(),
            icingaweb2_url: "http://icinga2.fqdn.here/icingaweb2".to_string(),
            graphite_url: "http://graphite.fqdn.here/render".to_string(),
            logo_path: PathBuf::from(DEFAULT_LOGO_PATH),
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    ///
    /// A nonexistent file yields the defaults; an unreadable or invalid
    /// file is an error.
    ///
    /// # Errors
    /// Returns [`ConfigError::LoadError`] if the file cannot be read.
    /// Returns [`ConfigError::ValidationError`] if the YAML is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadError(format!("{}: {}", path.display(), e)))?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    /// Apply command-line overrides. A flag that was given wins over both
    /// the file value and the compiled-in default; an absent flag leaves
    /// the configuration untouched.
    pub fn apply_cli_overrides(&mut self, cli: &NotificationCli) {
        if let Some(mail_from) = &cli.mailfrom {
            self.mail_from = mail_from.clone();
        }
        if let Some(url) = &cli.icingaweb2url {
            self.icingaweb2_url = url.clone();
        }
    }

    /// Whether the relay wants authentication: both credentials present and
    /// non-empty.
    pub fn smtp_credentials(&self) -> Option<(String, String)> {
        match (&self.smtp.username, &self.smtp.password) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.expose().is_empty() => {
                Some((user.clone(), pass.expose().to_string()))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_reference_deployment() {
        let config = Config::default();
        assert_eq!(config.mail_from, "icinga@icinga2.fqdn.here");
        assert_eq!(config.smtp.host, "localhost");
        assert_eq!(config.smtp.port, 25);
        assert_eq!(config.icingaweb2_url, "http://icinga2.fqdn.here/icingaweb2");
        assert_eq!(config.graphite_url, "http://graphite.fqdn.here/render");
        assert_eq!(config.logo_path, PathBuf::from(DEFAULT_LOGO_PATH));
        assert!(config.smtp_credentials().is_none());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = Config::load(Path::new("/nonexistent/mail-graphite.yaml")).unwrap();
        assert_eq!(config.smtp.host, "localhost");
    }

    #[test]
    fn loads_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "mail_from: icinga@mon.example.org\n\
             icingaweb2_url: https://mon.example.org/icingaweb2\n\
             graphite_url: https://graphite.example.org/render\n\
             smtp:\n\
             \x20 host: mail.example.org\n\
             \x20 port: 587\n\
             \x20 username: icinga\n\
             \x20 password: hunter2"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.mail_from, "icinga@mon.example.org");
        assert_eq!(config.smtp.host, "mail.example.org");
        assert_eq!(config.smtp.port, 587);
        assert_eq!(
            config.smtp_credentials(),
            Some(("icinga".to_string(), "hunter2".to_string()))
        );
        // Unset field keeps its default
        assert_eq!(config.logo_path, PathBuf::from(DEFAULT_LOGO_PATH));
    }

    #[test]
    fn cli_flags_override_file_values_and_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "mail_from: icinga@mon.example.org\n\
             icingaweb2_url: https://mon.example.org/icingaweb2"
        )
        .unwrap();

        let mut config = Config::load(file.path()).unwrap();
        let cli = NotificationCli {
            mailfrom: Some("alerts@override.example.org".to_string()),
            icingaweb2url: Some("https://override.example.org/icingaweb2".to_string()),
            ..Default::default()
        };
        config.apply_cli_overrides(&cli);

        assert_eq!(config.mail_from, "alerts@override.example.org");
        assert_eq!(config.icingaweb2_url, "https://override.example.org/icingaweb2");

        // Also wins over the compiled-in defaults when no file is involved
        let mut defaults = Config::default();
        defaults.apply_cli_overrides(&cli);
        assert_eq!(defaults.mail_from, "alerts@override.example.org");
    }

    #[test]
    fn absent_cli_flags_leave_config_untouched() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "mail_from: icinga@mon.example.org\n\
             icingaweb2_url: https://mon.example.org/icingaweb2"
        )
        .unwrap();

        let mut config = Config::load(file.path()).unwrap();
        config.apply_cli_overrides(&NotificationCli::default());

        assert_eq!(config.mail_from, "icinga@mon.example.org");
        assert_eq!(config.icingaweb2_url, "https://mon.example.org/icingaweb2");
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "smtp: [not, a, mapping").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn empty_credentials_do_not_authenticate() {
        let mut config = Config::default();
        config.smtp.username = Some(String::new());
        config.smtp.password = Some(SecretString::new(String::new()));
        assert!(config.smtp_credentials().is_none());

        config.smtp.username = Some("icinga".to_string());
        config.smtp.password = None;
        assert!(config.smtp_credentials().is_none());
    }

    #[test]
    fn password_never_leaks_in_debug_output() {
        let mut config = Config::default();
        config.smtp.password = Some(SecretString::new("super-secret".to_string()));

        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
