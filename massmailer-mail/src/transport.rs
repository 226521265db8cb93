//! Email transport implementations.

use async_trait::async_trait;
use lettre::{
    transport::smtp::authentication::Credentials, AsyncSmtpTransport, AsyncTransport,
    Tokio1Executor,
};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::{Address, MailError, Message, Result};

/// Outcome of a single transport attempt.
///
/// A transport that reached the server but had recipients refused reports
/// them here; connection-level problems are returned as errors instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Recipients the transport refused, in message order.
    pub rejected: Vec<Address>,
}

impl Delivery {
    /// Every recipient was accepted.
    pub fn accepted() -> Self {
        Self::default()
    }

    /// The given recipients were refused.
    pub fn rejected(rejected: Vec<Address>) -> Self {
        Self { rejected }
    }

    /// Whether no recipient was refused.
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Email transport trait.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver a fully built message.
    async fn send(&self, message: &Message) -> Result<Delivery>;

    /// Check if the transport is healthy.
    async fn is_healthy(&self) -> bool {
        true
    }
}

/// SMTP security mode.
///
/// Names follow `MAIL_ENCRYPTION`: `tls` is a STARTTLS upgrade, `ssl` is
/// implicit TLS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// No encryption (port 25, not recommended).
    None,
    /// STARTTLS upgrade (port 587).
    #[default]
    #[serde(alias = "tls")]
    StartTls,
    /// Implicit TLS (port 465).
    #[serde(rename = "ssl", alias = "smtps")]
    Tls,
}

impl SmtpSecurity {
    /// Parse the `MAIL_ENCRYPTION` style names (`tls`, `ssl`, `starttls`, `none`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "" | "none" | "null" => Some(Self::None),
            "tls" | "starttls" => Some(Self::StartTls),
            "ssl" | "smtps" => Some(Self::Tls),
            _ => None,
        }
    }

    /// Conventional port for this mode.
    pub fn default_port(self) -> u16 {
        match self {
            Self::None => 25,
            Self::StartTls => 587,
            Self::Tls => 465,
        }
    }
}

/// SMTP configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    /// SMTP server host.
    pub host: String,
    /// SMTP server port.
    pub port: u16,
    /// Security mode.
    pub security: SmtpSecurity,
    /// Username for authentication.
    pub username: Option<String>,
    /// Password for authentication.
    pub password: Option<String>,
    /// Connection timeout.
    #[serde(with = "seconds")]
    pub timeout: Duration,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self::new("localhost")
    }
}

impl SmtpConfig {
    /// Create a new SMTP configuration.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 587,
            security: SmtpSecurity::StartTls,
            username: None,
            password: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Set credentials.
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set the port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the security mode without touching the port.
    pub fn security(mut self, security: SmtpSecurity) -> Self {
        self.security = security;
        self
    }

    /// Set the security mode and its conventional port.
    pub fn security_with_port(self, security: SmtpSecurity) -> Self {
        self.security(security).port(security.default_port())
    }

    /// Use STARTTLS security (port 587).
    pub fn starttls(self) -> Self {
        self.security_with_port(SmtpSecurity::StartTls)
    }

    /// Use implicit TLS security (port 465).
    pub fn tls(self) -> Self {
        self.security_with_port(SmtpSecurity::Tls)
    }

    /// Use no encryption (not recommended).
    pub fn insecure(self) -> Self {
        self.security_with_port(SmtpSecurity::None)
    }

    /// Set the connection timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

mod seconds {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

/// SMTP transport.
pub struct SmtpTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    config: SmtpConfig,
}

impl SmtpTransport {
    /// Create a new SMTP transport.
    pub fn new(config: SmtpConfig) -> Result<Self> {
        let mut builder = match config.security {
            SmtpSecurity::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            }
            SmtpSecurity::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            }
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?,
        };

        builder = builder.port(config.port).timeout(Some(config.timeout));

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let transport = builder.build();

        info!(
            host = %config.host,
            port = config.port,
            security = ?config.security,
            "SMTP transport initialized"
        );

        Ok(Self { transport, config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &SmtpConfig {
        &self.config
    }

    /// Test the SMTP connection.
    pub async fn test_connection(&self) -> Result<bool> {
        self.transport
            .test_connection()
            .await
            .map_err(MailError::from)
    }
}

#[async_trait]
impl Transport for SmtpTransport {
    async fn send(&self, message: &Message) -> Result<Delivery> {
        let built = message.to_lettre()?;

        debug!(
            to = ?message.recipient_emails(),
            subject = ?message.subject,
            "Sending email via SMTP"
        );

        match self.transport.send(built).await {
            Ok(_) => {
                debug!("Email sent successfully");
                Ok(Delivery::accepted())
            }
            // A 5xx reply ends the whole SMTP transaction, so every envelope
            // recipient counts as refused.
            Err(e) if e.is_permanent() => {
                warn!(error = %e, "SMTP server permanently rejected the message");
                Ok(Delivery::rejected(message.to.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn is_healthy(&self) -> bool {
        self.test_connection().await.unwrap_or(false)
    }
}

/// Transport that logs messages instead of sending them.
///
/// Every recipient is accepted. Useful for local development and dry runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTransport;

#[async_trait]
impl Transport for LogTransport {
    async fn send(&self, message: &Message) -> Result<Delivery> {
        message.validate()?;

        info!(
            to = ?message.recipient_emails(),
            from = %message.from.as_ref().map(ToString::to_string).unwrap_or_default(),
            reply_to = %message.reply_to.as_ref().map(ToString::to_string).unwrap_or_default(),
            subject = %message.subject.as_deref().unwrap_or_default(),
            body = %message.text.as_deref().or(message.html.as_deref()).unwrap_or_default(),
            "Email sent (log transport)"
        );

        Ok(Delivery::accepted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smtp_config_builder() {
        let config = SmtpConfig::new("smtp.example.com")
            .port(2525)
            .security(SmtpSecurity::StartTls)
            .credentials("user", "pass");

        assert_eq!(config.host, "smtp.example.com");
        assert_eq!(config.port, 2525);
        assert_eq!(config.security, SmtpSecurity::StartTls);
        assert_eq!(config.username.as_deref(), Some("user"));
    }

    #[test]
    fn test_security_presets_set_port() {
        assert_eq!(SmtpConfig::new("h").tls().port, 465);
        assert_eq!(SmtpConfig::new("h").insecure().port, 25);
        assert_eq!(SmtpConfig::new("h").tls().starttls().port, 587);
    }

    #[test]
    fn test_security_from_name() {
        assert_eq!(SmtpSecurity::from_name("tls"), Some(SmtpSecurity::StartTls));
        assert_eq!(SmtpSecurity::from_name("starttls"), Some(SmtpSecurity::StartTls));
        assert_eq!(SmtpSecurity::from_name("SSL"), Some(SmtpSecurity::Tls));
        assert_eq!(SmtpSecurity::from_name("smtps"), Some(SmtpSecurity::Tls));
        assert_eq!(SmtpSecurity::from_name("null"), Some(SmtpSecurity::None));
        assert_eq!(SmtpSecurity::from_name("carrier-pigeon"), None);
    }

    #[test]
    fn test_delivery() {
        assert!(Delivery::accepted().is_complete());

        let rejected = Delivery::rejected(vec![Address::new("b@x.com").unwrap()]);
        assert!(!rejected.is_complete());
    }

    #[tokio::test]
    async fn test_log_transport_accepts_valid_message() {
        let mut message = Message::new();
        message
            .to(vec![Address::new("a@x.com").unwrap()])
            .subject("Hi")
            .from(Address::new("noreply@x.com").unwrap())
            .text("Hello");

        let delivery = LogTransport.send(&message).await.unwrap();
        assert!(delivery.is_complete());
    }

    #[tokio::test]
    async fn test_log_transport_rejects_incomplete_message() {
        let message = Message::new();
        assert!(LogTransport.send(&message).await.is_err());
    }
}
