//! Mail configuration.
//!
//! Values can come from the process environment (optionally seeded from a
//! `.env` file) or from a TOML document:
//!
//! ```toml
//! templates = "resources/mail"
//!
//! [from]
//! address = "hello@example.com"
//! name = "Example"
//!
//! [smtp]
//! host = "smtp.example.com"
//! port = 587
//! security = "starttls"
//! timeout = 30
//! ```

use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::{Address, MailError, Result, SmtpConfig, SmtpSecurity};

/// Global "from" identity. Outgoing mail uses it as the reply-to address.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct FromConfig {
    /// `mail.from.address`
    pub address: String,
    /// `mail.from.name`
    #[serde(default)]
    pub name: Option<String>,
}

/// Mail configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// Default sender identity.
    pub from: FromConfig,
    /// SMTP transport settings.
    #[serde(default)]
    pub smtp: SmtpConfig,
    /// Root directory of the email templates.
    #[serde(default)]
    pub templates: Option<PathBuf>,
}

impl MailConfig {
    /// Create a configuration with the given global from identity.
    pub fn new(from_address: impl Into<String>, from_name: Option<String>) -> Self {
        Self {
            from: FromConfig {
                address: from_address.into(),
                name: from_name,
            },
            smtp: SmtpConfig::default(),
            templates: None,
        }
    }

    /// Load from the process environment, reading `.env` first if present.
    ///
    /// Recognised keys: `MAIL_FROM_ADDRESS` (required), `MAIL_FROM_NAME`,
    /// `MAIL_HOST`, `MAIL_PORT`, `MAIL_USERNAME`, `MAIL_PASSWORD`,
    /// `MAIL_ENCRYPTION`, `MAIL_TIMEOUT` (seconds), `MAIL_TEMPLATES`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup using the same keys as [`from_env`](Self::from_env).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let address = get("MAIL_FROM_ADDRESS")
            .ok_or_else(|| MailError::Config("MAIL_FROM_ADDRESS is not set".to_string()))?;

        let mut smtp = SmtpConfig::new(get("MAIL_HOST").unwrap_or_else(|| "localhost".to_string()));

        if let Some(security) = get("MAIL_ENCRYPTION") {
            let security = SmtpSecurity::from_name(&security).ok_or_else(|| {
                MailError::Config(format!("Unknown MAIL_ENCRYPTION: {}", security))
            })?;
            smtp = smtp.security_with_port(security);
        }

        if let Some(port) = get("MAIL_PORT") {
            smtp = smtp.port(parse_number("MAIL_PORT", &port)?);
        }

        if let (Some(username), Some(password)) = (get("MAIL_USERNAME"), get("MAIL_PASSWORD")) {
            smtp = smtp.credentials(username, password);
        }

        if let Some(timeout) = get("MAIL_TIMEOUT") {
            smtp = smtp.timeout(Duration::from_secs(parse_number("MAIL_TIMEOUT", &timeout)?));
        }

        Ok(Self {
            from: FromConfig {
                address,
                name: get("MAIL_FROM_NAME"),
            },
            smtp,
            templates: get("MAIL_TEMPLATES").map(PathBuf::from),
        })
    }

    /// Parse a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// The reply-to address every dispatched message carries.
    pub fn reply_to(&self) -> Result<Address> {
        match &self.from.name {
            Some(name) => Address::with_name(&self.from.address, name),
            None => Address::new(&self.from.address),
        }
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| MailError::Config(format!("{} must be a number, got {:?}", key, value)))
}
