//! # MassMailer Mail
//!
//! Delivers one templated email to a list of recipients through a mail
//! facade and reports whether every recipient was accepted.
//!
//! ## Features
//!
//! - **Dispatcher**: [`DefaultMailer`] builds the envelope from [`MailParams`],
//!   applies the configured reply-to address and collapses recipient
//!   rejections into a single boolean
//! - **Facade**: [`Mailer`] renders a template and hands the message to a
//!   [`Transport`]
//! - **Transports**: SMTP (lettre), log-only and in-memory
//! - **Templates**: Handlebars, loaded from a directory tree
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use massmailer_mail::{DefaultMailer, MailConfig, MailParams, Mailer, MassMailer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MailConfig::from_env()?;
//!     let mailer = DefaultMailer::new(Mailer::from_config(&config)?, &config)?;
//!
//!     let params = MailParams::builder()
//!         .template("campaigns.weekly")
//!         .variable("headline", "Spring sale")
//!         .recipients(["a@example.com", "b@example.com"])
//!         .subject("This week at Example")
//!         .sender("news@example.com", "Example News")
//!         .build()?;
//!
//!     let delivered = mailer.send(&params, Box::new(|| println!("message built"))).await?;
//!     if !delivered {
//!         eprintln!("some recipients were refused; see the error log");
//!     }
//!     Ok(())
//! }
//! ```

mod address;
mod config;
mod dispatcher;
mod error;
mod facade;
mod log;
mod memory;
mod message;
mod params;
mod transport;

#[cfg(feature = "handlebars")]
mod template_handlebars;

pub use address::{Address, IntoAddress};
pub use config::{FromConfig, MailConfig};
pub use dispatcher::{DefaultMailer, MassMailer, OnSent};
pub use error::{MailError, Result};
pub use facade::{MailFacade, Mailer, MessageBuilder};
pub use log::{DeliveryLog, MemoryLog, TracingLog};
pub use memory::MemoryTransport;
pub use message::Message;
pub use params::{MailParams, MailParamsBuilder};
pub use transport::{Delivery, LogTransport, SmtpConfig, SmtpSecurity, SmtpTransport, Transport};

#[cfg(feature = "handlebars")]
pub use template_handlebars::HandlebarsEngine;

/// Template engine trait for rendering email templates.
pub trait TemplateEngine: Send + Sync {
    /// Render a template with the given name and context.
    fn render(&self, name: &str, context: &serde_json::Value) -> Result<RenderedTemplate>;

    /// Check if a template exists.
    fn has_template(&self, name: &str) -> bool;

    /// Register a template from a string.
    fn register_template(&mut self, name: &str, content: &str) -> Result<()>;
}

/// Rendered template output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedTemplate {
    /// HTML content (if available).
    pub html: Option<String>,
    /// Plain text content (if available).
    pub text: Option<String>,
    /// Subject line (if available).
    pub subject: Option<String>,
}

impl RenderedTemplate {
    /// Create a new rendered template with HTML content.
    pub fn html(html: impl Into<String>) -> Self {
        Self {
            html: Some(html.into()),
            ..Self::default()
        }
    }

    /// Create a new rendered template with text content.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Set the subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }
}

/// Prelude for common imports.
///
/// ```
/// use massmailer_mail::prelude::*;
/// ```
pub mod prelude {
    pub use crate::address::{Address, IntoAddress};
    pub use crate::config::MailConfig;
    pub use crate::dispatcher::{DefaultMailer, MassMailer};
    pub use crate::error::{MailError, Result};
    pub use crate::facade::{MailFacade, Mailer};
    pub use crate::params::MailParams;
    pub use crate::transport::{SmtpConfig, SmtpTransport, Transport};
    pub use crate::{RenderedTemplate, TemplateEngine};

    #[cfg(feature = "handlebars")]
    pub use crate::HandlebarsEngine;
}
