//! The mail facade the dispatcher delegates to.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use crate::{Message, Result, SmtpConfig, SmtpTransport, TemplateEngine, Transport};

#[cfg(feature = "handlebars")]
use crate::{MailConfig, MailError};

/// Closure that fills in a message's envelope before it is rendered and sent.
pub type MessageBuilder<'a> = Box<dyn FnOnce(&mut Message) + Send + 'a>;

/// Template-driven mail sending capability.
///
/// Failures are tracked per facade, not per call. [`failures`](Self::failures)
/// is only reliable when sends on one facade are not concurrent; callers
/// sharing a facade across tasks must serialize `send` and `failures`.
#[async_trait]
pub trait MailFacade: Send + Sync {
    /// Build, render and deliver one message.
    ///
    /// `build` runs exactly once, before rendering. Recipient rejections are
    /// not errors; they are available from [`failures`](Self::failures)
    /// afterwards.
    async fn send(
        &self,
        template: &str,
        variables: &Map<String, Value>,
        build: MessageBuilder<'_>,
    ) -> Result<()>;

    /// Addresses refused during the most recent [`send`](Self::send).
    ///
    /// A concurrent `send` on the same facade may overwrite the list before it
    /// is read.
    fn failures(&self) -> Vec<String>;
}

/// [`MailFacade`] backed by a template engine and a transport.
pub struct Mailer {
    transport: Arc<dyn Transport>,
    templates: Arc<dyn TemplateEngine>,
    failures: Mutex<Vec<String>>,
}

impl Mailer {
    /// Create a mailer from a transport and a template engine.
    pub fn new(
        transport: impl Transport + 'static,
        templates: impl TemplateEngine + 'static,
    ) -> Self {
        Self::from_parts(Arc::new(transport), Arc::new(templates))
    }

    /// Create a mailer from shared components.
    pub fn from_parts(transport: Arc<dyn Transport>, templates: Arc<dyn TemplateEngine>) -> Self {
        Self {
            transport,
            templates,
            failures: Mutex::new(Vec::new()),
        }
    }

    /// Create a mailer that sends over SMTP.
    pub fn smtp(config: SmtpConfig, templates: impl TemplateEngine + 'static) -> Result<Self> {
        Ok(Self::new(SmtpTransport::new(config)?, templates))
    }

    /// Create an SMTP mailer with Handlebars templates, both taken from configuration.
    #[cfg(feature = "handlebars")]
    pub fn from_config(config: &MailConfig) -> Result<Self> {
        let dir = config
            .templates
            .as_ref()
            .ok_or_else(|| MailError::Config("no template directory configured".to_string()))?;
        let engine = crate::HandlebarsEngine::from_directory(dir)?;
        Self::smtp(config.smtp.clone(), engine)
    }

    /// Check if the transport is healthy.
    pub async fn is_healthy(&self) -> bool {
        self.transport.is_healthy().await
    }

    fn failures_slot(&self) -> MutexGuard<'_, Vec<String>> {
        self.failures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl MailFacade for Mailer {
    async fn send(
        &self,
        template: &str,
        variables: &Map<String, Value>,
        build: MessageBuilder<'_>,
    ) -> Result<()> {
        self.failures_slot().clear();

        let mut message = Message::new();
        build(&mut message);

        let rendered = self
            .templates
            .render(template, &Value::Object(variables.clone()))?;
        message.apply_rendered(rendered);

        debug!(template, recipients = message.to.len(), "Dispatching templated email");

        let delivery = self.transport.send(&message).await?;

        *self.failures_slot() = delivery.rejected.into_iter().map(|a| a.email).collect();
        Ok(())
    }

    fn failures(&self) -> Vec<String> {
        self.failures_slot().clone()
    }
}
