//! Bulk dispatch of templated email.

use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    Address, DeliveryLog, MailConfig, MailFacade, MailParams, Message, Result, TracingLog,
};

/// Callback run once the message envelope has been built.
pub type OnSent = Box<dyn FnOnce() + Send>;

/// Sends one templated email to a list of recipients.
///
/// The trait is object safe, so dispatchers can be held as `Arc<dyn MassMailer>`.
#[async_trait]
pub trait MassMailer: Send + Sync {
    /// Deliver `params`, calling `on_sent` once the message has been built.
    ///
    /// Returns `Ok(false)` when at least one recipient was refused; partial
    /// and total failure are not distinguished. Transport and template errors
    /// are returned as `Err`.
    async fn send(&self, params: &MailParams, on_sent: OnSent) -> Result<bool>;
}

/// [`MassMailer`] delegating to a [`MailFacade`].
///
/// Every message carries the configured global from identity as its
/// reply-to address. Refused recipients are reported to the injected
/// [`DeliveryLog`].
pub struct DefaultMailer<M> {
    facade: M,
    reply_to: Address,
    log: Arc<dyn DeliveryLog>,
}

impl<M: MailFacade> DefaultMailer<M> {
    /// Create a dispatcher taking its reply-to address from `config`.
    pub fn new(facade: M, config: &MailConfig) -> Result<Self> {
        Ok(Self::with_reply_to(facade, config.reply_to()?))
    }

    /// Create a dispatcher with an explicit reply-to address.
    pub fn with_reply_to(facade: M, reply_to: Address) -> Self {
        Self {
            facade,
            reply_to,
            log: Arc::new(TracingLog),
        }
    }

    /// Report failures to `log` instead of `tracing`.
    pub fn with_log(mut self, log: impl DeliveryLog + 'static) -> Self {
        self.log = Arc::new(log);
        self
    }

    /// The underlying facade.
    pub fn facade(&self) -> &M {
        &self.facade
    }

    /// The reply-to address applied to every message.
    pub fn reply_to(&self) -> &Address {
        &self.reply_to
    }

    fn report_failures(&self, failed: &[String]) {
        self.log
            .error("One or more errors occurred during the email delivery.");

        let affected = serde_json::to_string(failed).unwrap_or_else(|_| format!("{:?}", failed));
        self.log.error(&format!("Emails affected: {}", affected));
    }
}

#[async_trait]
impl<M: MailFacade> MassMailer for DefaultMailer<M> {
    async fn send(&self, params: &MailParams, on_sent: OnSent) -> Result<bool> {
        let recipients = params.recipients().to_vec();
        let subject = params.subject().to_string();
        let sender = params.sender().clone();
        let reply_to = self.reply_to.clone();

        self.facade
            .send(
                params.template(),
                params.variables(),
                Box::new(move |message: &mut Message| {
                    message
                        .to(recipients)
                        .subject(subject)
                        .from(sender)
                        .reply_to(reply_to);
                    on_sent();
                }),
            )
            .await?;

        let failed = self.facade.failures();
        if failed.is_empty() {
            return Ok(true);
        }

        self.report_failures(&failed);
        Ok(false)
    }
}
