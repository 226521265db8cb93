//! The message a mail facade builds and hands to its transport.

use serde::{Deserialize, Serialize};

use crate::{Address, MailError, RenderedTemplate, Result};

/// Email message under construction.
///
/// A [`MailFacade`](crate::MailFacade) creates an empty message, lets the
/// caller's builder closure fill in the envelope, then attaches the rendered
/// template bodies. Setters take `&mut self` and return it so the closure can
/// chain them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Sender address.
    pub from: Option<Address>,
    /// Reply-to address.
    pub reply_to: Option<Address>,
    /// To recipients, in the order given.
    pub to: Vec<Address>,
    /// Email subject.
    pub subject: Option<String>,
    /// Plain text body.
    pub text: Option<String>,
    /// HTML body.
    pub html: Option<String>,
}

impl Message {
    /// Create a new empty message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the recipients, replacing any already present.
    pub fn to<I>(&mut self, recipients: I) -> &mut Self
    where
        I: IntoIterator<Item = Address>,
    {
        self.to = recipients.into_iter().collect();
        self
    }

    /// Set the subject.
    pub fn subject(&mut self, subject: impl Into<String>) -> &mut Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the sender.
    pub fn from(&mut self, from: Address) -> &mut Self {
        self.from = Some(from);
        self
    }

    /// Set the reply-to address.
    pub fn reply_to(&mut self, reply_to: Address) -> &mut Self {
        self.reply_to = Some(reply_to);
        self
    }

    /// Set the plain text body.
    pub fn text(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = Some(text.into());
        self
    }

    /// Set the HTML body.
    pub fn html(&mut self, html: impl Into<String>) -> &mut Self {
        self.html = Some(html.into());
        self
    }

    /// Attach rendered template output.
    ///
    /// A subject already set on the message wins over the template's.
    pub fn apply_rendered(&mut self, rendered: RenderedTemplate) -> &mut Self {
        if self.subject.is_none() {
            self.subject = rendered.subject;
        }
        if rendered.html.is_some() {
            self.html = rendered.html;
        }
        if rendered.text.is_some() {
            self.text = rendered.text;
        }
        self
    }

    /// Recipient email addresses, in order.
    pub fn recipient_emails(&self) -> Vec<String> {
        self.to.iter().map(|a| a.email.clone()).collect()
    }

    /// Validate the message.
    pub fn validate(&self) -> Result<()> {
        if self.from.is_none() {
            return Err(MailError::MissingField("from"));
        }
        if self.to.is_empty() {
            return Err(MailError::MissingField("to"));
        }
        if self.subject.is_none() {
            return Err(MailError::MissingField("subject"));
        }
        if self.text.is_none() && self.html.is_none() {
            return Err(MailError::MissingField("text/html body"));
        }
        Ok(())
    }

    /// Build a lettre message.
    pub(crate) fn to_lettre(&self) -> Result<lettre::Message> {
        self.validate()?;

        let from = self
            .from
            .as_ref()
            .ok_or(MailError::MissingField("from"))?
            .to_mailbox()?;

        let mut builder = lettre::Message::builder()
            .from(from)
            .subject(self.subject.as_deref().unwrap_or_default());

        for addr in &self.to {
            builder = builder.to(addr.to_mailbox()?);
        }

        if let Some(reply_to) = &self.reply_to {
            builder = builder.reply_to(reply_to.to_mailbox()?);
        }

        let body = match (&self.html, &self.text) {
            (Some(html), Some(text)) => {
                lettre::message::MultiPart::alternative_plain_html(text.clone(), html.clone())
            }
            (Some(html), None) => lettre::message::MultiPart::alternative_plain_html(
                String::new(),
                html.clone(),
            ),
            (None, Some(text)) => {
                return builder
                    .header(lettre::message::header::ContentType::TEXT_PLAIN)
                    .body(text.clone())
                    .map_err(MailError::from);
            }
            (None, None) => return Err(MailError::MissingField("text/html body")),
        };

        builder.multipart(body).map_err(MailError::from)
    }
}
