//! Parameters of a single dispatch.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{Address, IntoAddress, MailError, Result};

/// Everything needed to deliver one templated email to a list of recipients.
///
/// Immutable once built; construct one per send with [`MailParams::builder`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MailParams {
    template: String,
    variables: Map<String, Value>,
    recipients: Vec<Address>,
    subject: String,
    sender: Address,
}

impl MailParams {
    /// Start building parameters.
    pub fn builder() -> MailParamsBuilder {
        MailParamsBuilder::default()
    }

    /// Template identifier resolved by the template engine.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Template variables.
    pub fn variables(&self) -> &Map<String, Value> {
        &self.variables
    }

    /// Recipients, in the order given.
    pub fn recipients(&self) -> &[Address] {
        &self.recipients
    }

    /// Subject line.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Sender address and display name.
    pub fn sender(&self) -> &Address {
        &self.sender
    }
}

/// Builder for [`MailParams`].
///
/// Address parsing errors are kept until [`build`](Self::build) so calls can
/// be chained.
#[derive(Debug, Default)]
pub struct MailParamsBuilder {
    template: Option<String>,
    variables: Map<String, Value>,
    recipients: Vec<Address>,
    subject: Option<String>,
    sender: Option<Address>,
    error: Option<MailError>,
}

impl MailParamsBuilder {
    /// Set the template identifier.
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Add one template variable.
    pub fn variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Add every field of a serializable value as template variables.
    ///
    /// The value must serialize to a JSON object.
    pub fn variables<T: Serialize>(mut self, variables: &T) -> Self {
        match serde_json::to_value(variables) {
            Ok(Value::Object(map)) => self.variables.extend(map),
            Ok(other) => {
                self.record(MailError::Serialization(format!(
                    "template variables must be an object, got {}",
                    other
                )));
            }
            Err(e) => self.record(e.into()),
        }
        self
    }

    /// Add a recipient.
    pub fn recipient(mut self, recipient: impl IntoAddress) -> Self {
        match recipient.into_address() {
            Ok(address) => self.recipients.push(address),
            Err(e) => self.record(e),
        }
        self
    }

    /// Add several recipients, keeping their order.
    pub fn recipients<I, A>(mut self, recipients: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: IntoAddress,
    {
        for recipient in recipients {
            self = self.recipient(recipient);
        }
        self
    }

    /// Set the subject.
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the sender address and display name.
    pub fn sender(mut self, email: impl Into<String>, name: impl Into<String>) -> Self {
        match Address::with_name(email, name) {
            Ok(address) => self.sender = Some(address),
            Err(e) => self.record(e),
        }
        self
    }

    /// Set the sender from an already parsed address.
    pub fn sender_address(mut self, sender: Address) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Validate and build the parameters.
    pub fn build(self) -> Result<MailParams> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if self.recipients.is_empty() {
            return Err(MailError::MissingField("recipients"));
        }

        Ok(MailParams {
            template: self.template.ok_or(MailError::MissingField("template"))?,
            variables: self.variables,
            recipients: self.recipients,
            subject: self.subject.ok_or(MailError::MissingField("subject"))?,
            sender: self.sender.ok_or(MailError::MissingField("sender"))?,
        })
    }

    fn record(&mut self, error: MailError) {
        self.error.get_or_insert(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> MailParamsBuilder {
        MailParams::builder()
            .template("campaigns.weekly")
            .subject("Weekly digest")
            .sender("digest@x.com", "Digest")
    }

    #[test]
    fn test_build() {
        let params = base()
            .recipients(["a@x.com", "b@x.com"])
            .variable("headline", "News")
            .build()
            .unwrap();

        assert_eq!(params.template(), "campaigns.weekly");
        assert_eq!(params.subject(), "Weekly digest");
        assert_eq!(params.sender().name(), Some("Digest"));
        let emails: Vec<_> = params.recipients().iter().map(|a| a.email()).collect();
        assert_eq!(emails, vec!["a@x.com", "b@x.com"]);
        assert_eq!(params.variables().get("headline"), Some(&json!("News")));
    }

    #[test]
    fn test_variables_from_struct() {
        #[derive(Serialize)]
        struct Digest {
            headline: &'static str,
            count: u32,
        }

        let params = base()
            .recipient("a@x.com")
            .variables(&Digest {
                headline: "News",
                count: 3,
            })
            .build()
            .unwrap();

        assert_eq!(params.variables().get("count"), Some(&json!(3)));
    }

    #[test]
    fn test_variables_must_be_object() {
        let err = base().recipient("a@x.com").variables(&vec![1, 2]).build();
        assert!(matches!(err, Err(MailError::Serialization(_))));
    }

    #[test]
    fn test_empty_recipients_rejected() {
        assert!(matches!(
            base().build(),
            Err(MailError::MissingField("recipients"))
        ));
    }

    #[test]
    fn test_invalid_recipient_reported_at_build() {
        let err = base().recipient("not-an-address").recipient("a@x.com").build();
        assert!(matches!(err, Err(MailError::InvalidAddress(_))));
    }

    #[test]
    fn test_missing_sender() {
        let err = MailParams::builder()
            .template("t")
            .subject("s")
            .recipient("a@x.com")
            .build();
        assert!(matches!(err, Err(MailError::MissingField("sender"))));
    }
}
