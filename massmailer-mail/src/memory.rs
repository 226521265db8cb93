//! In-memory transport.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use crate::{Delivery, Message, Result, Transport};

/// Transport that keeps every message in memory.
///
/// Addresses registered with [`MemoryTransport::reject`] are reported as
/// refused, which makes partial and total delivery failures reproducible
/// without a mail server.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    sent: Mutex<Vec<Message>>,
    rejecting: Mutex<HashSet<String>>,
}

impl MemoryTransport {
    /// Create an empty transport that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse delivery to the given email addresses.
    pub fn reject<I, S>(self, emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        lock(&self.rejecting).extend(emails.into_iter().map(|e| e.into().to_lowercase()));
        self
    }

    /// Messages handed to this transport so far.
    pub fn sent(&self) -> Vec<Message> {
        lock(&self.sent).clone()
    }

    /// Number of messages handed to this transport.
    pub fn sent_count(&self) -> usize {
        lock(&self.sent).len()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn send(&self, message: &Message) -> Result<Delivery> {
        message.validate()?;

        let rejected = {
            let rejecting = lock(&self.rejecting);
            message
                .to
                .iter()
                .filter(|a| rejecting.contains(&a.email.to_lowercase()))
                .cloned()
                .collect()
        };

        lock(&self.sent).push(message.clone());
        Ok(Delivery::rejected(rejected))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Address;

    fn message(to: &[&str]) -> Message {
        let mut message = Message::new();
        message
            .to(to.iter().map(|s| Address::new(*s).unwrap()))
            .subject("Hi")
            .from(Address::new("noreply@x.com").unwrap())
            .text("Hello");
        message
    }

    #[tokio::test]
    async fn test_records_messages() {
        let transport = MemoryTransport::new();
        transport.send(&message(&["a@x.com"])).await.unwrap();

        assert_eq!(transport.sent_count(), 1);
        assert_eq!(transport.sent()[0].recipient_emails(), vec!["a@x.com"]);
    }

    #[tokio::test]
    async fn test_rejects_configured_addresses_case_insensitively() {
        let transport = MemoryTransport::new().reject(["B@x.com"]);
        let delivery = transport
            .send(&message(&["a@x.com", "b@x.com"]))
            .await
            .unwrap();

        let rejected: Vec<_> = delivery.rejected.iter().map(|a| a.email.as_str()).collect();
        assert_eq!(rejected, vec!["b@x.com"]);
    }
}
