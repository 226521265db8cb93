//! Where the dispatcher reports delivery failures.

use std::sync::Mutex;

/// Error-level log sink used by [`DefaultMailer`](crate::DefaultMailer).
pub trait DeliveryLog: Send + Sync {
    /// Record an error-level entry.
    fn error(&self, message: &str);
}

/// Forwards entries to `tracing` at error level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl DeliveryLog for TracingLog {
    fn error(&self, message: &str) {
        tracing::error!(target: "massmailer::delivery", "{}", message);
    }
}

/// Keeps entries in memory for later inspection.
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<String>>,
}

impl MemoryLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries recorded so far, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|e| e.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl DeliveryLog for MemoryLog {
    fn error(&self, message: &str) {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.push(message.to_string());
    }
}

impl<L: DeliveryLog + ?Sized> DeliveryLog for std::sync::Arc<L> {
    fn error(&self, message: &str) {
        (**self).error(message)
    }
}
