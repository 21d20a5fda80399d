//! User-facing error notification sink.
//!
//! The UI owns the actual toast mechanism; the store only ever calls
//! [`Notifier::error`] with a fixed, human-readable message, exactly once
//! per failed operation and never on success.

use std::sync::Mutex;

/// Fire-and-forget sink for user-facing error messages.
pub trait Notifier: Send + Sync {
    /// Report a failure message to the user.
    fn error(&self, message: &str);
}

/// Notifier that logs messages at warn level.
///
/// Default choice for binaries without a UI toast layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        tracing::warn!(target: "cartwheel::notify", "{message}");
    }
}

/// Notifier that captures messages for assertions.
///
/// As a test double it panics on a poisoned lock rather than dropping
/// messages after a crash elsewhere.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages reported so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the message lock is poisoned.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("notifier lock poisoned").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        self.messages
            .lock()
            .expect("notifier lock poisoned")
            .push(message.to_string());
    }
}

impl<N: Notifier> Notifier for std::sync::Arc<N> {
    fn error(&self, message: &str) {
        N::error(self, message);
    }
}
