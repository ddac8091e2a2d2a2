//! Operator logging and end-user warnings
//!
//! The fetcher reports through an injected [`Notifier`] instead of reaching for
//! process-wide state. Operator-facing errors go to the log; user-facing warnings
//! are held until the consumer renders them.

use std::sync::Mutex;

/// Message shown to users when a list could not be fetched
pub const FETCH_WARNING: &str =
    "There was an issue fetching data for this page. Content may be missing or not appear as intended.";

/// Sink for fetch-time diagnostics
pub trait Notifier: Send + Sync {
    /// Records an operator-facing error
    fn log_error(&self, message: &str);

    /// Queues a non-fatal warning for the end user
    fn warn_user(&self, message: &str);
}

/// Notifier that logs through `tracing` and collects user warnings
#[derive(Debug, Default)]
pub struct TracingNotifier {
    warnings: Mutex<Vec<String>>,
}

impl TracingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains the queued user warnings
    pub fn take_warnings(&self) -> Vec<String> {
        let mut warnings = self.warnings.lock().unwrap_or_else(|p| p.into_inner());
        std::mem::take(&mut *warnings)
    }
}

impl Notifier for TracingNotifier {
    fn log_error(&self, message: &str) {
        tracing::error!(target: "api_interface", "{}", message);
    }

    fn warn_user(&self, message: &str) {
        tracing::debug!(target: "api_interface", "user warning: {}", message);
        let mut warnings = self.warnings.lock().unwrap_or_else(|p| p.into_inner());
        // Repeated warnings are shown once
        if !warnings.iter().any(|w| w == message) {
            warnings.push(message.to_string());
        }
    }
}

impl<T: Notifier + ?Sized> Notifier for std::sync::Arc<T> {
    fn log_error(&self, message: &str) {
        (**self).log_error(message)
    }

    fn warn_user(&self, message: &str) {
        (**self).warn_user(message)
    }
}
