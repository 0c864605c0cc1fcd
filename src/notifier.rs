//! Outbound SMS/email notification capability.
//!
//! The concrete provider (Twilio, SES, ...) lives outside this crate. Callers
//! only see the `Notifier` trait; failures are logged and never propagate,
//! per the best-effort contract that governs all side-effect emitters here.

use async_trait::async_trait;

/// A capability for sending an outbound message to a phone number or email address.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, recipient: &str, message: &str);
}

/// Default `Notifier` for installations with no SMS/email provider configured.
///
/// Logs at debug level and never fails, matching the spec's requirement that
/// outbound-message failures are non-fatal.
#[derive(Debug, Clone, Default)]
pub struct LoggingNotifier;

#[async_trait]
impl Notifier for LoggingNotifier {
    async fn send(&self, recipient: &str, message: &str) {
        tracing::debug!(recipient, message, "notifier: would send outbound message");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_logging_notifier_does_not_panic() {
        let notifier = LoggingNotifier;
        notifier.send("+905551112233", "Your ticket was updated").await;
    }
}
