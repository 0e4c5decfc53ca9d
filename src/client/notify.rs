//! # Notification Seam
//!
//! Critical failures must reach the user as a transient notification (the
//! embedding application decides how to render it). The client only
//! depends on the [`Notifier`] trait; the default implementation logs.

use async_trait::async_trait;
use tracing::warn;

/// A user-facing notification: short title, human-readable description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Short title, e.g. "Add comment failed"
    pub title: String,

    /// Human-readable description of what went wrong
    pub body: String,
}

impl Notification {
    /// Create a notification
    pub fn new<T: Into<String>, B: Into<String>>(title: T, body: B) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Sink for user-facing notifications
///
/// Implementations forward to whatever presentation channel the embedding
/// application uses (toast queue, status bar, message bus).
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one notification
    async fn notify(&self, notification: Notification);
}

/// Default notifier: logs at warn level
///
/// Suitable for headless use and tests that don't assert on notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: Notification) {
        warn!(
            title = %notification.title,
            body = %notification.body,
            "user notification"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_notifier_accepts_notifications() {
        let notifier = LogNotifier;
        notifier
            .notify(Notification::new("Add comment failed", "Please try again."))
            .await;
    }
}
