//! User-facing notification channel.
//!
//! The browser original surfaced outcomes as toasts; here they are events on
//! a bounded mpsc channel the presentation layer drains. Emission never
//! blocks a state transition: when the consumer falls behind, the event is
//! dropped with a warning.

use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Cloneable sending half handed to the controllers.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::Sender<Notification>,
}

impl Notifier {
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Notification>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(Notification::success(message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(Notification::error(message));
    }

    fn push(&self, notification: Notification) {
        if let Err(err) = self.tx.try_send(notification) {
            tracing::warn!(%err, "dropping notification, consumer is not keeping up");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn notifications_arrive_in_order() {
        let (notifier, mut rx) = Notifier::channel(8);
        notifier.success("one");
        notifier.error("two");

        let first = rx.recv().await.unwrap();
        assert_eq!(first.level, NotificationLevel::Success);
        assert_eq!(first.message, "one");

        let second = rx.recv().await.unwrap();
        assert_eq!(second.level, NotificationLevel::Error);
        assert_eq!(second.message, "two");
    }

    #[tokio::test]
    async fn full_channel_drops_instead_of_blocking() {
        let (notifier, mut rx) = Notifier::channel(1);
        notifier.success("kept");
        notifier.success("dropped");

        assert_eq!(rx.recv().await.unwrap().message, "kept");
        assert!(rx.try_recv().is_err());
    }
}
