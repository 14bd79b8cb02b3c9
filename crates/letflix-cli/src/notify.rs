//! Transient notifications.

use std::time::Duration;

/// Label of the dismiss action shown with every notification.
pub const ACTION_LABEL: &str = "OK";

/// Kind of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// The operation succeeded.
    Success,
    /// The operation failed.
    Failure,
}

/// Surface for short-lived user notifications.
pub trait Notifier {
    /// Shows `text` to the user.
    fn notify(&self, kind: NotificationKind, text: &str);
}

/// Notifier that renders through the log output.
#[derive(Debug, Clone, Copy)]
pub struct LogNotifier {
    duration: Duration,
}

impl LogNotifier {
    /// Creates a notifier whose notifications last `duration`.
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self { duration }
    }
}

impl Notifier for LogNotifier {
    fn notify(&self, kind: NotificationKind, text: &str) {
        let duration_ms = u64::try_from(self.duration.as_millis()).unwrap_or(u64::MAX);
        match kind {
            NotificationKind::Success => {
                tracing::info!(action = ACTION_LABEL, duration_ms, "{text}");
            }
            NotificationKind::Failure => {
                tracing::warn!(action = ACTION_LABEL, duration_ms, "{text}");
            }
        }
    }
}
