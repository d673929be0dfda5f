//! Notification queue (toasts).
//!
//! Producers anywhere in the engine push ephemeral user-facing messages; the
//! facade renders whatever is currently active. Each toast owns an expiry
//! timer and is removed when the timer fires or when it is dismissed,
//! whichever comes first. Removal is idempotent by id, so the timer firing
//! after a manual dismissal (or the other way around) is harmless.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::AbortHandle;
use uuid::Uuid;

/// Default display duration, matching the storefront UI convention.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(3000);

/// How loud a notification is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Something worked.
    Success,
    /// Something failed.
    Error,
    /// Neutral information.
    Info,
}

/// A single user-facing notification.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Generated unique id.
    pub id: Uuid,
    /// Message text.
    pub message: String,
    /// Severity tag.
    pub severity: Severity,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

struct ActiveToast {
    notification: Notification,
    expiry: AbortHandle,
}

/// The notification queue.
///
/// Cheaply cloneable; all clones share the same queue. Requires a tokio
/// runtime (expiry timers are spawned tasks), so construct it at wiring time.
#[derive(Clone)]
pub struct ToastQueue {
    inner: Arc<ToastQueueInner>,
}

struct ToastQueueInner {
    toasts: Mutex<Vec<ActiveToast>>,
    duration: Duration,
}

impl ToastQueueInner {
    fn lock(&self) -> MutexGuard<'_, Vec<ActiveToast>> {
        self.toasts.lock().expect("toast queue mutex poisoned")
    }

    /// Remove a toast by id, aborting its expiry timer. No-op if absent.
    fn remove(&self, id: Uuid) {
        let mut toasts = self.lock();
        if let Some(pos) = toasts.iter().position(|t| t.notification.id == id) {
            let toast = toasts.remove(pos);
            toast.expiry.abort();
        }
    }
}

impl ToastQueue {
    /// Create a queue whose toasts expire after `duration`.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            inner: Arc::new(ToastQueueInner {
                toasts: Mutex::new(Vec::new()),
                duration,
            }),
        }
    }

    /// Push a notification and schedule its auto-removal.
    ///
    /// Returns the generated id, usable with [`Self::dismiss`].
    pub fn show(&self, message: impl Into<String>, severity: Severity) -> Uuid {
        let id = Uuid::new_v4();
        let notification = Notification {
            id,
            message: message.into(),
            severity,
            created_at: Utc::now(),
        };

        let inner = Arc::clone(&self.inner);
        let duration = self.inner.duration;
        let task = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            inner.remove(id);
        });

        self.inner.lock().push(ActiveToast {
            notification,
            expiry: task.abort_handle(),
        });
        id
    }

    /// Shorthand for a success toast.
    pub fn success(&self, message: impl Into<String>) -> Uuid {
        self.show(message, Severity::Success)
    }

    /// Shorthand for an error toast.
    pub fn error(&self, message: impl Into<String>) -> Uuid {
        self.show(message, Severity::Error)
    }

    /// Shorthand for an info toast.
    pub fn info(&self, message: impl Into<String>) -> Uuid {
        self.show(message, Severity::Info)
    }

    /// Dismiss a toast immediately, cancelling its pending auto-removal.
    ///
    /// Dismissing an id that already expired (or never existed) is a safe
    /// no-op.
    pub fn dismiss(&self, id: Uuid) {
        self.inner.remove(id);
    }

    /// Currently active notifications in insertion order.
    #[must_use]
    pub fn active(&self) -> Vec<Notification> {
        self.inner
            .lock()
            .iter()
            .map(|t| t.notification.clone())
            .collect()
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_toast_expires_after_duration() {
        let toasts = ToastQueue::new(Duration::from_millis(3000));
        toasts.show("Added to cart", Severity::Success);
        assert_eq!(toasts.active().len(), 1);

        // Just before expiry the toast is still visible
        tokio::time::sleep(Duration::from_millis(2999)).await;
        assert_eq!(toasts.active().len(), 1);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(toasts.active().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_cancels_timer() {
        let toasts = ToastQueue::new(Duration::from_millis(3000));
        let id = toasts.show("Removed from wishlist", Severity::Info);

        toasts.dismiss(id);
        assert!(toasts.active().is_empty());

        // The aborted timer must not resurrect or panic anything
        tokio::time::sleep(Duration::from_millis(4000)).await;
        assert!(toasts.active().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_after_expiry_is_noop() {
        let toasts = ToastQueue::new(Duration::from_millis(10));
        let id = toasts.show("Order placed", Severity::Success);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(toasts.active().is_empty());

        // Already auto-removed; dismissing again must be safe
        toasts.dismiss(id);
        assert!(toasts.active().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_multiple_toasts_stack_in_order() {
        let toasts = ToastQueue::new(Duration::from_millis(3000));
        toasts.show("first", Severity::Info);
        toasts.show("second", Severity::Error);
        toasts.show("third", Severity::Success);

        let active = toasts.active();
        let messages: Vec<&str> = active.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, ["first", "second", "third"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_toast_expires_independently() {
        let toasts = ToastQueue::new(Duration::from_millis(100));
        toasts.show("early", Severity::Info);

        tokio::time::sleep(Duration::from_millis(60)).await;
        toasts.show("late", Severity::Info);

        tokio::time::sleep(Duration::from_millis(60)).await;
        let active = toasts.active();
        assert_eq!(active.len(), 1);
        assert_eq!(
            active.first().map(|n| n.message.as_str()),
            Some("late")
        );
    }
}
