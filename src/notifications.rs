//! Notifications
//!
//! Feed of short-lived messages shown to the shopper. The newest message is
//! always first.

use std::collections::VecDeque;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::ids::TypedUuid;

/// Notification id
pub type NotificationId = TypedUuid<Notification>;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Neutral information
    Info,
    /// Something completed
    Success,
    /// Something failed
    Error,
}

/// A single notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique id assigned on creation
    pub id: NotificationId,

    /// Text shown to the shopper
    pub message: String,

    /// Severity
    pub kind: NotificationKind,

    /// Whether the shopper has seen it
    pub read: bool,

    /// Creation instant
    pub timestamp: Timestamp,
}

/// Notification feed.
#[derive(Debug, Clone, Default)]
pub struct NotificationStore {
    notifications: VecDeque<Notification>,
}

impl NotificationStore {
    /// Create an empty feed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a new unread notification at the front of the feed.
    pub fn add_notification(
        &mut self,
        message: impl Into<String>,
        kind: NotificationKind,
    ) -> NotificationId {
        let id = NotificationId::new();

        self.notifications.push_front(Notification {
            id,
            message: message.into(),
            kind,
            read: false,
            timestamp: Timestamp::now(),
        });

        id
    }

    /// Mark every notification currently in the feed as read.
    pub fn mark_all_read(&mut self) {
        for notification in &mut self.notifications {
            notification.read = true;
        }
    }

    /// Remove every notification.
    pub fn clear_notifications(&mut self) {
        self.notifications.clear();
    }

    /// Notifications, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter()
    }

    /// Number of notifications not yet read.
    pub fn unread_count(&self) -> usize {
        self.notifications
            .iter()
            .filter(|notification| !notification.read)
            .count()
    }

    /// Number of notifications.
    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    /// Whether the feed is empty.
    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(store: &NotificationStore) -> Vec<&str> {
        store.iter().map(|n| n.message.as_str()).collect()
    }

    #[test]
    fn new_notifications_are_unread_and_first() {
        let mut store = NotificationStore::new();

        store.add_notification("first", NotificationKind::Info);
        let id = store.add_notification("second", NotificationKind::Error);

        let front = store.iter().next();

        assert_eq!(front.map(|n| n.id), Some(id));
        assert_eq!(front.map(|n| n.kind), Some(NotificationKind::Error));
        assert_eq!(front.map(|n| n.read), Some(false));
    }

    #[test]
    fn feed_reads_in_reverse_call_order() {
        let mut store = NotificationStore::new();

        store.add_notification("A", NotificationKind::Info);
        store.add_notification("B", NotificationKind::Success);
        store.add_notification("C", NotificationKind::Error);

        assert_eq!(messages(&store), ["C", "B", "A"]);

        store.mark_all_read();

        assert!(store.iter().all(|n| n.read), "every notification should be read");
        assert_eq!(store.unread_count(), 0);

        store.clear_notifications();

        assert!(store.is_empty());
    }

    #[test]
    fn ids_are_unique() {
        let mut store = NotificationStore::new();

        let first = store.add_notification("A", NotificationKind::Info);
        let second = store.add_notification("A", NotificationKind::Info);

        assert_ne!(first, second);
    }

    #[test]
    fn mark_all_read_is_idempotent() {
        let mut once = NotificationStore::new();
        once.add_notification("A", NotificationKind::Info);
        once.add_notification("B", NotificationKind::Info);

        let mut twice = once.clone();

        once.mark_all_read();
        twice.mark_all_read();
        twice.mark_all_read();

        assert_eq!(once.iter().collect::<Vec<_>>(), twice.iter().collect::<Vec<_>>());
    }

    #[test]
    fn mark_all_read_does_not_affect_later_notifications() {
        let mut store = NotificationStore::new();

        store.add_notification("old", NotificationKind::Info);
        store.mark_all_read();
        store.add_notification("new", NotificationKind::Success);

        assert_eq!(store.unread_count(), 1);
        assert_eq!(store.iter().next().map(|n| n.read), Some(false));
    }
}
