//! Live order feed
//!
//! Follows a shopper's order subscription and turns status changes into
//! notifications.

use lienzo::{
    ids::UserId,
    notifications::NotificationStore,
    orders::{Order, OrderStatusTracker, StatusChange},
};
use tokio::sync::mpsc::Receiver;
use tracing::{debug, info};

/// Status-change notifier for one shopper's orders.
#[derive(Debug, Clone)]
pub struct OrderFeed {
    owner: UserId,
    tracker: OrderStatusTracker,
}

impl OrderFeed {
    pub fn new(owner: UserId) -> Self {
        Self {
            owner,
            tracker: OrderStatusTracker::new(),
        }
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Fold one snapshot into the feed, pushing a notification for every
    /// milestone reached since the previous snapshot.
    ///
    /// Orders owned by anyone else are ignored.
    pub fn apply(
        &mut self,
        snapshot: &[Order],
        notifications: &mut NotificationStore,
    ) -> Vec<StatusChange> {
        let owned: Vec<Order> = snapshot
            .iter()
            .filter(|order| order.user_id == self.owner)
            .cloned()
            .collect();

        let changes = self.tracker.observe(&owned);

        for change in &changes {
            info!(order = %change.order, from = %change.from, to = %change.to, "order status changed");

            change.notify(notifications);
        }

        changes
    }

    /// Drain a live subscription in arrival order until it closes.
    ///
    /// Returns the number of snapshots processed.
    pub async fn follow(
        &mut self,
        mut receiver: Receiver<Vec<Order>>,
        notifications: &mut NotificationStore,
    ) -> usize {
        let mut snapshots = 0;

        while let Some(snapshot) = receiver.recv().await {
            self.apply(&snapshot, notifications);
            snapshots += 1;
        }

        debug!(owner = %self.owner, snapshots, "order subscription closed");

        snapshots
    }
}
