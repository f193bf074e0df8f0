//! Order Status Tracking
//!
//! Successive snapshots of a shopper's orders are folded into a list of status
//! changes. Only orders present in both the previous and the current snapshot
//! can change; an order seen for the first time establishes its baseline.

use rustc_hash::FxHashMap;

use crate::notifications::{NotificationKind, NotificationStore};

use super::{Order, OrderId, OrderStatus};

/// An order whose status differs between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    /// Order that changed
    pub order: OrderId,

    /// Status in the previous snapshot
    pub from: OrderStatus,

    /// Status in the current snapshot
    pub to: OrderStatus,
}

impl StatusChange {
    /// The notification shown to the shopper for this change, if any.
    pub fn notification(&self) -> Option<(NotificationKind, &'static str)> {
        match self.to {
            OrderStatus::Paid => Some((
                NotificationKind::Success,
                "Thank you for shopping with us! We have confirmed your order.",
            )),
            OrderStatus::Shipped => Some((
                NotificationKind::Info,
                "Your order has been shipped and will be arriving soon!",
            )),
            OrderStatus::Delivered => Some((
                NotificationKind::Success,
                "Your order has been delivered. Enjoy!",
            )),
            OrderStatus::Pending | OrderStatus::Cancelled => None,
        }
    }

    /// Push this change's notification, if it has one.
    pub fn notify(&self, notifications: &mut NotificationStore) -> bool {
        let Some((kind, message)) = self.notification() else {
            return false;
        };

        notifications.add_notification(message, kind);

        true
    }
}

/// Statuses of the orders in `current` that differ from `previous`, in `current` order.
pub fn diff_statuses(
    previous: &FxHashMap<OrderId, OrderStatus>,
    current: &[Order],
) -> Vec<StatusChange> {
    current
        .iter()
        .filter_map(|order| {
            let from = *previous.get(&order.id)?;

            (from != order.status).then(|| StatusChange {
                order: order.id.clone(),
                from,
                to: order.status,
            })
        })
        .collect()
}

/// Fold state over a stream of order snapshots.
#[derive(Debug, Clone, Default)]
pub struct OrderStatusTracker {
    previous: FxHashMap<OrderId, OrderStatus>,
}

impl OrderStatusTracker {
    /// Create a tracker that has seen no snapshot yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare `snapshot` with the last one observed and remember it.
    pub fn observe(&mut self, snapshot: &[Order]) -> Vec<StatusChange> {
        let changes = diff_statuses(&self.previous, snapshot);

        self.previous = snapshot
            .iter()
            .map(|order| (order.id.clone(), order.status))
            .collect();

        changes
    }

    /// Last observed status of an order.
    pub fn status_of(&self, order: &OrderId) -> Option<OrderStatus> {
        self.previous.get(order).copied()
    }

    /// Number of orders in the last snapshot.
    pub fn len(&self) -> usize {
        self.previous.len()
    }

    /// Whether no orders have been observed.
    pub fn is_empty(&self) -> bool {
        self.previous.is_empty()
    }
}

/// Run every snapshot through a fresh tracker and collect all changes in order.
pub fn fold_snapshots<'a, I>(snapshots: I) -> Vec<StatusChange>
where
    I: IntoIterator<Item = &'a [Order]>,
{
    let mut tracker = OrderStatusTracker::new();

    snapshots
        .into_iter()
        .flat_map(|snapshot| tracker.observe(snapshot))
        .collect()
}
