//! Orders repository.

use async_trait::async_trait;
use lienzo::{
    ids::UserId,
    orders::{NewOrder, Order, OrderId, OrderStatus},
};
use mockall::automock;
use tokio::sync::mpsc::Receiver;

use crate::database::DatabaseError;

/// Access to the orders collection.
#[automock]
#[async_trait]
pub trait OrdersRepository: Send + Sync {
    /// Store a new order and return it with its assigned id.
    async fn create_order(&self, order: NewOrder) -> Result<Order, DatabaseError>;

    /// Load a single order.
    async fn get_order(&self, order: &OrderId) -> Result<Order, DatabaseError>;

    /// Every order in the collection.
    async fn list_orders(&self) -> Result<Vec<Order>, DatabaseError>;

    /// Orders owned by one user.
    async fn list_orders_for_user(&self, user: &UserId) -> Result<Vec<Order>, DatabaseError>;

    /// Overwrite an order's status.
    async fn update_status(&self, order: &OrderId, status: OrderStatus)
    -> Result<(), DatabaseError>;

    /// Live subscription to the orders owned by `user`.
    ///
    /// Each message is the full current snapshot of that user's orders. The
    /// channel closes when the subscription ends.
    async fn watch_orders_for_user(&self, user: &UserId)
    -> Result<Receiver<Vec<Order>>, DatabaseError>;
}
