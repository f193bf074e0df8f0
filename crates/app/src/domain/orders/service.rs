//! Orders service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::tz::TimeZone;
use lienzo::{
    analytics::SalesSummary,
    ids::UserId,
    orders::{NewOrder, Order, OrderId, OrderStatus},
};
use mockall::automock;
use tokio::sync::mpsc::Receiver;
use tracing::{info, warn};

use crate::domain::orders::{errors::OrdersServiceError, repository::OrdersRepository};

#[derive(Clone)]
pub struct DocumentOrdersService {
    repository: Arc<dyn OrdersRepository>,
}

impl DocumentOrdersService {
    #[must_use]
    pub fn new(repository: Arc<dyn OrdersRepository>) -> Self {
        Self { repository }
    }

    async fn reconcile_payment(&self, order: &mut Order) -> Result<(), OrdersServiceError> {
        self.repository
            .update_status(&order.id, OrderStatus::Paid)
            .await?;

        info!(order = %order.id, "marked pending order with captured payment as paid");

        order.status = OrderStatus::Paid;

        Ok(())
    }
}

#[async_trait]
impl OrdersService for DocumentOrdersService {
    #[tracing::instrument(
        name = "orders.service.place_order",
        skip(self, order),
        fields(user = %order.user_id, status = %order.status),
        err
    )]
    async fn place_order(&self, order: NewOrder) -> Result<Order, OrdersServiceError> {
        if order.items.is_empty() {
            return Err(OrdersServiceError::Empty);
        }

        let order = self.repository.create_order(order).await?;

        info!(order = %order.id, total = %order.total_amount, "placed order");

        Ok(order)
    }

    async fn order_history(&self, user: &UserId) -> Result<Vec<Order>, OrdersServiceError> {
        let mut orders = self.repository.list_orders_for_user(user).await?;

        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(orders)
    }

    #[tracing::instrument(name = "orders.service.list_orders", skip(self), err)]
    async fn list_orders(&self) -> Result<Vec<Order>, OrdersServiceError> {
        let mut orders = self.repository.list_orders().await?;

        for order in &mut orders {
            if order.awaiting_payment_reconciliation() {
                self.reconcile_payment(order).await?;
            }
        }

        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(orders)
    }

    #[tracing::instrument(
        name = "orders.service.change_status",
        skip(self),
        fields(order = %order, next = %next),
        err
    )]
    async fn change_status(
        &self,
        order: &OrderId,
        next: OrderStatus,
    ) -> Result<Order, OrdersServiceError> {
        let mut current = self.repository.get_order(order).await?;

        if !current.status.can_transition_to(next) {
            warn!(from = %current.status, to = %next, "rejected order status change");

            return Err(OrdersServiceError::InvalidTransition {
                order: order.clone(),
                from: current.status,
                to: next,
            });
        }

        self.repository.update_status(order, next).await?;

        info!(from = %current.status, to = %next, "changed order status");

        current.status = next;

        Ok(current)
    }

    async fn sales_summary(&self, tz: &TimeZone) -> Result<SalesSummary, OrdersServiceError> {
        let orders = self.repository.list_orders().await?;

        Ok(SalesSummary::from_orders(&orders, tz))
    }

    async fn watch_orders(&self, user: &UserId) -> Result<Receiver<Vec<Order>>, OrdersServiceError> {
        Ok(self.repository.watch_orders_for_user(user).await?)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Persists a new order.
    async fn place_order(&self, order: NewOrder) -> Result<Order, OrdersServiceError>;

    /// Orders owned by `user`, newest first.
    async fn order_history(&self, user: &UserId) -> Result<Vec<Order>, OrdersServiceError>;

    /// Every order, newest first. Pending orders whose payment succeeded are
    /// marked paid on the way out.
    async fn list_orders(&self) -> Result<Vec<Order>, OrdersServiceError>;

    /// Moves an order to `next` if the transition is allowed.
    async fn change_status(
        &self,
        order: &OrderId,
        next: OrderStatus,
    ) -> Result<Order, OrdersServiceError>;

    /// Dashboard figures over every order.
    async fn sales_summary(&self, tz: &TimeZone) -> Result<SalesSummary, OrdersServiceError>;

    /// Live snapshots of the orders owned by `user`.
    async fn watch_orders(&self, user: &UserId) -> Result<Receiver<Vec<Order>>, OrdersServiceError>;
}
