//! Orders

use std::num::NonZeroU32;

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    addresses::Address,
    cart::{CartLineItem, CartStore},
    catalog::{Color, ProductId, Size},
    ids::{DocumentId, UserId},
};

pub mod status;
pub mod tracking;

pub use status::{OrderStatus, UnknownStatus};
pub use tracking::{OrderStatusTracker, StatusChange, diff_statuses, fold_snapshots};

/// Order id assigned by the orders collection.
pub type OrderId = DocumentId<Order>;

/// A purchased line, copied from the cart when the order was placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Product id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Unit price in major currency units
    pub price: Decimal,

    /// Number of units
    pub quantity: NonZeroU32,

    /// Selected size
    pub size: Size,

    /// Selected color
    pub color: Color,

    /// Product image
    pub image: String,
}

impl OrderLine {
    /// Price of all units on this line.
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity.get())
    }
}

impl From<&CartLineItem> for OrderLine {
    fn from(item: &CartLineItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            quantity: item.quantity,
            size: item.size,
            color: item.color,
            image: item.image.clone(),
        }
    }
}

/// Outcome recorded by the payment gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Funds captured
    Success,
    /// Payment attempt failed
    Failed,
}

/// Payment attached to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    /// Gateway-assigned payment id
    pub payment_id: String,

    /// Payment outcome
    pub status: PaymentStatus,

    /// When the gateway reported the outcome
    pub created_at: Timestamp,
}

impl PaymentRecord {
    /// A captured payment reported now.
    pub fn succeeded(payment_id: impl Into<String>) -> Self {
        Self {
            payment_id: payment_id.into(),
            status: PaymentStatus::Success,
            created_at: Timestamp::now(),
        }
    }
}

/// Order contents before the orders collection assigns an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    /// Owner of the order
    pub user_id: UserId,

    /// Owner's email at the time of purchase
    pub user_email: Option<String>,

    /// Purchased lines
    pub items: Vec<OrderLine>,

    /// Amount charged, shipping included
    pub total_amount: Decimal,

    /// Initial status
    pub status: OrderStatus,

    /// Placement instant
    pub created_at: Timestamp,

    /// Where to ship
    pub shipping_address: Option<Address>,

    /// Payment, when one was taken
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentRecord>,
}

impl NewOrder {
    /// Snapshot a cart into an order placed now.
    pub fn from_cart(
        cart: &CartStore,
        user_id: UserId,
        user_email: Option<String>,
        shipping_address: Option<Address>,
        status: OrderStatus,
    ) -> Self {
        Self {
            user_id,
            user_email,
            items: cart.items().iter().map(OrderLine::from).collect(),
            total_amount: cart.total(),
            status,
            created_at: Timestamp::now(),
            shipping_address,
            payment: None,
        }
    }

    /// Attach a payment record.
    #[must_use]
    pub fn with_payment(mut self, payment: PaymentRecord) -> Self {
        self.payment = Some(payment);
        self
    }

    /// Combine with the id assigned by the orders collection.
    pub fn into_order(self, id: OrderId) -> Order {
        Order {
            id,
            user_id: self.user_id,
            user_email: self.user_email,
            items: self.items,
            total_amount: self.total_amount,
            status: self.status,
            created_at: self.created_at,
            shipping_address: self.shipping_address,
            payment: self.payment,
        }
    }
}

/// A stored order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order id
    pub id: OrderId,

    /// Owner of the order
    pub user_id: UserId,

    /// Owner's email at the time of purchase
    pub user_email: Option<String>,

    /// Purchased lines
    pub items: Vec<OrderLine>,

    /// Amount charged, shipping included
    pub total_amount: Decimal,

    /// Fulfilment status
    pub status: OrderStatus,

    /// Placement instant
    pub created_at: Timestamp,

    /// Where to ship
    pub shipping_address: Option<Address>,

    /// Payment, when one was taken
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentRecord>,
}

impl Order {
    /// A pending order whose gateway payment succeeded and should be marked paid.
    pub fn awaiting_payment_reconciliation(&self) -> bool {
        self.status == OrderStatus::Pending
            && self
                .payment
                .as_ref()
                .is_some_and(|payment| payment.status == PaymentStatus::Success)
    }

    /// Number of units across all lines.
    pub fn unit_count(&self) -> u64 {
        self.items
            .iter()
            .map(|line| u64::from(line.quantity.get()))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use crate::{catalog::ProductId, pricing::ShippingPolicy};

    use super::*;

    fn cart() -> CartStore {
        let mut cart = CartStore::new(ShippingPolicy::default());

        cart.add_item(CartLineItem {
            id: ProductId::new("1"),
            name: "Fearless".to_string(),
            price: Decimal::new(1499, 0),
            image: "/images/1.png".to_string(),
            size: Size::M,
            color: Color::Black,
            quantity: NonZeroU32::MIN.saturating_add(1),
        });

        cart
    }

    #[test]
    fn orders_snapshot_cart_lines_and_total() {
        let order = NewOrder::from_cart(
            &cart(),
            UserId::new("uid-1"),
            Some("shopper@example.com".to_string()),
            None,
            OrderStatus::Pending,
        );

        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items.first().map(OrderLine::line_total), Some(Decimal::new(2998, 0)));
        assert_eq!(order.total_amount, Decimal::new(3008, 0));
        assert!(order.payment.is_none());
    }

    #[test]
    fn pending_order_with_captured_payment_needs_reconciliation() {
        let new_order = NewOrder::from_cart(
            &cart(),
            UserId::new("uid-1"),
            None,
            None,
            OrderStatus::Pending,
        );

        let unpaid = new_order.clone().into_order(OrderId::new("a"));
        let paid = new_order
            .with_payment(PaymentRecord::succeeded("pay_123"))
            .into_order(OrderId::new("b"));

        assert!(!unpaid.awaiting_payment_reconciliation());
        assert!(paid.awaiting_payment_reconciliation());
        assert_eq!(paid.unit_count(), 2);
    }
}
