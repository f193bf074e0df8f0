//! Cart
//!
//! The session cart. Lines are identified by product, size and color together;
//! adding a line that already exists grows its quantity instead of adding a row.

use std::num::NonZeroU32;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    catalog::{Color, ProductId, Size},
    pricing::ShippingPolicy,
};

/// Identity of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineKey {
    /// Product id
    pub id: ProductId,

    /// Selected size
    pub size: Size,

    /// Selected color
    pub color: Color,
}

impl LineKey {
    /// Build a key for a product variant.
    pub fn new(id: impl Into<ProductId>, size: Size, color: Color) -> Self {
        Self {
            id: id.into(),
            size,
            color,
        }
    }
}

/// A single line in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Product id
    pub id: ProductId,

    /// Product name at the time it was added
    pub name: String,

    /// Unit price in major currency units
    pub price: Decimal,

    /// Primary product image
    pub image: String,

    /// Selected size
    pub size: Size,

    /// Selected color
    pub color: Color,

    /// Number of units
    pub quantity: NonZeroU32,
}

impl CartLineItem {
    /// The line's identity.
    pub fn key(&self) -> LineKey {
        LineKey {
            id: self.id.clone(),
            size: self.size,
            color: self.color,
        }
    }

    /// Whether this line has the given identity.
    pub fn has_key(&self, key: &LineKey) -> bool {
        self.id == key.id && self.size == key.size && self.color == key.color
    }

    /// Set the number of units.
    #[must_use]
    pub fn with_quantity(mut self, quantity: NonZeroU32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Price of all units on this line.
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity.get())
    }
}

/// Derived cart amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    /// Sum of all line totals
    pub subtotal: Decimal,

    /// Shipping fee
    pub shipping: Decimal,

    /// Subtotal plus shipping
    pub total: Decimal,
}

/// Session cart.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    items: Vec<CartLineItem>,
    shipping: ShippingPolicy,
}

impl CartStore {
    /// Create an empty cart charging shipping according to `shipping`.
    pub fn new(shipping: ShippingPolicy) -> Self {
        Self {
            items: Vec::new(),
            shipping,
        }
    }

    /// Add a line, merging it into an existing line with the same identity.
    pub fn add_item(&mut self, item: CartLineItem) {
        let key = item.key();

        match self.items.iter_mut().find(|existing| existing.has_key(&key)) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(item.quantity.get());
            }
            None => self.items.push(item),
        }
    }

    /// Adjust a line's quantity by `delta`.
    ///
    /// Updates that would leave the line below one unit are ignored. Returns whether
    /// the quantity changed.
    pub fn update_quantity(&mut self, key: &LineKey, delta: i32) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.has_key(key)) else {
            return false;
        };

        let next = i64::from(item.quantity.get()) + i64::from(delta);

        match u32::try_from(next).ok().and_then(NonZeroU32::new) {
            Some(quantity) if quantity != item.quantity => {
                item.quantity = quantity;
                true
            }
            Some(_) | None => false,
        }
    }

    /// Remove a line, returning it if it was present.
    pub fn remove_item(&mut self, key: &LineKey) -> Option<CartLineItem> {
        let idx = self.items.iter().position(|item| item.has_key(key))?;

        Some(self.items.remove(idx))
    }

    /// Remove every line.
    pub fn clear_cart(&mut self) {
        self.items.clear();
    }

    /// Lines in the order they were first added.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Look up a line by identity.
    pub fn get(&self, key: &LineKey) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.has_key(key))
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    pub fn unit_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Sum of price times quantity over all lines.
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Shipping fee; zero when the cart is empty.
    pub fn shipping(&self) -> Decimal {
        self.shipping.fee_for(self.items.len())
    }

    /// Subtotal plus shipping.
    pub fn total(&self) -> Decimal {
        self.subtotal() + self.shipping()
    }

    /// Subtotal, shipping and total together.
    pub fn totals(&self) -> CartTotals {
        let subtotal = self.subtotal();
        let shipping = self.shipping();

        CartTotals {
            subtotal,
            shipping,
            total: subtotal + shipping,
        }
    }
}
