//! Lienzo prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    addresses::{Address, AddressBook, AddressError, AddressId, NewAddress},
    analytics::SalesSummary,
    cart::{CartLineItem, CartStore, CartTotals, LineKey},
    catalog::{Catalog, CatalogError, Category, CategoryFilter, Color, Product, ProductId, Size},
    fixtures::{CatalogFixture, Fixture, FixtureError},
    ids::{DocumentId, TypedUuid, User, UserId},
    notifications::{Notification, NotificationId, NotificationKind, NotificationStore},
    orders::{
        NewOrder, Order, OrderId, OrderLine, OrderStatus, OrderStatusTracker, PaymentRecord,
        PaymentStatus, StatusChange, UnknownStatus, diff_statuses,
    },
    pricing::{PricingError, ShippingPolicy},
};
