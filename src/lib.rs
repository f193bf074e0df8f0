//! Lienzo
//!
//! Lienzo is the storefront state layer for an apparel shop: the session cart and
//! notification feed, the product catalog, address books, orders and their
//! status tracking, and sales analytics.

pub mod addresses;
pub mod analytics;
pub mod cart;
pub mod catalog;
pub mod fixtures;
pub mod ids;
pub mod notifications;
pub mod orders;
pub mod prelude;
pub mod pricing;
