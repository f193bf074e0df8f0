//! Lienzo storefront orchestration: authentication, checkout, order tracking
//! and administration over external collaborators.

pub mod auth;
pub mod checkout;
pub mod config;
pub mod context;
pub mod database;
pub mod domain;
pub mod observability;
pub mod payments;

#[cfg(test)]
mod test;
