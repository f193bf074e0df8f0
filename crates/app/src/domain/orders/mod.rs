//! Orders

pub mod errors;
pub mod feed;
mod repository;
pub mod service;

pub use errors::OrdersServiceError;
pub use feed::OrderFeed;
pub use repository::*;
pub use service::*;
