//! Orders service errors.

use lienzo::orders::{OrderId, OrderStatus};
use thiserror::Error;

use crate::database::DatabaseError;

#[derive(Debug, Error, PartialEq)]
pub enum OrdersServiceError {
    #[error("order not found")]
    NotFound,

    #[error("cannot move order {order} from {from} to {to}")]
    InvalidTransition {
        order: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("order has no items")]
    Empty,

    #[error("storage error")]
    Database(#[source] DatabaseError),
}

impl From<DatabaseError> for OrdersServiceError {
    fn from(error: DatabaseError) -> Self {
        if error.is_not_found() {
            return Self::NotFound;
        }

        Self::Database(error)
    }
}
