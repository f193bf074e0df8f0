//! Products service errors.

use lienzo::catalog::CatalogError;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::database::DatabaseError;

#[derive(Debug, Error, PartialEq)]
pub enum ProductsServiceError {
    #[error("product not found")]
    NotFound,

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("price cannot be negative: {0}")]
    NegativePrice(Decimal),

    #[error("invalid catalog listing")]
    Catalog(#[from] CatalogError),

    #[error("storage error")]
    Database(#[source] DatabaseError),
}

impl From<DatabaseError> for ProductsServiceError {
    fn from(error: DatabaseError) -> Self {
        if error.is_not_found() {
            return Self::NotFound;
        }

        Self::Database(error)
    }
}
