//! Document database seam
//!
//! The storefront persists users, orders and products in a hosted document
//! database. Only the error surface and collection names live here; each domain
//! declares its own repository trait over the collections it owns.

use thiserror::Error;

/// Collection holding one profile document per user, keyed by uid.
pub const USERS_COLLECTION: &str = "users";

/// Collection holding every order.
pub const ORDERS_COLLECTION: &str = "orders";

/// Collection holding the products managed from the admin dashboard.
pub const PRODUCTS_COLLECTION: &str = "products";

/// Errors reported by the document database client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DatabaseError {
    /// The document does not exist.
    #[error("document not found in {collection}: {id}")]
    NotFound {
        /// Collection that was queried
        collection: &'static str,
        /// Document id that was requested
        id: String,
    },

    /// Security rules rejected the request.
    #[error("permission denied on {0}")]
    PermissionDenied(&'static str),

    /// The database could not be reached.
    #[error("database unavailable: {0}")]
    Unavailable(String),

    /// The stored document could not be decoded.
    #[error("malformed document: {0}")]
    Malformed(String),
}

impl DatabaseError {
    /// Shorthand for a missing document.
    pub fn not_found(collection: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            collection,
            id: id.into(),
        }
    }

    /// Whether the error means the document does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<serde_json::Error> for DatabaseError {
    fn from(error: serde_json::Error) -> Self {
        Self::Malformed(error.to_string())
    }
}
