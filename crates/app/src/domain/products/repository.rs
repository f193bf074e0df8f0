//! Products Repository

use async_trait::async_trait;
use lienzo::catalog::{Product, ProductId};
use mockall::automock;

use crate::{database::DatabaseError, domain::products::models::NewProduct};

/// Access to the products collection.
#[automock]
#[async_trait]
pub trait ProductsRepository: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, DatabaseError>;

    async fn create_product(&self, product: NewProduct) -> Result<Product, DatabaseError>;

    async fn update_product(
        &self,
        product: &ProductId,
        update: NewProduct,
    ) -> Result<Product, DatabaseError>;

    async fn delete_product(&self, product: &ProductId) -> Result<(), DatabaseError>;
}
