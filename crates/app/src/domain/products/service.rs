//! Products service.

use std::sync::Arc;

use async_trait::async_trait;
use lienzo::catalog::{Catalog, Product, ProductId};
use mockall::automock;
use tracing::info;

use crate::domain::products::{
    errors::ProductsServiceError, models::NewProduct, repository::ProductsRepository,
};

#[derive(Clone)]
pub struct DocumentProductsService {
    repository: Arc<dyn ProductsRepository>,
}

impl DocumentProductsService {
    #[must_use]
    pub fn new(repository: Arc<dyn ProductsRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl ProductsService for DocumentProductsService {
    async fn list_products(&self) -> Result<Vec<Product>, ProductsServiceError> {
        Ok(self.repository.list_products().await?)
    }

    async fn catalog(&self) -> Result<Catalog, ProductsServiceError> {
        let products = self.list_products().await?;

        Ok(Catalog::with_products(products)?)
    }

    #[tracing::instrument(name = "products.service.create_product", skip(self, product), err)]
    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError> {
        product.validate()?;

        let created = self.repository.create_product(product).await?;

        info!(product = %created.id, "created product");

        Ok(created)
    }

    #[tracing::instrument(
        name = "products.service.update_product",
        skip(self, update),
        fields(product = %product),
        err
    )]
    async fn update_product(
        &self,
        product: &ProductId,
        update: NewProduct,
    ) -> Result<Product, ProductsServiceError> {
        update.validate()?;

        Ok(self.repository.update_product(product, update).await?)
    }

    #[tracing::instrument(
        name = "products.service.delete_product",
        skip(self),
        fields(product = %product),
        err
    )]
    async fn delete_product(&self, product: &ProductId) -> Result<(), ProductsServiceError> {
        self.repository.delete_product(product).await?;

        info!("deleted product");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieves all products.
    async fn list_products(&self) -> Result<Vec<Product>, ProductsServiceError>;

    /// Retrieves all products as an indexed catalog.
    async fn catalog(&self) -> Result<Catalog, ProductsServiceError>;

    /// Validates and stores a new product.
    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError>;

    /// Validates and overwrites an existing product.
    async fn update_product(
        &self,
        product: &ProductId,
        update: NewProduct,
    ) -> Result<Product, ProductsServiceError>;

    /// Deletes a product.
    async fn delete_product(&self, product: &ProductId) -> Result<(), ProductsServiceError>;
}
