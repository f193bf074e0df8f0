//! Product Models

use lienzo::catalog::{Category, Color, Product, ProductId};
use rust_decimal::Decimal;
use smallvec::SmallVec;

use crate::domain::products::errors::ProductsServiceError;

/// Product form submitted from the admin dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub image: String,
    pub category: Category,
    pub description: String,
    pub colors: Vec<Color>,
}

impl NewProduct {
    /// Check the form before it is written.
    ///
    /// # Errors
    ///
    /// Returns an error when the name or image is blank or the price is negative.
    pub fn validate(&self) -> Result<(), ProductsServiceError> {
        if self.name.trim().is_empty() {
            return Err(ProductsServiceError::MissingField("name"));
        }

        if self.image.trim().is_empty() {
            return Err(ProductsServiceError::MissingField("image"));
        }

        if self.price.is_sign_negative() {
            return Err(ProductsServiceError::NegativePrice(self.price));
        }

        Ok(())
    }

    /// Combine with an id into a catalog product.
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name.trim().to_string(),
            price: self.price,
            category: self.category,
            images: SmallVec::from_elem(self.image, 1),
            description: self.description,
            colors: SmallVec::from_vec(self.colors),
        }
    }
}
