//! Product Fixtures

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use serde::Deserialize;
use smallvec::SmallVec;

use crate::{
    catalog::{Category, Color, Product, ProductId},
    fixtures::FixtureError,
    pricing::parse_price,
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Products in listing order
    pub products: Vec<ProductFixture>,
}

/// Product fixture from YAML
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Catalog key; numeric keys are accepted
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Price written as `"AMOUNT CURRENCY"`, e.g. `"1499.00 INR"`
    pub price: String,

    /// Product category
    pub category: Category,

    /// Image URIs, primary image first
    #[serde(default)]
    pub images: SmallVec<[String; 1]>,

    /// Colors the product is offered in
    #[serde(default)]
    pub colors: SmallVec<[Color; 4]>,

    /// Long-form description
    #[serde(default)]
    pub description: String,
}

impl ProductFixture {
    /// Convert into a catalog product and the currency of its price.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Price`] when the price is malformed, negative or in
    /// an unknown currency.
    pub fn try_into_product(self) -> Result<(Product, &'static Currency), FixtureError> {
        let (price, currency): (Decimal, _) =
            parse_price(&self.price).map_err(|source| FixtureError::Price {
                product: self.id.to_string(),
                source,
            })?;

        let product = Product {
            id: self.id,
            name: self.name,
            price,
            category: self.category,
            images: self.images,
            description: self.description,
            colors: self.colors,
        };

        Ok((product, currency))
    }
}
