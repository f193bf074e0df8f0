//! Fixtures
//!
//! YAML product catalogs used by the CLI and by tests.

use std::{
    fs,
    path::{Path, PathBuf},
};

use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogError},
    pricing::PricingError,
};

pub mod products;

pub use products::{ProductFixture, ProductsFixture};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file {path}: {source}")]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid or negative price
    #[error("Invalid price for product {product}: {source}")]
    Price {
        /// Product whose price was rejected
        product: String,
        /// Underlying error
        source: PricingError,
    },

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// The fixture has no products, so its currency is unknown
    #[error("No products in fixture; currency unknown")]
    NoCurrency,

    /// Catalog rejected a product
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// A catalog together with the currency its prices are in.
#[derive(Debug, Clone)]
pub struct CatalogFixture {
    /// Products in listing order
    pub catalog: Catalog,

    /// Currency shared by every product
    pub currency: &'static Currency,
}

/// Fixture loader rooted at a base directory.
#[derive(Debug, Clone)]
pub struct Fixture {
    base_path: PathBuf,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    /// Loader rooted at `./fixtures`.
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Loader rooted at a custom directory.
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Base directory.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Load `products/{name}.yml` into a catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, a price is invalid,
    /// products use different currencies, or two products share an id.
    pub fn load_catalog(&self, name: &str) -> Result<CatalogFixture, FixtureError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));

        let contents = fs::read_to_string(&file_path).map_err(|source| FixtureError::Io {
            path: file_path.clone(),
            source,
        })?;

        parse_catalog(&contents)
    }
}

/// Parse a products fixture document.
///
/// # Errors
///
/// Returns an error if the YAML is malformed, a price is invalid, products use
/// different currencies, or two products share an id.
pub fn parse_catalog(contents: &str) -> Result<CatalogFixture, FixtureError> {
    let fixture: ProductsFixture = serde_norway::from_str(contents)?;

    let mut catalog = Catalog::default();
    let mut currency: Option<&'static Currency> = None;

    for product_fixture in fixture.products {
        let (product, product_currency) = product_fixture.try_into_product()?;

        match currency {
            Some(existing) if existing != product_currency => {
                return Err(FixtureError::CurrencyMismatch(
                    existing.iso_alpha_code.to_string(),
                    product_currency.iso_alpha_code.to_string(),
                ));
            }
            Some(_) => {}
            None => currency = Some(product_currency),
        }

        catalog.insert(product)?;
    }

    Ok(CatalogFixture {
        catalog,
        currency: currency.ok_or(FixtureError::NoCurrency)?,
    })
}
