//! Catalog

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    num::NonZeroU32,
    str::FromStr,
};

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{cart::CartLineItem, ids::DocumentId};

/// Product identifier, as assigned by the catalog or the products collection.
pub type ProductId = DocumentId<Product>;

/// Errors raised while browsing the catalog or building cart lines.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// No product with the given id.
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    /// A product with the same id already exists.
    #[error("duplicate product id: {0}")]
    DuplicateProduct(ProductId),

    /// The product is not offered in the requested color.
    #[error("product {product} is not available in {color}")]
    UnavailableColor {
        /// Product that was requested.
        product: ProductId,
        /// Color that was requested.
        color: Color,
    },

    /// The product has no image to show in the cart.
    #[error("product {0} has no image")]
    MissingImage(ProductId),

    /// Unrecognised variant or category value.
    #[error("unknown {kind}: {value}")]
    UnknownValue {
        /// What was being parsed.
        kind: &'static str,
        /// The rejected input.
        value: String,
    },
}

/// Garment size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Size {
    /// Small
    S,
    /// Medium
    M,
    /// Large
    L,
    /// Extra large
    XL,
    /// Double extra large
    XXL,
}

impl Size {
    /// Every size, smallest first.
    pub const ALL: [Self; 5] = [Self::S, Self::M, Self::L, Self::XL, Self::XXL];

    /// Label shown to shoppers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::S => "S",
            Self::M => "M",
            Self::L => "L",
            Self::XL => "XL",
            Self::XXL => "XXL",
        }
    }
}

impl Display for Size {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for Size {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|size| size.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CatalogError::UnknownValue {
                kind: "size",
                value: s.to_string(),
            })
    }
}

/// Garment color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// Black
    Black,
    /// White
    White,
    /// Grey
    Grey,
    /// Navy
    Navy,
}

impl Color {
    /// Every color in swatch order.
    pub const ALL: [Self; 4] = [Self::Black, Self::White, Self::Grey, Self::Navy];

    /// Lowercase name, as stored on orders.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::White => "white",
            Self::Grey => "grey",
            Self::Navy => "navy",
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for Color {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|color| color.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CatalogError::UnknownValue {
                kind: "color",
                value: s.to_string(),
            })
    }
}

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Hoodies
    Hoodies,
    /// Shirts
    Shirts,
    /// Accessories
    Accessories,
    /// Anything else
    Other,
}

impl Category {
    /// Every category in display order.
    pub const ALL: [Self; 4] = [Self::Hoodies, Self::Shirts, Self::Accessories, Self::Other];

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hoodies => "hoodies",
            Self::Shirts => "shirts",
            Self::Accessories => "accessories",
            Self::Other => "other",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CatalogError::UnknownValue {
                kind: "category",
                value: s.to_string(),
            })
    }
}

/// Category filter used by the shop listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Every product.
    #[default]
    All,

    /// Only products in one category.
    Only(Category),
}

impl CategoryFilter {
    /// Whether a product passes the filter.
    pub fn matches(self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => product.category == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }

        s.parse().map(Self::Only)
    }
}

/// Product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Unit price in major currency units
    pub price: Decimal,

    /// Product category
    pub category: Category,

    /// Image URIs, primary image first
    #[serde(default)]
    pub images: SmallVec<[String; 1]>,

    /// Long-form description
    #[serde(default)]
    pub description: String,

    /// Colors the product is offered in; empty means any color
    #[serde(default)]
    pub colors: SmallVec<[Color; 4]>,
}

impl Product {
    /// Whether the product is offered in `color`.
    pub fn offers_color(&self, color: Color) -> bool {
        self.colors.is_empty() || self.colors.contains(&color)
    }

    /// Build a single-unit cart line for the chosen variant.
    ///
    /// # Errors
    ///
    /// Returns an error when the color is not offered or the product has no image.
    pub fn line_item(&self, size: Size, color: Color) -> Result<CartLineItem, CatalogError> {
        if !self.offers_color(color) {
            return Err(CatalogError::UnavailableColor {
                product: self.id.clone(),
                color,
            });
        }

        let image = self
            .images
            .first()
            .ok_or_else(|| CatalogError::MissingImage(self.id.clone()))?;

        Ok(CartLineItem {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            image: image.clone(),
            size,
            color,
            quantity: NonZeroU32::MIN,
        })
    }
}

/// Catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: FxHashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog, keeping the given listing order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateProduct`] when two products share an id.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();

        for product in products {
            catalog.insert(product)?;
        }

        Ok(catalog)
    }

    /// Add a product to the end of the listing.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateProduct`] when the id is already present.
    pub fn insert(&mut self, product: Product) -> Result<(), CatalogError> {
        if self.index.contains_key(&product.id) {
            return Err(CatalogError::DuplicateProduct(product.id));
        }

        self.index.insert(product.id.clone(), self.products.len());
        self.products.push(product);

        Ok(())
    }

    /// Look up a product by id.
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.index.get(id).and_then(|&idx| self.products.get(idx))
    }

    /// Look up a product by id, failing when it is missing.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ProductNotFound`] when the id is unknown.
    pub fn require(&self, id: &ProductId) -> Result<&Product, CatalogError> {
        self.get(id)
            .ok_or_else(|| CatalogError::ProductNotFound(id.clone()))
    }

    /// Products passing the filter, in listing order.
    pub fn by_category(&self, filter: CategoryFilter) -> impl Iterator<Item = &Product> {
        self.products
            .iter()
            .filter(move |product| filter.matches(product))
    }

    /// Non-empty categories with their products, in category display order.
    pub fn grouped(&self) -> Vec<(Category, Vec<&Product>)> {
        Category::ALL
            .into_iter()
            .map(|category| {
                let products: Vec<&Product> =
                    self.by_category(CategoryFilter::Only(category)).collect();
                (category, products)
            })
            .filter(|(_, products)| !products.is_empty())
            .collect()
    }

    /// All products in listing order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;
    use testresult::TestResult;

    use super::*;

    fn product(id: u32, category: Category) -> Product {
        Product {
            id: ProductId::from(id),
            name: format!("Product {id}"),
            price: Decimal::new(1499, 0),
            category,
            images: smallvec![format!("/images/{id}.png")],
            description: String::new(),
            colors: smallvec![Color::Black, Color::White, Color::Grey],
        }
    }

    fn catalog() -> Result<Catalog, CatalogError> {
        Catalog::with_products([
            product(1, Category::Hoodies),
            product(2, Category::Shirts),
            product(3, Category::Hoodies),
        ])
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = Catalog::with_products([
            product(1, Category::Hoodies),
            product(1, Category::Shirts),
        ]);

        assert!(matches!(result, Err(CatalogError::DuplicateProduct(id)) if id == ProductId::new("1")));
    }

    #[test]
    fn category_filter_keeps_listing_order() -> TestResult {
        let catalog = catalog()?;

        let hoodies: Vec<_> = catalog
            .by_category(CategoryFilter::Only(Category::Hoodies))
            .map(|product| product.id.clone())
            .collect();

        assert_eq!(hoodies, [ProductId::new("1"), ProductId::new("3")]);
        assert_eq!(catalog.by_category(CategoryFilter::All).count(), 3);

        Ok(())
    }

    #[test]
    fn grouped_skips_empty_categories() -> TestResult {
        let catalog = catalog()?;

        let categories: Vec<_> = catalog.grouped().into_iter().map(|(c, _)| c).collect();

        assert_eq!(categories, [Category::Hoodies, Category::Shirts]);

        Ok(())
    }

    #[test]
    fn line_item_starts_at_one_unit_with_primary_image() -> TestResult {
        let catalog = catalog()?;

        let item = catalog
            .require(&ProductId::new("2"))?
            .line_item(Size::M, Color::Black)?;

        assert_eq!(item.quantity.get(), 1);
        assert_eq!(item.image, "/images/2.png");
        assert_eq!(item.price, Decimal::new(1499, 0));

        Ok(())
    }

    #[test]
    fn line_item_rejects_unoffered_color() -> TestResult {
        let catalog = catalog()?;

        let result = catalog
            .require(&ProductId::new("1"))?
            .line_item(Size::L, Color::Navy);

        assert!(matches!(result, Err(CatalogError::UnavailableColor { color: Color::Navy, .. })));

        Ok(())
    }

    #[test]
    fn unknown_product_is_not_found() -> TestResult {
        let catalog = catalog()?;

        let result = catalog.require(&ProductId::new("99"));

        assert!(matches!(result, Err(CatalogError::ProductNotFound(_))));

        Ok(())
    }

    #[test]
    fn variants_parse_case_insensitively() -> TestResult {
        assert_eq!("xl".parse::<Size>()?, Size::XL);
        assert_eq!("Grey".parse::<Color>()?, Color::Grey);
        assert_eq!("all".parse::<CategoryFilter>()?, CategoryFilter::All);
        assert_eq!(
            "shirts".parse::<CategoryFilter>()?,
            CategoryFilter::Only(Category::Shirts)
        );
        assert!("purple".parse::<Color>().is_err());

        Ok(())
    }
}
