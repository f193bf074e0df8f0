use std::{io, num::NonZeroU32, str::FromStr};

use clap::Args;
use lienzo::{
    cart::CartStore,
    catalog::{Catalog, CatalogError, Color, ProductId, Size},
    fixtures::CatalogFixture,
    pricing::{PricingError, ShippingPolicy, to_money},
};
use lienzo_app::config::StoreConfig;
use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Args)]
pub(crate) struct QuoteArgs {
    /// Cart line as ID:SIZE:COLOR[:QTY]; repeat for more lines
    #[arg(long = "item", required = true)]
    items: Vec<ItemSpec>,
}

#[derive(Debug, Error, PartialEq)]
pub(crate) enum ItemSpecError {
    #[error("expected ID:SIZE:COLOR[:QTY], got {0}")]
    Format(String),

    #[error("quantity must be a positive integer, got {0}")]
    Quantity(String),

    #[error(transparent)]
    Variant(#[from] CatalogError),
}

/// One `--item` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ItemSpec {
    id: ProductId,
    size: Size,
    color: Color,
    quantity: NonZeroU32,
}

impl FromStr for ItemSpec {
    type Err = ItemSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').map(str::trim).collect();

        let (id, size, color, quantity) = match parts.as_slice() {
            [id, size, color] => (*id, *size, *color, None),
            [id, size, color, quantity] => (*id, *size, *color, Some(*quantity)),
            _ => return Err(ItemSpecError::Format(s.to_string())),
        };

        if id.is_empty() {
            return Err(ItemSpecError::Format(s.to_string()));
        }

        let quantity = match quantity {
            Some(raw) => raw
                .parse::<NonZeroU32>()
                .map_err(|_err| ItemSpecError::Quantity(raw.to_string()))?,
            None => NonZeroU32::MIN,
        };

        Ok(Self {
            id: ProductId::new(id),
            size: size.parse()?,
            color: color.parse()?,
            quantity,
        })
    }
}

pub(crate) fn run(
    args: &QuoteArgs,
    fixture: &CatalogFixture,
    store: &StoreConfig,
    out: &mut impl io::Write,
) -> Result<(), String> {
    let shipping = store
        .shipping_policy()
        .map_err(|error| format!("invalid shipping fee: {error}"))?;

    if store.currency != fixture.currency.iso_alpha_code {
        warn!(
            store = %store.currency,
            catalog = fixture.currency.iso_alpha_code,
            "catalog currency differs from store currency; quoting in catalog currency"
        );
    }

    let cart = fill_cart(&fixture.catalog, &args.items, shipping)
        .map_err(|error| format!("failed to build cart: {error}"))?;

    render(&cart, fixture.currency, out)
}

fn fill_cart(
    catalog: &Catalog,
    items: &[ItemSpec],
    shipping: ShippingPolicy,
) -> Result<CartStore, CatalogError> {
    let mut cart = CartStore::new(shipping);

    for spec in items {
        let item = catalog
            .require(&spec.id)?
            .line_item(spec.size, spec.color)?
            .with_quantity(spec.quantity);

        cart.add_item(item);
    }

    Ok(cart)
}

fn render(
    cart: &CartStore,
    currency: &'static Currency,
    out: &mut impl io::Write,
) -> Result<(), String> {
    let money = |amount: Decimal| -> Result<String, String> {
        to_money(amount, currency)
            .map(|money| format!("{money}"))
            .map_err(|error: PricingError| format!("failed to price quote: {error}"))
    };

    let mut builder = Builder::default();

    builder.push_record(["#", "Product", "Size", "Color", "Qty", "Unit", "Line total"]);

    for (idx, item) in cart.items().iter().enumerate() {
        builder.push_record([
            format!("#{:<3}", idx + 1),
            item.name.clone(),
            item.size.to_string(),
            item.color.to_string(),
            item.quantity.to_string(),
            money(item.price)?,
            money(item.line_total())?,
        ]);
    }

    let totals = cart.totals();

    for (label, amount) in [
        ("Subtotal", totals.subtotal),
        ("Shipping", totals.shipping),
        ("Total", totals.total),
    ] {
        builder.push_record([
            String::new(),
            label.to_string(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            money(amount)?,
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), tabled::settings::Color::BOLD);
    table.modify(Columns::new(4..7), Alignment::right());

    writeln!(out, "{table}").map_err(|error| format!("failed to write quote: {error}"))
}
