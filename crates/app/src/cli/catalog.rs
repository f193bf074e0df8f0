use std::io;

use clap::Args;
use lienzo::{
    catalog::{CategoryFilter, Product},
    fixtures::CatalogFixture,
    pricing::to_money,
};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};

#[derive(Debug, Args)]
pub(crate) struct CatalogArgs {
    /// Only list one category (hoodies, shirts, accessories, other or all)
    #[arg(long, default_value = "all")]
    category: CategoryFilter,
}

pub(crate) fn run(
    args: &CatalogArgs,
    fixture: &CatalogFixture,
    out: &mut impl io::Write,
) -> Result<(), String> {
    let products: Vec<&Product> = fixture.catalog.by_category(args.category).collect();

    let mut builder = Builder::default();

    builder.push_record(["ID", "Name", "Category", "Colors", "Price"]);

    for product in &products {
        let price = to_money(product.price, fixture.currency)
            .map_err(|error| format!("failed to price product {}: {error}", product.id))?;

        let colors: Vec<&str> = product.colors.iter().map(|color| color.as_str()).collect();

        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            product.category.to_string(),
            colors.join(", "),
            price.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(4..5), Alignment::right());

    writeln!(out, "{table}\n{} products", products.len())
        .map_err(|error| format!("failed to write catalog: {error}"))
}
