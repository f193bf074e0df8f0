use std::io;

use clap::{Parser, Subcommand};
use lienzo::fixtures::{CatalogFixture, Fixture};
use lienzo_app::config::AppConfig;

mod catalog;
mod quote;

#[derive(Debug, Parser)]
#[command(name = "lienzo-app", about = "Lienzo storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List catalog products
    Catalog(catalog::CatalogArgs),

    /// Price a cart of catalog products
    Quote(quote::QuoteArgs),
}

impl Cli {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub(crate) fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    pub(crate) fn run(self, out: &mut impl io::Write) -> Result<(), String> {
        let fixture = load_catalog(&self.config)?;

        match self.command {
            Commands::Catalog(args) => catalog::run(&args, &fixture, out),
            Commands::Quote(args) => quote::run(&args, &fixture, &self.config.store, out),
        }
    }
}

fn load_catalog(config: &AppConfig) -> Result<CatalogFixture, String> {
    Fixture::with_base_path(&config.catalog.fixtures_dir)
        .load_catalog(&config.catalog.name)
        .map_err(|error| format!("failed to load catalog {}: {error}", config.catalog.name))
}
