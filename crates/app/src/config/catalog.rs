//! Catalog Config

use std::path::PathBuf;

use clap::Args;

/// Where the product catalog is loaded from.
#[derive(Debug, Args)]
pub struct CatalogConfig {
    /// Directory holding the `products/` fixtures
    #[arg(long, env = "FIXTURES_DIR", default_value = "./fixtures")]
    pub fixtures_dir: PathBuf,

    /// Catalog fixture name, without the `.yml` extension
    #[arg(long = "catalog", env = "CATALOG_NAME", default_value = "lienzo")]
    pub name: String,
}
