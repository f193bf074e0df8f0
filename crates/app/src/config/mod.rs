//! Storefront configuration
//!
//! Every setting can be given as a command line flag or an environment
//! variable. A `.env` file in the working directory is loaded first when present.

use clap::Args;

pub mod catalog;
pub mod observability;
pub mod store;

pub use catalog::CatalogConfig;
pub use observability::{LogFormat, LoggingConfig};
pub use store::StoreConfig;

/// Lienzo storefront configuration
#[derive(Debug, Args)]
pub struct AppConfig {
    /// Store pricing and payment settings.
    #[command(flatten)]
    pub store: StoreConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Product fixture settings.
    #[command(flatten)]
    pub catalog: CatalogConfig,
}

#[cfg(test)]
pub(crate) mod harness {
    use clap::Parser;

    use super::AppConfig;

    #[derive(Debug, Parser)]
    pub(crate) struct Harness {
        #[command(flatten)]
        pub(crate) config: AppConfig,
    }

    pub(crate) fn parse(args: &[&str]) -> Result<AppConfig, clap::Error> {
        Harness::try_parse_from(std::iter::once("lienzo").chain(args.iter().copied()))
            .map(|harness| harness.config)
    }
}
