//! Lienzo storefront CLI

use std::{io, process::ExitCode};

use lienzo_app::observability::init_subscriber;

use crate::cli::Cli;

mod cli;

fn main() -> ExitCode {
    let cli = match Cli::load() {
        Ok(cli) => cli,
        Err(error) => {
            // Help and version requests are reported through the same path
            _ = error.print();

            return if error.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(error) = init_subscriber(&cli.config.logging) {
        eprintln!("Logging error: {error}");

        return ExitCode::FAILURE;
    }

    if let Err(message) = cli.run(&mut io::stdout().lock()) {
        eprintln!("{message}");

        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
