//! `pubmed`: command-line front end for the PubMed job backend.

mod backend;
mod cli;
mod commands;
mod render;

use std::io;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use client_logging::{client_error, client_info};
use log::LevelFilter;

use crate::backend::Backend;
use crate::cli::Cli;

/// Written to the current working directory.
const LOG_FILE: &str = "pubmed_client.log";

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is the normal case.
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Some(destination) = cli.log.destination() {
        let level = if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        client_logging::initialize(destination, level, Path::new(LOG_FILE));
    }
    if let Ok(path) = &dotenv {
        client_info!("Loaded environment from {}", path.display());
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            client_error!("{:#}", err);
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let backend = Backend::from_cli(&cli)?;
    commands::run(cli.command, &backend, &mut io::stdout()).await
}
