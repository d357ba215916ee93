// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Raad - ask questions about Saudi company financials in plain language.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod app;
mod ask;
mod datasets;
mod doctor;
mod serve;
mod shell;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use raad_config::RaadConfig;

/// Raad - natural-language analytics over financial statement datasets.
#[derive(Parser, Debug)]
#[command(name = "raad", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP gateway.
    Serve,
    /// Launch an interactive chat session.
    Shell,
    /// Ask a single question and print the answer.
    Ask {
        /// Dataset to query (filings, facts, ratios, analytics).
        #[arg(long, short)]
        dataset: Option<String>,
        /// The question.
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Show store counts and a summary of each dataset.
    Datasets,
    /// Run the data verification report; exits 1 on any failed check.
    Verify,
    /// Check configuration, data and engine health.
    Doctor {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

fn load_config(path: Option<&std::path::Path>) -> RaadConfig {
    let loaded = match path {
        Some(path) => raad_config::load_and_validate_path(path),
        None => raad_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            raad_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());
    serve::init_tracing(&config.app.log_level);

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Shell) => shell::run_shell(config).await,
        Some(Commands::Ask { dataset, question }) => {
            ask::run_ask(config, dataset.as_deref(), &question.join(" ")).await
        }
        Some(Commands::Datasets) => datasets::run_datasets(config),
        Some(Commands::Verify) => match datasets::run_verify(config) {
            Ok(true) => Ok(()),
            Ok(false) => std::process::exit(1),
            Err(e) => Err(e),
        },
        Some(Commands::Doctor { plain }) => doctor::run_doctor(&config, plain).await,
        None => {
            println!("raad: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}
