// ABOUTME: PantryChef CLI - runs the recipe decision engine offline against a fixture catalog
// ABOUTME: Prints ranked recommendations or a single candidate's explanation as JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Rank recipes for a request
//! pantry-cli recommend --request request.json --recipes recipes.json --pretty
//!
//! # Explain why one candidate was ranked, downgraded, or rejected
//! pantry-cli explain --request request.json --recipes recipes.json --candidate 716429
//!
//! # Override engine settings from a JSON file
//! pantry-cli recommend --request request.json --recipes recipes.json --config engine.json
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pantry_chef::logging::LoggingConfig;

#[derive(Parser)]
#[command(
    name = "pantry-cli",
    about = "PantryChef recipe decision engine CLI",
    long_about = "Runs the full recommendation pipeline offline: a JSON recipe catalog stands in for the recipe database and a heuristic arbiter stands in for the language model."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Engine configuration JSON (defaults plus PANTRY_* environment variables otherwise)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Rank safe recipes for a pantry and constraints
    Recommend {
        /// Request JSON: ingredients plus constraint fields
        #[arg(long)]
        request: PathBuf,

        /// Recipe catalog JSON
        #[arg(long)]
        recipes: PathBuf,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },

    /// Explain the safety verdict and tier history of one candidate
    Explain {
        /// Request JSON: ingredients plus constraint fields
        #[arg(long)]
        request: PathBuf,

        /// Recipe catalog JSON
        #[arg(long)]
        recipes: PathBuf,

        /// Candidate id to explain
        #[arg(long)]
        candidate: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    LoggingConfig::for_cli(cli.verbose).init()?;

    let engine_config = commands::load_engine_config(cli.config.as_deref()).await?;

    match cli.command {
        Command::Recommend {
            request,
            recipes,
            pretty,
        } => {
            let output = commands::recommend(engine_config, &request, &recipes, pretty).await?;
            println!("{output}");
        }
        Command::Explain {
            request,
            recipes,
            candidate,
        } => {
            let output = commands::explain(engine_config, &request, &recipes, &candidate).await?;
            println!("{output}");
        }
    }

    Ok(())
}
