// SPDX-FileCopyrightText: 2026 Tavolo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tavolo - review intelligence for restaurant feedback.
//!
//! This is the binary entry point for the Tavolo pipeline.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use tavolo_config::{ConfigError, TavoloConfig};

mod classify;
mod pipeline;
mod report;
mod shutdown;
mod summarize;

/// Tavolo - review intelligence for restaurant feedback.
#[derive(Parser, Debug)]
#[command(name = "tavolo", version, about, long_about = None)]
struct Cli {
    /// Explicit config file (skips the XDG hierarchy).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify each review's sentiment and aggregate the overall mood.
    Classify(pipeline::InputArgs),
    /// Produce the full analytical report for a review set.
    Report(pipeline::InputArgs),
    /// Produce a compact dashboard summary for one restaurant.
    Summarize(summarize::SummarizeArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            tavolo_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.runtime.log_level);

    let result = match cli.command {
        Commands::Classify(args) => classify::run_classify(config, args).await,
        Commands::Report(args) => report::run_report(config, args).await,
        Commands::Summarize(args) => summarize::run_summarize(config, args).await,
    };

    if let Err(e) = result {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<TavoloConfig, Vec<ConfigError>> {
    match path {
        Some(path) => tavolo_config::load_and_validate_path(path),
        None => tavolo_config::load_and_validate(),
    }
}

/// Initializes the tracing subscriber with the given log level.
///
/// Logs go to stderr so stdout stays valid JSON for piping.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tavolo={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
