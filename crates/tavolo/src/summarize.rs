// SPDX-FileCopyrightText: 2026 Tavolo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tavolo summarize` command implementation.
//!
//! Produces the compact dashboard row for one restaurant: average rating,
//! review count, and a model-written sentiment summary. Falls back to the
//! rating-based estimate when the model path fails, so the command only
//! errors on empty or invalid input.

use clap::Args;
use tracing::info;

use tavolo_config::TavoloConfig;
use tavolo_core::TavoloError;
use tavolo_report::SummaryBuilder;

use crate::pipeline::{self, InputArgs};
use crate::shutdown;

/// Arguments for `tavolo summarize`.
#[derive(Args, Debug)]
pub struct SummarizeArgs {
    /// Restaurant name included in the summary prompt and output.
    #[arg(long, value_name = "NAME")]
    pub name: String,

    #[command(flatten)]
    pub input: InputArgs,
}

/// Runs the `tavolo summarize` command.
pub async fn run_summarize(config: TavoloConfig, args: SummarizeArgs) -> Result<(), TavoloError> {
    let reviews = pipeline::load_reviews(&args.input)?;

    let cancel = shutdown::install_signal_handler();
    let gateway = pipeline::build_gateway(&config, cancel)?;

    info!(
        restaurant = args.name.as_str(),
        reviews = reviews.len(),
        "summarizing restaurant sentiment"
    );
    let row = SummaryBuilder::new(gateway)
        .restaurant_sentiment(&args.name, &reviews)
        .await?;

    pipeline::print_json(&row)
}
