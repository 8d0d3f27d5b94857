// SPDX-FileCopyrightText: 2026 Tavolo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tavolo report` command implementation.
//!
//! Runs the aggregate analysis over a review set and prints the full
//! report: summary, pros and cons, mood split, predicted stars, and the
//! trend forecast. Unlike `summarize`, a failed analysis is an error here;
//! there is no degraded output for reports.

use tracing::info;

use tavolo_config::TavoloConfig;
use tavolo_core::TavoloError;
use tavolo_report::ReportBuilder;

use crate::pipeline::{self, InputArgs};
use crate::shutdown;

/// Runs the `tavolo report` command.
pub async fn run_report(config: TavoloConfig, args: InputArgs) -> Result<(), TavoloError> {
    let reviews = pipeline::load_reviews(&args)?;

    let cancel = shutdown::install_signal_handler();
    let gateway = pipeline::build_gateway(&config, cancel)?;

    info!(reviews = reviews.len(), "building analytical report");
    let analysis = ReportBuilder::new(gateway).build_report(&reviews).await?;

    pipeline::print_json(&analysis)
}
