// SPDX-FileCopyrightText: 2026 Tavolo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tavolo classify` command implementation.
//!
//! Classifies every review's sentiment in concurrent batches, then prints
//! the per-review results together with the aggregate mood breakdown and
//! the top review keywords.

use std::time::Duration;

use serde::Serialize;
use tracing::info;

use tavolo_config::TavoloConfig;
use tavolo_core::{MoodBreakdown, SentimentResult, TavoloError};
use tavolo_sentiment::{extract_keywords, BatchRunner, SentimentClassifier};

use crate::pipeline::{self, InputArgs};
use crate::shutdown;

/// JSON document emitted by `tavolo classify`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClassifyOutput {
    results: Vec<ClassifiedReview>,
    mood: MoodBreakdown,
    keywords: Vec<String>,
}

/// One input review paired with its sentiment.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClassifiedReview {
    text: String,
    stars: u8,
    #[serde(flatten)]
    sentiment: SentimentResult,
}

/// Runs the `tavolo classify` command.
pub async fn run_classify(config: TavoloConfig, args: InputArgs) -> Result<(), TavoloError> {
    let reviews = pipeline::load_reviews(&args)?;
    if reviews.is_empty() {
        return Err(TavoloError::NoReviews);
    }

    let cancel = shutdown::install_signal_handler();
    let gateway = pipeline::build_gateway(&config, cancel)?;

    let classifier = SentimentClassifier::new(
        gateway,
        Duration::from_secs(config.throttle.retry_delay_secs),
    );
    let runner = BatchRunner::new(
        classifier,
        config.batch.size,
        Duration::from_millis(config.batch.pause_ms),
    );

    info!(
        reviews = reviews.len(),
        batch_size = config.batch.size,
        "classifying reviews"
    );
    let results = runner.classify_all(&reviews).await;

    let mood = MoodBreakdown::from_results(&results);
    let texts: Vec<&str> = reviews.iter().map(|r| r.text.as_str()).collect();
    let keywords = extract_keywords(&texts);

    let output = ClassifyOutput {
        results: reviews
            .into_iter()
            .zip(results)
            .map(|(review, sentiment)| ClassifiedReview {
                text: review.text,
                stars: review.stars,
                sentiment,
            })
            .collect(),
        mood,
        keywords,
    };
    pipeline::print_json(&output)
}
