// SPDX-FileCopyrightText: 2026 Tavolo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Concurrent batch classification of review sets.
//!
//! Reviews are processed `batch_size` at a time: every review in a batch
//! is classified concurrently, then the runner pauses briefly before the
//! next batch. Output order always matches input order.

use std::time::Duration;

use futures::future::join_all;
use tokio::time::sleep;
use tracing::debug;

use tavolo_core::{Review, SentimentResult};

use crate::classifier::SentimentClassifier;

/// Drives per-review classification over a whole review set.
pub struct BatchRunner {
    classifier: SentimentClassifier,
    batch_size: usize,
    pause: Duration,
}

impl BatchRunner {
    /// Create a runner classifying `batch_size` reviews concurrently with
    /// `pause` slept between consecutive batches.
    pub fn new(classifier: SentimentClassifier, batch_size: usize, pause: Duration) -> Self {
        Self {
            classifier,
            // A zero batch would never make progress.
            batch_size: batch_size.max(1),
            pause,
        }
    }

    /// Classify every review, preserving input order.
    ///
    /// Infallible for the same reason single classification is: each review
    /// independently degrades to the neutral fallback on failure. No pause
    /// follows the final batch.
    pub async fn classify_all(&self, reviews: &[Review]) -> Vec<SentimentResult> {
        let mut results = Vec::with_capacity(reviews.len());
        let batches: Vec<&[Review]> = reviews.chunks(self.batch_size).collect();
        let total = batches.len();

        for (index, batch) in batches.into_iter().enumerate() {
            debug!(batch = index + 1, total, size = batch.len(), "classifying review batch");
            let outcomes = join_all(
                batch
                    .iter()
                    .map(|review| self.classifier.classify(&review.text)),
            )
            .await;
            results.extend(outcomes);

            if index + 1 < total {
                sleep(self.pause).await;
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tavolo_core::{SentimentLabel, TavoloError};
    use tavolo_gateway::{ModelGateway, RateLimiter};
    use tavolo_test_utils::{fixtures, MockGenerator};
    use tokio::time::Instant;

    fn runner_over(mock: Arc<MockGenerator>, batch_size: usize, pause: Duration) -> BatchRunner {
        let gateway = ModelGateway::new(
            mock,
            RateLimiter::new(10_000, Duration::from_secs(60)),
            Duration::from_secs(30),
        );
        let classifier = SentimentClassifier::new(Arc::new(gateway), Duration::from_secs(2));
        BatchRunner::new(classifier, batch_size, pause)
    }

    #[tokio::test]
    async fn empty_input_makes_no_calls() {
        let mock = Arc::new(MockGenerator::new());
        let runner = runner_over(mock.clone(), 25, Duration::from_millis(100));
        let results = runner.classify_all(&[]).await;
        assert!(results.is_empty());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn results_follow_input_order() {
        let mock = Arc::new(MockGenerator::with_responses(vec![
            r#"{"score": 0.9, "label": "positive"}"#.to_string(),
            r#"{"score": -0.8, "label": "negative"}"#.to_string(),
            r#"{"score": 0.0, "label": "neutral"}"#.to_string(),
        ]));
        let runner = runner_over(mock, 25, Duration::from_millis(100));

        let reviews = vec![
            fixtures::review("wonderful", 5, 1),
            fixtures::review("terrible", 1, 2),
            fixtures::review("fine", 3, 3),
        ];
        let results = runner.classify_all(&reviews).await;
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].label, SentimentLabel::Positive);
        assert_eq!(results[1].label, SentimentLabel::Negative);
        assert_eq!(results[2].label, SentimentLabel::Neutral);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrency_never_exceeds_batch_size() {
        let mock = Arc::new(MockGenerator::new().with_latency(Duration::from_secs(1)));
        let runner = runner_over(mock.clone(), 3, Duration::from_millis(100));

        let reviews: Vec<_> = (0..7)
            .map(|i| fixtures::review(&format!("review number {i}"), 3, i))
            .collect();
        let results = runner.classify_all(&reviews).await;

        assert_eq!(results.len(), 7);
        assert_eq!(mock.call_count(), 7);
        assert!(
            mock.peak_in_flight() <= 3,
            "peak concurrency was {}",
            mock.peak_in_flight()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn pauses_between_batches_but_not_after_the_last() {
        let mock = Arc::new(MockGenerator::new());
        let runner = runner_over(mock, 2, Duration::from_millis(100));

        let reviews: Vec<_> = (0..5)
            .map(|i| fixtures::review(&format!("review number {i}"), 4, i))
            .collect();

        // Three batches of 2 + 2 + 1: two inter-batch pauses.
        let start = Instant::now();
        runner.classify_all(&reviews).await;
        assert_eq!(start.elapsed(), Duration::from_millis(200));
    }

    #[tokio::test]
    async fn single_batch_has_no_pause() {
        let mock = Arc::new(MockGenerator::new());
        let runner = runner_over(mock, 25, Duration::from_millis(100));

        let reviews = vec![fixtures::review("quick bite", 4, 1)];
        let start = std::time::Instant::now();
        runner.classify_all(&reviews).await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn failures_inside_a_batch_do_not_disturb_neighbors() {
        let mock = Arc::new(MockGenerator::new());
        mock.push_response(r#"{"score": 0.9, "label": "positive"}"#).await;
        mock.push_error(TavoloError::Transport {
            message: "connection reset".to_string(),
            source: None,
        })
        .await;
        mock.push_response(r#"{"score": -0.9, "label": "negative"}"#).await;
        let runner = runner_over(mock, 25, Duration::from_millis(100));

        let reviews = vec![
            fixtures::review("superb", 5, 1),
            fixtures::review("meh", 3, 2),
            fixtures::review("awful", 1, 3),
        ];
        let results = runner.classify_all(&reviews).await;
        assert_eq!(results[0].label, SentimentLabel::Positive);
        assert_eq!(results[1], SentimentResult::neutral());
        assert_eq!(results[2].label, SentimentLabel::Negative);
    }
}
