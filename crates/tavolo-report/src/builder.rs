// SPDX-FileCopyrightText: 2026 Tavolo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aggregate report generation: one model call per restaurant.
//!
//! The prompt shows every review newest-first with its post date, plus a
//! short statistics block, and demands a camelCase JSON reply. Aggregate
//! calls are never retried; any failure surfaces as
//! [`TavoloError::AnalysisFailed`] so callers can distinguish a sunk
//! report from a degraded per-review result.

use std::sync::Arc;

use tracing::{debug, warn};

use tavolo_core::{Review, ReviewAnalysis, TavoloError};
use tavolo_gateway::ModelGateway;

use crate::parse::parse_report;
use crate::stats::ReviewStats;

const REPORT_PROMPT: &str = r#"Analyze these restaurant reviews (ordered from newest to oldest) and provide:
1. A concise summary of overall customer sentiment
2. Key pros and cons (3-4 of each)
3. Overall mood analysis (percentage of positive, neutral, and negative reviews, summing to 100)
4. Predicted star rating based on recent trends
5. Prediction for upcoming review volume and sentiment trends for next month, considering historical patterns

Reviews with timestamps:
{reviews}

Additional context for analysis:
- Total number of reviews: {total}
- Date range: {date_range}
- Average reviews per month: {monthly_average}

Respond ONLY with a JSON object (no markdown, no code blocks) using this structure:
{
  "summary": "concise summary of overall sentiment, noting any recent changes in sentiment",
  "pros": ["pro1", "pro2"],
  "cons": ["con1", "con2"],
  "mood": {
    "positive": number (percentage between 0-100),
    "neutral": number (percentage between 0-100),
    "negative": number (percentage between 0-100)
  },
  "predictedStars": number between 1.0 and 5.0, consistent with the mood (mostly positive: 4.0-5.0, mostly neutral: 2.5-3.5, mostly negative: 1.0-2.0),
  "trendPrediction": {
    "expectedReviews": number based on historical monthly average,
    "sentimentTrend": "improving/stable/declining based on recent vs older reviews",
    "confidence": number (percentage between 0-100, do not use decimal format, e.g. use 80 not 0.8)
  }
}"#;

/// Builds restaurant-level reports through the shared model gateway.
pub struct ReportBuilder {
    gateway: Arc<ModelGateway>,
}

impl ReportBuilder {
    pub fn new(gateway: Arc<ModelGateway>) -> Self {
        Self { gateway }
    }

    /// Produce one analytical report over the whole review set.
    ///
    /// Errors with [`TavoloError::NoReviews`] for an empty set and
    /// [`TavoloError::AnalysisFailed`] for every upstream or parse failure.
    /// Cancellation passes through untouched.
    pub async fn build_report(&self, reviews: &[Review]) -> Result<ReviewAnalysis, TavoloError> {
        if reviews.is_empty() {
            return Err(TavoloError::NoReviews);
        }
        let stats = ReviewStats::from_reviews(reviews)?;
        let prompt = build_report_prompt(reviews, &stats);
        debug!(total = stats.total, span_days = stats.span_days, "requesting aggregate report");

        let raw = self.gateway.generate(&prompt).await.map_err(escalate)?;
        let analysis = parse_report(&raw, &stats).inspect_err(|error| {
            warn!(error = %error, "aggregate report response did not parse");
        })?;
        Ok(analysis)
    }
}

/// Wrap upstream failures as analysis failures; empty-input and shutdown
/// outcomes keep their identity.
fn escalate(error: TavoloError) -> TavoloError {
    match error {
        TavoloError::NoReviews | TavoloError::Cancelled | TavoloError::AnalysisFailed { .. } => {
            error
        }
        other => TavoloError::AnalysisFailed {
            message: other.to_string(),
        },
    }
}

fn build_report_prompt(reviews: &[Review], stats: &ReviewStats) -> String {
    let mut newest_first: Vec<&Review> = reviews.iter().collect();
    newest_first.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let review_lines = newest_first
        .iter()
        .map(|review| {
            format!(
                "\"{}\" - {} stars (Posted: {})",
                review.text,
                review.stars,
                review.timestamp.format("%Y-%m-%d")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let date_range = format!(
        "{} to {}",
        stats.earliest.format("%Y-%m-%d"),
        stats.latest.format("%Y-%m-%d")
    );

    REPORT_PROMPT
        .replace("{reviews}", &review_lines)
        .replace("{total}", &stats.total.to_string())
        .replace("{date_range}", &date_range)
        .replace("{monthly_average}", &format!("{:.1}", stats.reviews_per_month))
}
