// SPDX-FileCopyrightText: 2026 Tavolo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dashboard summaries: one compact model call per restaurant, with the
//! rating-based estimator as a safety net.
//!
//! Unlike the aggregate report, a summary never fails for a non-empty
//! review set: any model or parse failure silently degrades to
//! [`FallbackEstimator`] output so a listing page renders every row.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use tavolo_core::{OverallSentiment, RestaurantSentiment, Review, SentimentSummary, TavoloError};
use tavolo_gateway::{strip_code_fences, ModelGateway};

use crate::fallback::FallbackEstimator;
use crate::stats::ReviewStats;

const SUMMARY_PROMPT: &str = r#"Role: You are a sentiment analysis expert who outputs only valid JSON.

Task: Analyze the following restaurant reviews and output a sentiment analysis in JSON format.

Restaurant: "{restaurant}"

Reviews to analyze:
{reviews}

Required Output Format (exact JSON structure required):
{
  "overallSentiment": "Positive" | "Neutral" | "Negative",
  "score": number from 0 to 100,
  "summary": "Brief analysis of overall sentiment",
  "recommendations": [
    "First specific recommendation based on reviews",
    "Second specific recommendation based on reviews"
  ]
}

Important:
1. Respond ONLY with the JSON object
2. 'overallSentiment' must be exactly "Positive", "Neutral", or "Negative"
3. No additional text or formatting
4. No markdown
5. No explanation"#;

/// Score substituted when a response's score field is unusable.
const DEFAULT_SCORE: f64 = 50.0;

/// Builds dashboard summaries through the shared model gateway.
pub struct SummaryBuilder {
    gateway: Arc<ModelGateway>,
}

impl SummaryBuilder {
    pub fn new(gateway: Arc<ModelGateway>) -> Self {
        Self { gateway }
    }

    /// Summarize one restaurant's reviews.
    ///
    /// Fails only for an empty review set. Every model-path failure falls
    /// back to the deterministic estimator.
    pub async fn summarize(
        &self,
        restaurant: &str,
        reviews: &[Review],
    ) -> Result<SentimentSummary, TavoloError> {
        if reviews.is_empty() {
            return Err(TavoloError::NoReviews);
        }

        let prompt = build_summary_prompt(restaurant, reviews);
        match self.attempt(&prompt).await {
            Ok(summary) => Ok(summary),
            Err(error) => {
                warn!(
                    error = %error,
                    restaurant,
                    "model summary failed, using rating-based fallback"
                );
                FallbackEstimator::estimate(reviews)
            }
        }
    }

    /// Summarize and pair with the review statistics for a dashboard row.
    pub async fn restaurant_sentiment(
        &self,
        restaurant: &str,
        reviews: &[Review],
    ) -> Result<RestaurantSentiment, TavoloError> {
        let stats = ReviewStats::from_reviews(reviews)?;
        let sentiment = self.summarize(restaurant, reviews).await?;
        Ok(RestaurantSentiment {
            restaurant_name: restaurant.to_string(),
            average_rating: stats.average_rounded(),
            total_reviews: stats.total,
            sentiment,
        })
    }

    async fn attempt(&self, prompt: &str) -> Result<SentimentSummary, TavoloError> {
        let raw = self.gateway.generate(prompt).await?;
        parse_summary(&raw)
    }
}

fn build_summary_prompt(restaurant: &str, reviews: &[Review]) -> String {
    let review_lines = reviews
        .iter()
        .map(|review| format!("- {} stars: \"{}\"", review.stars, review.text))
        .collect::<Vec<_>>()
        .join("\n");

    SUMMARY_PROMPT
        .replace("{restaurant}", restaurant)
        .replace("{reviews}", &review_lines)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSummary {
    overall_sentiment: Option<String>,
    score: Option<Value>,
    summary: Option<String>,
    recommendations: Option<Vec<String>>,
}

/// Parse and normalize one summary response.
///
/// All four fields must be present; their values are then normalized
/// leniently (free-form sentiment phrases, string-wrapped scores) before
/// anything is rejected.
pub fn parse_summary(raw: &str) -> Result<SentimentSummary, TavoloError> {
    let cleaned = strip_code_fences(raw);
    if cleaned.is_empty() {
        return Err(TavoloError::EmptyResponse);
    }

    let parsed: RawSummary = serde_json::from_str(&cleaned)
        .map_err(|e| TavoloError::InvalidSchema(format!("malformed summary JSON: {e}")))?;

    let overall_raw = parsed
        .overall_sentiment
        .ok_or_else(|| TavoloError::InvalidSchema("missing overallSentiment".to_string()))?;
    let score_raw = parsed
        .score
        .ok_or_else(|| TavoloError::InvalidSchema("missing score".to_string()))?;
    let summary = parsed
        .summary
        .ok_or_else(|| TavoloError::InvalidSchema("missing summary".to_string()))?;
    let recommendations = parsed
        .recommendations
        .ok_or_else(|| TavoloError::InvalidSchema("missing recommendations".to_string()))?;

    Ok(SentimentSummary {
        overall: normalize_overall(&overall_raw),
        score: normalize_score(&score_raw),
        summary: summary.trim().to_string(),
        recommendations: recommendations
            .into_iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect(),
    })
}

/// Map a free-form sentiment phrase onto the three-way label.
fn normalize_overall(raw: &str) -> OverallSentiment {
    let lowered = raw.to_lowercase();
    let normalized = lowered.trim();
    if normalized.contains("positive") {
        OverallSentiment::Positive
    } else if normalized.contains("negative") {
        OverallSentiment::Negative
    } else {
        OverallSentiment::Neutral
    }
}

/// Coerce a score value onto 0..=100.
///
/// Numbers pass through; strings are stripped to digits and a decimal
/// point first. Anything unusable becomes the midpoint 50.
fn normalize_score(raw: &Value) -> u8 {
    let number = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let digits: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            digits.parse::<f64>().ok()
        }
        _ => None,
    };
    number.unwrap_or(DEFAULT_SCORE).clamp(0.0, 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tavolo_gateway::RateLimiter;
    use tavolo_test_utils::{fixtures, MockGenerator};

    fn summaries_over(mock: Arc<MockGenerator>) -> SummaryBuilder {
        let gateway = ModelGateway::new(
            mock,
            RateLimiter::new(100, Duration::from_secs(60)),
            Duration::from_secs(30),
        );
        SummaryBuilder::new(Arc::new(gateway))
    }

    #[test]
    fn parse_accepts_contract_json() {
        let summary = parse_summary(&fixtures::summary_json()).unwrap();
        assert_eq!(summary.overall, OverallSentiment::Positive);
        assert_eq!(summary.score, 82);
        assert_eq!(summary.recommendations.len(), 2);
    }

    #[test]
    fn parse_normalizes_sentiment_phrases() {
        let raw = r#"{
            "overallSentiment": "Mostly POSITIVE overall",
            "score": 71,
            "summary": "Good.",
            "recommendations": []
        }"#;
        assert_eq!(parse_summary(raw).unwrap().overall, OverallSentiment::Positive);
    }

    #[test]
    fn parse_coerces_string_scores() {
        let raw = r#"{
            "overallSentiment": "Neutral",
            "score": "about 65 points",
            "summary": "Mixed.",
            "recommendations": ["More data"]
        }"#;
        assert_eq!(parse_summary(raw).unwrap().score, 65);
    }

    #[test]
    fn parse_defaults_unusable_scores_to_midpoint() {
        let raw = r#"{
            "overallSentiment": "Neutral",
            "score": "unknown",
            "summary": "Mixed.",
            "recommendations": []
        }"#;
        assert_eq!(parse_summary(raw).unwrap().score, 50);
    }

    #[test]
    fn parse_clamps_scores() {
        let raw = r#"{
            "overallSentiment": "Positive",
            "score": 140,
            "summary": "Great.",
            "recommendations": []
        }"#;
        assert_eq!(parse_summary(raw).unwrap().score, 100);
    }

    #[test]
    fn parse_drops_blank_recommendations() {
        let raw = r#"{
            "overallSentiment": "Positive",
            "score": 80,
            "summary": "Great.",
            "recommendations": ["  Keep it up  ", "   ", ""]
        }"#;
        let summary = parse_summary(raw).unwrap();
        assert_eq!(summary.recommendations, vec!["Keep it up"]);
    }

    #[test]
    fn parse_requires_all_fields() {
        let raw = r#"{"overallSentiment": "Positive", "score": 80, "summary": "Great."}"#;
        let err = parse_summary(raw).unwrap_err();
        assert!(err.to_string().contains("recommendations"), "got: {err}");
    }

    #[tokio::test]
    async fn summarize_uses_the_model_answer() {
        let mock = Arc::new(MockGenerator::with_responses(vec![fixtures::summary_json()]));
        let builder = summaries_over(mock.clone());

        let summary = builder
            .summarize("Trattoria Roma", &fixtures::sample_reviews())
            .await
            .unwrap();
        assert_eq!(summary.score, 82);

        let prompts = mock.prompts().await;
        assert!(prompts[0].contains("Restaurant: \"Trattoria Roma\""));
        assert!(prompts[0].contains("- 5 stars: \"The carbonara was outstanding"));
    }

    #[tokio::test]
    async fn summarize_falls_back_on_model_failure() {
        let mock = Arc::new(MockGenerator::new());
        mock.push_error(TavoloError::Transport {
            message: "connection refused".to_string(),
            source: None,
        })
        .await;
        let builder = summaries_over(mock.clone());

        let reviews = fixtures::sample_reviews();
        let summary = builder.summarize("Trattoria Roma", &reviews).await.unwrap();
        // Mean 3.25 stars -> 65.
        assert_eq!(summary.score, 65);
        assert_eq!(summary.overall, OverallSentiment::Positive);
        assert!(summary.summary.contains("8 reviews"));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn summarize_falls_back_on_unparseable_answer() {
        let mock = Arc::new(MockGenerator::with_responses(vec![
            "surely a lovely place".to_string(),
        ]));
        let builder = summaries_over(mock);

        let summary = builder
            .summarize("Trattoria Roma", &fixtures::sample_reviews())
            .await
            .unwrap();
        assert!(summary.summary.contains("Analysis based on"));
    }

    #[tokio::test]
    async fn summarize_rejects_empty_review_sets() {
        let mock = Arc::new(MockGenerator::new());
        let builder = summaries_over(mock.clone());
        let err = builder.summarize("Trattoria Roma", &[]).await.unwrap_err();
        assert!(matches!(err, TavoloError::NoReviews));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn restaurant_sentiment_pairs_stats_with_summary() {
        let mock = Arc::new(MockGenerator::with_responses(vec![fixtures::summary_json()]));
        let builder = summaries_over(mock);

        let row = builder
            .restaurant_sentiment("Trattoria Roma", &fixtures::sample_reviews())
            .await
            .unwrap();
        assert_eq!(row.restaurant_name, "Trattoria Roma");
        assert_eq!(row.average_rating, 3.3);
        assert_eq!(row.total_reviews, 8);
        assert_eq!(row.sentiment.score, 82);
    }
}
