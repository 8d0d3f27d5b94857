// SPDX-FileCopyrightText: 2026 Tavolo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Tavolo review pipeline.
//!
//! All analysis artifacts are request-scoped: they are created when a caller
//! asks for an analysis and discarded once consumed. Nothing here is cached
//! or written back to storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::TavoloError;

/// Score threshold separating positive/negative sentiment from neutral.
///
/// A score of `>= 0.3` counts as positive and `<= -0.3` as negative, both
/// for per-review labels and for aggregate mood tallies.
pub const SENTIMENT_THRESHOLD: f32 = 0.3;

/// One customer-submitted rating+text record for a restaurant.
///
/// Owned by the caller (the document-store collaborator); the pipeline never
/// mutates or persists reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Free-text review body. Never empty.
    pub text: String,
    /// Star rating, 1 through 5.
    pub stars: u8,
    /// When the review was posted.
    pub timestamp: DateTime<Utc>,
}

impl Review {
    /// Creates a review, validating that the text is non-empty and the star
    /// rating is within 1..=5.
    pub fn new(
        text: impl Into<String>,
        stars: u8,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, TavoloError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(TavoloError::InvalidReview(
                "review text must not be empty".to_string(),
            ));
        }
        if !(1..=5).contains(&stars) {
            return Err(TavoloError::InvalidReview(format!(
                "star rating must be between 1 and 5, got {stars}"
            )));
        }
        Ok(Self {
            text,
            stars,
            timestamp,
        })
    }
}

/// Per-review sentiment bucket.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Buckets a sentiment score using the shared ±[`SENTIMENT_THRESHOLD`].
    pub fn from_score(score: f32) -> Self {
        if score >= SENTIMENT_THRESHOLD {
            SentimentLabel::Positive
        } else if score <= -SENTIMENT_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

/// Sentiment of a single review: a score in [-1.0, 1.0] plus its label.
///
/// Produced once per review and immutable afterwards. A review the model
/// could not classify carries the [`SentimentResult::neutral`] fallback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    /// Continuous positivity measure, -1.0 (most negative) to 1.0 (most positive).
    pub score: f32,
    pub label: SentimentLabel,
}

impl SentimentResult {
    /// The fallback result used when classification fails: `{0.0, neutral}`.
    pub fn neutral() -> Self {
        Self {
            score: 0.0,
            label: SentimentLabel::Neutral,
        }
    }
}

/// Percentage breakdown of reviews into positive/neutral/negative buckets.
///
/// Derived, recomputed on every run, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MoodBreakdown {
    pub positive: f32,
    pub neutral: f32,
    pub negative: f32,
}

impl MoodBreakdown {
    /// Tallies per-review results into percentages using the score-side
    /// ±[`SENTIMENT_THRESHOLD`], so labels and aggregate counts can never
    /// disagree. Returns all zeros for an empty slice.
    pub fn from_results(results: &[SentimentResult]) -> Self {
        if results.is_empty() {
            return Self::default();
        }
        let mut positive = 0usize;
        let mut neutral = 0usize;
        let mut negative = 0usize;
        for result in results {
            match SentimentLabel::from_score(result.score) {
                SentimentLabel::Positive => positive += 1,
                SentimentLabel::Neutral => neutral += 1,
                SentimentLabel::Negative => negative += 1,
            }
        }
        let total = results.len() as f32;
        Self {
            positive: positive as f32 / total * 100.0,
            neutral: neutral as f32 / total * 100.0,
            negative: negative as f32 / total * 100.0,
        }
    }

    /// The label of the largest bucket. Ties resolve positive, then negative.
    pub fn dominant(&self) -> SentimentLabel {
        if self.positive >= self.neutral && self.positive >= self.negative {
            SentimentLabel::Positive
        } else if self.negative >= self.neutral {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    /// Returns a copy with every bucket clamped to [0, 100].
    pub fn clamped(&self) -> Self {
        Self {
            positive: self.positive.clamp(0.0, 100.0),
            neutral: self.neutral.clamp(0.0, 100.0),
            negative: self.negative.clamp(0.0, 100.0),
        }
    }
}

/// Direction of the sentiment trend comparing recent vs. older reviews.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TrendDirection {
    Improving,
    Stable,
    Declining,
}

/// Forecast block of an aggregate report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPrediction {
    /// Expected review volume next month, from the historical monthly cadence.
    pub expected_reviews: u32,
    pub sentiment_trend: TrendDirection,
    /// Forecast confidence as a whole percentage, 0..=100. Never a fraction.
    pub confidence: u8,
}

/// Restaurant-level narrative + numeric analysis produced from an entire
/// review set in one model call. Transient; one per restaurant per invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewAnalysis {
    /// One-paragraph summary of overall customer sentiment.
    pub summary: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub mood: MoodBreakdown,
    /// Predicted star rating, 1.0..=5.0, rounded to one decimal place.
    pub predicted_stars: f32,
    #[serde(rename = "trendPrediction")]
    pub trend: TrendPrediction,
}

impl ReviewAnalysis {
    /// Projects the positive-mood share one month out: ±10 points depending
    /// on the trend direction, clamped to [0, 100].
    pub fn projected_positive_share(&self) -> f32 {
        match self.trend.sentiment_trend {
            TrendDirection::Improving => (self.mood.positive + 10.0).min(100.0),
            TrendDirection::Declining => (self.mood.positive - 10.0).max(0.0),
            TrendDirection::Stable => self.mood.positive,
        }
    }
}

/// Overall sentiment label for the dashboard summary contract.
///
/// Serialized capitalized (`"Positive"`), unlike the lowercase per-review
/// [`SentimentLabel`] -- the two wire contracts differ upstream.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
pub enum OverallSentiment {
    Positive,
    Neutral,
    Negative,
}

/// Presentation band for a 0..=100 sentiment score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ScoreBand {
    /// Score 70 and above.
    High,
    /// Score 40 through 69.
    Mixed,
    /// Score below 40.
    Low,
}

/// Lightweight restaurant summary for dashboard listings.
///
/// One per restaurant per invocation. Always well-formed: the fallback
/// estimator produces the same shape when the model path fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentSummary {
    #[serde(rename = "overallSentiment")]
    pub overall: OverallSentiment,
    /// Sentiment score, 0 (worst) to 100 (best).
    pub score: u8,
    pub summary: String,
    pub recommendations: Vec<String>,
}

impl SentimentSummary {
    /// Buckets the score for presentation: High >= 70, Mixed >= 40, else Low.
    pub fn score_band(&self) -> ScoreBand {
        if self.score >= 70 {
            ScoreBand::High
        } else if self.score >= 40 {
            ScoreBand::Mixed
        } else {
            ScoreBand::Low
        }
    }
}

/// Dashboard row pairing a restaurant's review statistics with its summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantSentiment {
    pub restaurant_name: String,
    /// Mean star rating rounded to one decimal place.
    pub average_rating: f32,
    pub total_reviews: usize,
    pub sentiment: SentimentSummary,
}
