// SPDX-FileCopyrightText: 2026 Tavolo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rating-based summary estimation, used when the model path fails.
//!
//! Purely arithmetic and fully deterministic: the score is the mean star
//! rating projected onto the 0-100 scale. Dashboards always get a
//! well-formed summary as long as at least one review exists.

use tavolo_core::{OverallSentiment, Review, SentimentSummary, TavoloError};

/// Deterministic stand-in for the model-backed summary.
pub struct FallbackEstimator;

impl FallbackEstimator {
    /// Estimate a summary from star ratings alone.
    ///
    /// The score maps the mean rating onto 0-100 and rounds; the label is
    /// derived from the rounded score (>= 60 positive, >= 40 neutral, else
    /// negative). Recommendations are fixed boilerplate, flagging that the
    /// richer model analysis was unavailable.
    pub fn estimate(reviews: &[Review]) -> Result<SentimentSummary, TavoloError> {
        if reviews.is_empty() {
            return Err(TavoloError::NoReviews);
        }

        let average =
            reviews.iter().map(|r| f64::from(r.stars)).sum::<f64>() / reviews.len() as f64;
        let score = (average / 5.0 * 100.0).round() as u8;
        let overall = if score >= 60 {
            OverallSentiment::Positive
        } else if score >= 40 {
            OverallSentiment::Neutral
        } else {
            OverallSentiment::Negative
        };

        Ok(SentimentSummary {
            overall,
            score,
            summary: format!(
                "Analysis based on {} reviews with average rating of {:.1} stars.",
                reviews.len(),
                average
            ),
            recommendations: vec![
                "Consider collecting more detailed customer feedback".to_string(),
                "Monitor customer satisfaction trends regularly".to_string(),
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tavolo_test_utils::fixtures;

    fn reviews_with_stars(stars: &[u8]) -> Vec<Review> {
        stars
            .iter()
            .enumerate()
            .map(|(i, &s)| fixtures::review("text", s, i as i64))
            .collect()
    }

    #[test]
    fn empty_set_is_rejected() {
        assert!(matches!(
            FallbackEstimator::estimate(&[]),
            Err(TavoloError::NoReviews)
        ));
    }

    #[test]
    fn high_ratings_score_positive() {
        let summary = FallbackEstimator::estimate(&reviews_with_stars(&[5, 5, 4, 5])).unwrap();
        assert_eq!(summary.score, 95);
        assert_eq!(summary.overall, OverallSentiment::Positive);
        assert_eq!(
            summary.summary,
            "Analysis based on 4 reviews with average rating of 4.8 stars."
        );
        assert_eq!(summary.recommendations.len(), 2);
    }

    #[test]
    fn low_ratings_score_negative() {
        let summary = FallbackEstimator::estimate(&reviews_with_stars(&[1, 2, 1])).unwrap();
        assert_eq!(summary.score, 27);
        assert_eq!(summary.overall, OverallSentiment::Negative);
    }

    #[test]
    fn middling_ratings_score_neutral() {
        let summary = FallbackEstimator::estimate(&reviews_with_stars(&[3, 3, 2])).unwrap();
        // Mean 2.667 -> 53.3 -> 53.
        assert_eq!(summary.score, 53);
        assert_eq!(summary.overall, OverallSentiment::Neutral);
    }

    #[test]
    fn label_boundaries_use_the_rounded_score() {
        // Mean 3.0 -> exactly 60: positive.
        let summary = FallbackEstimator::estimate(&reviews_with_stars(&[3, 3, 3])).unwrap();
        assert_eq!(summary.score, 60);
        assert_eq!(summary.overall, OverallSentiment::Positive);

        // Mean 2.0 -> exactly 40: neutral.
        let summary = FallbackEstimator::estimate(&reviews_with_stars(&[2, 2])).unwrap();
        assert_eq!(summary.score, 40);
        assert_eq!(summary.overall, OverallSentiment::Neutral);
    }

    #[test]
    fn estimate_is_deterministic() {
        let reviews = fixtures::sample_reviews();
        let first = FallbackEstimator::estimate(&reviews).unwrap();
        let second = FallbackEstimator::estimate(&reviews).unwrap();
        assert_eq!(first, second);
    }
}
