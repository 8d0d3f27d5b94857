// SPDX-FileCopyrightText: 2026 Tavolo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canned reviews and model responses for pipeline tests.
//!
//! All timestamps are anchored to a fixed base time so stats, cadence, and
//! trend assertions are reproducible.

use chrono::{DateTime, Duration, TimeZone, Utc};

use tavolo_core::Review;

/// Fixed anchor for fixture timestamps: 2026-05-01 12:00:00 UTC.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap()
}

/// Build a review posted `days_ago` days before [`base_time`].
pub fn review(text: &str, stars: u8, days_ago: i64) -> Review {
    Review {
        text: text.to_string(),
        stars,
        timestamp: base_time() - Duration::days(days_ago),
    }
}

/// A mixed review set for one restaurant, spanning roughly three months.
///
/// Five positive-leaning, one middling, two negative reviews; average
/// rating 3.25 stars across 88 days.
pub fn sample_reviews() -> Vec<Review> {
    vec![
        review(
            "The carbonara was outstanding and the staff made us feel at home",
            5,
            2,
        ),
        review("Great wine list, slightly slow service on a busy night", 4, 5),
        review("Average food, nothing memorable", 3, 12),
        review(
            "Cold pasta and a rude waiter ruined our anniversary dinner",
            1,
            20,
        ),
        review("Lovely terrace, the tiramisu alone is worth the trip", 5, 33),
        review("Portions have gotten smaller since my last visit", 2, 47),
        review("Solid neighborhood spot for a quick lunch", 4, 61),
        review("Overpriced for what you get", 2, 88),
    ]
}

/// A well-formed classifier response for the given score and label.
pub fn classification_json(score: f32, label: &str) -> String {
    format!(r#"{{"score": {score}, "label": "{label}"}}"#)
}

/// A well-formed aggregate report in the camelCase wire shape.
pub fn report_json() -> String {
    r#"{
  "summary": "Guests praise the fresh pasta and warm service, with occasional complaints about weekend waits.",
  "pros": ["fresh pasta", "attentive staff", "cozy atmosphere"],
  "cons": ["weekend wait times", "limited parking"],
  "mood": {"positive": 70.0, "neutral": 20.0, "negative": 10.0},
  "predictedStars": 4.3,
  "trendPrediction": {"expectedReviews": 12, "sentimentTrend": "improving", "confidence": 80}
}"#
    .to_string()
}

/// A well-formed dashboard summary in the camelCase wire shape.
pub fn summary_json() -> String {
    r#"{
  "overallSentiment": "Positive",
  "score": 82,
  "summary": "Customers consistently highlight the food quality and warm service.",
  "recommendations": ["Keep weekend staffing high", "Promote the terrace seating"]
}"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_reviews_are_valid() {
        let reviews = sample_reviews();
        assert_eq!(reviews.len(), 8);
        for review in &reviews {
            assert!(!review.text.is_empty());
            assert!((1..=5).contains(&review.stars));
            assert!(review.timestamp <= base_time());
        }
    }

    #[test]
    fn fixture_timestamps_are_deterministic() {
        assert_eq!(review("a", 3, 10).timestamp, review("b", 5, 10).timestamp);
    }
}
