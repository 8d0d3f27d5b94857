// SPDX-FileCopyrightText: 2026 Tavolo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Descriptive statistics over a review set.
//!
//! Everything here is computed from the reviews alone, with no reference to
//! the current wall clock, so identical inputs always produce identical
//! prompts and synthesized forecasts.

use chrono::{DateTime, Utc};

use tavolo_core::{Review, TavoloError};

/// Days per month used by the cadence estimate.
const DAYS_PER_MONTH: f64 = 30.0;

/// Summary statistics for one restaurant's review set.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewStats {
    pub total: usize,
    /// Mean star rating, unrounded.
    pub average_stars: f64,
    pub earliest: DateTime<Utc>,
    pub latest: DateTime<Utc>,
    /// Whole days between earliest and latest review, never below 1.
    pub span_days: i64,
    /// Historical cadence: reviews per 30-day month over the span.
    pub reviews_per_month: f64,
}

impl ReviewStats {
    /// Compute stats for a non-empty review set.
    pub fn from_reviews(reviews: &[Review]) -> Result<Self, TavoloError> {
        let Some(first) = reviews.first() else {
            return Err(TavoloError::NoReviews);
        };

        let total = reviews.len();
        let average_stars =
            reviews.iter().map(|r| f64::from(r.stars)).sum::<f64>() / total as f64;
        let (earliest, latest) = reviews.iter().fold(
            (first.timestamp, first.timestamp),
            |(earliest, latest), review| {
                (earliest.min(review.timestamp), latest.max(review.timestamp))
            },
        );

        // A same-day set still spans one day for cadence purposes.
        let span_days = (latest - earliest).num_days().max(1);
        let reviews_per_month = total as f64 * DAYS_PER_MONTH / span_days as f64;

        Ok(Self {
            total,
            average_stars,
            earliest,
            latest,
            span_days,
            reviews_per_month,
        })
    }

    /// Mean star rating rounded to one decimal place.
    pub fn average_rounded(&self) -> f32 {
        ((self.average_stars * 10.0).round() / 10.0) as f32
    }

    /// Expected review volume next month, from the historical cadence.
    pub fn expected_monthly_reviews(&self) -> u32 {
        self.reviews_per_month.round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tavolo_test_utils::fixtures;

    #[test]
    fn empty_set_is_rejected() {
        let err = ReviewStats::from_reviews(&[]).unwrap_err();
        assert!(matches!(err, TavoloError::NoReviews));
    }

    #[test]
    fn sample_set_stats() {
        let reviews = fixtures::sample_reviews();
        let stats = ReviewStats::from_reviews(&reviews).unwrap();
        assert_eq!(stats.total, 8);
        assert_eq!(stats.average_stars, 3.25);
        assert_eq!(stats.average_rounded(), 3.3);
        // Newest is 2 days before base, oldest 88: 86 days apart.
        assert_eq!(stats.span_days, 86);
        let cadence = 8.0 * 30.0 / 86.0;
        assert!((stats.reviews_per_month - cadence).abs() < 1e-9);
        assert_eq!(stats.expected_monthly_reviews(), 3);
    }

    #[test]
    fn single_review_spans_one_day() {
        let reviews = vec![fixtures::review("only one", 4, 10)];
        let stats = ReviewStats::from_reviews(&reviews).unwrap();
        assert_eq!(stats.span_days, 1);
        assert_eq!(stats.reviews_per_month, 30.0);
        assert_eq!(stats.earliest, stats.latest);
    }

    #[test]
    fn same_day_reviews_span_one_day() {
        let reviews = vec![
            fixtures::review("lunch", 4, 3),
            fixtures::review("dinner", 2, 3),
        ];
        let stats = ReviewStats::from_reviews(&reviews).unwrap();
        assert_eq!(stats.span_days, 1);
        assert_eq!(stats.reviews_per_month, 60.0);
    }

    #[test]
    fn order_of_reviews_does_not_matter() {
        let mut reviews = fixtures::sample_reviews();
        let forward = ReviewStats::from_reviews(&reviews).unwrap();
        reviews.reverse();
        let backward = ReviewStats::from_reviews(&reviews).unwrap();
        assert_eq!(forward, backward);
    }
}
