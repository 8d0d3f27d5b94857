// SPDX-FileCopyrightText: 2026 Tavolo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core types and traits for the Tavolo review-intelligence pipeline.
//!
//! This crate defines the vocabulary every other Tavolo crate speaks:
//!
//! - [`TavoloError`]: the shared error taxonomy
//! - [`Review`], [`SentimentResult`], [`MoodBreakdown`]: per-review sentiment
//! - [`ReviewAnalysis`], [`SentimentSummary`]: restaurant-level reports
//! - [`TextGenerator`]: the seam to any text-generation backend
//!
//! It carries no I/O of its own.

pub mod error;
pub mod generator;
pub mod types;

pub use error::TavoloError;
pub use generator::TextGenerator;
pub use types::{
    MoodBreakdown, OverallSentiment, RestaurantSentiment, Review, ReviewAnalysis, ScoreBand,
    SentimentLabel, SentimentResult, SentimentSummary, TrendDirection, TrendPrediction,
    SENTIMENT_THRESHOLD,
};
