// SPDX-FileCopyrightText: 2026 Tavolo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Tavolo review pipeline.

use thiserror::Error;

/// The primary error type used across the Tavolo pipeline crates.
#[derive(Debug, Error)]
pub enum TavoloError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Caller-supplied review data violated a field invariant.
    #[error("invalid review: {0}")]
    InvalidReview(String),

    /// The upstream model signaled quota exhaustion (HTTP 429 or equivalent).
    #[error("rate limited by upstream: {message}")]
    RateLimited { message: String },

    /// Network or service failure while reaching the model endpoint.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The model returned no usable text (empty or whitespace-only completion).
    #[error("model returned an empty response")]
    EmptyResponse,

    /// The model's output did not match the schema a prompt demanded.
    #[error("invalid response schema: {0}")]
    InvalidSchema(String),

    /// An aggregate report could not be produced from the review set.
    #[error("analysis failed: {message}")]
    AnalysisFailed { message: String },

    /// A report or summary was requested for an empty review set.
    #[error("no reviews to analyze")]
    NoReviews,

    /// An in-flight model call exceeded its per-request deadline.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// The surrounding run was cancelled before the call completed.
    #[error("operation cancelled by shutdown")]
    Cancelled,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
