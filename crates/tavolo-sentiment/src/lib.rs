// SPDX-FileCopyrightText: 2026 Tavolo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-review sentiment pipeline.
//!
//! Three pieces, used together by the dashboard flow:
//!
//! - [`SentimentClassifier`] - one model call per review with a neutral
//!   fallback, so classification never fails outright
//! - [`BatchRunner`] - order-preserving concurrent batches with a pause
//!   between them
//! - [`extract_keywords`] - lexical keyword ranking, no model involved

pub mod batch;
pub mod classifier;
pub mod keywords;

pub use batch::BatchRunner;
pub use classifier::SentimentClassifier;
pub use keywords::extract_keywords;
