// SPDX-FileCopyrightText: 2026 Tavolo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Restaurant-level analysis built on top of the model gateway.
//!
//! Two consumers with different failure contracts share this crate:
//!
//! - [`ReportBuilder`] produces the full analytical report (summary, pros
//!   and cons, mood split, trend forecast). It escalates every upstream
//!   failure to [`TavoloError::AnalysisFailed`] and never retries; the
//!   caller decides whether a degraded view is acceptable.
//! - [`SummaryBuilder`] produces the compact dashboard summary and never
//!   surfaces a model failure for a non-empty review set. It degrades to
//!   the deterministic [`FallbackEstimator`] instead.
//!
//! Both derive cadence and date-range context from [`ReviewStats`], so
//! prompt context and synthesized forecasts always agree.
//!
//! [`TavoloError::AnalysisFailed`]: tavolo_core::TavoloError::AnalysisFailed

pub mod builder;
pub mod fallback;
pub mod parse;
pub mod stats;
pub mod summary;

pub use builder::ReportBuilder;
pub use fallback::FallbackEstimator;
pub use parse::parse_report;
pub use stats::ReviewStats;
pub use summary::{parse_summary, SummaryBuilder};
