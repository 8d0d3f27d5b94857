// SPDX-FileCopyrightText: 2026 Tavolo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Throttled gateway in front of any text-generation backend.
//!
//! Everything the pipeline sends upstream flows through one
//! [`ModelGateway`], which owns the process-wide request budget:
//!
//! - [`RateLimiter`] - rolling-window throttle that makes callers wait,
//!   never fail, when the budget is spent
//! - [`ModelGateway`] - per-request timeout, cancellation, and metrics
//!   around a [`tavolo_core::TextGenerator`]
//! - [`strip_code_fences`] - cleanup of fenced model output before parsing

pub mod gateway;
pub mod limiter;
pub mod sanitize;

pub use gateway::ModelGateway;
pub use limiter::RateLimiter;
pub use sanitize::strip_code_fences;
