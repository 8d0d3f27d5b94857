// SPDX-FileCopyrightText: 2026 Tavolo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini text-generation backend for Tavolo.
//!
//! [`GeminiClient`] implements [`tavolo_core::TextGenerator`] over the
//! generateContent REST endpoint. Rate limiting, timeouts beyond the socket
//! level, and retry policy all live with the callers; this crate only
//! speaks the wire protocol and classifies its failures.

pub mod client;
pub mod types;

pub use client::GeminiClient;
pub use types::GenerationConfig;
