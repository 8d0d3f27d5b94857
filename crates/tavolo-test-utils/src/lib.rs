// SPDX-FileCopyrightText: 2026 Tavolo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Tavolo integration tests.
//!
//! Provides a mock generation backend and canned fixtures for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockGenerator`] - Mock text backend with scripted responses and errors
//! - [`fixtures`] - Canned reviews and wire-shaped model responses

pub mod fixtures;
pub mod mock_generator;

pub use mock_generator::MockGenerator;
