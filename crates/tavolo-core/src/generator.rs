// SPDX-FileCopyrightText: 2026 Tavolo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The text-generation seam between the pipeline and any model backend.

use async_trait::async_trait;

use crate::error::TavoloError;

/// A backend that turns a prompt into generated text.
///
/// The pipeline depends only on this trait; the production implementation
/// calls the Gemini HTTP endpoint, and tests substitute a scripted mock.
/// Implementations must be safe to share across tasks.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short backend identifier used in logs and metrics labels.
    fn name(&self) -> &str;

    /// Sends `prompt` to the backend and returns the raw generated text.
    ///
    /// Errors use the shared taxonomy: [`TavoloError::RateLimited`] for
    /// quota exhaustion, [`TavoloError::Transport`] for network or service
    /// failures, and [`TavoloError::EmptyResponse`] when the backend
    /// produced no usable text.
    async fn generate(&self, prompt: &str) -> Result<String, TavoloError>;
}
