// SPDX-FileCopyrightText: 2026 Tavolo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock text-generation backend for deterministic testing.
//!
//! `MockGenerator` implements [`TextGenerator`] with pre-configured
//! responses, enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use tavolo_core::{TavoloError, TextGenerator};

/// A mock backend that returns pre-configured responses or errors.
///
/// Outcomes are popped from a FIFO queue. When the queue is empty,
/// a default "mock response" text is returned. The generator also
/// records every prompt it receives and tracks how many calls ran
/// concurrently, so tests can assert on batching behavior.
pub struct MockGenerator {
    responses: Arc<Mutex<VecDeque<Result<String, TavoloError>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    latency: Option<Duration>,
}

impl MockGenerator {
    /// Create a new mock generator with an empty response queue.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            latency: None,
        }
    }

    /// Create a mock generator pre-loaded with the given successful responses.
    pub fn with_responses(responses: Vec<String>) -> Self {
        let queue: VecDeque<Result<String, TavoloError>> =
            responses.into_iter().map(Ok).collect();
        Self {
            responses: Arc::new(Mutex::new(queue)),
            ..Self::new()
        }
    }

    /// Make every call take `latency` before resolving.
    ///
    /// Combined with tokio's paused test clock this lets tests observe
    /// concurrency and timeout behavior deterministically.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Add a successful response to the end of the queue.
    pub async fn push_response(&self, text: impl Into<String>) {
        self.responses.lock().await.push_back(Ok(text.into()));
    }

    /// Add an error outcome to the end of the queue.
    pub async fn push_error(&self, error: TavoloError) {
        self.responses.lock().await.push_back(Err(error));
    }

    /// Number of `generate` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of calls that were ever in flight at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// All prompts received so far, in arrival order.
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }

    /// Pop the next outcome, or return the default response.
    async fn next_outcome(&self) -> Result<String, TavoloError> {
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok("mock response".to_string()))
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, prompt: &str) -> Result<String, TavoloError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let active = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(active, Ordering::SeqCst);
        self.prompts.lock().await.push(prompt.to_string());

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let outcome = self.next_outcome().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }
}
