// SPDX-FileCopyrightText: 2026 Tavolo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The single entry point for every outbound model call.
//!
//! `ModelGateway` wraps a [`TextGenerator`] backend with the process-wide
//! rate limiter, a per-request timeout, and an optional cancellation token.
//! Both pipelines call through here, so one request budget covers all model
//! traffic regardless of which analysis produced it. Responses come back
//! fence-stripped, and a response that is blank after stripping surfaces
//! as [`TavoloError::EmptyResponse`] instead of text.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use tavolo_core::{TavoloError, TextGenerator};

use crate::limiter::RateLimiter;
use crate::sanitize::strip_code_fences;

/// Throttled, cancellable front for a text-generation backend.
pub struct ModelGateway {
    generator: Arc<dyn TextGenerator>,
    limiter: RateLimiter,
    request_timeout: Duration,
    cancel: CancellationToken,
}

impl fmt::Debug for ModelGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelGateway")
            .field("backend", &self.generator.name())
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl ModelGateway {
    /// Create a gateway over `generator` with the given limiter and
    /// per-request timeout. The default cancellation token never fires.
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        limiter: RateLimiter,
        request_timeout: Duration,
    ) -> Self {
        Self {
            generator,
            limiter,
            request_timeout,
            cancel: CancellationToken::new(),
        }
    }

    /// Attach a cancellation token; firing it aborts in-flight and queued
    /// calls with [`TavoloError::Cancelled`].
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Short identifier of the wrapped backend.
    pub fn backend_name(&self) -> &str {
        self.generator.name()
    }

    /// Acquire a rate-limit slot, then run one generation call under the
    /// per-request timeout.
    ///
    /// Waits (never fails) when the request budget is exhausted. Exceeding
    /// the timeout yields [`TavoloError::Timeout`]; a fired cancellation
    /// token yields [`TavoloError::Cancelled`], including while waiting for
    /// a rate-limit slot. Returned text has Markdown code fences stripped;
    /// text that is empty after stripping yields
    /// [`TavoloError::EmptyResponse`].
    pub async fn generate(&self, prompt: &str) -> Result<String, TavoloError> {
        counter!("tavolo_generate_requests_total").increment(1);
        debug!(
            backend = self.generator.name(),
            prompt_len = prompt.len(),
            "dispatching generation request"
        );

        let result = tokio::select! {
            _ = self.cancel.cancelled() => Err(TavoloError::Cancelled),
            result = self.throttled_call(prompt) => result,
        };

        match &result {
            Ok(text) => {
                debug!(response_len = text.len(), "generation request completed");
            }
            Err(error) => {
                counter!("tavolo_generate_failures_total", "class" => failure_class(error))
                    .increment(1);
            }
        }
        result
    }

    async fn throttled_call(&self, prompt: &str) -> Result<String, TavoloError> {
        self.limiter.acquire().await;
        let text = match timeout(self.request_timeout, self.generator.generate(prompt)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(TavoloError::Timeout {
                    duration: self.request_timeout,
                })
            }
        };

        let cleaned = strip_code_fences(&text);
        if cleaned.is_empty() {
            return Err(TavoloError::EmptyResponse);
        }
        Ok(cleaned)
    }
}

/// Stable label for the failure-counter metric.
fn failure_class(error: &TavoloError) -> &'static str {
    match error {
        TavoloError::Config(_) => "config",
        TavoloError::InvalidReview(_) => "invalid_review",
        TavoloError::RateLimited { .. } => "rate_limited",
        TavoloError::Transport { .. } => "transport",
        TavoloError::EmptyResponse => "empty_response",
        TavoloError::InvalidSchema(_) => "invalid_schema",
        TavoloError::AnalysisFailed { .. } => "analysis_failed",
        TavoloError::NoReviews => "no_reviews",
        TavoloError::Timeout { .. } => "timeout",
        TavoloError::Cancelled => "cancelled",
        TavoloError::Internal(_) => "internal",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tavolo_test_utils::MockGenerator;
    use tokio::time::Instant;

    fn gateway_over(mock: Arc<MockGenerator>, max_requests: u32) -> ModelGateway {
        ModelGateway::new(
            mock,
            RateLimiter::new(max_requests, Duration::from_secs(60)),
            Duration::from_secs(30),
        )
    }

    #[tokio::test]
    async fn returns_backend_text() {
        let mock = Arc::new(MockGenerator::with_responses(vec!["hello".to_string()]));
        let gateway = gateway_over(mock.clone(), 10);
        assert_eq!(gateway.generate("prompt").await.unwrap(), "hello");
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn fenced_responses_are_delivered_clean() {
        let mock = Arc::new(MockGenerator::with_responses(vec![
            "```json\n{\"score\": 0.8}\n```".to_string(),
        ]));
        let gateway = gateway_over(mock, 10);
        assert_eq!(gateway.generate("prompt").await.unwrap(), "{\"score\": 0.8}");
    }

    #[tokio::test]
    async fn blank_response_classifies_as_empty() {
        let mock = Arc::new(MockGenerator::with_responses(vec![
            "```json\n```".to_string(),
        ]));
        let gateway = gateway_over(mock, 10);
        assert!(matches!(
            gateway.generate("prompt").await,
            Err(TavoloError::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn backend_errors_pass_through() {
        let mock = Arc::new(MockGenerator::new());
        mock.push_error(TavoloError::RateLimited {
            message: "quota".to_string(),
        })
        .await;
        let gateway = gateway_over(mock, 10);
        assert!(matches!(
            gateway.generate("prompt").await,
            Err(TavoloError::RateLimited { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_backend_times_out() {
        let mock = Arc::new(
            MockGenerator::with_responses(vec!["too late".to_string()])
                .with_latency(Duration::from_secs(120)),
        );
        let gateway = gateway_over(mock, 10);
        let err = gateway.generate("prompt").await.unwrap_err();
        assert!(matches!(err, TavoloError::Timeout { duration } if duration == Duration::from_secs(30)));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_budget_delays_the_next_call() {
        let mock = Arc::new(MockGenerator::new());
        let gateway = gateway_over(mock, 1);

        let start = Instant::now();
        gateway.generate("first").await.unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);

        gateway.generate("second").await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(60));
    }

    #[tokio::test]
    async fn fired_token_rejects_new_calls() {
        let token = CancellationToken::new();
        token.cancel();
        let mock = Arc::new(MockGenerator::new());
        let gateway = gateway_over(mock, 10).with_cancellation(token);
        assert!(matches!(
            gateway.generate("prompt").await,
            Err(TavoloError::Cancelled)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_aborts_inflight_call() {
        let token = CancellationToken::new();
        let mock = Arc::new(
            MockGenerator::new().with_latency(Duration::from_secs(600)),
        );
        let gateway = ModelGateway::new(
            mock,
            RateLimiter::new(10, Duration::from_secs(60)),
            // Longer than the canceller's delay so cancellation wins.
            Duration::from_secs(900),
        )
        .with_cancellation(token.clone());

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            token.cancel();
        });

        let err = gateway.generate("prompt").await.unwrap_err();
        assert!(matches!(err, TavoloError::Cancelled));
    }
}
