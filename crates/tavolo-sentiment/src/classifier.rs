// SPDX-FileCopyrightText: 2026 Tavolo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-review sentiment classification.
//!
//! One model call per review, returning a score in [-1, 1] and a label.
//! Classification is best-effort: rate limits get a single delayed retry,
//! and any other failure degrades to the neutral fallback so one bad review
//! never sinks a whole dashboard run.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use tavolo_core::{SentimentLabel, SentimentResult, TavoloError};
use tavolo_gateway::{strip_code_fences, ModelGateway};

const CLASSIFY_PROMPT: &str = r#"Analyze the sentiment of the following review text and provide a score between -1 (most negative) and 1 (most positive), and a label (positive, neutral, or negative).

Review: "{review}"

Important: Only respond with a JSON object. No markdown, no code blocks, no additional text. Just the pure JSON object in this exact format:
{ "score": number, "label": "positive" | "neutral" | "negative" }"#;

/// Extra attempts after the first when the upstream reports rate limiting.
const MAX_RETRIES: u32 = 1;

/// Classifies single reviews through the shared model gateway.
pub struct SentimentClassifier {
    gateway: Arc<ModelGateway>,
    retry_delay: Duration,
}

impl SentimentClassifier {
    /// Create a classifier. `retry_delay` is slept before the rate-limit
    /// retry attempt.
    pub fn new(gateway: Arc<ModelGateway>, retry_delay: Duration) -> Self {
        Self {
            gateway,
            retry_delay,
        }
    }

    /// Classify one review text.
    ///
    /// Never fails: a rate-limited call is retried once after the configured
    /// delay, and every other failure (including a retry that fails again)
    /// returns [`SentimentResult::neutral`].
    pub async fn classify(&self, text: &str) -> SentimentResult {
        let prompt = CLASSIFY_PROMPT.replace("{review}", text);

        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                tokio::time::sleep(self.retry_delay).await;
            }

            match self.attempt(&prompt).await {
                Ok(result) => return result,
                Err(TavoloError::RateLimited { message }) if attempt < MAX_RETRIES => {
                    warn!(
                        error = %message,
                        attempt,
                        "rate limited during classification, retrying"
                    );
                }
                Err(error) => {
                    warn!(error = %error, "classification failed, falling back to neutral");
                    return SentimentResult::neutral();
                }
            }
        }

        SentimentResult::neutral()
    }

    async fn attempt(&self, prompt: &str) -> Result<SentimentResult, TavoloError> {
        let raw = self.gateway.generate(prompt).await?;
        parse_sentiment(&raw)
    }
}

#[derive(Debug, Deserialize)]
struct RawSentiment {
    score: f64,
    label: String,
}

/// Parse and validate one classification response.
///
/// The payload must be a JSON object with a numeric `score` in [-1, 1] and
/// a `label` that matches the score under the shared threshold. Extra keys
/// are tolerated; anything else is [`TavoloError::InvalidSchema`].
pub fn parse_sentiment(raw: &str) -> Result<SentimentResult, TavoloError> {
    let cleaned = strip_code_fences(raw);
    let parsed: RawSentiment = serde_json::from_str(&cleaned)
        .map_err(|e| TavoloError::InvalidSchema(format!("malformed sentiment JSON: {e}")))?;

    if !(-1.0..=1.0).contains(&parsed.score) {
        return Err(TavoloError::InvalidSchema(format!(
            "score {} outside [-1, 1]",
            parsed.score
        )));
    }

    let label: SentimentLabel = parsed.label.parse().map_err(|_| {
        TavoloError::InvalidSchema(format!("unknown sentiment label {:?}", parsed.label))
    })?;

    let score = parsed.score as f32;
    if SentimentLabel::from_score(score) != label {
        return Err(TavoloError::InvalidSchema(format!(
            "label {label} disagrees with score {score}"
        )));
    }

    Ok(SentimentResult { score, label })
}
