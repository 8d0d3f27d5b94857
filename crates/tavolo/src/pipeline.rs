// SPDX-FileCopyrightText: 2026 Tavolo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared command wiring: review input loading and gateway construction.
//!
//! Every subcommand reads the same review JSON shape and talks to the model
//! through one [`ModelGateway`], so the configured request budget covers the
//! whole process no matter which analysis runs.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::info;

use tavolo_config::TavoloConfig;
use tavolo_core::{Review, TavoloError};
use tavolo_gateway::{ModelGateway, RateLimiter};
use tavolo_gemini::{GeminiClient, GenerationConfig};

/// Review source shared by every subcommand.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Path to a JSON array of reviews. Reads stdin when omitted.
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,
}

/// One review as supplied on the command line.
///
/// Deserialized separately from [`Review`] so CLI input passes through the
/// same star-range and empty-text validation as any other caller.
#[derive(Debug, Deserialize)]
struct ReviewInput {
    text: String,
    stars: u8,
    timestamp: chrono::DateTime<chrono::Utc>,
}

/// Load and validate reviews from a file or stdin.
pub fn load_reviews(args: &InputArgs) -> Result<Vec<Review>, TavoloError> {
    let raw = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| TavoloError::Config(format!("cannot read {}: {e}", path.display())))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| TavoloError::Config(format!("cannot read stdin: {e}")))?;
            buf
        }
    };

    let inputs: Vec<ReviewInput> = serde_json::from_str(&raw)
        .map_err(|e| TavoloError::Config(format!("invalid review JSON: {e}")))?;

    inputs
        .into_iter()
        .map(|input| Review::new(input.text, input.stars, input.timestamp))
        .collect()
}

/// Build the process-wide model gateway from configuration.
///
/// The gateway wraps a Gemini client behind the configured request budget
/// and the shutdown token, so Ctrl+C aborts queued calls too.
pub fn build_gateway(
    config: &TavoloConfig,
    cancel: CancellationToken,
) -> Result<Arc<ModelGateway>, TavoloError> {
    let api_key = resolve_api_key(config).inspect_err(|_| {
        eprintln!(
            "error: Gemini API key required. Set via: config (gemini.api_key) or GEMINI_API_KEY env var"
        );
    })?;

    let generation = GenerationConfig {
        temperature: config.gemini.temperature as f32,
        top_p: config.gemini.top_p as f32,
        top_k: config.gemini.top_k,
    };
    let request_timeout = Duration::from_secs(config.gemini.request_timeout_secs);

    let client = GeminiClient::new(
        api_key,
        config.gemini.model.clone(),
        generation,
        request_timeout,
    )?;

    let limiter = RateLimiter::new(
        config.throttle.max_requests,
        Duration::from_secs(config.throttle.cooldown_secs),
    );

    info!(
        model = config.gemini.model.as_str(),
        max_requests = config.throttle.max_requests,
        cooldown_secs = config.throttle.cooldown_secs,
        "model gateway ready"
    );

    Ok(Arc::new(
        ModelGateway::new(Arc::new(client), limiter, request_timeout).with_cancellation(cancel),
    ))
}

/// Resolve the Gemini API key from config, falling back to the environment.
fn resolve_api_key(config: &TavoloConfig) -> Result<String, TavoloError> {
    if let Some(key) = &config.gemini.api_key
        && !key.trim().is_empty()
    {
        return Ok(key.clone());
    }
    if let Ok(key) = std::env::var("GEMINI_API_KEY")
        && !key.trim().is_empty()
    {
        return Ok(key);
    }
    Err(TavoloError::Config("missing Gemini API key".to_string()))
}

/// Serialize a command's output document to pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), TavoloError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| TavoloError::Internal(format!("failed to serialize output: {e}")))?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "tavolo-reviews-{}-{}.json",
            std::process::id(),
            content.len()
        ));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn load_reviews_parses_valid_input() {
        let path = write_temp(
            r#"[
                {"text": "Great pasta", "stars": 5, "timestamp": "2026-04-29T12:00:00Z"},
                {"text": "Slow service", "stars": 2, "timestamp": "2026-04-20T19:30:00Z"}
            ]"#,
        );
        let reviews = load_reviews(&InputArgs { input: Some(path.clone()) }).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].text, "Great pasta");
        assert_eq!(reviews[1].stars, 2);
    }

    #[test]
    fn load_reviews_rejects_out_of_range_stars() {
        let path = write_temp(r#"[{"text": "ok", "stars": 9, "timestamp": "2026-04-29T12:00:00Z"}]"#);
        let err = load_reviews(&InputArgs { input: Some(path.clone()) }).unwrap_err();
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(err, TavoloError::InvalidReview(_)), "got: {err}");
    }

    #[test]
    fn load_reviews_rejects_malformed_json() {
        let path = write_temp("not json at all");
        let err = load_reviews(&InputArgs { input: Some(path.clone()) }).unwrap_err();
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(err, TavoloError::Config(_)), "got: {err}");
    }

    #[test]
    fn resolve_api_key_prefers_config() {
        let mut config = TavoloConfig::default();
        config.gemini.api_key = Some("from-config".to_string());
        assert_eq!(resolve_api_key(&config).unwrap(), "from-config");
    }

    #[test]
    fn resolve_api_key_ignores_blank_config_value() {
        let mut config = TavoloConfig::default();
        config.gemini.api_key = Some("   ".to_string());
        // Falls through to the env var, which is unset in tests.
        if std::env::var("GEMINI_API_KEY").is_err() {
            assert!(resolve_api_key(&config).is_err());
        }
    }

    #[test]
    fn build_gateway_fails_without_key() {
        let config = TavoloConfig::default();
        if std::env::var("GEMINI_API_KEY").is_err() {
            let err = build_gateway(&config, CancellationToken::new()).unwrap_err();
            assert!(matches!(err, TavoloError::Config(_)), "got: {err}");
        }
    }
}
