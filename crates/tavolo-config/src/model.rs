// SPDX-FileCopyrightText: 2026 Tavolo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Tavolo review pipeline.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Tavolo configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TavoloConfig {
    /// Process-wide runtime settings.
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// Gemini API settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Request budget settings shared by every model call.
    #[serde(default)]
    pub throttle: ThrottleConfig,

    /// Concurrent classification batch settings.
    #[serde(default)]
    pub batch: BatchConfig,
}

/// Process-wide runtime configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Gemini API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// Gemini API key. `None` requires the GEMINI_API_KEY environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier used for every generation request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature (0.0-2.0).
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Nucleus sampling mass (0.0-1.0).
    #[serde(default = "default_top_p")]
    pub top_p: f64,

    /// Top-k sampling cutoff.
    #[serde(default = "default_top_k")]
    pub top_k: u32,

    /// Timeout for one HTTP exchange, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            top_k: default_top_k(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_top_p() -> f64 {
    0.8
}

fn default_top_k() -> u32 {
    40
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Request budget configuration.
///
/// One process-wide budget covers classification, reports, and summaries.
/// Defaults match the Gemini free-tier allowance with headroom to spare.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ThrottleConfig {
    /// Maximum requests allowed per cooldown window.
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Window length in seconds.
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,

    /// Delay before retrying a rate-limited classification, in seconds.
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            cooldown_secs: default_cooldown_secs(),
            retry_delay_secs: default_retry_delay_secs(),
        }
    }
}

fn default_max_requests() -> u32 {
    1800
}

fn default_cooldown_secs() -> u64 {
    60
}

fn default_retry_delay_secs() -> u64 {
    2
}

/// Concurrent classification batch configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BatchConfig {
    /// Number of reviews classified concurrently per batch.
    #[serde(default = "default_batch_size")]
    pub size: usize,

    /// Pause between consecutive batches, in milliseconds.
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            size: default_batch_size(),
            pause_ms: default_pause_ms(),
        }
    }
}

fn default_batch_size() -> usize {
    25
}

fn default_pause_ms() -> u64 {
    100
}
