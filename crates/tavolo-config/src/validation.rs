// SPDX-FileCopyrightText: 2026 Tavolo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as sampling parameter ranges and nonzero request budgets.

use crate::diagnostic::ConfigError;
use crate::model::TavoloConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &TavoloConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.runtime.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "runtime.log_level must be one of trace, debug, info, warn, error; got `{}`",
                config.runtime.log_level
            ),
        });
    }

    if config.gemini.model.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "gemini.model must not be empty".to_string(),
        });
    }

    if !(0.0..=2.0).contains(&config.gemini.temperature) {
        errors.push(ConfigError::Validation {
            message: format!(
                "gemini.temperature must be between 0.0 and 2.0, got {}",
                config.gemini.temperature
            ),
        });
    }

    if !(0.0..=1.0).contains(&config.gemini.top_p) {
        errors.push(ConfigError::Validation {
            message: format!(
                "gemini.top_p must be between 0.0 and 1.0, got {}",
                config.gemini.top_p
            ),
        });
    }

    if config.gemini.top_k == 0 {
        errors.push(ConfigError::Validation {
            message: "gemini.top_k must be at least 1".to_string(),
        });
    }

    if config.gemini.request_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "gemini.request_timeout_secs must be at least 1".to_string(),
        });
    }

    if config.throttle.max_requests == 0 {
        errors.push(ConfigError::Validation {
            message: "throttle.max_requests must be at least 1".to_string(),
        });
    }

    if config.throttle.cooldown_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "throttle.cooldown_secs must be at least 1".to_string(),
        });
    }

    if config.batch.size == 0 {
        errors.push(ConfigError::Validation {
            message: "batch.size must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
