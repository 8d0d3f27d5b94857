// SPDX-FileCopyrightText: 2026 Tavolo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./tavolo.toml` > `~/.config/tavolo/tavolo.toml` > `/etc/tavolo/tavolo.toml`
//! with environment variable overrides via `TAVOLO_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::TavoloConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/tavolo/tavolo.toml` (system-wide)
/// 3. `~/.config/tavolo/tavolo.toml` (user XDG config)
/// 4. `./tavolo.toml` (local directory)
/// 5. `TAVOLO_*` environment variables
pub fn load_config() -> Result<TavoloConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TavoloConfig::default()))
        .merge(Toml::file("/etc/tavolo/tavolo.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("tavolo/tavolo.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("tavolo.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and inline configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<TavoloConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TavoloConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TavoloConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TavoloConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `TAVOLO_GEMINI_API_KEY` must
/// map to `gemini.api_key`, not `gemini.api.key`.
fn env_provider() -> Env {
    Env::prefixed("TAVOLO_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: TAVOLO_THROTTLE_MAX_REQUESTS -> "throttle_max_requests"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("runtime_", "runtime.", 1)
            .replacen("gemini_", "gemini.", 1)
            .replacen("throttle_", "throttle.", 1)
            .replacen("batch_", "batch.", 1);
        mapped.into()
    })
}
