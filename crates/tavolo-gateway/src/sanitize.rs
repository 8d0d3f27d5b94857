// SPDX-FileCopyrightText: 2026 Tavolo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cleanup of raw model output before parsing.
//!
//! Models routinely wrap JSON answers in Markdown code fences, with or
//! without a language tag. Parsers in this workspace strip those fences
//! first and only then attempt to interpret the payload.

use std::sync::LazyLock;

use regex::Regex;

/// Opening or closing code fence, optionally tagged (```json, ```text, ...).
static FENCE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[a-zA-Z0-9]*\s*").unwrap());

/// Remove Markdown code fences and surrounding whitespace from model output.
///
/// Inline single-backtick spans are left alone; only triple-backtick fences
/// are stripped.
pub fn strip_code_fences(raw: &str) -> String {
    FENCE_PATTERN.replace_all(raw, "").trim().to_string()
}
