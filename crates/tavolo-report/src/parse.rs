// SPDX-FileCopyrightText: 2026 Tavolo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parsing and normalization of aggregate report responses.
//!
//! The report prompt demands a camelCase JSON object, but models sometimes
//! answer in the older sectioned text format (SUMMARY: / SENTIMENT: / ...).
//! Parsing tries JSON first, then the sectioned grammar, and fails with
//! [`TavoloError::AnalysisFailed`] only when neither matches.
//!
//! Numeric fields are normalized rather than trusted: percentages clamp to
//! [0, 100] as given (a fractional confidence like 0.8 stays 0.8 of a
//! percent, it is never rescaled), star predictions clamp to [1, 5], and
//! missing forecast blocks are synthesized from the review statistics.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use tavolo_core::{
    MoodBreakdown, ReviewAnalysis, SentimentLabel, TavoloError, TrendDirection, TrendPrediction,
};
use tavolo_gateway::strip_code_fences;

use crate::stats::ReviewStats;

/// Confidence assigned to forecasts the parser synthesizes itself.
const SYNTHESIZED_CONFIDENCE: u8 = 50;

static NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").unwrap());

/// Parse one aggregate report response into a normalized [`ReviewAnalysis`].
///
/// `stats` supplies the fallback values for anything the response omits:
/// the expected monthly volume, a stable trend, and a mid confidence.
pub fn parse_report(raw: &str, stats: &ReviewStats) -> Result<ReviewAnalysis, TavoloError> {
    let cleaned = strip_code_fences(raw);
    if cleaned.is_empty() {
        return Err(TavoloError::AnalysisFailed {
            message: "empty response after cleaning".to_string(),
        });
    }

    if let Some(analysis) = parse_json_report(&cleaned, stats) {
        return Ok(analysis);
    }
    if let Some(analysis) = parse_sectioned_report(&cleaned, stats) {
        return Ok(analysis);
    }

    Err(TavoloError::AnalysisFailed {
        message: "response matches neither the JSON nor the sectioned report format".to_string(),
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReport {
    summary: Option<String>,
    pros: Option<Vec<String>>,
    cons: Option<Vec<String>>,
    mood: Option<RawMood>,
    predicted_stars: Option<f64>,
    #[serde(rename = "trendPrediction")]
    trend_prediction: Option<RawTrend>,
}

#[derive(Debug, Deserialize)]
struct RawMood {
    positive: Option<f64>,
    neutral: Option<f64>,
    negative: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTrend {
    expected_reviews: Option<f64>,
    sentiment_trend: Option<String>,
    confidence: Option<f64>,
}

/// JSON path: requires a non-empty summary and a mood block; everything
/// else gets a normalized default.
fn parse_json_report(cleaned: &str, stats: &ReviewStats) -> Option<ReviewAnalysis> {
    let raw: RawReport = serde_json::from_str(cleaned).ok()?;

    let summary = raw
        .summary
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())?;
    let raw_mood = raw.mood?;
    let mood = MoodBreakdown {
        positive: raw_mood.positive.unwrap_or(0.0) as f32,
        neutral: raw_mood.neutral.unwrap_or(0.0) as f32,
        negative: raw_mood.negative.unwrap_or(0.0) as f32,
    }
    .clamped();

    let predicted_stars = raw
        .predicted_stars
        .map(normalize_stars)
        .unwrap_or_else(|| stars_for_mood(&mood));
    let trend = raw
        .trend_prediction
        .map(|block| normalize_trend_block(block, stats))
        .unwrap_or_else(|| synthesized_trend(stats));

    Some(ReviewAnalysis {
        summary,
        pros: clean_list(raw.pros.unwrap_or_default()),
        cons: clean_list(raw.cons.unwrap_or_default()),
        mood,
        predicted_stars,
        trend,
    })
}

/// Sectioned path: requires a SUMMARY: section and a SENTIMENT: or MOOD:
/// section with per-label percentages. STRENGTHS:/PROS: and
/// WEAKNESSES:/CONS: become pros and cons; optional PREDICTED RATING:,
/// TREND:, and FORECAST: sections refine the numeric fields.
fn parse_sectioned_report(cleaned: &str, stats: &ReviewStats) -> Option<ReviewAnalysis> {
    let sections: Vec<&str> = cleaned.split("\n\n").collect();
    let find = |marker: &str| sections.iter().find(|s| s.contains(marker)).copied();
    let find_either = |a: &str, b: &str| find(a).or_else(|| find(b));

    let summary = find("SUMMARY:")?.replace("SUMMARY:", "").trim().to_string();
    if summary.is_empty() {
        return None;
    }

    let sentiment_section = find_either("SENTIMENT:", "MOOD:")?;
    let mood = MoodBreakdown {
        positive: labeled_number(sentiment_section, "positive").unwrap_or(0.0) as f32,
        neutral: labeled_number(sentiment_section, "neutral").unwrap_or(0.0) as f32,
        negative: labeled_number(sentiment_section, "negative").unwrap_or(0.0) as f32,
    }
    .clamped();

    let pros = find_either("STRENGTHS:", "PROS:")
        .map(list_items)
        .unwrap_or_default();
    let cons = find_either("WEAKNESSES:", "CONS:")
        .map(list_items)
        .unwrap_or_default();

    let predicted_stars = find("PREDICTED RATING:")
        .and_then(|s| extract_numbers(s).first().copied())
        .map(normalize_stars)
        .unwrap_or_else(|| stars_for_mood(&mood));

    let sentiment_trend = find("TREND:")
        .map(normalize_trend)
        .unwrap_or(TrendDirection::Stable);
    let expected_reviews = find("FORECAST:")
        .and_then(|s| extract_numbers(s).first().copied())
        .map(|n| n.max(0.0).round() as u32)
        .unwrap_or_else(|| stats.expected_monthly_reviews());

    Some(ReviewAnalysis {
        summary,
        pros,
        cons,
        mood,
        predicted_stars,
        trend: TrendPrediction {
            expected_reviews,
            sentiment_trend,
            confidence: SYNTHESIZED_CONFIDENCE,
        },
    })
}

fn normalize_trend_block(raw: RawTrend, stats: &ReviewStats) -> TrendPrediction {
    TrendPrediction {
        expected_reviews: raw
            .expected_reviews
            .map(|n| n.max(0.0).round() as u32)
            .unwrap_or_else(|| stats.expected_monthly_reviews()),
        sentiment_trend: raw
            .sentiment_trend
            .as_deref()
            .map(normalize_trend)
            .unwrap_or(TrendDirection::Stable),
        confidence: raw
            .confidence
            .map(normalize_confidence)
            .unwrap_or(SYNTHESIZED_CONFIDENCE),
    }
}

fn synthesized_trend(stats: &ReviewStats) -> TrendPrediction {
    TrendPrediction {
        expected_reviews: stats.expected_monthly_reviews(),
        sentiment_trend: TrendDirection::Stable,
        confidence: SYNTHESIZED_CONFIDENCE,
    }
}

/// Map a free-form trend phrase onto a direction. A phrase naming both
/// directions (a model echoing the instructions) counts as stable.
fn normalize_trend(raw: &str) -> TrendDirection {
    let lowered = raw.to_lowercase();
    match (lowered.contains("improv"), lowered.contains("declin")) {
        (true, false) => TrendDirection::Improving,
        (false, true) => TrendDirection::Declining,
        _ => TrendDirection::Stable,
    }
}

/// Confidence is taken as a percentage and clamped; fractions are not
/// rescaled.
fn normalize_confidence(value: f64) -> u8 {
    value.clamp(0.0, 100.0).round() as u8
}

/// Star predictions clamp to the rating scale and round to one decimal.
fn normalize_stars(value: f64) -> f32 {
    ((value.clamp(1.0, 5.0) * 10.0).round() / 10.0) as f32
}

/// Midpoint star rating for the dominant mood bucket, used when a response
/// omits the prediction entirely.
fn stars_for_mood(mood: &MoodBreakdown) -> f32 {
    match mood.dominant() {
        SentimentLabel::Positive => 4.5,
        SentimentLabel::Neutral => 3.0,
        SentimentLabel::Negative => 1.5,
    }
}

fn extract_numbers(text: &str) -> Vec<f64> {
    NUMBER_PATTERN
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect()
}

/// First number following `label` in `section`, matched case-insensitively,
/// so the mood lines can appear in any order.
fn labeled_number(section: &str, label: &str) -> Option<f64> {
    let lowered = section.to_lowercase();
    let rest = &lowered[lowered.find(label)? + label.len()..];
    extract_numbers(rest).first().copied()
}

fn list_items(section: &str) -> Vec<String> {
    section
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('-'))
        .map(|line| line.trim_start_matches('-').trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
