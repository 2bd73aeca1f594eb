//! Parsing of the model's JSON answer into scan guesses.

use serde::Deserialize;
use serde_json::Value as JsonValue;

use stocksnap_inventory::{Confidence, ScanGuess};

use crate::error::ExtractionError;

/// Raw record as the model emits it. Everything but `name` is optional and
/// loosely typed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGuess {
    name: String,
    #[serde(default)]
    quantity: Option<JsonValue>,
    #[serde(default)]
    original_text: Option<String>,
    #[serde(default)]
    confidence: Option<String>,
    #[serde(default)]
    alternatives: Option<Vec<String>>,
}

/// Parse the model's text answer.
///
/// - Markdown code fences around the JSON are tolerated.
/// - Missing, non-numeric or non-positive quantities become 1; fractions round
///   to the nearest whole count (minimum 1).
/// - Missing confidence means high; alternatives are kept only for low
///   confidence guesses.
/// - Records with a blank name are skipped.
pub fn parse_guesses(text: &str) -> Result<Vec<ScanGuess>, ExtractionError> {
    let body = strip_code_fence(text.trim());
    if body.is_empty() {
        return Err(ExtractionError::EmptyResponse);
    }

    let raw: Vec<RawGuess> =
        serde_json::from_str(body).map_err(|e| ExtractionError::Malformed(e.to_string()))?;

    let guesses = raw
        .into_iter()
        .filter_map(|g| {
            let name = g.name.trim().to_string();
            if name.is_empty() {
                tracing::warn!("skipping extracted line with blank name");
                return None;
            }

            let confidence = match g.confidence.as_deref().map(str::trim) {
                Some(c) if c.eq_ignore_ascii_case("low") => Confidence::Low,
                _ => Confidence::High,
            };
            let alternatives = match confidence {
                Confidence::Low => g
                    .alternatives
                    .unwrap_or_default()
                    .into_iter()
                    .map(|a| a.trim().to_string())
                    .filter(|a| !a.is_empty() && *a != name)
                    .collect(),
                Confidence::High => Vec::new(),
            };

            Some(ScanGuess {
                quantity: normalize_quantity(g.quantity.as_ref()),
                original_text: g.original_text.unwrap_or_else(|| name.clone()),
                name,
                confidence,
                alternatives,
            })
        })
        .collect();

    Ok(guesses)
}

fn normalize_quantity(value: Option<&JsonValue>) -> u32 {
    let n = match value {
        Some(JsonValue::Number(n)) => n.as_f64(),
        Some(JsonValue::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match n {
        Some(n) if n.is_finite() && n > 0.0 => (n.round() as u32).max(1),
        _ => 1,
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop an optional language tag on the opening fence line.
    let rest = match rest.find('\n') {
        Some(i) => &rest[i + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
