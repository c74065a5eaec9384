//! Purpose: Recover a single JSON value from unreliable free-text input.
//! Exports: `extract`, `extract_opt`.
//! Role: Ordered fallback chain over increasingly invasive recovery strategies.
//! Invariants: Cheapest, most faithful strategy first; textual repair last.
//! Invariants: Only the LAST brace block is ever attempted; earlier blocks are
//! never consulted even when the last one fails repair.
//! Invariants: Empty input is a benign no-result, not an error.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::core::error::Error;
use crate::core::repair::repair;

// Leading ``` or ```json marker plus a trailing ``` marker. Anchored to the
// whole input, matching the Markdown wrapping emitted by chat models.
static FENCE_MARKERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```(?:json)?\s*|```\s*$").expect("fence pattern"));

// Non-greedy brace-to-brace scan. Deliberately depth-unaware: a literal `}`
// inside a nested object or string value truncates the candidate block. This
// mirrors the established recovery behavior and is not to be "fixed" here.
static BRACE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*?\}").expect("brace pattern"));

/// Extracts a JSON value from `raw`, tolerating code fences, surrounding
/// prose, and minor syntax damage (bare keys, single quotes, trailing
/// commas).
///
/// Returns `Ok(None)` for empty input, `Ok(Some(value))` when any strategy
/// recovers a value, and a `NotFound` error once every strategy is
/// exhausted. Intermediate parse failures are swallowed.
pub fn extract(raw: &str) -> Result<Option<Value>, Error> {
    if raw.is_empty() {
        return Ok(None);
    }

    if let Ok(value) = serde_json::from_str(raw) {
        return Ok(Some(value));
    }

    tracing::debug!("direct parse failed; stripping fence markers");
    let unfenced = FENCE_MARKERS.replace_all(raw, "");
    if let Ok(value) = serde_json::from_str(&unfenced) {
        return Ok(Some(value));
    }

    // The block scan runs over the original input, not the unfenced text.
    // The last block wins: in multi-turn output the final brace-delimited
    // span is the answer payload, earlier ones are examples or reasoning.
    let Some(found) = BRACE_BLOCK.find_iter(raw).last() else {
        tracing::debug!("no brace block in input");
        return Err(Error::json_not_found());
    };
    let block = found.as_str();

    tracing::debug!(start = found.start(), len = block.len(), "trying last brace block");
    if let Ok(value) = serde_json::from_str(block) {
        return Ok(Some(value));
    }

    let repaired = repair(block);
    match serde_json::from_str(&repaired) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            tracing::debug!(error = %err, "repaired block still unparseable");
            Err(Error::json_not_found())
        }
    }
}

/// `extract` for callers holding an optional input; absent input is treated
/// like empty input.
pub fn extract_opt(raw: Option<&str>) -> Result<Option<Value>, Error> {
    match raw {
        Some(raw) => extract(raw),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{extract, extract_opt};
    use crate::core::error::{ErrorKind, JSON_NOT_FOUND};

    #[test]
    fn fence_without_language_tag_is_stripped() {
        let raw = "```\n{\"ok\": true}\n```";
        assert_eq!(extract(raw).unwrap(), Some(json!({"ok": true})));
    }

    #[test]
    fn whitespace_only_input_is_not_treated_as_empty() {
        let err = extract("   \n  ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.message(), Some(JSON_NOT_FOUND));
    }

    #[test]
    fn absent_input_is_a_no_op() {
        assert_eq!(extract_opt(None).unwrap(), None);
        assert_eq!(extract_opt(Some("")).unwrap(), None);
    }

    #[test]
    fn non_object_json_still_parses_directly() {
        // The chain accepts any JSON type on the direct path, even though
        // callers typically expect objects.
        assert_eq!(extract("[1, 2, 3]").unwrap(), Some(json!([1, 2, 3])));
        assert_eq!(extract("42").unwrap(), Some(json!(42)));
    }
}
