//! Purpose: Text helpers for server-sent-event transport chunks.
//! Exports: `split_sse_messages`, `clean_json_string`.
//! Role: Pre-processing ahead of extraction when input arrives as SSE chunks.
//! Invariants: Splitting never allocates; returned slices borrow the chunk.

use std::sync::LazyLock;

use regex::Regex;

static MESSAGE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n\r?\n").expect("boundary pattern"));

/// Splits a transport chunk into SSE messages on blank lines, dropping empty
/// parts. Field parsing (`data:` prefixes and friends) is left to callers.
pub fn split_sse_messages(chunk: &str) -> Vec<&str> {
    MESSAGE_BOUNDARY
        .split(chunk)
        .filter(|part| !part.is_empty())
        .collect()
}

/// Interprets a raw fragment as a JSON string literal, decoding standard
/// escapes. When the fragment is not a valid literal body, only literal
/// `\n` and `\"` sequences are rewritten.
pub fn clean_json_string(raw: &str) -> String {
    let quoted = format!("\"{raw}\"");
    match serde_json::from_str::<String>(&quoted) {
        Ok(decoded) => decoded,
        Err(_) => raw.replace("\\n", "\n").replace("\\\"", "\""),
    }
}
