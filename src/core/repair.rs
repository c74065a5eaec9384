//! Purpose: Heuristic textual repairs that turn near-JSON into parseable JSON.
//! Exports: `repair`, plus the individual passes for targeted reuse.
//! Role: Last-resort stage of the extraction chain; never applied to input
//! that already parses.
//! Invariants: Passes run in a fixed order: trailing commas, bare keys,
//! single-quoted strings. Reordering changes results on damaged input.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").expect("trailing comma pattern"));

static BARE_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"((?:,|\{|\[)\s*)([A-Za-z0-9_$@-]+)\s*:").expect("bare key pattern"));

static SINGLE_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'([^'\\]*(?:\\.[^'\\]*)*)'").expect("single quote pattern"));

/// Applies all repair passes in order and returns the rewritten text.
pub fn repair(input: &str) -> String {
    let pass = strip_trailing_commas(input);
    let pass = quote_bare_keys(&pass);
    rewrite_single_quoted(&pass)
}

/// Removes a comma that immediately precedes a closing `}` or `]`.
pub fn strip_trailing_commas(input: &str) -> String {
    TRAILING_COMMA.replace_all(input, "$1").into_owned()
}

/// Wraps unquoted object keys in double quotes. A key is a run of letters,
/// digits, `_`, `$`, `@`, or `-` that follows `{`, `[`, or `,` (modulo
/// whitespace) and precedes a colon.
pub fn quote_bare_keys(input: &str) -> String {
    BARE_KEY.replace_all(input, "${1}\"${2}\":").into_owned()
}

/// Rewrites single-quoted string literals as double-quoted ones, un-escaping
/// embedded `\'` and escaping embedded `"` so the literal survives the quote
/// change.
pub fn rewrite_single_quoted(input: &str) -> String {
    SINGLE_QUOTED
        .replace_all(input, |caps: &Captures<'_>| {
            let body = caps[1].replace("\\'", "'").replace('"', "\\\"");
            format!("\"{body}\"")
        })
        .into_owned()
}
