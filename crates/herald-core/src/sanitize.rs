//! # Text Sanitization Module
//!
//! Normalizes free-text payload content before it is placed into an embed:
//! markup stripping, length-budget truncation, and display title-casing for
//! payload enum values.

use regex::Regex;

/// Character appended when a string is cut down to its length budget.
pub const ELLIPSIS: char = '\u{2026}';

/// Length budget for embed descriptions.
pub const DESCRIPTION_LIMIT: usize = 1024;

/// Length budget for free text that still has to pass through markdown
/// rewriting after truncation.
pub const REWRITE_LIMIT: usize = 256;

/// Remove HTML-tag-like substrings from `input`.
///
/// Matches the non-greedy pattern `<[^>]*>` with no nesting awareness. This is
/// a deliberately lossy approximation, not a parser: a `>` inside an attribute
/// value terminates the match early. Downstream truncation math depends on the
/// exact stripped length, so the pattern must not be replaced with a real
/// HTML parser.
pub fn strip_markup(input: &str) -> String {
    // The pattern is static and known-valid.
    let tag = Regex::new(r"<[^>]*>").unwrap();
    tag.replace_all(input, "").into_owned()
}

/// Truncate `input` to at most `limit` characters.
///
/// Strings within the budget pass through unchanged. Longer strings are cut to
/// the first `limit - 1` characters followed by a single ellipsis, so the
/// result is always exactly `limit` characters long in that case.
pub fn truncate(input: &str, limit: usize) -> String {
    if input.chars().count() <= limit {
        return input.to_string();
    }

    let mut out: String = input.chars().take(limit - 1).collect();
    out.push(ELLIPSIS);
    out
}

/// Normalize a payload enum value (issue priority, kind, state, ...) for
/// display.
///
/// `None` yields `"None"`; an empty string passes through unchanged; anything
/// else is lowercased, split on single spaces, and each token's first
/// character is uppercased. Multi-word values with mixed existing casing are
/// normalized, not preserved; this is a display rule for short payload
/// values, not a general title-casing algorithm.
pub fn title_case(value: Option<&str>) -> String {
    let value = match value {
        Some(v) => v,
        None => return "None".to_string(),
    };

    if value.is_empty() {
        return String::new();
    }

    value
        .to_lowercase()
        .split(' ')
        .map(|token| {
            let mut chars = token.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "sanitize_tests.rs"]
mod tests;
