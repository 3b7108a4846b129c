//! Query sanitization applied before any text reaches a store adapter.

use std::sync::LazyLock;

use regex::Regex;

/// Everything that is not a letter, a digit, an underscore or whitespace.
static UNSAFE_CHARS: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}_\s]+").ok());

/// Bareword operators in the FTS5 grammar.
const FTS5_OPERATORS: [&str; 4] = ["AND", "OR", "NOT", "NEAR"];

/// Neutralize punctuation and operators in a free-text query.
///
/// `@`, `:`, quotes, parentheses, `*`, `^` and every other punctuation mark
/// become token separators. Uppercase boolean operators are lowercased so the
/// adapter treats them as ordinary words. Whitespace is collapsed.
pub fn sanitize_query(raw: &str) -> String {
    let cleaned = match UNSAFE_CHARS.as_ref() {
        Some(re) => re.replace_all(raw, " ").into_owned(),
        None => raw
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '_' || c.is_whitespace() { c } else { ' ' })
            .collect(),
    };
    cleaned
        .split_whitespace()
        .map(|token| {
            if FTS5_OPERATORS.contains(&token) {
                token.to_ascii_lowercase()
            } else {
                token.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercased terms of an already sanitized query.
pub fn query_terms(sanitized: &str) -> Vec<String> {
    sanitized
        .split_whitespace()
        .map(|t| t.to_lowercase())
        .collect()
}
