//! Turning warehouse identifiers into readable phrases.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::dictionary::{expand_abbreviation, ABBREVIATIONS, NON_IDENTIFIER_WORDS};

// One alternation over every abbreviation, so each word is rewritten at
// most once and expansions are never re-matched.
static ABBREVIATION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let alternation = ABBREVIATIONS
        .iter()
        .map(|(abbr, _)| regex::escape(abbr))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{})\b", alternation)).unwrap()
});

/// Convert a column or table name to a readable phrase.
///
/// `"CUSTOMER_ID"` becomes `"Customer identifier"`, `"dob"` becomes
/// `"Date of birth"`.
pub fn clean_name(name: &str) -> String {
    let spaced = name.replace('_', " ").to_lowercase();
    let expanded = ABBREVIATION_PATTERN.replace_all(&spaced, |caps: &Captures| {
        expand_abbreviation(&caps[0])
            .unwrap_or(&caps[0])
            .to_string()
    });
    capitalize_first(&expanded)
}

/// Lower-cased name segments, split on `_`, `-`, `.`, whitespace and
/// camelCase boundaries (`CustomerId` gives `customer`, `id`).
pub fn segments(name: &str) -> Vec<String> {
    name.split(|c: char| c == '_' || c == '-' || c == '.' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .flat_map(split_camel_case)
        .map(|s| s.to_lowercase())
        .collect()
}

/// Whether a segment names an identifier: `id` itself, or a word ending in
/// `id` such as `userid` that is not an ordinary English word.
pub fn is_identifier_segment(segment: &str) -> bool {
    segment == "id"
        || (segment.chars().count() >= 4
            && segment.ends_with("id")
            && !NON_IDENTIFIER_WORDS.contains(&segment))
}

// A boundary sits before an upper-case letter that follows a lower-case
// letter or digit, and before the last capital of an acronym run
// (`HTTPServer` gives `HTTP`, `Server`).
fn split_camel_case(word: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = word.char_indices().collect();
    let mut parts = Vec::new();
    let mut start = 0;
    for i in 1..chars.len() {
        let (idx, c) = chars[i];
        let prev = chars[i - 1].1;
        let next_lower = chars.get(i + 1).is_some_and(|(_, n)| n.is_lowercase());
        let boundary = c.is_uppercase()
            && ((prev.is_lowercase() || prev.is_ascii_digit()) || (prev.is_uppercase() && next_lower));
        if boundary {
            parts.push(&word[start..idx]);
            start = idx;
        }
    }
    parts.push(&word[start..]);
    parts
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
