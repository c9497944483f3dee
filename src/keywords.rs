//! Keyword set normalization and chip markup
//!
//! The server stores keywords as one free-text string. For display it is
//! split on commas, trimmed, lowercased, de-duplicated and sorted.

use std::collections::BTreeSet;

/// CSS class of a rendered keyword chip
pub const KEYWORD_CLASS: &str = "keyword-span";

/// Normalize a raw keyword string into its sorted, unique, non-empty tokens
pub fn keyword_set(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Escape text for insertion into HTML element content or attribute values
pub fn escape_html(unsafe_text: &str) -> String {
    let mut escaped = String::with_capacity(unsafe_text.len());
    for c in unsafe_text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render keywords as concatenated `<span class="keyword-span">` chips
pub fn keyword_markup(keywords: &[String]) -> String {
    keywords
        .iter()
        .map(|k| format!("<span class=\"{}\">{}</span>", KEYWORD_CLASS, escape_html(k)))
        .collect()
}
