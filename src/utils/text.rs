//! Text utils

use itertools::Itertools;
use regex::Regex;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"[a-zA-Z][^A-Z]*").unwrap();
    static ref NUMBER_PREFIX: Regex = Regex::new(r"^\d+\s+").unwrap();
}

/// Split a camel case identifier into space separated words,
/// e.g. `AverageTrueRange` gives `Average True Range`.
pub fn humanize(identifier: &str) -> String {
    WORD.find_iter(identifier).map(|m| m.as_str()).join(" ")
}

/// Lower case a key and join its words with dashes
pub fn slugify(key: &str) -> String {
    key.to_lowercase().replace(' ', "-")
}

/// Catalog keys and file stems are compared in this form
pub fn normalize_key(key: &str) -> String {
    key.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '_')
        .filter(|part| !part.is_empty())
        .join("-")
}

/// Drop the `NN ` numbering of a folder name
pub fn strip_number_prefix(name: &str) -> &str {
    match NUMBER_PREFIX.find(name) {
        Some(m) => name[m.end()..].trim(),
        None => name.trim(),
    }
}

/// Keep at most `max` characters, appending an ellipsis when cut
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

pub fn replace_last(text: &str, old: &str, new: &str) -> String {
    match text.rfind(old) {
        Some(idx) => format!("{}{}{}", &text[..idx], new, &text[idx + old.len()..]),
        None => text.to_string(),
    }
}

/// Text between the first `(` and the last `)` of a line
pub fn call_arguments(line: &str) -> Option<&str> {
    let (_, rest) = line.split_once('(')?;
    rest.rsplit_once(')').map(|(arguments, _)| arguments)
}
