//! Small text helpers for list rendering.

/// Cuts `text` to at most `max` characters, appending `…` when shortened.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(max - 1).collect();
    out.push('…');
    out
}

/// Unicode case-insensitive equality, so "Meditació" equals "MEDITACIÓ".
pub fn same_folded(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Case-insensitive substring match over several fields. An empty needle
/// matches everything.
pub fn matches_filter<'a>(needle: &str, fields: impl IntoIterator<Item = &'a str>) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
}
