//! String utilities for the domain layer.

/// Upper-case the first character, leaving the rest untouched
///
/// Used for displayed dominant answers: `"yes please"` -> `"Yes please"`.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Truncate a string to a maximum length with ellipsis (UTF-8 safe)
///
/// `max_len` is in bytes; the cut backs up to the previous char boundary.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len.saturating_sub(3).min(s.len());
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}
