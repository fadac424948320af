//! Text cleanup for extracted and provider-supplied strings.

/// Collapses runs of whitespace into single spaces and trims the ends.
///
/// Anchor and heading text comes out of the DOM with the source's
/// indentation and line breaks; comparisons need it normalized.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Removes control characters other than newline, tab and carriage return.
pub fn sanitize_text(text: &str) -> String {
    text.chars()
        .filter(|c| {
            let code = *c as u32;
            code >= 0x20 || code == 0x09 || code == 0x0A || code == 0x0D
        })
        .filter(|c| *c != '\u{7F}')
        .collect()
}

/// Sanitizes `text` and truncates it to at most `max_chars` characters.
///
/// Truncation is by character, never inside a UTF-8 sequence, and appends an
/// ellipsis when anything was cut.
pub fn sanitize_and_truncate(text: &str, max_chars: usize) -> String {
    let sanitized = sanitize_text(text);
    let trimmed = sanitized.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let mut truncated: String = trimmed.chars().take(max_chars.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}
