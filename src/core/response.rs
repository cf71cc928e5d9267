//! Discord length limits and text truncation
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.2.0: Cap post text so the body and voice link fit one message
//! - 1.1.0: Add char-based truncation for channel and thread titles
//! - 1.0.0: Initial message limit helpers

/// Discord message content limit
pub const MESSAGE_LIMIT: usize = 2000;

/// Characters of post text kept in voice channel names and thread titles
pub const TITLE_CHAR_LIMIT: usize = 30;

/// Room kept after the post text for the voice channel link line
pub const VOICE_LINK_RESERVE: usize = 100;

/// Longest post text accepted from the edit modal
pub const POST_TEXT_LIMIT: usize = MESSAGE_LIMIT - VOICE_LINK_RESERVE;

/// Keep at most `max_chars` characters of multi-line `text`
pub fn clip_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}

/// Keep at most `max_chars` characters of `text` (never splits a character)
///
/// Newlines are folded into spaces since channel names and thread titles are
/// single-line. Surrounding whitespace is trimmed.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.trim()
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .take(max_chars)
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// Truncate text to fit message limit, adding ellipsis if needed
pub fn truncate_for_message(text: &str) -> String {
    if text.len() <= MESSAGE_LIMIT {
        text.to_string()
    } else {
        // Find a safe UTF-8 boundary
        let mut end = MESSAGE_LIMIT - 3; // Room for "..."
        while !text.is_char_boundary(end) && end > 0 {
            end -= 1;
        }
        format!("{}...", &text[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_chars_keeps_lines() {
        assert_eq!(clip_chars("line one\nline two", 100), "line one\nline two");
        assert_eq!(clip_chars("line one\nline two", 10), "line one\nl");
    }

    #[test]
    fn test_clip_chars_multibyte() {
        let text = "모집".repeat(1500);
        let result = clip_chars(&text, MESSAGE_LIMIT);
        assert_eq!(result.chars().count(), MESSAGE_LIMIT);
    }

    #[test]
    fn test_truncate_chars_short() {
        assert_eq!(truncate_chars("Raid group", 30), "Raid group");
    }

    #[test]
    fn test_truncate_chars_counts_chars_not_bytes() {
        let text = "모집".repeat(20);
        let result = truncate_chars(&text, TITLE_CHAR_LIMIT);
        assert_eq!(result.chars().count(), TITLE_CHAR_LIMIT);
    }

    #[test]
    fn test_truncate_chars_single_line() {
        assert_eq!(truncate_chars("line one\nline two", 30), "line one line two");
    }

    #[test]
    fn test_truncate_chars_trims() {
        assert_eq!(truncate_chars("  padded   ", 30), "padded");
        assert_eq!(truncate_chars("abcde     fgh", 6), "abcde");
    }

    #[test]
    fn test_truncate_for_message_short() {
        let text = "short text";
        assert_eq!(truncate_for_message(text), text);
    }

    #[test]
    fn test_truncate_for_message_long() {
        let result = truncate_for_message(&"a".repeat(3000));
        assert!(result.len() <= MESSAGE_LIMIT);
        assert!(result.ends_with("..."));
    }

    #[test]
    fn test_truncate_for_message_utf8_boundary() {
        let result = truncate_for_message(&"가".repeat(1000));
        assert!(result.len() <= MESSAGE_LIMIT);
    }
}
