// src/util/text.rs

/// First non-empty line of `text`, trimmed and cut to `max_chars` characters.
///
/// Truncated lines end with an ellipsis, which counts toward the limit.
///
/// # Examples
///
/// ```
/// use quick_answers::util::text::preview;
///
/// assert_eq!(preview("\n  Refund policy\nsecond line", 40), "Refund policy");
/// assert_eq!(preview("abcdefghij", 5), "abcd…");
/// ```
pub fn preview(text: &str, max_chars: usize) -> String {
    let first = text
        .lines()
        .map(|line| line.trim())
        .find(|line| !line.is_empty())
        .unwrap_or("");

    if first.chars().count() <= max_chars {
        return first.to_string();
    }
    let mut cut: String = first.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// `"1 note"`, `"3 notes"`.
pub fn plural(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, if count == 1 { "" } else { "s" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_multiline_text_when_previewing_then_returns_only_first_line() {
        assert_eq!(preview("First line\nSecond line", 80), "First line");
    }

    #[test]
    fn given_leading_blank_lines_when_previewing_then_skips_them() {
        assert_eq!(preview("\n\n   \nHola", 80), "Hola");
    }

    #[test]
    fn given_empty_text_when_previewing_then_returns_empty_string() {
        assert_eq!(preview("", 10), "");
    }

    #[test]
    fn given_long_line_when_previewing_then_truncates_on_char_boundary() {
        let result = preview("ñañañañaña", 4);
        assert_eq!(result, "ñañ…");
        assert_eq!(result.chars().count(), 4);
    }

    #[test]
    fn given_whitespace_around_text_when_previewing_then_trims_whitespace() {
        assert_eq!(preview("  Olá  ", 10), "Olá");
    }

    #[test]
    fn given_counts_when_pluralizing_then_adds_suffix_except_for_one() {
        assert_eq!(plural(0, "note"), "0 notes");
        assert_eq!(plural(1, "note"), "1 note");
        assert_eq!(plural(2, "response"), "2 responses");
    }
}
