use ratatui::{
    style::{Modifier, Style},
    text::Span,
};

/// Spans for a single-line input with a block cursor at char index `cursor`.
/// The text scrolls horizontally so the cursor stays within `width`.
pub fn input_spans(text: &str, cursor: usize, width: usize, style: Style) -> Vec<Span<'static>> {
    if width == 0 {
        return Vec::new();
    }
    let chars: Vec<char> = text.chars().collect();
    let cursor = cursor.min(chars.len());

    // One column is reserved for the cursor when it sits past the end.
    let skip = (cursor + 1).saturating_sub(width);
    let visible: Vec<char> = chars.iter().copied().skip(skip).take(width).collect();
    let at = cursor - skip;

    let before: String = visible[..at.min(visible.len())].iter().collect();
    let (under, after): (String, String) = if at < visible.len() {
        (
            visible[at].to_string(),
            visible[at + 1..].iter().collect(),
        )
    } else {
        (" ".to_string(), String::new())
    };

    vec![
        Span::styled(before, style),
        Span::styled(under, style.add_modifier(Modifier::REVERSED)),
        Span::styled(after, style),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(spans: &[Span]) -> Vec<String> {
        spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn test_cursor_at_end() {
        let spans = input_spans("2024", 4, 20, Style::default());
        assert_eq!(texts(&spans), ["2024", " ", ""]);
    }

    #[test]
    fn test_cursor_in_middle() {
        let spans = input_spans("2024", 1, 20, Style::default());
        assert_eq!(texts(&spans), ["2", "0", "24"]);
    }

    #[test]
    fn test_scrolls_to_keep_cursor_visible() {
        let spans = input_spans("abcdefgh", 8, 4, Style::default());
        assert_eq!(texts(&spans), ["fgh", " ", ""]);
    }

    #[test]
    fn test_zero_width() {
        assert!(input_spans("abc", 0, 0, Style::default()).is_empty());
    }
}
