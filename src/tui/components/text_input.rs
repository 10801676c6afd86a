//! Single-line input field rendering
//!
//! Wraps [`tui_input::Input`] values in a labelled one-line field with an
//! inverse-video cursor. The login screen and the task form both draw their
//! text fields through here so focus and cursor behavior stay consistent.

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use tui_input::Input;

use crate::tui::styles::Theme;

pub fn render_text_field(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    input: &Input,
    focused: bool,
    placeholder: Option<&str>,
    theme: &Theme,
) {
    render_field(
        frame,
        area,
        label,
        input.value(),
        input.visual_cursor(),
        focused,
        placeholder,
        theme,
    );
}

/// Like [`render_text_field`], but every typed character shows as a mask.
/// The cursor still tracks the real position, so editing mid-password works.
pub fn render_secret_field(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    input: &Input,
    focused: bool,
    theme: &Theme,
) {
    let masked = "\u{2022}".repeat(input.value().chars().count());
    render_field(
        frame,
        area,
        label,
        &masked,
        input.visual_cursor(),
        focused,
        None,
        theme,
    );
}

#[allow(clippy::too_many_arguments)]
fn render_field(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    cursor: usize,
    focused: bool,
    placeholder: Option<&str>,
    theme: &Theme,
) {
    let (label_style, value_style) = if focused {
        (
            Style::default().fg(theme.accent).underlined(),
            Style::default().fg(theme.accent),
        )
    } else {
        (
            Style::default().fg(theme.text),
            Style::default().fg(theme.text),
        )
    };

    let mut spans = vec![Span::styled(label.to_string(), label_style), Span::raw(" ")];
    if focused {
        let cursor_style = Style::default().fg(theme.background).bg(theme.accent);
        spans.extend(cursor_spans(value, cursor, value_style, cursor_style));
    } else if value.is_empty() {
        if let Some(hint) = placeholder {
            spans.push(Span::styled(
                hint.to_string(),
                Style::default().fg(theme.dimmed),
            ));
        }
    } else {
        spans.push(Span::styled(value.to_string(), value_style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Splits `text` into before-cursor, cursor cell, and after-cursor spans.
///
/// `cursor` counts characters, not bytes. When the cursor sits past the last
/// character it gets a styled space so it stays visible at the end of the
/// field.
fn cursor_spans(
    text: &str,
    cursor: usize,
    value_style: Style,
    cursor_style: Style,
) -> Vec<Span<'static>> {
    let mut offsets = text
        .char_indices()
        .map(|(at, _)| at)
        .chain(std::iter::once(text.len()));
    let start = offsets.nth(cursor).unwrap_or(text.len());
    let end = offsets.next().unwrap_or(text.len());

    let mut spans = Vec::with_capacity(3);
    if start > 0 {
        spans.push(Span::styled(text[..start].to_string(), value_style));
    }
    if start < end {
        spans.push(Span::styled(text[start..end].to_string(), cursor_style));
    } else {
        spans.push(Span::styled(" ".to_string(), cursor_style));
    }
    if end < text.len() {
        spans.push(Span::styled(text[end..].to_string(), value_style));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    fn value_style() -> Style {
        Style::default().fg(Color::White)
    }

    fn cursor_style() -> Style {
        Style::default().bg(Color::White)
    }

    fn contents<'a>(spans: &'a [Span<'static>]) -> Vec<&'a str> {
        spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_cursor_in_the_middle() {
        let spans = cursor_spans("hello", 1, value_style(), cursor_style());
        assert_eq!(contents(&spans), vec!["h", "e", "llo"]);
        assert_eq!(spans[0].style, value_style());
        assert_eq!(spans[1].style, cursor_style());
        assert_eq!(spans[2].style, value_style());
    }

    #[test]
    fn test_cursor_on_first_char() {
        let spans = cursor_spans("hi", 0, value_style(), cursor_style());
        assert_eq!(contents(&spans), vec!["h", "i"]);
        assert_eq!(spans[0].style, cursor_style());
    }

    #[test]
    fn test_cursor_past_the_end_gets_a_space_cell() {
        let spans = cursor_spans("hi", 2, value_style(), cursor_style());
        assert_eq!(contents(&spans), vec!["hi", " "]);
        assert_eq!(spans[1].style, cursor_style());
    }

    #[test]
    fn test_empty_text() {
        let spans = cursor_spans("", 0, value_style(), cursor_style());
        assert_eq!(contents(&spans), vec![" "]);
        assert_eq!(spans[0].style, cursor_style());
    }

    #[test]
    fn test_multibyte_mask_chars_split_on_char_boundaries() {
        // Password masks are U+2022, three bytes each.
        let masked = "\u{2022}".repeat(4);
        let spans = cursor_spans(&masked, 2, value_style(), cursor_style());
        assert_eq!(
            contents(&spans),
            vec!["\u{2022}\u{2022}", "\u{2022}", "\u{2022}"]
        );
        assert_eq!(spans[1].style, cursor_style());
    }
}
