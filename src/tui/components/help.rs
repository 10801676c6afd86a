//! Keyboard shortcut overlay
//!
//! Rendered over the board when `?` is pressed. The bindings are laid out in
//! two columns so the overlay stays short enough for small terminals.

use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::tui::dialogs::centered_rect;
use crate::tui::styles::Theme;

const DIALOG_WIDTH: u16 = 64;
const DIALOG_HEIGHT: u16 = 17;

struct Section {
    title: &'static str,
    entries: &'static [(&'static str, &'static str)],
}

const LEFT: &[Section] = &[
    Section {
        title: "Navigation",
        entries: &[
            ("h/←", "Focus column left"),
            ("l/→", "Focus column right"),
            ("Tab/S-Tab", "Cycle columns"),
            ("j/↓", "Move down"),
            ("k/↑", "Move up"),
            ("g/G", "Jump to top/bottom"),
        ],
    },
    Section {
        title: "Moving cards",
        entries: &[
            ("Space/m", "Pick up card"),
            ("h/j/k/l", "Aim the move"),
            ("Enter", "Drop card"),
            ("Esc", "Cancel move"),
        ],
    },
];

const RIGHT: &[Section] = &[
    Section {
        title: "Tasks",
        entries: &[
            ("Enter/e", "Edit task"),
            ("n", "New task"),
            ("d", "Delete task"),
        ],
    },
    Section {
        title: "Other",
        entries: &[
            ("r", "Reload board"),
            ("o", "Log out"),
            ("?", "Toggle help"),
            ("q", "Quit"),
        ],
    },
];

fn column_lines(sections: &[Section], theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for section in sections {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            section.title,
            Style::default().fg(theme.accent).bold(),
        )));
        for (key, action) in section.entries {
            lines.push(Line::from(vec![
                Span::styled(format!("  {key:9}"), Style::default().fg(theme.hint)),
                Span::styled(*action, Style::default().fg(theme.text)),
            ]));
        }
    }
    lines
}

pub struct HelpOverlay;

impl HelpOverlay {
    pub fn render(frame: &mut Frame, area: Rect, theme: &Theme) {
        let dialog_area = centered_rect(area, DIALOG_WIDTH, DIALOG_HEIGHT);

        frame.render_widget(Clear, dialog_area);

        let block = Block::default()
            .style(Style::default().bg(theme.background))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border))
            .title(" Keyboard Shortcuts ")
            .title_style(Style::default().fg(theme.title).bold());

        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(inner);

        frame.render_widget(Paragraph::new(column_lines(LEFT, theme)), columns[0]);
        frame.render_widget(Paragraph::new(column_lines(RIGHT, theme)), columns[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One row per header and entry, plus a blank row between sections.
    fn rows(sections: &[Section]) -> usize {
        let entries: usize = sections.iter().map(|s| s.entries.len()).sum();
        entries + sections.len() + sections.len().saturating_sub(1)
    }

    #[test]
    fn test_both_columns_fit_the_dialog_height() {
        let inner_height = (DIALOG_HEIGHT - 2) as usize;
        assert!(rows(LEFT) <= inner_height, "left column overflows");
        assert!(rows(RIGHT) <= inner_height, "right column overflows");
    }

    #[test]
    fn test_entries_fit_the_column_width() {
        let column_width = ((DIALOG_WIDTH - 2) / 2) as usize;
        for section in LEFT.iter().chain(RIGHT) {
            assert!(section.title.chars().count() <= column_width);
            for (key, action) in section.entries {
                // Key cell is 2 spaces of indent plus a 9-char padded key.
                let key_cell = 2 + key.chars().count().max(9);
                assert!(
                    key_cell + action.chars().count() <= column_width,
                    "'{key}: {action}' is too wide for the help column"
                );
            }
        }
    }
}
