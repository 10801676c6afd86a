//! Delete confirmation dialog
//!
//! The only destructive action on the board goes through here. "Keep" is
//! preselected, so a reflexive Enter never deletes anything.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::DialogResult;
use crate::tui::styles::Theme;

pub struct ConfirmDialog {
    task_id: i64,
    task_title: String,
    /// Whether the Delete button is the highlighted choice.
    armed: bool,
}

impl ConfirmDialog {
    pub fn delete_task(task_id: i64, task_title: &str) -> Self {
        Self {
            task_id,
            task_title: task_title.to_string(),
            armed: false,
        }
    }

    pub fn task_id(&self) -> i64 {
        self.task_id
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DialogResult<()> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => DialogResult::Submit(()),
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => DialogResult::Cancel,
            KeyCode::Enter if self.armed => DialogResult::Submit(()),
            KeyCode::Enter => DialogResult::Cancel,
            KeyCode::Left | KeyCode::Char('h') => {
                self.armed = true;
                DialogResult::Continue
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.armed = false;
                DialogResult::Continue
            }
            KeyCode::Tab => {
                self.armed = !self.armed;
                DialogResult::Continue
            }
            _ => DialogResult::Continue,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let dialog_area = super::centered_rect(area, 50, 8);

        frame.render_widget(Clear, dialog_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.error))
            .title(" Delete Task ")
            .title_style(Style::default().fg(theme.error).bold());

        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([Constraint::Min(1), Constraint::Length(2)])
            .split(inner);

        let message = vec![
            Line::from(vec![
                Span::styled("Delete ", Style::default().fg(theme.text)),
                Span::styled(
                    format!("\"{}\"", self.task_title),
                    Style::default().fg(theme.title).bold(),
                ),
                Span::styled("?", Style::default().fg(theme.text)),
            ]),
            Line::from(Span::styled(
                "This cannot be undone.",
                Style::default().fg(theme.dimmed),
            )),
        ];
        frame.render_widget(
            Paragraph::new(message).wrap(Wrap { trim: true }),
            chunks[0],
        );

        let delete_style = if self.armed {
            Style::default().fg(theme.background).bg(theme.error).bold()
        } else {
            Style::default().fg(theme.dimmed)
        };
        let keep_style = if self.armed {
            Style::default().fg(theme.dimmed)
        } else {
            Style::default()
                .fg(theme.background)
                .bg(theme.success)
                .bold()
        };
        let buttons = Line::from(vec![
            Span::styled(" Delete ", delete_style),
            Span::raw("    "),
            Span::styled(" Keep ", keep_style),
        ]);
        frame.render_widget(
            Paragraph::new(buttons).alignment(Alignment::Center),
            chunks[1],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn dialog() -> ConfirmDialog {
        ConfirmDialog::delete_task(7, "Write docs")
    }

    #[test]
    fn test_starts_disarmed() {
        assert!(!dialog().armed, "Keep must be the default choice");
    }

    #[test]
    fn test_task_id_accessor() {
        assert_eq!(dialog().task_id(), 7);
    }

    #[test]
    fn test_y_confirms_immediately() {
        let mut d = dialog();
        assert!(matches!(
            d.handle_key(key(KeyCode::Char('y'))),
            DialogResult::Submit(())
        ));
        let mut d = dialog();
        assert!(matches!(
            d.handle_key(key(KeyCode::Char('Y'))),
            DialogResult::Submit(())
        ));
    }

    #[test]
    fn test_n_and_esc_cancel() {
        for code in [KeyCode::Char('n'), KeyCode::Char('N'), KeyCode::Esc] {
            let mut d = dialog();
            assert!(matches!(d.handle_key(key(code)), DialogResult::Cancel));
        }
    }

    #[test]
    fn test_enter_while_disarmed_cancels() {
        let mut d = dialog();
        assert!(matches!(
            d.handle_key(key(KeyCode::Enter)),
            DialogResult::Cancel
        ));
    }

    #[test]
    fn test_enter_while_armed_submits() {
        let mut d = dialog();
        d.handle_key(key(KeyCode::Left));
        assert!(matches!(
            d.handle_key(key(KeyCode::Enter)),
            DialogResult::Submit(())
        ));
    }

    #[test]
    fn test_arrows_arm_and_disarm() {
        let mut d = dialog();
        d.handle_key(key(KeyCode::Left));
        assert!(d.armed);
        d.handle_key(key(KeyCode::Right));
        assert!(!d.armed);

        d.handle_key(key(KeyCode::Char('h')));
        assert!(d.armed);
        d.handle_key(key(KeyCode::Char('l')));
        assert!(!d.armed);
    }

    #[test]
    fn test_tab_toggles_the_choice() {
        let mut d = dialog();
        d.handle_key(key(KeyCode::Tab));
        assert!(d.armed);
        d.handle_key(key(KeyCode::Tab));
        assert!(!d.armed);
    }

    #[test]
    fn test_unrelated_keys_change_nothing() {
        let mut d = dialog();
        assert!(matches!(
            d.handle_key(key(KeyCode::Char('x'))),
            DialogResult::Continue
        ));
        assert!(!d.armed);
    }
}
