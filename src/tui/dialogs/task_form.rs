//! Task create/edit dialog

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::*;
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;
use ratatui_textarea::TextArea;

use super::DialogResult;
use crate::task::{Priority, Status, Task, TaskPayload, User};
use crate::tui::components::render_text_field;
use crate::tui::styles::Theme;

const FIELD_TITLE: usize = 0;
const FIELD_DESCRIPTION: usize = 1;
const FIELD_STATUS: usize = 2;
const FIELD_PRIORITY: usize = 3;
const FIELD_ASSIGNEE: usize = 4;
const FIELD_DUE: usize = 5;
const FIELD_COUNT: usize = 6;

/// What the form hands back to the board on submit.
pub enum FormSubmit {
    Save(TaskPayload),
    Delete(i64),
}

pub struct TaskFormDialog {
    task_id: Option<i64>,
    title: Input,
    description: TextArea<'static>,
    status_index: usize,
    priority_index: usize,
    /// 0 = unassigned, otherwise `users[assignee_index - 1]`.
    assignee_index: usize,
    due_date: Input,
    users: Vec<User>,
    focused_field: usize,
    error_message: Option<String>,
    submitting: bool,
}

impl TaskFormDialog {
    pub fn new_task(users: Vec<User>) -> Self {
        let mut description = TextArea::default();
        description.set_cursor_line_style(Style::default());

        Self {
            task_id: None,
            title: Input::default(),
            description,
            status_index: 0,  // backlog
            priority_index: 1, // medium
            assignee_index: 0,
            due_date: Input::default(),
            users,
            focused_field: FIELD_TITLE,
            error_message: None,
            submitting: false,
        }
    }

    pub fn edit_task(task: &Task, users: Vec<User>) -> Self {
        let text = task.description.clone().unwrap_or_default();
        let lines: Vec<String> = if text.is_empty() {
            vec![String::new()]
        } else {
            text.lines().map(|l| l.to_string()).collect()
        };
        let mut description = TextArea::new(lines);
        description.set_cursor_line_style(Style::default());

        let assignee_index = task
            .assigned_to
            .as_ref()
            .and_then(|assignee| users.iter().position(|u| u.id == assignee.id))
            .map(|pos| pos + 1)
            .unwrap_or(0);
        let priority_index = Priority::ALL
            .iter()
            .position(|p| *p == task.priority)
            .unwrap_or(1);
        let due_date = task
            .due_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();

        Self {
            task_id: Some(task.id),
            title: Input::new(task.title.clone()),
            description,
            status_index: task.status.index(),
            priority_index,
            assignee_index,
            due_date: Input::new(due_date),
            users,
            focused_field: FIELD_TITLE,
            error_message: None,
            submitting: false,
        }
    }

    pub fn task_id(&self) -> Option<i64> {
        self.task_id
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// A failed save lands here: the form reopens for input with the server
    /// message shown, instead of discarding what the user typed.
    pub fn set_error(&mut self, error: String) {
        self.error_message = Some(error);
        self.submitting = false;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DialogResult<FormSubmit> {
        // All input is held while a save is in flight; the board resolves
        // the form once the server answers.
        if self.submitting {
            return DialogResult::Continue;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('s') => return self.submit(),
                KeyCode::Char('d') => {
                    if let Some(id) = self.task_id {
                        return DialogResult::Submit(FormSubmit::Delete(id));
                    }
                    return DialogResult::Continue;
                }
                _ => {}
            }
        }

        let on_choice = matches!(
            self.focused_field,
            FIELD_STATUS | FIELD_PRIORITY | FIELD_ASSIGNEE
        );

        match key.code {
            KeyCode::Esc => {
                self.error_message = None;
                DialogResult::Cancel
            }
            KeyCode::Tab => {
                self.focused_field = (self.focused_field + 1) % FIELD_COUNT;
                DialogResult::Continue
            }
            KeyCode::BackTab => {
                self.focused_field = if self.focused_field == 0 {
                    FIELD_COUNT - 1
                } else {
                    self.focused_field - 1
                };
                DialogResult::Continue
            }
            // Enter inserts a newline in the description and submits anywhere
            // else; Ctrl+S submits from the description too.
            KeyCode::Enter if self.focused_field != FIELD_DESCRIPTION => self.submit(),
            KeyCode::Left if on_choice => {
                self.cycle_choice(false);
                DialogResult::Continue
            }
            KeyCode::Right | KeyCode::Char(' ') if on_choice => {
                self.cycle_choice(true);
                DialogResult::Continue
            }
            _ => {
                match self.focused_field {
                    FIELD_TITLE => {
                        self.title.handle_event(&crossterm::event::Event::Key(key));
                        self.error_message = None;
                    }
                    FIELD_DESCRIPTION => {
                        self.description.input(key);
                        self.error_message = None;
                    }
                    FIELD_DUE => {
                        self.due_date
                            .handle_event(&crossterm::event::Event::Key(key));
                        self.error_message = None;
                    }
                    _ => {}
                }
                DialogResult::Continue
            }
        }
    }

    fn cycle_choice(&mut self, forward: bool) {
        let len = match self.focused_field {
            FIELD_STATUS => Status::ALL.len(),
            FIELD_PRIORITY => Priority::ALL.len(),
            FIELD_ASSIGNEE => self.users.len() + 1,
            _ => return,
        };
        let index = match self.focused_field {
            FIELD_STATUS => &mut self.status_index,
            FIELD_PRIORITY => &mut self.priority_index,
            FIELD_ASSIGNEE => &mut self.assignee_index,
            _ => return,
        };
        *index = if forward {
            (*index + 1) % len
        } else {
            (*index + len - 1) % len
        };
    }

    fn submit(&mut self) -> DialogResult<FormSubmit> {
        let title = self.title.value().trim().to_string();
        if title.is_empty() {
            self.error_message = Some("Title is required".to_string());
            return DialogResult::Continue;
        }

        let due_value = self.due_date.value().trim();
        let due_date = if due_value.is_empty() {
            None
        } else {
            match NaiveDate::parse_from_str(due_value, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    self.error_message = Some("Due date must be YYYY-MM-DD".to_string());
                    return DialogResult::Continue;
                }
            }
        };

        let assigned_to = if self.assignee_index == 0 {
            None
        } else {
            self.users.get(self.assignee_index - 1).map(|u| u.id)
        };

        self.error_message = None;
        self.submitting = true;
        DialogResult::Submit(FormSubmit::Save(TaskPayload {
            title,
            description: self.description.lines().join("\n"),
            status: Status::ALL[self.status_index],
            priority: Priority::ALL[self.priority_index],
            due_date,
            assigned_to,
        }))
    }

    fn assignee_name(&self) -> &str {
        if self.assignee_index == 0 {
            "Unassigned"
        } else {
            self.users
                .get(self.assignee_index - 1)
                .map(|u| u.full_name.as_str())
                .unwrap_or("Unassigned")
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let dialog_area = super::centered_rect(area, 70, 19);

        frame.render_widget(Clear, dialog_area);

        let title = if self.task_id.is_some() {
            " Edit Task "
        } else {
            " New Task "
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .title(title)
            .title_style(Style::default().fg(theme.title).bold());

        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(2), // title
                Constraint::Length(4), // description label + text
                Constraint::Length(2), // status
                Constraint::Length(2), // priority
                Constraint::Length(2), // assignee
                Constraint::Length(2), // due date
                Constraint::Min(1),    // error / hints
            ])
            .split(inner);

        render_text_field(
            frame,
            chunks[0],
            "Title:",
            &self.title,
            self.focused_field == FIELD_TITLE,
            None,
            theme,
        );

        self.render_description(frame, chunks[1], theme);

        self.render_choice_dots(
            frame,
            chunks[2],
            "Status:",
            &Status::ALL.map(|s| s.title()),
            self.status_index,
            self.focused_field == FIELD_STATUS,
            theme,
        );
        self.render_choice_dots(
            frame,
            chunks[3],
            "Priority:",
            &Priority::ALL.map(|p| p.label()),
            self.priority_index,
            self.focused_field == FIELD_PRIORITY,
            theme,
        );
        self.render_assignee(frame, chunks[4], theme);

        render_text_field(
            frame,
            chunks[5],
            "Due date:",
            &self.due_date,
            self.focused_field == FIELD_DUE,
            Some("(YYYY-MM-DD, empty for none)"),
            theme,
        );

        self.render_footer(frame, chunks[6], theme);
    }

    fn render_description(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let is_focused = self.focused_field == FIELD_DESCRIPTION;
        let label_style = if is_focused {
            Style::default().fg(theme.accent).underlined()
        } else {
            Style::default().fg(theme.text)
        };
        let label_area = Rect { height: 1, ..area };
        frame.render_widget(
            Paragraph::new(Span::styled("Description:", label_style)),
            label_area,
        );

        let text_area = Rect {
            y: area.y + 1,
            height: area.height.saturating_sub(1),
            ..area
        };
        let mut text_clone = self.description.clone();
        text_clone.set_style(Style::default().fg(theme.text));
        if is_focused {
            text_clone.set_cursor_style(Style::default().fg(theme.background).bg(theme.accent));
        } else {
            text_clone.set_cursor_style(Style::default());
        }
        frame.render_widget(&text_clone, text_area);
    }

    #[allow(clippy::too_many_arguments)]
    fn render_choice_dots(
        &self,
        frame: &mut Frame,
        area: Rect,
        label: &str,
        options: &[&str],
        selected: usize,
        is_focused: bool,
        theme: &Theme,
    ) {
        let label_style = if is_focused {
            Style::default().fg(theme.accent).underlined()
        } else {
            Style::default().fg(theme.text)
        };

        let mut spans = vec![Span::styled(label.to_string(), label_style), Span::raw(" ")];
        for (idx, name) in options.iter().enumerate() {
            let is_selected = idx == selected;
            let style = if is_selected {
                Style::default().fg(theme.accent).bold()
            } else {
                Style::default().fg(theme.dimmed)
            };
            if idx > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(if is_selected { "● " } else { "○ " }, style));
            spans.push(Span::styled(name.to_string(), style));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_assignee(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let is_focused = self.focused_field == FIELD_ASSIGNEE;
        let label_style = if is_focused {
            Style::default().fg(theme.accent).underlined()
        } else {
            Style::default().fg(theme.text)
        };
        let value_style = if is_focused {
            Style::default().fg(theme.accent).bold()
        } else {
            Style::default().fg(theme.text)
        };

        // The user list can be long, so this field shows one value at a
        // time instead of every option inline.
        let value = if is_focused {
            format!("◂ {} ▸", self.assignee_name())
        } else {
            self.assignee_name().to_string()
        };
        let line = Line::from(vec![
            Span::styled("Assignee:", label_style),
            Span::raw(" "),
            Span::styled(value, value_style),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let line = if self.submitting {
            Line::from(Span::styled(
                "Saving...",
                Style::default().fg(theme.pending),
            ))
        } else if let Some(error) = &self.error_message {
            Line::from(vec![
                Span::styled("✗ Error: ", Style::default().fg(theme.error).bold()),
                Span::styled(error, Style::default().fg(theme.error)),
            ])
        } else {
            let mut spans = vec![
                Span::styled("Tab", Style::default().fg(theme.hint)),
                Span::raw(" next  "),
                Span::styled("←/→", Style::default().fg(theme.hint)),
                Span::raw(" change  "),
                Span::styled("Enter", Style::default().fg(theme.hint)),
                Span::raw(" save  "),
            ];
            if self.task_id.is_some() {
                spans.push(Span::styled("Ctrl+D", Style::default().fg(theme.hint)));
                spans.push(Span::raw(" delete  "));
            }
            spans.push(Span::styled("Esc", Style::default().fg(theme.hint)));
            spans.push(Span::raw(" cancel"));
            Line::from(spans)
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}
