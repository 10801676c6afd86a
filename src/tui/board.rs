//! Kanban board view
//!
//! Four status columns with keyboard-driven card movement. A grabbed card
//! is aimed with the motion keys and dropped with Enter; the board updates
//! immediately and syncs the status change in the background. If the sync
//! fails, the board reloads from the server so local state never drifts.

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::*;
use tokio::sync::mpsc;

use super::app::Action;
use super::components::HelpOverlay;
use super::dialogs::{ConfirmDialog, DialogResult, FormSubmit, TaskFormDialog};
use super::styles::Theme;
use crate::api::{ApiClient, ApiError};
use crate::board::{BoardState, DropOutcome, DropTarget, StatusChange};
use crate::task::{Status, Task, TaskPayload, User};

enum BoardMsg {
    TasksLoaded(Result<Vec<Task>, ApiError>),
    UsersLoaded(Result<Vec<User>, ApiError>),
    StatusSynced {
        task_id: i64,
        result: Result<Task, ApiError>,
    },
    TaskSaved(Result<Task, ApiError>),
    TaskDeleted {
        task_id: i64,
        result: Result<(), ApiError>,
    },
}

/// A card in flight: where it came from and where it currently points.
#[derive(Clone, Copy)]
struct Drag {
    task_id: i64,
    from: DropTarget,
    to: DropTarget,
}

struct StatusMessage {
    text: String,
    is_error: bool,
}

pub struct BoardView {
    client: ApiClient,
    user: User,
    board: BoardState,
    users: Vec<User>,
    selected_column: usize,
    selected_row: usize,
    drag: Option<Drag>,
    form: Option<TaskFormDialog>,
    confirm: Option<ConfirmDialog>,
    show_help: bool,
    confirm_delete: bool,
    loading: bool,
    status_message: Option<StatusMessage>,
    tx: mpsc::UnboundedSender<BoardMsg>,
    rx: mpsc::UnboundedReceiver<BoardMsg>,
}

impl BoardView {
    pub fn new(client: ApiClient, user: User, confirm_delete: bool) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            client,
            user,
            board: BoardState::new(),
            users: Vec::new(),
            selected_column: 0,
            selected_row: 0,
            drag: None,
            form: None,
            confirm: None,
            show_help: false,
            confirm_delete,
            loading: false,
            status_message: None,
            tx,
            rx,
        }
    }

    pub fn request_reload(&mut self) {
        self.loading = true;
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(BoardMsg::TasksLoaded(client.list_tasks().await));
        });
    }

    pub fn request_users(&self) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(BoardMsg::UsersLoaded(client.list_users().await));
        });
    }

    fn spawn_status_sync(&self, change: StatusChange) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.update_task_status(change.task_id, change.to).await;
            let _ = tx.send(BoardMsg::StatusSynced {
                task_id: change.task_id,
                result,
            });
        });
    }

    fn spawn_save(&self, task_id: Option<i64>, payload: TaskPayload) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = match task_id {
                Some(id) => client.update_task(id, &payload).await,
                None => client.create_task(&payload).await,
            };
            let _ = tx.send(BoardMsg::TaskSaved(result));
        });
    }

    fn spawn_delete(&self, task_id: i64) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.delete_task(task_id).await;
            let _ = tx.send(BoardMsg::TaskDeleted { task_id, result });
        });
    }

    fn current_status(&self) -> Status {
        Status::ALL[self.selected_column]
    }

    fn selected_task(&self) -> Option<&Task> {
        self.board.task_at(self.current_status(), self.selected_row)
    }

    fn clamp_selection(&mut self) {
        let len = self.board.column_len(self.current_status());
        self.selected_row = self.selected_row.min(len.saturating_sub(1));
    }

    fn set_error_message(&mut self, text: String) {
        self.status_message = Some(StatusMessage {
            text,
            is_error: true,
        });
    }

    fn set_info_message(&mut self, text: String) {
        self.status_message = Some(StatusMessage {
            text,
            is_error: false,
        });
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        // A status line lives until the next keypress.
        self.status_message = None;

        if self.show_help {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.show_help = false;
            }
            return None;
        }

        if let Some(confirm) = &mut self.confirm {
            match confirm.handle_key(key) {
                DialogResult::Continue => {}
                DialogResult::Cancel => self.confirm = None,
                DialogResult::Submit(()) => {
                    let task_id = confirm.task_id();
                    self.confirm = None;
                    self.spawn_delete(task_id);
                }
            }
            return None;
        }

        if let Some(form) = &mut self.form {
            match form.handle_key(key) {
                DialogResult::Continue => {}
                DialogResult::Cancel => self.form = None,
                DialogResult::Submit(FormSubmit::Save(payload)) => {
                    let task_id = form.task_id();
                    self.spawn_save(task_id, payload);
                }
                DialogResult::Submit(FormSubmit::Delete(task_id)) => {
                    self.form = None;
                    self.request_delete(task_id);
                }
            }
            return None;
        }

        if self.drag.is_some() {
            self.handle_drag_key(key);
            return None;
        }

        self.handle_board_key(key)
    }

    fn handle_board_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('q') => return Some(Action::Quit),
            KeyCode::Char('o') => return Some(Action::Logout { notice: None }),
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Left | KeyCode::Char('h') => self.move_column(-1),
            KeyCode::Right | KeyCode::Char('l') => self.move_column(1),
            KeyCode::Tab => {
                self.selected_column = (self.selected_column + 1) % Status::ALL.len();
                self.clamp_selection();
            }
            KeyCode::BackTab => {
                self.selected_column =
                    (self.selected_column + Status::ALL.len() - 1) % Status::ALL.len();
                self.clamp_selection();
            }
            KeyCode::Down | KeyCode::Char('j') => self.move_row(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_row(-1),
            KeyCode::Char('g') => self.selected_row = 0,
            KeyCode::Char('G') => {
                let len = self.board.column_len(self.current_status());
                self.selected_row = len.saturating_sub(1);
            }
            KeyCode::Char(' ') | KeyCode::Char('m') => self.pick_up_card(),
            KeyCode::Enter | KeyCode::Char('e') => self.open_edit_form(),
            KeyCode::Char('n') => {
                self.form = Some(TaskFormDialog::new_task(self.users.clone()));
            }
            KeyCode::Char('d') => {
                if let Some(task) = self.selected_task() {
                    let task_id = task.id;
                    self.request_delete(task_id);
                }
            }
            KeyCode::Char('r') | KeyCode::F(5) => {
                self.request_reload();
                self.request_users();
            }
            _ => {}
        }
        None
    }

    fn handle_drag_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.drag = None,
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('m') => self.drop_card(),
            KeyCode::Left | KeyCode::Char('h') => self.aim_drag(-1, 0),
            KeyCode::Right | KeyCode::Char('l') => self.aim_drag(1, 0),
            KeyCode::Down | KeyCode::Char('j') => self.aim_drag(0, 1),
            KeyCode::Up | KeyCode::Char('k') => self.aim_drag(0, -1),
            _ => {}
        }
    }

    fn move_column(&mut self, delta: i32) {
        let max = Status::ALL.len() as i32 - 1;
        self.selected_column = (self.selected_column as i32 + delta).clamp(0, max) as usize;
        self.clamp_selection();
    }

    fn move_row(&mut self, delta: i32) {
        let len = self.board.column_len(self.current_status());
        if len == 0 {
            self.selected_row = 0;
            return;
        }
        let max = len as i32 - 1;
        self.selected_row = (self.selected_row as i32 + delta).clamp(0, max) as usize;
    }

    fn pick_up_card(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let task_id = task.id;
        if self.board.is_pending(task_id) {
            self.set_error_message("Card is still syncing, try again in a moment".to_string());
            return;
        }
        let from = DropTarget {
            column: self.current_status(),
            index: self.selected_row,
        };
        self.drag = Some(Drag {
            task_id,
            from,
            to: from,
        });
    }

    fn aim_drag(&mut self, d_col: i32, d_row: i32) {
        let Some(drag) = self.drag else {
            return;
        };
        let mut to = drag.to;

        if d_col != 0 {
            let max = Status::ALL.len() as i32 - 1;
            let col = (to.column.index() as i32 + d_col).clamp(0, max) as usize;
            to.column = Status::ALL[col];
        }

        // Within the source column the card itself still holds a slot, so
        // the last position is one less than in a foreign column.
        let len = self.board.column_len(to.column);
        let max_index = if to.column == drag.from.column {
            len.saturating_sub(1)
        } else {
            len
        };

        if d_row > 0 {
            to.index = (to.index + 1).min(max_index);
        } else if d_row < 0 {
            to.index = to.index.saturating_sub(1);
        } else {
            to.index = to.index.min(max_index);
        }

        if let Some(drag) = &mut self.drag {
            drag.to = to;
        }
    }

    fn drop_card(&mut self) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        match self.board.apply_drop(drag.task_id, drag.from, Some(drag.to)) {
            DropOutcome::NoOp => {}
            DropOutcome::Moved(change) => {
                // Selection follows the card to its new home.
                self.selected_column = change.to.index();
                let len = self.board.column_len(change.to);
                self.selected_row = drag.to.index.min(len.saturating_sub(1));
                self.spawn_status_sync(change);
            }
        }
    }

    fn open_edit_form(&mut self) {
        let Some(task) = self.selected_task().cloned() else {
            return;
        };
        self.form = Some(TaskFormDialog::edit_task(&task, self.users.clone()));
    }

    fn request_delete(&mut self, task_id: i64) {
        if self.confirm_delete {
            let title = self
                .board
                .get(task_id)
                .map(|t| t.title.clone())
                .unwrap_or_default();
            self.confirm = Some(ConfirmDialog::delete_task(task_id, &title));
        } else {
            self.spawn_delete(task_id);
        }
    }

    /// Drain results from finished requests. Returns whether anything
    /// changed and, when the session has died, the logout action.
    pub fn poll_async(&mut self) -> (bool, Option<Action>) {
        let mut changed = false;
        let mut action = None;

        while let Ok(msg) = self.rx.try_recv() {
            changed = true;
            if let Some(a) = self.handle_msg(msg) {
                action = Some(a);
            }
        }

        (changed, action)
    }

    fn handle_msg(&mut self, msg: BoardMsg) -> Option<Action> {
        match msg {
            BoardMsg::TasksLoaded(Ok(tasks)) => {
                self.loading = false;
                self.board.replace_all(tasks);
                self.clamp_selection();
                None
            }
            BoardMsg::TasksLoaded(Err(e)) => {
                self.loading = false;
                self.auth_or_error(e, "Failed to load tasks")
            }
            BoardMsg::UsersLoaded(Ok(users)) => {
                self.users = users;
                None
            }
            BoardMsg::UsersLoaded(Err(e)) => self.auth_or_error(e, "Failed to load users"),
            BoardMsg::StatusSynced {
                result: Ok(task), ..
            } => {
                self.board.confirm(task);
                None
            }
            BoardMsg::StatusSynced {
                task_id,
                result: Err(e),
            } => {
                if e.is_unauthorized() {
                    return Some(session_expired());
                }
                // Optimistic move did not stick. Forget the pending record
                // and pull the server's view of the whole board.
                self.board.resolve_failure(task_id);
                self.set_error_message(format!("Move failed: {e}. Reloading board."));
                self.request_reload();
                None
            }
            BoardMsg::TaskSaved(Ok(_)) => {
                self.form = None;
                self.request_reload();
                None
            }
            BoardMsg::TaskSaved(Err(e)) => {
                if e.is_unauthorized() {
                    return Some(session_expired());
                }
                match &mut self.form {
                    Some(form) => form.set_error(e.to_string()),
                    None => self.set_error_message(format!("Save failed: {e}")),
                }
                None
            }
            BoardMsg::TaskDeleted { result: Ok(()), .. } => {
                self.set_info_message("Task deleted".to_string());
                self.request_reload();
                None
            }
            BoardMsg::TaskDeleted {
                result: Err(e), ..
            } => self.auth_or_error(e, "Delete failed"),
        }
    }

    fn auth_or_error(&mut self, error: ApiError, what: &str) -> Option<Action> {
        if error.is_unauthorized() {
            Some(session_expired())
        } else {
            self.set_error_message(format!("{what}: {error}"));
            None
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        frame.render_widget(
            Block::default().style(Style::default().bg(theme.background)),
            area,
        );

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);

        self.render_board(frame, chunks[0], theme);
        self.render_status_bar(frame, chunks[1], theme);

        if let Some(form) = &self.form {
            form.render(frame, area, theme);
        }
        if let Some(confirm) = &self.confirm {
            confirm.render(frame, area, theme);
        }
        if self.show_help {
            HelpOverlay::render(frame, area, theme);
        }
    }

    fn render_board(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border))
            .title(format!(" Task Board [{}] ", self.user.full_name))
            .title_style(Style::default().fg(theme.title).bold());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(25); 4])
            .split(inner);

        for (idx, status) in Status::ALL.iter().enumerate() {
            self.render_column(frame, columns[idx], *status, idx, theme);
        }
    }

    fn render_column(
        &self,
        frame: &mut Frame,
        area: Rect,
        status: Status,
        col_idx: usize,
        theme: &Theme,
    ) {
        let tasks = self.board.column(status);
        let ghost_at = self
            .drag
            .as_ref()
            .filter(|d| d.to.column == status)
            .map(|d| d.to.index);
        let is_focused = self.drag.is_none() && col_idx == self.selected_column;

        let border_style = if ghost_at.is_some() {
            Style::default().fg(theme.column_border)
        } else if is_focused {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.border)
        };
        let title_style = if is_focused || ghost_at.is_some() {
            Style::default().fg(theme.title).bold()
        } else {
            Style::default().fg(theme.dimmed)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!(" {} ({}) ", status.title(), tasks.len()))
            .title_style(title_style);

        let mut items: Vec<ListItem> = Vec::with_capacity(tasks.len() + 1);
        for (idx, task) in tasks.iter().enumerate() {
            if ghost_at == Some(idx) {
                items.push(Self::ghost_item(theme));
            }
            let is_dragged = self.drag.map(|d| d.task_id == task.id).unwrap_or(false);
            items.push(self.card_item(task, is_dragged, theme));
        }
        if let Some(ghost) = ghost_at {
            if ghost >= tasks.len() {
                items.push(Self::ghost_item(theme));
            }
        }

        let mut state = ListState::default();
        if let Some(ghost) = ghost_at {
            state.select(Some(ghost.min(items.len().saturating_sub(1))));
        } else if is_focused && !tasks.is_empty() {
            state.select(Some(self.selected_row.min(tasks.len() - 1)));
        }

        let highlight = if ghost_at.is_some() {
            Style::default().bg(theme.drag_selection)
        } else {
            Style::default().bg(theme.selection)
        };

        let list = List::new(items).block(block).highlight_style(highlight);
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn card_item(&self, task: &Task, is_dragged: bool, theme: &Theme) -> ListItem<'static> {
        let pending = self.board.is_pending(task.id);
        let title_style = if is_dragged {
            Style::default().fg(theme.dimmed)
        } else {
            Style::default().fg(theme.text)
        };

        let mut title_spans = vec![
            Span::styled("▎", Style::default().fg(theme.priority(task.priority))),
            Span::styled(task.title.clone(), title_style),
        ];
        if pending {
            title_spans.push(Span::styled(" ⟳", Style::default().fg(theme.pending)));
        }

        let mut meta_spans = vec![
            Span::raw(" "),
            Span::styled(
                task.priority.label().to_lowercase(),
                Style::default().fg(theme.priority(task.priority)),
            ),
        ];
        if let Some(due) = task.due_date {
            let overdue = due < Local::now().date_naive() && task.status != Status::Done;
            let style = if overdue {
                Style::default().fg(theme.overdue).bold()
            } else {
                Style::default().fg(theme.dimmed)
            };
            meta_spans.push(Span::raw("  "));
            meta_spans.push(Span::styled(format!("Due: {}", due.format("%Y-%m-%d")), style));
        }
        if let Some(name) = task.assignee_name() {
            meta_spans.push(Span::raw("  "));
            meta_spans.push(Span::styled(
                format!("@{name}"),
                Style::default().fg(theme.hint),
            ));
        }

        ListItem::new(Text::from(vec![
            Line::from(title_spans),
            Line::from(meta_spans),
            Line::from(""),
        ]))
    }

    fn ghost_item(theme: &Theme) -> ListItem<'static> {
        ListItem::new(Text::from(vec![
            Line::from(Span::styled(
                "▸ move here",
                Style::default().fg(theme.pending).bold(),
            )),
            Line::from(""),
        ]))
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let line = if let Some(msg) = &self.status_message {
            let style = if msg.is_error {
                Style::default().fg(theme.error)
            } else {
                Style::default().fg(theme.success)
            };
            Line::from(Span::styled(format!(" {}", msg.text), style))
        } else if self.loading {
            Line::from(Span::styled(
                " Loading tasks...",
                Style::default().fg(theme.pending),
            ))
        } else if self.drag.is_some() {
            hint_line(
                &[("h/j/k/l", "aim"), ("Enter", "drop"), ("Esc", "cancel")],
                theme,
            )
        } else {
            hint_line(
                &[
                    ("j/k", "move"),
                    ("Space", "grab"),
                    ("n", "new"),
                    ("Enter", "edit"),
                    ("d", "delete"),
                    ("r", "reload"),
                    ("o", "logout"),
                    ("?", "help"),
                    ("q", "quit"),
                ],
                theme,
            )
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}

fn session_expired() -> Action {
    Action::Logout {
        notice: Some("Session expired, sign in again".to_string()),
    }
}

fn hint_line(pairs: &[(&str, &str)], theme: &Theme) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for (key, desc) in pairs {
        spans.push(Span::styled(
            key.to_string(),
            Style::default().fg(theme.hint),
        ));
        spans.push(Span::styled(
            format!(" {desc}  "),
            Style::default().fg(theme.dimmed),
        ));
    }
    Line::from(spans)
}
