//! Login and registration screen
//!
//! The board is gated behind this view. Requests run on spawned tasks and
//! report back over a channel, so the UI keeps drawing while the server
//! answers.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::*;
use tokio::sync::mpsc;
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

use super::app::Action;
use super::components::{render_secret_field, render_text_field};
use super::dialogs::centered_rect;
use super::styles::Theme;
use crate::api::{ApiClient, ApiError, LoginResponse, RegisterPayload};
use crate::auth::Session;

enum AuthMsg {
    LoggedIn(Result<LoginResponse, ApiError>),
    Registered(Result<(), ApiError>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Login,
    Register,
}

pub struct LoginView {
    client: ApiClient,
    mode: Mode,
    username: Input,
    email: Input,
    full_name: Input,
    password: Input,
    focused_field: usize,
    busy: bool,
    error: Option<String>,
    info: Option<String>,
    tx: mpsc::UnboundedSender<AuthMsg>,
    rx: mpsc::UnboundedReceiver<AuthMsg>,
}

impl LoginView {
    pub fn new(client: ApiClient, notice: Option<String>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            client,
            mode: Mode::Login,
            username: Input::default(),
            email: Input::default(),
            full_name: Input::default(),
            password: Input::default(),
            focused_field: 0,
            busy: false,
            error: None,
            info: notice,
            tx,
            rx,
        }
    }

    fn field_count(&self) -> usize {
        match self.mode {
            Mode::Login => 2,
            Mode::Register => 4,
        }
    }

    fn current_input_mut(&mut self) -> &mut Input {
        match (self.mode, self.focused_field) {
            (Mode::Login, 0) | (Mode::Register, 0) => &mut self.username,
            (Mode::Login, _) => &mut self.password,
            (Mode::Register, 1) => &mut self.email,
            (Mode::Register, 2) => &mut self.full_name,
            (Mode::Register, _) => &mut self.password,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if self.busy {
            return None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('r') {
            self.mode = match self.mode {
                Mode::Login => Mode::Register,
                Mode::Register => Mode::Login,
            };
            self.focused_field = 0;
            self.error = None;
            self.info = None;
            return None;
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.focused_field = (self.focused_field + 1) % self.field_count();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focused_field = if self.focused_field == 0 {
                    self.field_count() - 1
                } else {
                    self.focused_field - 1
                };
            }
            KeyCode::Enter => match self.mode {
                Mode::Login => self.submit_login(),
                Mode::Register => self.submit_register(),
            },
            _ => {
                self.current_input_mut()
                    .handle_event(&crossterm::event::Event::Key(key));
                self.error = None;
            }
        }
        None
    }

    fn submit_login(&mut self) {
        let username = self.username.value().trim().to_string();
        let password = self.password.value().to_string();
        if username.is_empty() || password.is_empty() {
            self.error = Some("Username and password are required".to_string());
            return;
        }

        self.busy = true;
        self.error = None;
        self.info = None;
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.login(&username, &password).await;
            let _ = tx.send(AuthMsg::LoggedIn(result));
        });
    }

    fn submit_register(&mut self) {
        let payload = RegisterPayload {
            username: self.username.value().trim().to_string(),
            email: self.email.value().trim().to_string(),
            full_name: self.full_name.value().trim().to_string(),
            password: self.password.value().to_string(),
        };
        if payload.username.is_empty()
            || payload.email.is_empty()
            || payload.full_name.is_empty()
            || payload.password.is_empty()
        {
            self.error = Some("All fields are required".to_string());
            return;
        }

        self.busy = true;
        self.error = None;
        self.info = None;
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.register(&payload).await;
            let _ = tx.send(AuthMsg::Registered(result));
        });
    }

    /// Drain results from finished auth requests. Returns whether anything
    /// changed and, on a successful login, the action for the app.
    pub fn poll_async(&mut self) -> (bool, Option<Action>) {
        let mut changed = false;
        let mut action = None;

        while let Ok(msg) = self.rx.try_recv() {
            changed = true;
            match msg {
                AuthMsg::LoggedIn(Ok(response)) => {
                    action = Some(Action::LoggedIn(Session::from(response)));
                }
                AuthMsg::LoggedIn(Err(e)) => {
                    self.busy = false;
                    self.error = Some(auth_error_text(&e));
                }
                AuthMsg::Registered(Ok(())) => {
                    // The server does not log a fresh account in; it signs in
                    // with its new credentials like any other user.
                    self.busy = false;
                    self.mode = Mode::Login;
                    self.password = Input::default();
                    self.focused_field = 0;
                    self.error = None;
                    self.info = Some("Account created, sign in to continue".to_string());
                }
                AuthMsg::Registered(Err(e)) => {
                    self.busy = false;
                    self.error = Some(auth_error_text(&e));
                }
            }
        }

        (changed, action)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        frame.render_widget(
            Block::default().style(Style::default().bg(theme.background)),
            area,
        );

        let height = match self.mode {
            Mode::Login => 10,
            Mode::Register => 14,
        };
        let box_area = centered_rect(area, 56, height);

        let title = match self.mode {
            Mode::Login => " Taskdeck: Sign In ",
            Mode::Register => " Taskdeck: Create Account ",
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .title(title)
            .title_style(Style::default().fg(theme.title).bold());

        let inner = block.inner(box_area);
        frame.render_widget(block, box_area);

        let mut constraints = vec![Constraint::Length(2); self.field_count()];
        constraints.push(Constraint::Min(1)); // message
        constraints.push(Constraint::Length(1)); // hints
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints(constraints)
            .split(inner);

        match self.mode {
            Mode::Login => {
                render_text_field(
                    frame,
                    chunks[0],
                    "Username:",
                    &self.username,
                    self.focused_field == 0,
                    None,
                    theme,
                );
                render_secret_field(
                    frame,
                    chunks[1],
                    "Password:",
                    &self.password,
                    self.focused_field == 1,
                    theme,
                );
            }
            Mode::Register => {
                render_text_field(
                    frame,
                    chunks[0],
                    "Username: ",
                    &self.username,
                    self.focused_field == 0,
                    None,
                    theme,
                );
                render_text_field(
                    frame,
                    chunks[1],
                    "Email:    ",
                    &self.email,
                    self.focused_field == 1,
                    None,
                    theme,
                );
                render_text_field(
                    frame,
                    chunks[2],
                    "Full name:",
                    &self.full_name,
                    self.focused_field == 2,
                    None,
                    theme,
                );
                render_secret_field(
                    frame,
                    chunks[3],
                    "Password: ",
                    &self.password,
                    self.focused_field == 3,
                    theme,
                );
            }
        }

        let message_chunk = chunks[chunks.len() - 2];
        if self.busy {
            let text = match self.mode {
                Mode::Login => "Signing in...",
                Mode::Register => "Creating account...",
            };
            frame.render_widget(
                Paragraph::new(Span::styled(text, Style::default().fg(theme.pending))),
                message_chunk,
            );
        } else if let Some(error) = &self.error {
            let line = Line::from(vec![
                Span::styled("✗ ", Style::default().fg(theme.error).bold()),
                Span::styled(error.as_str(), Style::default().fg(theme.error)),
            ]);
            frame.render_widget(Paragraph::new(line).wrap(Wrap { trim: true }), message_chunk);
        } else if let Some(info) = &self.info {
            let line = Line::from(vec![
                Span::styled("✓ ", Style::default().fg(theme.success).bold()),
                Span::styled(info.as_str(), Style::default().fg(theme.success)),
            ]);
            frame.render_widget(Paragraph::new(line).wrap(Wrap { trim: true }), message_chunk);
        }

        let toggle_hint = match self.mode {
            Mode::Login => " register  ",
            Mode::Register => " sign in  ",
        };
        let hint = Line::from(vec![
            Span::styled("Enter", Style::default().fg(theme.hint)),
            Span::raw(" submit  "),
            Span::styled("Tab", Style::default().fg(theme.hint)),
            Span::raw(" next  "),
            Span::styled("Ctrl+R", Style::default().fg(theme.hint)),
            Span::raw(toggle_hint),
            Span::styled("Ctrl+C", Style::default().fg(theme.hint)),
            Span::raw(" quit"),
        ]);
        frame.render_widget(Paragraph::new(hint), chunks[chunks.len() - 1]);
    }
}

fn auth_error_text(error: &ApiError) -> String {
    if error.is_unreachable() {
        "Cannot reach the server. Is it running?".to_string()
    } else {
        error.to_string()
    }
}
