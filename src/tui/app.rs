//! Main TUI application
//!
//! Owns the screen stack (login or board) and the event loop. Views hand
//! back an `Action` when something outside their own state has to change.

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use std::time::Duration;

use super::board::BoardView;
use super::login::LoginView;
use super::styles::Theme;
use crate::api::ApiClient;
use crate::auth::{Session, SessionStore};

#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    LoggedIn(Session),
    Logout { notice: Option<String> },
}

enum Screen {
    Login(LoginView),
    Board(BoardView),
}

pub struct App {
    screen: Screen,
    theme: Theme,
    client: ApiClient,
    store: SessionStore,
    confirm_delete: bool,
    should_quit: bool,
    needs_redraw: bool,
}

impl App {
    pub fn new(
        client: ApiClient,
        store: SessionStore,
        confirm_delete: bool,
        restored: Option<Session>,
    ) -> Self {
        let screen = match restored {
            Some(session) => Screen::Board(BoardView::new(
                client.with_token(&session.token),
                session.user,
                confirm_delete,
            )),
            None => Screen::Login(LoginView::new(client.clone(), None)),
        };

        Self {
            screen,
            theme: Theme::default(),
            client,
            store,
            confirm_delete,
            should_quit: false,
            needs_redraw: false,
        }
    }

    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    ) -> Result<()> {
        // Initial render
        terminal.clear()?;
        terminal.draw(|f| self.render(f))?;

        // A restored session skips the login screen, so the first load
        // starts here rather than in a LoggedIn action.
        if let Screen::Board(board) = &mut self.screen {
            board.request_reload();
            board.request_users();
        }

        loop {
            // Force full redraw when the screen changed
            if self.needs_redraw {
                terminal.clear()?;
                terminal.draw(|f| self.render(f))?;
                self.needs_redraw = false;
            }

            // Poll with short timeout for responsive input
            if event::poll(Duration::from_millis(50))? {
                match event::read()? {
                    Event::Key(key) => {
                        self.handle_key(key);

                        // Draw immediately after input for responsiveness
                        terminal.draw(|f| self.render(f))?;

                        if self.should_quit {
                            break;
                        }
                        continue;
                    }
                    Event::Resize(_, _) => {
                        terminal.draw(|f| self.render(f))?;
                    }
                    _ => {}
                }
            }

            // Drain finished requests (non-blocking)
            let (changed, action) = match &mut self.screen {
                Screen::Login(login) => login.poll_async(),
                Screen::Board(board) => board.poll_async(),
            };
            if let Some(action) = action {
                self.apply_action(action);
            }

            // Single draw after all updates to avoid flicker
            if changed {
                terminal.draw(|f| self.render(f))?;
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        match &self.screen {
            Screen::Login(login) => login.render(frame, frame.area(), &self.theme),
            Screen::Board(board) => board.render(frame, frame.area(), &self.theme),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        // Ctrl+C quits from anywhere; plain 'q' belongs to the views so it
        // can still be typed into login fields.
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        let action = match &mut self.screen {
            Screen::Login(login) => login.handle_key(key),
            Screen::Board(board) => board.handle_key(key),
        };
        if let Some(action) = action {
            self.apply_action(action);
        }
    }

    fn apply_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::LoggedIn(session) => {
                // A save failure only costs the next start a login.
                if let Err(e) = self.store.save(&session) {
                    tracing::warn!("Failed to persist session: {}", e);
                }

                let mut board = BoardView::new(
                    self.client.with_token(&session.token),
                    session.user,
                    self.confirm_delete,
                );
                board.request_reload();
                board.request_users();
                self.screen = Screen::Board(board);
                self.needs_redraw = true;
            }
            Action::Logout { notice } => {
                if let Err(e) = self.store.clear() {
                    tracing::warn!("Failed to clear stored session: {}", e);
                }
                self.screen = Screen::Login(LoginView::new(self.client.clone(), notice));
                self.needs_redraw = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::User;
    use serial_test::serial;
    use tempfile::tempdir;

    fn sample_session() -> Session {
        Session {
            token: "tok-abc123".to_string(),
            user: User {
                id: 1,
                username: "maria".to_string(),
                email: "maria@example.com".to_string(),
                full_name: "Maria Petrova".to_string(),
                created_at: None,
            },
        }
    }

    fn app_with(restored: Option<Session>) -> App {
        let client = ApiClient::new("http://127.0.0.1:1").unwrap();
        let store = SessionStore::new().unwrap();
        App::new(client, store, true, restored)
    }

    #[test]
    #[serial]
    fn test_starts_on_login_without_session() {
        let temp = tempdir().unwrap();
        std::env::set_var("TASKDECK_CONFIG_DIR", temp.path());

        let app = app_with(None);
        assert!(matches!(app.screen, Screen::Login(_)));
        assert!(!app.should_quit);

        std::env::remove_var("TASKDECK_CONFIG_DIR");
    }

    #[test]
    #[serial]
    fn test_starts_on_board_with_restored_session() {
        let temp = tempdir().unwrap();
        std::env::set_var("TASKDECK_CONFIG_DIR", temp.path());

        let app = app_with(Some(sample_session()));
        assert!(matches!(app.screen, Screen::Board(_)));

        std::env::remove_var("TASKDECK_CONFIG_DIR");
    }

    #[test]
    #[serial]
    fn test_ctrl_c_quits_from_login() {
        let temp = tempdir().unwrap();
        std::env::set_var("TASKDECK_CONFIG_DIR", temp.path());

        let mut app = app_with(None);
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);

        std::env::remove_var("TASKDECK_CONFIG_DIR");
    }

    #[test]
    #[serial]
    fn test_plain_q_is_typed_into_login_fields() {
        let temp = tempdir().unwrap();
        std::env::set_var("TASKDECK_CONFIG_DIR", temp.path());

        let mut app = app_with(None);
        app.handle_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(!app.should_quit);

        std::env::remove_var("TASKDECK_CONFIG_DIR");
    }

    #[tokio::test]
    #[serial]
    async fn test_login_action_switches_to_board_and_saves() {
        let temp = tempdir().unwrap();
        std::env::set_var("TASKDECK_CONFIG_DIR", temp.path());

        let mut app = app_with(None);
        app.apply_action(Action::LoggedIn(sample_session()));

        assert!(matches!(app.screen, Screen::Board(_)));
        assert!(app.needs_redraw);
        let saved = app.store.load().expect("session should be persisted");
        assert_eq!(saved.token, "tok-abc123");

        std::env::remove_var("TASKDECK_CONFIG_DIR");
    }

    #[test]
    #[serial]
    fn test_logout_clears_store_and_returns_to_login() {
        let temp = tempdir().unwrap();
        std::env::set_var("TASKDECK_CONFIG_DIR", temp.path());

        let mut app = app_with(Some(sample_session()));
        app.store.save(&sample_session()).unwrap();

        app.apply_action(Action::Logout {
            notice: Some("Session expired, sign in again".to_string()),
        });

        assert!(matches!(app.screen, Screen::Login(_)));
        assert!(app.store.load().is_none());

        std::env::remove_var("TASKDECK_CONFIG_DIR");
    }
}
