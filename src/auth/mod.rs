//! Login session state and its on-disk persistence
//!
//! A `Session` is an owned value produced by a successful login and passed
//! to whoever needs it; there is no process-global auth state. The store
//! keeps one session on disk so the TUI and the CLI share a login.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

use crate::api::LoginResponse;
use crate::config::app_dir;
use crate::task::User;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl From<LoginResponse> for Session {
    fn from(response: LoginResponse) -> Self {
        Self {
            token: response.access_token,
            user: response.user,
        }
    }
}

pub struct SessionStore {
    session_path: PathBuf,
}

impl SessionStore {
    pub fn new() -> Result<Self> {
        let dir = app_dir()?;
        fs::create_dir_all(&dir)?;
        Ok(Self {
            session_path: dir.join("session.json"),
        })
    }

    /// Missing or empty file means no saved session; a corrupt file is
    /// treated the same, with a warning, so a bad write never locks the
    /// user out of the login screen.
    pub fn load(&self) -> Option<Session> {
        if !self.session_path.exists() {
            return None;
        }

        let content = fs::read_to_string(&self.session_path).ok()?;
        if content.trim().is_empty() {
            return None;
        }

        match serde_json::from_str(&content) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("Discarding unreadable session file: {}", e);
                None
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        let content = serde_json::to_string_pretty(session)?;
        fs::write(&self.session_path, content)?;
        Ok(())
    }

    /// Logout: drop the stored session unconditionally. No server call is
    /// made and a missing file is not an error.
    pub fn clear(&self) -> Result<()> {
        if self.session_path.exists() {
            fs::remove_file(&self.session_path)?;
        }
        Ok(())
    }
}
