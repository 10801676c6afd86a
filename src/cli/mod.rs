//! CLI command implementations

pub mod auth;
pub mod definition;
pub mod list;
pub mod task;
pub mod users;

pub use definition::{Cli, Commands};

use anyhow::{bail, Result};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::api::ApiClient;
use crate::auth::SessionStore;
use crate::config::Config;
use crate::task::{Priority, Status, User};

/// Server URL from the `--server` flag (or `TASKDECK_SERVER`) with the
/// config file as fallback.
pub fn resolve_server(server_flag: Option<&str>) -> Result<String> {
    if let Some(url) = server_flag {
        return Ok(url.to_string());
    }

    let config = Config::load()?;
    match config.server_url() {
        Some(url) => Ok(url.to_string()),
        None => bail!(
            "No task server configured.\n\
             Pass one with --server http://localhost:5000 or set [server] url in config.toml"
        ),
    }
}

pub fn base_client(server_flag: Option<&str>) -> Result<ApiClient> {
    let url = resolve_server(server_flag)?;
    Ok(ApiClient::new(&url)?)
}

/// Client carrying the stored session token. Task commands require a
/// prior `td login`.
pub fn authed_client(server_flag: Option<&str>) -> Result<ApiClient> {
    let client = base_client(server_flag)?;
    let store = SessionStore::new()?;
    match store.load() {
        Some(session) => Ok(client.with_token(&session.token)),
        None => bail!("Not logged in. Run: td login"),
    }
}

pub fn parse_status(s: &str) -> Result<Status> {
    Status::parse(s).ok_or_else(|| {
        anyhow::anyhow!("Unknown status: {}. Use backlog, todo, in_progress or done", s)
    })
}

pub fn parse_priority(s: &str) -> Result<Priority> {
    Priority::parse(s)
        .ok_or_else(|| anyhow::anyhow!("Unknown priority: {}. Use low, medium or high", s))
}

/// Find a user by id, username or full name, in that order.
pub fn resolve_user<'a>(identifier: &str, users: &'a [User]) -> Result<&'a User> {
    if let Ok(id) = identifier.parse::<i64>() {
        if let Some(user) = users.iter().find(|u| u.id == id) {
            return Ok(user);
        }
    }

    if let Some(user) = users.iter().find(|u| u.username == identifier) {
        return Ok(user);
    }

    if let Some(user) = users
        .iter()
        .find(|u| u.full_name.eq_ignore_ascii_case(identifier))
    {
        return Ok(user);
    }

    bail!("User not found: {}", identifier)
}

/// Truncate to a display width, appending "..." when something was cut.
/// Width-aware so wide glyphs in titles do not break table columns.
pub fn truncate(s: &str, max: usize) -> String {
    if UnicodeWidthStr::width(s) <= max {
        return s.to_string();
    }

    let reserved = if max > 3 { 3 } else { 0 };
    let avail = max - reserved;

    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > avail {
            break;
        }
        out.push(c);
        used += w;
    }
    if reserved > 0 {
        out.push_str("...");
    }
    out
}
