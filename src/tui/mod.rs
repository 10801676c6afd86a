//! TUI entry point: server checks, terminal setup, and the app loop

mod app;
mod board;
mod components;
mod dialogs;
mod login;
mod styles;

pub use app::*;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;

use crate::api::ApiClient;
use crate::auth::SessionStore;
use crate::config::{config_path, Config};

pub async fn run(server_override: Option<String>) -> Result<()> {
    let config = Config::load()?;

    let url = match server_override.as_deref().or_else(|| config.server_url()) {
        Some(url) => url.to_string(),
        None => {
            eprintln!("Error: no task server configured");
            eprintln!();
            eprintln!("Point taskdeck at your server with either:");
            eprintln!("  td --server http://localhost:5000");
            eprintln!("  TASKDECK_SERVER=http://localhost:5000 td");
            eprintln!();
            if let Ok(path) = config_path() {
                eprintln!("or set it once in {}:", path.display());
            } else {
                eprintln!("or set it once in config.toml:");
            }
            eprintln!("  [server]");
            eprintln!("  url = \"http://localhost:5000\"");
            std::process::exit(1);
        }
    };

    let client = ApiClient::new(&url)?;

    // Fail fast when the server is down instead of opening a dead UI.
    if let Err(e) = client.health().await {
        eprintln!("Error: cannot reach task server at {url}");
        eprintln!("  {e}");
        eprintln!();
        eprintln!("Check that the server is running, or point at another one:");
        eprintln!("  td --server http://localhost:5000");
        std::process::exit(1);
    }

    let store = SessionStore::new()?;
    let restored = store.load();

    // Raw mode + alternate screen
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and run. A stale stored token is not checked here: the
    // first request will come back 401 and drop the user on the login
    // screen with a notice.
    let mut app = App::new(client, store, config.ui.confirm_delete, restored);
    let result = app.run(&mut terminal).await;

    // Tear down even when the loop returned an error
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}
