//! `td login` and `td logout` command implementations

use anyhow::{bail, Result};
use clap::Args;
use crossterm::event::{Event, KeyCode, KeyModifiers};
use std::io::{self, Write};

use crate::auth::{Session, SessionStore};

#[derive(Args)]
pub struct LoginArgs {
    /// Username (prompted when omitted)
    #[arg(short = 'u', long)]
    username: Option<String>,

    /// Password (prompted when omitted; the prompt does not echo)
    #[arg(short = 'p', long, env = "TASKDECK_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

pub async fn run(server: Option<&str>, args: LoginArgs) -> Result<()> {
    let client = super::base_client(server)?;

    let username = match args.username {
        Some(username) => username,
        None => prompt_line("Username: ")?,
    };
    if username.trim().is_empty() {
        bail!("Username is required");
    }

    let password = match args.password {
        Some(password) => password,
        None => prompt_password("Password: ")?,
    };

    let response = client.login(username.trim(), &password).await?;
    let session = Session::from(response);

    let store = SessionStore::new()?;
    store.save(&session)?;

    println!(
        "✓ Signed in as {} ({})",
        session.user.username, session.user.full_name
    );
    Ok(())
}

pub fn run_logout() -> Result<()> {
    let store = SessionStore::new()?;
    store.clear()?;
    println!("✓ Signed out");
    Ok(())
}

fn prompt_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Read a password without echo. Raw mode keeps typed characters off the
/// screen; Backspace edits, Ctrl+C aborts.
fn prompt_password(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;

    crossterm::terminal::enable_raw_mode()?;
    let result = read_password_raw();
    crossterm::terminal::disable_raw_mode()?;
    println!();

    result
}

fn read_password_raw() -> Result<String> {
    let mut password = String::new();
    loop {
        if let Event::Key(key) = crossterm::event::read()? {
            match key.code {
                KeyCode::Enter => break,
                KeyCode::Backspace => {
                    password.pop();
                }
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    bail!("Login cancelled")
                }
                KeyCode::Char(c) => password.push(c),
                _ => {}
            }
        }
    }
    Ok(password)
}
