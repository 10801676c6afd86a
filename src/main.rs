//! Taskdeck - Terminal kanban client

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use taskdeck::cli::{self, Cli, Commands};
use taskdeck::tui;

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::var("TASKDECK_DEBUG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter("taskdeck=debug")
            .init();
    }

    let cli = Cli::parse();

    // Completion needs no server, no session, no config.
    if let Some(Commands::Completion { shell }) = cli.command {
        generate(shell, &mut Cli::command(), "td", &mut std::io::stdout());
        return Ok(());
    }

    let server = cli.server.clone();

    match cli.command {
        Some(Commands::Login(args)) => cli::auth::run(server.as_deref(), args).await,
        Some(Commands::Logout) => cli::auth::run_logout(),
        Some(Commands::List(args)) => cli::list::run(server.as_deref(), args).await,
        Some(Commands::Add(args)) => cli::task::run_add(server.as_deref(), args).await,
        Some(Commands::Show(args)) => cli::task::run_show(server.as_deref(), args).await,
        Some(Commands::Move(args)) => cli::task::run_move(server.as_deref(), args).await,
        Some(Commands::Rm(args)) => cli::task::run_rm(server.as_deref(), args).await,
        Some(Commands::Users(args)) => cli::users::run(server.as_deref(), args).await,
        None => tui::run(server).await,
        _ => unreachable!(),
    }
}
