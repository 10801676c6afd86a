//! Top-level CLI definition

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use super::auth::LoginArgs;
use super::list::ListArgs;
use super::task::{AddArgs, MoveArgs, RmArgs, ShowArgs};
use super::users::UsersArgs;

#[derive(Parser)]
#[command(
    name = "td",
    version,
    about = "Terminal kanban client for a shared task server",
    long_about = "Terminal kanban client for a shared task server.\n\n\
                  Run without a subcommand to open the board TUI."
)]
pub struct Cli {
    /// Task server URL (overrides the config file)
    #[arg(long, global = true, env = "TASKDECK_SERVER")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session for later commands
    Login(LoginArgs),

    /// Drop the stored session
    Logout,

    /// List tasks as a table or JSON
    List(ListArgs),

    /// Create a task
    Add(AddArgs),

    /// Show one task in full
    Show(ShowArgs),

    /// Move a task to another column
    Move(MoveArgs),

    /// Delete a task
    Rm(RmArgs),

    /// List the server's users
    Users(UsersArgs),

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}
