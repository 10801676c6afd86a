//! `td add`, `td show`, `td move` and `td rm` command implementations

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use clap::Args;
use std::io::{self, Write};

use crate::task::TaskPayload;

#[derive(Args)]
pub struct AddArgs {
    /// Task title
    title: String,

    /// Longer description
    #[arg(short = 'd', long)]
    description: Option<String>,

    /// Column (backlog, todo, in_progress, done)
    #[arg(short = 's', long, default_value = "backlog")]
    status: String,

    /// Priority (low, medium, high)
    #[arg(short = 'p', long, default_value = "medium")]
    priority: String,

    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    due: Option<String>,

    /// Assignee (user id, username or full name)
    #[arg(short = 'a', long)]
    assignee: Option<String>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Task id
    id: i64,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
pub struct MoveArgs {
    /// Task id
    id: i64,

    /// Destination column (backlog, todo, in_progress, done)
    status: String,
}

#[derive(Args)]
pub struct RmArgs {
    /// Task id
    id: i64,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    yes: bool,
}

pub async fn run_add(server: Option<&str>, args: AddArgs) -> Result<()> {
    let status = super::parse_status(&args.status)?;
    let priority = super::parse_priority(&args.priority)?;
    let due_date = parse_due(args.due.as_deref())?;

    let client = super::authed_client(server)?;

    let assigned_to = match &args.assignee {
        Some(identifier) => {
            let users = client.list_users().await?;
            Some(super::resolve_user(identifier, &users)?.id)
        }
        None => None,
    };

    let payload = TaskPayload {
        title: args.title,
        description: args.description.unwrap_or_default(),
        status,
        priority,
        due_date,
        assigned_to,
    };

    let task = client.create_task(&payload).await?;

    println!("✓ Created task #{}: {}", task.id, task.title);
    println!("  Status:   {}", task.status.title());
    println!("  Priority: {}", task.priority.label());
    if let Some(due) = task.due_date {
        println!("  Due:      {}", due.format("%Y-%m-%d"));
    }
    if let Some(name) = task.assignee_name() {
        println!("  Assignee: {}", name);
    }

    Ok(())
}

pub async fn run_show(server: Option<&str>, args: ShowArgs) -> Result<()> {
    let client = super::authed_client(server)?;
    let task = client.get_task(args.id).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&task)?);
        return Ok(());
    }

    println!("#{} {}", task.id, task.title);
    println!("  Status:   {}", task.status.title());
    println!("  Priority: {}", task.priority.label());
    println!(
        "  Due:      {}",
        task.due_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!("  Assignee: {}", task.assignee_name().unwrap_or("-"));
    match &task.created_by {
        Some(creator) => println!(
            "  Created:  {} by {}",
            task.created_at.format("%Y-%m-%d %H:%M"),
            creator.full_name
        ),
        None => println!("  Created:  {}", task.created_at.format("%Y-%m-%d %H:%M")),
    }
    println!("  Updated:  {}", task.updated_at.format("%Y-%m-%d %H:%M"));

    if let Some(description) = &task.description {
        if !description.is_empty() {
            println!();
            println!("{}", description);
        }
    }

    Ok(())
}

pub async fn run_move(server: Option<&str>, args: MoveArgs) -> Result<()> {
    let status = super::parse_status(&args.status)?;

    let client = super::authed_client(server)?;
    let task = client.update_task_status(args.id, status).await?;

    println!("✓ Moved #{} to {}", task.id, task.status.title());
    Ok(())
}

pub async fn run_rm(server: Option<&str>, args: RmArgs) -> Result<()> {
    let client = super::authed_client(server)?;

    // Fetch first so the prompt can show what is about to go.
    let task = client.get_task(args.id).await?;

    if !args.yes {
        print!("Delete \"{}\"? [y/N] ", task.title);
        io::stdout().flush()?;

        let mut response = String::new();
        io::stdin().read_line(&mut response)?;

        if response.trim().to_lowercase() != "y" {
            println!("Cancelled.");
            return Ok(());
        }
    }

    client.delete_task(args.id).await?;
    println!("✓ Deleted task #{}", args.id);
    Ok(())
}

fn parse_due(due: Option<&str>) -> Result<Option<NaiveDate>> {
    match due {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| anyhow!("Due date must be YYYY-MM-DD, got: {}", s)),
    }
}
