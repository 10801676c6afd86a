//! `td list` command implementation

use anyhow::Result;
use clap::Args;

use crate::task::Task;

const TABLE_COL_ID: usize = 5;
const TABLE_COL_TITLE: usize = 32;
const TABLE_COL_STATUS: usize = 12;
const TABLE_COL_PRIORITY: usize = 8;
const TABLE_COL_DUE: usize = 10;

#[derive(Args)]
pub struct ListArgs {
    /// Only tasks in this column (backlog, todo, in_progress, done)
    #[arg(short = 's', long)]
    status: Option<String>,

    /// Output as JSON, exactly as the server reports it
    #[arg(long)]
    json: bool,
}

fn print_table_header() {
    println!(
        "{:<width_id$} {:<width_title$} {:<width_status$} {:<width_priority$} {:<width_due$} ASSIGNEE",
        "ID",
        "TITLE",
        "STATUS",
        "PRIORITY",
        "DUE",
        width_id = TABLE_COL_ID,
        width_title = TABLE_COL_TITLE,
        width_status = TABLE_COL_STATUS,
        width_priority = TABLE_COL_PRIORITY,
        width_due = TABLE_COL_DUE
    );
    println!(
        "{}",
        "-".repeat(
            TABLE_COL_ID + TABLE_COL_TITLE + TABLE_COL_STATUS + TABLE_COL_PRIORITY + TABLE_COL_DUE
                + 13
        )
    );
}

fn print_table_row(task: &Task) {
    let title = super::truncate(&task.title, TABLE_COL_TITLE);
    let due = task
        .due_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());
    let assignee = task.assignee_name().unwrap_or("-");
    println!(
        "{:<width_id$} {:<width_title$} {:<width_status$} {:<width_priority$} {:<width_due$} {}",
        task.id,
        title,
        task.status.as_str(),
        task.priority.label(),
        due,
        assignee,
        width_id = TABLE_COL_ID,
        width_title = TABLE_COL_TITLE,
        width_status = TABLE_COL_STATUS,
        width_priority = TABLE_COL_PRIORITY,
        width_due = TABLE_COL_DUE
    );
}

pub async fn run(server: Option<&str>, args: ListArgs) -> Result<()> {
    let status_filter = match args.status.as_deref() {
        Some(s) => Some(super::parse_status(s)?),
        None => None,
    };

    let client = super::authed_client(server)?;
    let mut tasks = client.list_tasks().await?;

    if let Some(status) = status_filter {
        tasks.retain(|t| t.status == status);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
        return Ok(());
    }

    if tasks.is_empty() {
        println!("No tasks.");
        return Ok(());
    }

    print_table_header();
    for task in &tasks {
        print_table_row(task);
    }
    println!("\nTotal: {} tasks", tasks.len());

    Ok(())
}
