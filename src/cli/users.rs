//! `td users` command implementation

use anyhow::Result;
use clap::Args;

const TABLE_COL_ID: usize = 5;
const TABLE_COL_USERNAME: usize = 16;
const TABLE_COL_NAME: usize = 24;

#[derive(Args)]
pub struct UsersArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(server: Option<&str>, args: UsersArgs) -> Result<()> {
    let client = super::authed_client(server)?;
    let users = client.list_users().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&users)?);
        return Ok(());
    }

    if users.is_empty() {
        println!("No users.");
        return Ok(());
    }

    println!(
        "{:<width_id$} {:<width_username$} {:<width_name$} EMAIL",
        "ID",
        "USERNAME",
        "NAME",
        width_id = TABLE_COL_ID,
        width_username = TABLE_COL_USERNAME,
        width_name = TABLE_COL_NAME
    );
    println!(
        "{}",
        "-".repeat(TABLE_COL_ID + TABLE_COL_USERNAME + TABLE_COL_NAME + 28)
    );

    for user in &users {
        println!(
            "{:<width_id$} {:<width_username$} {:<width_name$} {}",
            user.id,
            super::truncate(&user.username, TABLE_COL_USERNAME),
            super::truncate(&user.full_name, TABLE_COL_NAME),
            user.email,
            width_id = TABLE_COL_ID,
            width_username = TABLE_COL_USERNAME,
            width_name = TABLE_COL_NAME
        );
    }
    println!("\nTotal: {} users", users.len());

    Ok(())
}
