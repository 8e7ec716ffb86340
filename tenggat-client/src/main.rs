mod client;
mod commands;
mod table;
mod util;

use crate::{
    client::TenggatClient,
    commands::{
        add_command, clear_command, delete_command, edit_command, list_command, settings_command,
        show_command, summary_command, toggle_command, AddArgs, ClearArgs, DeleteArgs, EditArgs,
        ListArgs, SettingsCommand, ShowArgs, ToggleArgs,
    },
};
use anyhow::{Context, Result};
use chrono::FixedOffset;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::process;
use url::Url;

#[derive(Debug, Parser)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[clap(
        long,
        default_value = "http://127.0.0.1:1337",
        use_value_delimiter = true,
        env = "TENGGAT_CLUSTER",
        help = "Comma-separated list of daemon endpoints"
    )]
    cluster: Vec<Url>,

    #[clap(
        long,
        default_value_t = 420,
        allow_hyphen_values = true,
        env = "TENGGAT_UTC_OFFSET",
        help = "Minutes east of UTC for entering and printing deadlines"
    )]
    utc_offset: i32,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Add a new task
    Add(AddArgs),
    /// List tasks
    List(ListArgs),
    /// Show specific tasks
    Show(ShowArgs),
    /// Change a task
    Edit(EditArgs),
    /// Mark tasks done, or open them again
    Toggle(ToggleArgs),
    /// Delete tasks
    Delete(DeleteArgs),
    /// Delete every task
    Clear(ClearArgs),
    /// Show task progress
    Summary,
    /// Manage reminder delivery
    #[command(subcommand)]
    Settings(SettingsCommand),
}

async fn run(cli: Cli) -> Result<()> {
    let offset =
        FixedOffset::east_opt(cli.utc_offset * 60).context("UTC offset must be within a day")?;
    let tenggat = TenggatClient::new(cli.cluster)?;

    match cli.command {
        Command::Add(args) => add_command(args, tenggat, offset).await,
        Command::List(args) => list_command(args, tenggat, offset).await,
        Command::Show(args) => show_command(args, tenggat, offset).await,
        Command::Edit(args) => edit_command(args, tenggat, offset).await,
        Command::Toggle(args) => toggle_command(args, tenggat).await,
        Command::Delete(args) => delete_command(args, tenggat).await,
        Command::Clear(args) => clear_command(args, tenggat).await,
        Command::Summary => summary_command(tenggat).await,
        Command::Settings(command) => settings_command(command, tenggat).await,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    if let Err(error) = run(Cli::parse()).await {
        eprintln!("{} {}", "✖".red().bold(), error);
        process::exit(1);
    }

    Ok(())
}
