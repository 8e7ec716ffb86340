use crate::{
    client::TenggatClient,
    table::{print_summary, print_task_details, print_tasks},
    util::{parse_deadline, Compact},
};
use anyhow::bail;
use chrono::FixedOffset;
use clap::{Args, Subcommand};
use colored::Colorize;
use tenggat_types::{
    CreateTask, EditTask, ReminderSettings, StatusFilter, Task, TaskPriority, TaskSort, Title,
};
use uuid::Uuid;

fn print_done(action: &str, task: &Task) {
    println!(
        "{} {action} task {} {}",
        "✓".green().bold(),
        task.title,
        task.id.to_string().bright_black().italic()
    );
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[clap(required = true, help = "Task title")]
    title: Title,

    #[clap(long, help = "Longer description of the task")]
    description: Option<String>,

    #[clap(
        long,
        help = "Deadline as YYYY-MM-DD HH:MM in the configured offset, or RFC 3339"
    )]
    deadline: Option<String>,

    #[clap(long, help = "Task priority [default: medium]")]
    priority: Option<TaskPriority>,
}

pub async fn add_command(
    args: AddArgs,
    client: TenggatClient,
    offset: FixedOffset,
) -> anyhow::Result<()> {
    let deadline = args
        .deadline
        .map(|input| parse_deadline(&input, offset))
        .transpose()?;

    let task = client
        .create(CreateTask {
            title: args.title,
            description: args.description,
            deadline,
            priority: args.priority,
        })
        .await?;

    print_done("Created", &task);
    Ok(())
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[clap(long, required = false, help = "Which tasks to list: all, active or completed")]
    status: Option<StatusFilter>,

    #[clap(long, required = false, help = "Task order: newest or smart")]
    sort: Option<TaskSort>,
}

pub async fn list_command(
    args: ListArgs,
    client: TenggatClient,
    offset: FixedOffset,
) -> anyhow::Result<()> {
    let tasks = client.list(args.status, args.sort).await?;
    print_tasks(tasks, offset);
    Ok(())
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    #[clap(required = true, help = "Tasks to show")]
    ids: Vec<Uuid>,
}

pub async fn show_command(
    args: ShowArgs,
    client: TenggatClient,
    offset: FixedOffset,
) -> anyhow::Result<()> {
    let tasks = futures::future::join_all(args.ids.compact().into_iter().map(|id| client.find(id)))
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    for task in tasks {
        print_task_details(task, offset);
    }

    Ok(())
}

#[derive(Debug, Args)]
pub struct EditArgs {
    #[clap(required = true, help = "Task to edit")]
    id: Uuid,

    #[clap(long, help = "New title")]
    title: Option<Title>,

    #[clap(long, conflicts_with = "clear_description", help = "New description")]
    description: Option<String>,

    #[clap(long, default_value_t = false, help = "Remove the description")]
    clear_description: bool,

    #[clap(
        long,
        conflicts_with = "clear_deadline",
        help = "New deadline, moving it re-arms every reminder"
    )]
    deadline: Option<String>,

    #[clap(long, default_value_t = false, help = "Remove the deadline")]
    clear_deadline: bool,

    #[clap(long, help = "New priority")]
    priority: Option<TaskPriority>,
}

pub async fn edit_command(
    args: EditArgs,
    client: TenggatClient,
    offset: FixedOffset,
) -> anyhow::Result<()> {
    let current = client.find(args.id).await?;
    let mut edit = EditTask::from_task(&current);

    if let Some(title) = args.title {
        edit.title = title;
    }

    if args.clear_description {
        edit.description = None;
    } else if let Some(description) = args.description {
        edit.description = Some(description);
    }

    if args.clear_deadline {
        edit.deadline = None;
    } else if let Some(input) = args.deadline {
        edit.deadline = Some(parse_deadline(&input, offset)?);
    }

    if let Some(priority) = args.priority {
        edit.priority = Some(priority);
    }

    let task = client.edit(args.id, edit).await?;
    print_done("Updated", &task);
    Ok(())
}

#[derive(Debug, Args)]
pub struct ToggleArgs {
    #[clap(required = true, help = "Tasks to mark done or open again")]
    ids: Vec<Uuid>,
}

pub async fn toggle_command(args: ToggleArgs, client: TenggatClient) -> anyhow::Result<()> {
    let task_results =
        futures::future::join_all(args.ids.compact().into_iter().map(|id| client.toggle(id))).await;

    for result in task_results {
        match result {
            Ok(task) if task.completed => print_done("Completed", &task),
            Ok(task) => print_done("Reopened", &task),
            Err(error) => println!("{} {}", "✖".red().bold(), error),
        }
    }

    Ok(())
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    #[clap(required = true, help = "Tasks to delete")]
    ids: Vec<Uuid>,
}

pub async fn delete_command(args: DeleteArgs, client: TenggatClient) -> anyhow::Result<()> {
    let task_results =
        futures::future::join_all(args.ids.compact().into_iter().map(|id| client.delete(id))).await;

    for result in task_results {
        match result {
            Ok(task) => print_done("Deleted", &task),
            Err(error) => println!("{} {}", "✖".red().bold(), error),
        }
    }

    Ok(())
}

#[derive(Debug, Args)]
pub struct ClearArgs {
    #[clap(long, default_value_t = false, help = "Confirm deleting every task")]
    yes: bool,
}

pub async fn clear_command(args: ClearArgs, client: TenggatClient) -> anyhow::Result<()> {
    if !args.yes {
        bail!("Refusing to delete every task without --yes")
    }

    let deleted = client.delete_all().await?;
    println!("{} Deleted {} tasks", "✓".green().bold(), deleted.deleted);
    Ok(())
}

pub async fn summary_command(client: TenggatClient) -> anyhow::Result<()> {
    print_summary(client.summary().await?);
    Ok(())
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Show the reminder settings
    Show,
    /// Change the reminder settings
    Set(SetSettingsArgs),
    /// Send a test message with the stored settings
    Test,
}

#[derive(Debug, Args)]
pub struct SetSettingsArgs {
    #[clap(long, help = "Gateway API token")]
    token: Option<String>,

    #[clap(long, help = "Phone number reminders are sent to")]
    target: Option<String>,
}

pub async fn settings_command(
    command: SettingsCommand,
    client: TenggatClient,
) -> anyhow::Result<()> {
    match command {
        SettingsCommand::Show => print_settings(&client.settings().await?),
        SettingsCommand::Set(args) => {
            let current = client.settings().await?;
            let settings = client
                .update_settings(ReminderSettings {
                    send_token: args.token.unwrap_or(current.send_token),
                    target_address: args.target.unwrap_or(current.target_address),
                })
                .await?;

            println!("{} Saved reminder settings", "✓".green().bold());
            print_settings(&settings);
        }
        SettingsCommand::Test => {
            if client.test_settings().await?.sent {
                println!("{} Test message sent", "✓".green().bold());
            } else {
                bail!("Gateway did not accept the test message")
            }
        }
    }

    Ok(())
}

fn print_settings(settings: &ReminderSettings) {
    let token = if settings.send_token.is_empty() {
        "not set".into()
    } else {
        settings.masked_token()
    };
    let target = if settings.target_address.is_empty() {
        "not set"
    } else {
        settings.target_address.as_str()
    };

    println!("Token:  {token}");
    println!("Target: {target}");

    if !settings.is_configured() {
        println!(
            " {} Reminders are not sent until both are set",
            "⚠".yellow().bold()
        );
    }
}
