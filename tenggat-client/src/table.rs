use chrono::{DateTime, FixedOffset, Utc};
use tabled::{
    builder::Builder,
    settings::{
        object::{Columns, Rows},
        Color, Style,
    },
};

use tenggat_types::{DeadlineStatus, Summary, Task, THRESHOLDS};

use crate::util::format_deadline;

const PROGRESS_BAR_LENGTH: usize = 16;

fn status(task: &Task, now: DateTime<Utc>) -> &'static str {
    if task.completed {
        return "done";
    }

    DeadlineStatus::of(task, now).map_or("open", DeadlineStatus::label)
}

fn deadline(task: &Task, offset: FixedOffset) -> String {
    task.deadline
        .map_or_else(|| "none".into(), |deadline| format_deadline(deadline, offset))
}

fn reminders_sent(task: &Task) -> String {
    let labels = THRESHOLDS
        .iter()
        .filter(|threshold| task.reminder_sent(threshold.key))
        .map(|threshold| threshold.label)
        .collect::<Vec<_>>();

    if labels.is_empty() {
        "none".into()
    } else {
        labels.join(", ")
    }
}

fn progress_bar(percent: u8) -> String {
    let filled = usize::from(percent.min(100)) * PROGRESS_BAR_LENGTH / 100;
    format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(PROGRESS_BAR_LENGTH - filled)
    )
}

pub fn print_tasks(tasks: Vec<Task>, offset: FixedOffset) {
    let mut builder = Builder::new();
    builder.push_record(["ID", "Title", "Priority", "Deadline", "Status"]);

    let now = Utc::now();

    for task in tasks {
        builder.push_record([
            task.id.to_string(),
            task.title.to_string(),
            task.priority.to_string(),
            deadline(&task, offset),
            status(&task, now).to_string(),
        ]);
    }

    let mut table = builder.build();
    table
        .with(Style::modern_rounded())
        .modify(Columns::first(), Color::FG_BRIGHT_BLACK)
        .modify(Rows::first(), Color::FG_WHITE | Color::BOLD);
    println!("{table}");
}

pub fn print_task_details(task: Task, offset: FixedOffset) {
    let now = Utc::now();

    let mut builder = Builder::new();
    builder.push_record(["ID".to_string(), task.id.to_string()]);
    builder.push_record(["Title".to_string(), task.title.to_string()]);
    builder.push_record([
        "Description".to_string(),
        task.description.clone().unwrap_or_else(|| "none".into()),
    ]);
    builder.push_record(["Priority".to_string(), task.priority.to_string()]);
    builder.push_record(["Deadline".to_string(), deadline(&task, offset)]);
    builder.push_record(["Status".to_string(), status(&task, now).to_string()]);
    builder.push_record([
        "Created".to_string(),
        format_deadline(task.created_at, offset),
    ]);
    builder.push_record(["Reminders sent".to_string(), reminders_sent(&task)]);

    let mut table = builder.build();
    table
        .with(Style::modern_rounded())
        .modify(Columns::first(), Color::FG_WHITE | Color::BOLD);
    println!("{table}");
}

pub fn print_summary(summary: Summary) {
    let mut builder = Builder::new();
    builder.push_record(["Total", "Completed", "Pending", "Progress"]);
    builder.push_record([
        summary.total.to_string(),
        summary.completed.to_string(),
        summary.pending.to_string(),
        format!("{} {:>3}%", progress_bar(summary.percent), summary.percent),
    ]);

    let mut table = builder.build();
    table
        .with(Style::modern_rounded())
        .modify(Columns::last(), Color::FG_GREEN)
        .modify(Rows::first(), Color::FG_WHITE | Color::BOLD);
    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use tenggat_types::CreateTask;

    fn task(deadline: Option<DateTime<Utc>>) -> Task {
        Task::generate(CreateTask {
            title: "Pay rent".parse().unwrap(),
            description: None,
            deadline,
            priority: None,
        })
    }

    #[test]
    fn status_reflects_completion_and_deadline() {
        let now = Utc::now();
        assert_eq!(status(&task(None), now), "open");
        assert_eq!(status(&task(Some(now - TimeDelta::hours(1))), now), "overdue");
        assert_eq!(status(&task(Some(now + TimeDelta::hours(5))), now), "today");

        let mut done = task(Some(now - TimeDelta::hours(1)));
        done.completed = true;
        assert_eq!(status(&done, now), "done");
    }

    #[test]
    fn reminders_are_listed_longest_first() {
        let mut task = task(Some(Utc::now()));
        assert_eq!(reminders_sent(&task), "none");

        task.reminders_sent.insert("1d".into(), true);
        task.reminders_sent.insert("2d".into(), true);
        assert_eq!(reminders_sent(&task), "2 hari, 1 hari");
    }

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(0), "░".repeat(PROGRESS_BAR_LENGTH));
        assert_eq!(progress_bar(50), format!("{}{}", "█".repeat(8), "░".repeat(8)));
        assert_eq!(progress_bar(100), "█".repeat(PROGRESS_BAR_LENGTH));
    }
}
