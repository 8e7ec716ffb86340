use std::cmp::Ordering;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::Task;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskSort {
    /// Most recently created first.
    #[default]
    Newest,
    /// Open before done, overdue first, then priority, then nearest deadline.
    Smart,
}

impl TaskSort {
    pub fn sort(self, tasks: &mut [Task], now: DateTime<Utc>) {
        match self {
            Self::Newest => tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            Self::Smart => tasks.sort_by(|a, b| smart_order(a, b, now)),
        }
    }
}

fn smart_order(a: &Task, b: &Task, now: DateTime<Utc>) -> Ordering {
    a.completed
        .cmp(&b.completed)
        .then_with(|| match (a.is_overdue(now), b.is_overdue(now)) {
            (true, true) => a.deadline.cmp(&b.deadline),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => Ordering::Equal,
        })
        .then_with(|| b.priority.weight().cmp(&a.priority.weight()))
        .then_with(|| match (a.deadline, b.deadline) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| b.created_at.cmp(&a.created_at))
}

/// Filter and order a task list the way the list views show it.
pub fn select_tasks(
    tasks: impl IntoIterator<Item = Task>,
    filter: StatusFilter,
    sort: TaskSort,
    now: DateTime<Utc>,
) -> Vec<Task> {
    let mut tasks = tasks
        .into_iter()
        .filter(|task| filter.matches(task))
        .collect::<Vec<_>>();
    sort.sort(&mut tasks, now);
    tasks
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Share of completed tasks, rounded to a whole percent.
    pub percent: u8,
}

impl Summary {
    pub fn of(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|task| task.completed).count();
        let percent = if total == 0 {
            0
        } else {
            (completed as f64 / total as f64 * 100.0).round() as u8
        };

        Self {
            total,
            completed,
            pending: total - completed,
            percent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineStatus {
    Overdue,
    DueSoon,
    Today,
    Upcoming,
}

impl DeadlineStatus {
    /// Urgency of an open task's deadline; `None` for finished tasks or no deadline.
    pub fn of(task: &Task, now: DateTime<Utc>) -> Option<Self> {
        if task.completed {
            return None;
        }

        let time_left = task.time_left(now)?;
        Some(if time_left < TimeDelta::zero() {
            Self::Overdue
        } else if time_left < TimeDelta::hours(1) {
            Self::DueSoon
        } else if time_left < TimeDelta::hours(24) {
            Self::Today
        } else {
            Self::Upcoming
        })
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Overdue => "overdue",
            Self::DueSoon => "due soon",
            Self::Today => "today",
            Self::Upcoming => "upcoming",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CreateTask, TaskPriority};

    fn task(title: &str, priority: TaskPriority, deadline: Option<DateTime<Utc>>) -> Task {
        Task::generate(CreateTask {
            title: title.parse().unwrap(),
            description: None,
            deadline,
            priority: Some(priority),
        })
    }

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|task| task.title.as_str()).collect()
    }

    #[test]
    fn summary_rounds_percent() {
        let mut tasks = vec![
            task("a", TaskPriority::Low, None),
            task("b", TaskPriority::Low, None),
            task("c", TaskPriority::Low, None),
        ];
        tasks[0].completed = true;
        tasks[1].completed = true;

        assert_eq!(
            Summary::of(&tasks),
            Summary {
                total: 3,
                completed: 2,
                pending: 1,
                percent: 67,
            }
        );
        assert_eq!(Summary::of(&[]).percent, 0);
    }

    #[test]
    fn status_filter_splits_open_and_done() {
        let mut done = task("done", TaskPriority::Medium, None);
        done.completed = true;
        let open = task("open", TaskPriority::Medium, None);
        let now = Utc::now();

        let all = vec![done, open];
        let active = select_tasks(all.clone(), StatusFilter::Active, TaskSort::Newest, now);
        let completed = select_tasks(all.clone(), StatusFilter::Completed, TaskSort::Newest, now);

        assert_eq!(titles(&active), ["open"]);
        assert_eq!(titles(&completed), ["done"]);
        assert_eq!(
            select_tasks(all, StatusFilter::All, TaskSort::Newest, now).len(),
            2
        );
    }

    #[test]
    fn newest_sort_uses_creation_time() {
        let now = Utc::now();
        let mut older = task("older", TaskPriority::High, None);
        older.created_at = now - TimeDelta::hours(2);
        let mut newer = task("newer", TaskPriority::Low, None);
        newer.created_at = now - TimeDelta::hours(1);

        let mut tasks = vec![older, newer];
        TaskSort::Newest.sort(&mut tasks, now);
        assert_eq!(titles(&tasks), ["newer", "older"]);
    }

    #[test]
    fn smart_sort_orders_by_state_overdue_priority_deadline_and_age() {
        let now = Utc::now();

        let mut done = task("done", TaskPriority::High, Some(now - TimeDelta::days(3)));
        done.completed = true;
        let very_late = task("very late", TaskPriority::Low, Some(now - TimeDelta::days(2)));
        let late = task("late", TaskPriority::Low, Some(now - TimeDelta::hours(1)));
        let urgent = task("urgent", TaskPriority::High, Some(now + TimeDelta::days(5)));
        let soon = task("soon", TaskPriority::Medium, Some(now + TimeDelta::hours(2)));
        let later = task("later", TaskPriority::Medium, Some(now + TimeDelta::days(1)));
        let mut someday_old = task("someday old", TaskPriority::Medium, None);
        someday_old.created_at = now - TimeDelta::days(10);
        let someday_new = task("someday new", TaskPriority::Medium, None);

        let mut tasks = vec![
            someday_old,
            done,
            later,
            someday_new,
            soon,
            late,
            urgent,
            very_late,
        ];
        TaskSort::Smart.sort(&mut tasks, now);

        assert_eq!(
            titles(&tasks),
            [
                "very late",
                "late",
                "urgent",
                "soon",
                "later",
                "someday new",
                "someday old",
                "done",
            ]
        );
    }

    #[test]
    fn deadline_status_buckets() {
        let now = Utc::now();
        let at = |delta: TimeDelta| task("t", TaskPriority::Medium, Some(now + delta));

        assert_eq!(
            DeadlineStatus::of(&at(TimeDelta::minutes(-1)), now),
            Some(DeadlineStatus::Overdue)
        );
        assert_eq!(
            DeadlineStatus::of(&at(TimeDelta::minutes(30)), now),
            Some(DeadlineStatus::DueSoon)
        );
        assert_eq!(
            DeadlineStatus::of(&at(TimeDelta::hours(5)), now),
            Some(DeadlineStatus::Today)
        );
        assert_eq!(
            DeadlineStatus::of(&at(TimeDelta::days(3)), now),
            Some(DeadlineStatus::Upcoming)
        );

        let mut done = at(TimeDelta::minutes(-1));
        done.completed = true;
        assert_eq!(DeadlineStatus::of(&done, now), None);
        assert_eq!(
            DeadlineStatus::of(&task("t", TaskPriority::Medium, None), now),
            None
        );
    }
}
