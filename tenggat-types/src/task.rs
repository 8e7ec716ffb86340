use std::collections::BTreeMap;

use chrono::{
    serde::{ts_milliseconds, ts_milliseconds_option},
    DateTime, SubsecRound, TimeDelta, Utc,
};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

use crate::{CreateTask, Title};

/// Threshold keys that already fired for the task's current deadline.
pub type RemindersSent = BTreeMap<String, bool>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: Title,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        with = "ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub completed: bool,
    #[serde(with = "ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub reminders_sent: RemindersSent,
}

impl Task {
    pub fn generate(payload: CreateTask) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: payload.title,
            description: payload.description,
            deadline: payload.deadline,
            priority: payload.priority.unwrap_or_default(),
            completed: false,
            created_at: now_millis(),
            reminders_sent: RemindersSent::new(),
        }
    }

    /// Time until the deadline, negative once it has passed.
    pub fn time_left(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        self.deadline.map(|deadline| deadline - now)
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.deadline.is_some_and(|deadline| deadline < now)
    }

    pub fn reminder_sent(&self, key: &str) -> bool {
        self.reminders_sent.get(key).copied().unwrap_or(false)
    }
}

/// Current time truncated to the millisecond precision tasks are stored with.
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    High,
    #[default]
    Medium,
    Low,
}

impl TaskPriority {
    /// Ordering weight, higher sorts first.
    pub fn weight(self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create(title: &str) -> CreateTask {
        CreateTask {
            title: title.parse().unwrap(),
            description: None,
            deadline: None,
            priority: None,
        }
    }

    #[test]
    fn generated_task_starts_open_with_medium_priority() {
        let task = Task::generate(create("Pay rent"));
        assert!(!task.completed);
        assert!(task.reminders_sent.is_empty());
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.created_at.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn timestamps_serialize_as_epoch_millis() {
        let mut task = Task::generate(create("Pay rent"));
        task.deadline = DateTime::from_timestamp_millis(1_700_000_000_123);
        task.created_at = DateTime::from_timestamp_millis(1_600_000_000_000).unwrap();

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["deadline"], json!(1_700_000_000_123_i64));
        assert_eq!(value["createdAt"], json!(1_600_000_000_000_i64));
        assert_eq!(value["priority"], json!("medium"));
        assert_eq!(value["remindersSent"], json!({}));
    }

    #[test]
    fn missing_optional_fields_deserialize_to_defaults() {
        let task: Task = serde_json::from_value(json!({
            "id": "8f0e3d52-0e4c-4f43-9e39-3bb1c5ad8f3e",
            "title": "Old task",
            "createdAt": 1_600_000_000_000_i64,
        }))
        .unwrap();

        assert_eq!(task.deadline, None);
        assert_eq!(task.description, None);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert!(!task.completed);
        assert!(task.reminders_sent.is_empty());
    }

    #[test]
    fn overdue_requires_open_task_with_past_deadline() {
        let now = Utc::now();
        let mut task = Task::generate(create("Pay rent"));
        assert!(!task.is_overdue(now));

        task.deadline = Some(now - TimeDelta::minutes(1));
        assert!(task.is_overdue(now));
        assert_eq!(task.time_left(now), Some(TimeDelta::minutes(-1)));

        task.completed = true;
        assert!(!task.is_overdue(now));
    }

    #[test]
    fn priority_parses_from_cli_strings() {
        assert_eq!("high".parse::<TaskPriority>().unwrap(), TaskPriority::High);
        assert_eq!(TaskPriority::Low.to_string(), "low");
        assert!(TaskPriority::High.weight() > TaskPriority::Medium.weight());
    }
}
