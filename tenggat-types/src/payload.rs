use chrono::{serde::ts_milliseconds_option, DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Task, TaskPriority, Title};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    pub title: Title,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        with = "ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
}

/// Replacement values for a task's mutable fields.
///
/// `description` and `deadline` are replaced as given, so `None` clears them.
/// A missing `priority` keeps the current one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditTask {
    pub title: Title,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        with = "ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
}

impl EditTask {
    /// Edit that keeps every field of `task` as it is.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            deadline: task.deadline,
            priority: Some(task.priority),
        }
    }
}

/// Answer to a bulk delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deleted {
    pub deleted: usize,
}

/// Outcome of a gateway connection test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestMessage {
    pub sent: bool,
}

/// Body of every non-2xx API response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_payload_accepts_minimal_body() {
        let payload: CreateTask = serde_json::from_value(json!({ "title": "Pay rent" })).unwrap();
        assert_eq!(payload.title.as_str(), "Pay rent");
        assert_eq!(payload.deadline, None);
        assert_eq!(payload.priority, None);
    }

    #[test]
    fn create_payload_rejects_blank_title() {
        assert!(serde_json::from_value::<CreateTask>(json!({ "title": "  " })).is_err());
    }

    #[test]
    fn edit_from_task_keeps_every_field() {
        let task = Task::generate(CreateTask {
            title: "Pay rent".parse().unwrap(),
            description: Some("flat 3B".into()),
            deadline: DateTime::from_timestamp_millis(1_700_000_000_000),
            priority: Some(TaskPriority::High),
        });

        let edit = EditTask::from_task(&task);
        assert_eq!(edit.title, task.title);
        assert_eq!(edit.description, task.description);
        assert_eq!(edit.deadline, task.deadline);
        assert_eq!(edit.priority, Some(TaskPriority::High));
    }
}
