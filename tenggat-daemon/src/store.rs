use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tenggat_types::{CreateTask, EditTask, ReminderSettings, Task};
use uuid::Uuid;

use crate::storage::{StateStorage, StoreState};

/// Owner of all tasks and reminder settings.
///
/// Every mutation runs under one lock and is saved before the lock is
/// released. Operations on unknown ids change nothing and return `None`.
#[derive(Clone)]
pub struct Store {
    state: Arc<Mutex<StoreState>>,
    storage: Arc<dyn StateStorage>,
}

impl Store {
    /// Load the saved state, starting empty when there is none or it is unreadable.
    pub fn open<S>(storage: S) -> Self
    where
        S: StateStorage + 'static,
    {
        let state = match storage.load() {
            Ok(Some(state)) => {
                tracing::info!("Loaded {} tasks", state.tasks.len());
                state
            }
            Ok(None) => StoreState::default(),
            Err(error) => {
                tracing::warn!("Starting with empty state: {error:?}");
                StoreState::default()
            }
        };

        Self {
            state: Arc::new(Mutex::new(state)),
            storage: Arc::new(storage),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn mutate<T>(&self, apply: impl FnOnce(&mut StoreState) -> T) -> T {
        let mut state = self.lock();
        let result = apply(&mut state);

        if let Err(error) = self.storage.save(&state) {
            tracing::error!("Failed to persist state: {error:?}");
        }

        result
    }

    fn mutate_task(&self, id: Uuid, apply: impl FnOnce(&mut Task)) -> Option<Task> {
        self.mutate(|state| {
            let task = state.tasks.iter_mut().find(|task| task.id == id)?;
            apply(task);
            Some(task.clone())
        })
    }

    pub fn snapshot(&self) -> StoreState {
        self.lock().clone()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.lock().tasks.clone()
    }

    pub fn find_task(&self, id: Uuid) -> Option<Task> {
        self.lock().tasks.iter().find(|task| task.id == id).cloned()
    }

    pub fn settings(&self) -> ReminderSettings {
        self.lock().settings.clone()
    }

    pub fn add_task(&self, payload: CreateTask) -> Task {
        let task = Task::generate(payload);
        self.mutate(|state| state.tasks.insert(0, task.clone()));
        task
    }

    pub fn toggle_task(&self, id: Uuid) -> Option<Task> {
        self.mutate_task(id, |task| task.completed = !task.completed)
    }

    pub fn edit_task(&self, id: Uuid, edit: EditTask) -> Option<Task> {
        self.mutate_task(id, |task| {
            if edit.deadline != task.deadline {
                task.reminders_sent.clear();
            }

            task.title = edit.title;
            task.description = edit.description;
            task.deadline = edit.deadline;
            if let Some(priority) = edit.priority {
                task.priority = priority;
            }
        })
    }

    pub fn delete_task(&self, id: Uuid) -> Option<Task> {
        self.mutate(|state| {
            let index = state.tasks.iter().position(|task| task.id == id)?;
            Some(state.tasks.remove(index))
        })
    }

    /// Remove every task, keeping the settings. Returns how many were removed.
    pub fn delete_all_tasks(&self) -> usize {
        self.mutate(|state| std::mem::take(&mut state.tasks).len())
    }

    pub fn update_settings(&self, settings: ReminderSettings) {
        self.mutate(|state| state.settings = settings);
    }

    pub fn mark_reminder_sent(&self, id: Uuid, key: &str) -> Option<Task> {
        self.mutate_task(id, |task| {
            if task.deadline.is_some() {
                task.reminders_sent.insert(key.to_string(), true);
            }
        })
    }

    /// Mark `key` only if the task still has the deadline the reminder was
    /// computed for. A deadline edited while a send was in flight already
    /// started a fresh set of thresholds.
    pub fn mark_reminder_sent_for_deadline(
        &self,
        id: Uuid,
        key: &str,
        deadline: DateTime<Utc>,
    ) -> Option<Task> {
        self.mutate(|state| {
            let task = state
                .tasks
                .iter_mut()
                .find(|task| task.id == id && task.deadline == Some(deadline))?;
            task.reminders_sent.insert(key.to_string(), true);
            Some(task.clone())
        })
    }
}
