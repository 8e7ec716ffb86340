use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tenggat_types::{ReminderSettings, Task};

/// Key the whole store state is saved under.
pub const NAMESPACE: &str = "todo-storage";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreState {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub settings: ReminderSettings,
}

/// Durable home of the store state.
pub trait StateStorage: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> anyhow::Result<Option<StoreState>>;
    fn save(&self, state: &StoreState) -> anyhow::Result<()>;
}

/// One JSON document per namespace inside a state directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>, key: &str) -> Self {
        Self {
            path: dir.into().join(format!("{key}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStorage for FileStorage {
    fn load(&self) -> anyhow::Result<Option<StoreState>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => {
                return Err(error).context(format!("Failed to read {}", self.path.display()))
            }
        };

        let state = serde_json::from_slice(&bytes)
            .context(format!("Failed to parse {}", self.path.display()))?;

        Ok(Some(state))
    }

    fn save(&self, state: &StoreState) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create state directory")?;
        }

        let json = serde_json::to_vec_pretty(state)?;
        let partial = self.path.with_extension("json.tmp");
        fs::write(&partial, json).context(format!("Failed to write {}", partial.display()))?;
        fs::rename(&partial, &self.path)
            .context(format!("Failed to replace {}", self.path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
pub mod memory {
    use super::{StateStorage, StoreState};
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    pub struct MemoryStorage {
        pub state: Mutex<Option<StoreState>>,
        pub fail_saves: bool,
    }

    impl MemoryStorage {
        pub fn failing() -> Self {
            Self {
                fail_saves: true,
                ..Self::default()
            }
        }
    }

    impl StateStorage for MemoryStorage {
        fn load(&self) -> anyhow::Result<Option<StoreState>> {
            Ok(self.state.lock().unwrap().clone())
        }

        fn save(&self, state: &StoreState) -> anyhow::Result<()> {
            if self.fail_saves {
                anyhow::bail!("disk full")
            }
            *self.state.lock().unwrap() = Some(state.clone());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenggat_types::CreateTask;

    fn sample_state() -> StoreState {
        StoreState {
            tasks: vec![Task::generate(CreateTask {
                title: "Pay rent".parse().unwrap(),
                description: None,
                deadline: None,
                priority: None,
            })],
            settings: ReminderSettings {
                send_token: "token".into(),
                target_address: "081234567890".into(),
            },
        }
    }

    #[test]
    fn missing_file_loads_as_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path(), NAMESPACE);
        assert_eq!(storage.load().unwrap(), None);
    }

    #[test]
    fn saved_state_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"), NAMESPACE);
        let state = sample_state();

        storage.save(&state).unwrap();
        assert!(storage.path().ends_with("todo-storage.json"));
        assert_eq!(storage.load().unwrap(), Some(state));
    }

    #[test]
    fn garbage_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path(), NAMESPACE);
        fs::write(storage.path(), b"{ not json").unwrap();
        assert!(storage.load().is_err());
    }
}
