use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::io::store::{MemoryStore, TaskStore};
use crate::model::{NewUser, Schedule, Task, TaskFormData, TaskId, TaskPatch, User, UserId};

/// Save a schedule to a JSON file.
pub fn save_schedule(schedule: &Schedule, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(schedule)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Load a schedule from a JSON file, skipping task records that don't parse.
///
/// Returns the schedule and how many task records were dropped.
pub fn load_schedule(path: &Path) -> Result<(Schedule, usize)> {
    let json = std::fs::read_to_string(path)?;
    Ok(Schedule::from_json_lenient(&json)?)
}

/// A [`TaskStore`] backed by one JSON document on disk.
///
/// The whole document is rewritten after every successful change. If the
/// write fails the change is rolled back in memory too.
pub struct JsonStore {
    path: PathBuf,
    inner: MemoryStore,
    is_new: bool,
}

impl JsonStore {
    /// Open the document at `path`, starting empty when it does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            log::info!("no schedule at {:?}, starting empty", path);
            return Ok(Self {
                path,
                inner: MemoryStore::new(),
                is_new: true,
            });
        }

        let (schedule, skipped) = load_schedule(&path)?;
        if skipped > 0 {
            log::warn!("{} task record(s) in {:?} could not be read", skipped, path);
        }
        log::info!(
            "loaded {} task(s) and {} assignee(s) from {:?}",
            schedule.tasks.len(),
            schedule.users.len(),
            path
        );
        Ok(Self {
            path,
            inner: MemoryStore::with_schedule(schedule),
            is_new: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when the file did not exist at open time.
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    fn mutate<T>(&mut self, op: impl FnOnce(&mut MemoryStore) -> Result<T>) -> Result<T> {
        let snapshot = self.inner.clone();
        let value = op(&mut self.inner)?;
        if let Err(e) = save_schedule(self.inner.schedule(), &self.path) {
            log::error!("failed to write {:?}: {}", self.path, e);
            self.inner = snapshot;
            return Err(e);
        }
        self.is_new = false;
        Ok(value)
    }
}

impl TaskStore for JsonStore {
    fn fetch_tasks(&self) -> Result<Vec<Task>> {
        self.inner.fetch_tasks()
    }

    fn fetch_users(&self) -> Result<Vec<User>> {
        self.inner.fetch_users()
    }

    fn create_task(&mut self, data: TaskFormData) -> Result<Task> {
        self.mutate(|s| s.create_task(data))
    }

    fn update_task(&mut self, id: TaskId, patch: &TaskPatch) -> Result<Task> {
        self.mutate(|s| s.update_task(id, patch))
    }

    fn delete_task(&mut self, id: TaskId) -> Result<()> {
        self.mutate(|s| s.delete_task(id))
    }

    fn add_user(&mut self, data: NewUser) -> Result<User> {
        self.mutate(|s| s.add_user(data))
    }

    fn remove_user(&mut self, id: UserId) -> Result<()> {
        self.mutate(|s| s.remove_user(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskStatus;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn changes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("schedule.json");

        let task_id = {
            let mut store = JsonStore::open(&path).unwrap();
            assert!(store.is_new());
            let ana = store
                .add_user(NewUser {
                    name: "Ana".into(),
                    email: Some("ana@example.com".into()),
                })
                .unwrap();
            let task = store
                .create_task(TaskFormData {
                    name: "Build".into(),
                    start_date: d(8),
                    end_date: d(10),
                    assigned_to: ana.id,
                    status: TaskStatus::InProgress,
                })
                .unwrap();
            store
                .update_task(task.id, &TaskPatch::reschedule(d(15), d(17)))
                .unwrap();
            task.id
        };

        let store = JsonStore::open(&path).unwrap();
        assert!(!store.is_new());
        let tasks = store.fetch_tasks().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, task_id);
        assert_eq!(tasks[0].start_date, d(15));
        assert_eq!(tasks[0].end_date, d(17));
        assert_eq!(tasks[0].status, TaskStatus::InProgress);
        assert_eq!(tasks[0].user.as_ref().map(|u| u.name.as_str()), Some("Ana"));
    }

    #[test]
    fn file_stores_plain_dates_without_joined_user() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.json");
        let mut store = JsonStore::open(&path).unwrap();
        let ana = store
            .add_user(NewUser {
                name: "Ana".into(),
                email: None,
            })
            .unwrap();
        store
            .create_task(TaskFormData {
                name: "Build".into(),
                start_date: d(8),
                end_date: d(10),
                assigned_to: ana.id,
                status: TaskStatus::Pending,
            })
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["tasks"][0]["start_date"], "2024-01-08");
        assert!(raw["tasks"][0].get("user").is_none());
    }

    #[test]
    fn failed_operation_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.json");
        let mut store = JsonStore::open(&path).unwrap();
        assert!(store.remove_user(uuid::Uuid::new_v4()).is_err());
        assert!(!path.exists());
    }
}
