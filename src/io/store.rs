//! The persistence boundary.
//!
//! The chart never writes tasks itself. It hands every change to a
//! [`TaskStore`] and replaces its cached copy with whatever the store
//! confirms.

use chrono::Utc;

use crate::error::{GanttError, Result};
use crate::model::{NewUser, Schedule, Task, TaskFormData, TaskId, TaskPatch, User, UserId};

pub trait TaskStore {
    /// All tasks ordered by start date, each with its assignee joined in.
    fn fetch_tasks(&self) -> Result<Vec<Task>>;

    /// All assignees ordered by name.
    fn fetch_users(&self) -> Result<Vec<User>>;

    fn create_task(&mut self, data: TaskFormData) -> Result<Task>;

    /// Apply a partial update and return the stored result.
    fn update_task(&mut self, id: TaskId, patch: &TaskPatch) -> Result<Task>;

    fn delete_task(&mut self, id: TaskId) -> Result<()>;

    fn add_user(&mut self, data: NewUser) -> Result<User>;

    /// Remove an assignee. Refused while any task is still assigned to them.
    fn remove_user(&mut self, id: UserId) -> Result<()>;
}

/// A store that lives entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    schedule: Schedule,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schedule(schedule: Schedule) -> Self {
        Self { schedule }
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    fn user(&self, id: UserId) -> Option<&User> {
        self.schedule.users.iter().find(|u| u.id == id)
    }

    fn require_user(&self, id: UserId) -> Result<()> {
        self.user(id).map(|_| ()).ok_or(GanttError::UserNotFound(id))
    }

    /// Copy of a stored task with its `user` field filled in.
    fn joined(&self, task: &Task) -> Task {
        let mut task = task.clone();
        task.user = self.user(task.assigned_to).cloned();
        task
    }
}

impl TaskStore for MemoryStore {
    fn fetch_tasks(&self) -> Result<Vec<Task>> {
        let mut tasks: Vec<Task> = self.schedule.tasks.iter().map(|t| self.joined(t)).collect();
        tasks.sort_by_key(|t| t.start_date);
        Ok(tasks)
    }

    fn fetch_users(&self) -> Result<Vec<User>> {
        let mut users = self.schedule.users.clone();
        users.sort_by_key(|u| u.name.to_lowercase());
        Ok(users)
    }

    fn create_task(&mut self, data: TaskFormData) -> Result<Task> {
        data.validate().map_err(GanttError::Invalid)?;
        self.require_user(data.assigned_to)?;

        let now = Utc::now();
        let mut task = data.into_task();
        task.created_at = Some(now);
        task.updated_at = Some(now);
        task.user = None;
        self.schedule.tasks.push(task.clone());
        self.schedule.touch();
        Ok(self.joined(&task))
    }

    fn update_task(&mut self, id: TaskId, patch: &TaskPatch) -> Result<Task> {
        if let Some(assignee) = patch.assigned_to {
            self.require_user(assignee)?;
        }
        let stored = self
            .schedule
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(GanttError::TaskNotFound(id))?;
        patch.apply(stored);
        stored.updated_at = Some(Utc::now());
        stored.user = None;
        let updated = stored.clone();
        self.schedule.touch();
        Ok(self.joined(&updated))
    }

    fn delete_task(&mut self, id: TaskId) -> Result<()> {
        let before = self.schedule.tasks.len();
        self.schedule.tasks.retain(|t| t.id != id);
        if self.schedule.tasks.len() == before {
            return Err(GanttError::TaskNotFound(id));
        }
        self.schedule.touch();
        Ok(())
    }

    fn add_user(&mut self, data: NewUser) -> Result<User> {
        let data = data
            .normalized()
            .ok_or(GanttError::Invalid("Assignee name is required"))?;
        let mut user = User::new(data.name, data.email);
        user.created_at = Some(Utc::now());
        self.schedule.users.push(user.clone());
        self.schedule.touch();
        Ok(user)
    }

    fn remove_user(&mut self, id: UserId) -> Result<()> {
        let name = self
            .user(id)
            .map(|u| u.name.clone())
            .ok_or(GanttError::UserNotFound(id))?;
        let count = self
            .schedule
            .tasks
            .iter()
            .filter(|t| t.assigned_to == id)
            .count();
        if count > 0 {
            return Err(GanttError::AssigneeHasTasks { name, count });
        }
        self.schedule.users.retain(|u| u.id != id);
        self.schedule.touch();
        Ok(())
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

    fn form(name: &str, start: u32, end: u32, assignee: UserId) -> TaskFormData {
        TaskFormData {
            name: name.into(),
            start_date: d(start),
            end_date: d(end),
            assigned_to: assignee,
            status: TaskStatus::Pending,
        }
    }

    fn store_with_user(name: &str) -> (MemoryStore, User) {
        let mut store = MemoryStore::new();
        let user = store
            .add_user(NewUser {
                name: name.into(),
                email: None,
            })
            .unwrap();
        (store, user)
    }

    #[test]
    fn fetch_orders_and_joins() {
        let (mut store, ana) = store_with_user("Ana");
        store.create_task(form("Later", 20, 22, ana.id)).unwrap();
        store.create_task(form("Sooner", 8, 10, ana.id)).unwrap();

        let tasks = store.fetch_tasks().unwrap();
        assert_eq!(tasks[0].name, "Sooner");
        assert_eq!(tasks[1].name, "Later");
        assert_eq!(tasks[0].user.as_ref().map(|u| u.name.as_str()), Some("Ana"));
        assert_eq!(tasks[0].duration, Some(3));
        // The stored copy never carries the joined user.
        assert!(store.schedule().tasks.iter().all(|t| t.user.is_none()));
    }

    #[test]
    fn users_sorted_by_name() {
        let mut store = MemoryStore::new();
        for name in ["carla", "Ana", "Bruno"] {
            store
                .add_user(NewUser {
                    name: name.into(),
                    email: None,
                })
                .unwrap();
        }
        let names: Vec<String> = store.fetch_users().unwrap().into_iter().map(|u| u.name).collect();
        assert_eq!(names, vec!["Ana", "Bruno", "carla"]);
    }

    #[test]
    fn update_reschedules_and_refreshes_duration() {
        let (mut store, ana) = store_with_user("Ana");
        let task = store.create_task(form("Build", 8, 10, ana.id)).unwrap();

        let updated = store
            .update_task(task.id, &TaskPatch::reschedule(d(11), d(15)))
            .unwrap();
        assert_eq!(updated.start_date, d(11));
        assert_eq!(updated.end_date, d(15));
        assert_eq!(updated.duration, Some(3));
        assert!(updated.updated_at.is_some());
    }

    #[test]
    fn update_to_unknown_assignee_is_refused() {
        let (mut store, ana) = store_with_user("Ana");
        let task = store.create_task(form("Build", 8, 10, ana.id)).unwrap();
        let patch = TaskPatch::reschedule(d(8), d(10)).with_assignee(uuid::Uuid::new_v4());
        assert!(matches!(
            store.update_task(task.id, &patch),
            Err(GanttError::UserNotFound(_))
        ));
        assert_eq!(store.fetch_tasks().unwrap()[0].assigned_to, ana.id);
    }

    #[test]
    fn missing_task_errors() {
        let mut store = MemoryStore::new();
        let id = uuid::Uuid::new_v4();
        assert!(matches!(store.delete_task(id), Err(GanttError::TaskNotFound(_))));
        assert!(matches!(
            store.update_task(id, &TaskPatch::default()),
            Err(GanttError::TaskNotFound(_))
        ));
    }

    #[test]
    fn remove_user_with_tasks_is_refused() {
        let (mut store, ana) = store_with_user("Ana");
        let task = store.create_task(form("Build", 8, 10, ana.id)).unwrap();

        assert!(matches!(
            store.remove_user(ana.id),
            Err(GanttError::AssigneeHasTasks { count: 1, .. })
        ));

        store.delete_task(task.id).unwrap();
        store.remove_user(ana.id).unwrap();
        assert!(store.fetch_users().unwrap().is_empty());
    }

    #[test]
    fn blank_names_are_rejected() {
        let mut store = MemoryStore::new();
        assert!(store
            .add_user(NewUser {
                name: "   ".into(),
                email: Some("x@example.com".into()),
            })
            .is_err());

        let (mut store, ana) = store_with_user("Ana");
        assert!(matches!(
            store.create_task(form(" ", 8, 10, ana.id)),
            Err(GanttError::Invalid(_))
        ));
    }
}
