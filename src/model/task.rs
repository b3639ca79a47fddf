use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::calendar::{calculate_working_days, local_date};
use super::user::{User, UserId};

pub type TaskId = Uuid;

/// Where a task is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }

    pub fn all() -> &'static [TaskStatus] {
        &[TaskStatus::Pending, TaskStatus::InProgress, TaskStatus::Done]
    }
}

/// A scheduled piece of work owned by one assignee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    /// First day of the task, inclusive.
    #[serde(with = "local_date")]
    pub start_date: NaiveDate,
    /// Last day of the task, inclusive.
    #[serde(with = "local_date")]
    pub end_date: NaiveDate,
    /// Working days between start and end, kept in sync by the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    pub assigned_to: UserId,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Assignee record joined in on fetch. Never the source of truth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl Task {
    pub fn new(
        name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        assigned_to: UserId,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            start_date,
            end_date,
            duration: Some(calculate_working_days(start_date, end_date)),
            assigned_to,
            status: TaskStatus::Pending,
            created_at: None,
            updated_at: None,
            user: None,
        }
    }

    /// Working days covered by the task's own range.
    pub fn working_days(&self) -> u32 {
        calculate_working_days(self.start_date, self.end_date)
    }

    fn refresh_duration(&mut self) {
        self.duration = Some(self.working_days());
    }
}

/// Payload of the create/edit form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskFormData {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub assigned_to: UserId,
    pub status: TaskStatus,
}

impl TaskFormData {
    pub fn from_task(task: &Task) -> Self {
        Self {
            name: task.name.clone(),
            start_date: task.start_date,
            end_date: task.end_date,
            assigned_to: task.assigned_to,
            status: task.status,
        }
    }

    /// Form-level checks; returns a message for the first failing field.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("Name is required");
        }
        if self.end_date < self.start_date {
            return Err("End date must not be before the start date");
        }
        Ok(())
    }

    pub fn into_task(self) -> Task {
        let mut task = Task::new(self.name.trim(), self.start_date, self.end_date, self.assigned_to);
        task.status = self.status;
        task
    }
}

/// Partial update sent to the store. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    pub fn reschedule(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date: Some(start_date),
            end_date: Some(end_date),
            ..Default::default()
        }
    }

    pub fn from_form(form: &TaskFormData) -> Self {
        Self {
            name: Some(form.name.trim().to_string()),
            start_date: Some(form.start_date),
            end_date: Some(form.end_date),
            assigned_to: Some(form.assigned_to),
            status: Some(form.status),
        }
    }

    pub fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assigned_to = Some(assignee);
        self
    }

    /// Write the set fields into `task` and refresh its cached duration.
    pub fn apply(&self, task: &mut Task) {
        if let Some(name) = &self.name {
            task.name = name.clone();
        }
        if let Some(start) = self.start_date {
            task.start_date = start;
        }
        if let Some(end) = self.end_date {
            task.end_date = end;
        }
        if let Some(assignee) = self.assigned_to {
            if assignee != task.assigned_to {
                task.user = None;
            }
            task.assigned_to = assignee;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        task.refresh_duration();
    }
}
