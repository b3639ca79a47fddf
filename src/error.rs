use thiserror::Error;

use crate::model::{TaskId, UserId};

/// Everything that can go wrong outside of pure layout code.
#[derive(Debug, Error)]
pub enum GanttError {
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("task {0} not found")]
    TaskNotFound(TaskId),

    #[error("assignee {0} not found")]
    UserNotFound(UserId),

    #[error("{0}")]
    Invalid(&'static str),

    #[error("assignee '{name}' still has {count} task(s)")]
    AssigneeHasTasks { name: String, count: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse settings: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("failed to write settings: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, GanttError>;
