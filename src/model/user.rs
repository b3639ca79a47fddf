use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type UserId = Uuid;

/// A person tasks can be assigned to. Each one gets a lane in the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(name: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email,
            created_at: None,
        }
    }
}

/// Data collected by the "add assignee" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: Option<String>,
}

impl NewUser {
    /// Trimmed copy, or `None` when the name is blank. Blank emails become `None`.
    pub fn normalized(&self) -> Option<NewUser> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }
        let email = self
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string);
        Some(NewUser {
            name: name.to_string(),
            email,
        })
    }
}
