use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::task::Task;
use super::user::User;

/// The persisted document: every assignee and every task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub users: Vec<User>,
    pub tasks: Vec<Task>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            tasks: Vec::new(),
            created: Utc::now(),
            modified: Utc::now(),
        }
    }
}

/// Same shape as [`Schedule`] with tasks left undecoded, so one bad record
/// does not take the whole document down.
#[derive(Deserialize)]
struct LenientSchedule {
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    tasks: Vec<serde_json::Value>,
    created: Option<DateTime<Utc>>,
    modified: Option<DateTime<Utc>>,
}

impl Schedule {
    /// Touch the modified timestamp.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }

    /// Decode a document, dropping tasks that fail to parse (bad dates,
    /// missing fields). Returns the schedule and the number of dropped tasks.
    pub fn from_json_lenient(json: &str) -> serde_json::Result<(Self, usize)> {
        let raw: LenientSchedule = serde_json::from_str(json)?;
        let mut skipped = 0;
        let mut tasks = Vec::with_capacity(raw.tasks.len());
        for (i, value) in raw.tasks.into_iter().enumerate() {
            match serde_json::from_value::<Task>(value) {
                Ok(task) => tasks.push(task),
                Err(e) => {
                    log::warn!("skipping task record #{}: {}", i, e);
                    skipped += 1;
                }
            }
        }
        let now = Utc::now();
        Ok((
            Self {
                users: raw.users,
                tasks,
                created: raw.created.unwrap_or(now),
                modified: raw.modified.unwrap_or(now),
            },
            skipped,
        ))
    }
}
