use super::task::Task;
use super::user::{User, UserId};

/// One horizontal band of the chart: an assignee and their tasks.
#[derive(Debug, Clone, PartialEq)]
pub struct Lane<'a> {
    /// Drop target identity. Always the assignee's id, never a position.
    pub assignee: UserId,
    pub label: String,
    /// False when tasks point at an assignee missing from the user list.
    pub known: bool,
    pub tasks: Vec<&'a Task>,
}

/// Split tasks into lanes.
///
/// Every known user gets a lane in the given order, even without tasks.
/// Tasks whose assignee is not in `users` get extra lanes appended in
/// first-seen order. Tasks keep their input order within a lane.
pub fn group_by_assignee<'a>(tasks: &'a [Task], users: &[User]) -> Vec<Lane<'a>> {
    let mut lanes: Vec<Lane<'a>> = users
        .iter()
        .map(|user| Lane {
            assignee: user.id,
            label: user.name.clone(),
            known: true,
            tasks: Vec::new(),
        })
        .collect();

    for task in tasks {
        match lanes.iter_mut().find(|lane| lane.assignee == task.assigned_to) {
            Some(lane) => lane.tasks.push(task),
            None => lanes.push(Lane {
                assignee: task.assigned_to,
                label: fallback_label(task),
                known: false,
                tasks: vec![task],
            }),
        }
    }

    lanes
}

fn fallback_label(task: &Task) -> String {
    match &task.user {
        Some(user) if user.id == task.assigned_to => user.name.clone(),
        _ => {
            let id = task.assigned_to.simple().to_string();
            format!("User {}", &id[..8])
        }
    }
}
