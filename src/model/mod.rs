pub mod calendar;
pub mod drag;
pub mod grouping;
pub mod schedule;
pub mod task;
pub mod timeline;
pub mod user;

pub use drag::{DragController, TaskUpdate, TimelineGeometry};
pub use grouping::{group_by_assignee, Lane};
pub use schedule::Schedule;
pub use task::{Task, TaskFormData, TaskId, TaskPatch, TaskStatus};
pub use timeline::{DateWindow, TaskPosition, WindowOverride};
pub use user::{NewUser, User, UserId};
