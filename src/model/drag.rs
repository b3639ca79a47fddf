//! Drag state machine for task bars.
//!
//! Two gestures exist and only one can run at a time:
//!
//! - **Reposition**: press on a bar and move horizontally. Every move that
//!   lands on a new day produces a [`TaskUpdate`] with new dates.
//! - **Transfer**: pick the bar up by its grip and drop it on another lane.
//!   The drop produces dates from the drop position plus the lane's assignee.
//!
//! The controller knows nothing about widgets. The chart feeds it pointer
//! x-coordinates and the timeline's geometry as read at event time, and calls
//! [`DragController::pointer_up`] whenever the button is released anywhere,
//! which ends any session.

use chrono::NaiveDate;

use super::calendar::{add_working_days, calculate_working_days};
use super::task::{Task, TaskId, TaskPatch};
use super::timeline::DateWindow;
use super::user::UserId;

/// Screen-space horizontal extent of the timeline's day columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineGeometry {
    /// x of the first day column's left edge.
    pub left: f32,
    pub width: f32,
}

impl TimelineGeometry {
    fn is_usable(&self) -> bool {
        self.left.is_finite() && self.width.is_finite() && self.width > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragGesture {
    Reposition,
    Transfer,
}

/// State of one in-progress drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub task_id: TaskId,
    pub gesture: DragGesture,
    pub original_start: NaiveDate,
    pub original_end: NaiveDate,
    pub original_assignee: UserId,
    /// Working days the task covered when it was picked up.
    pub working_days: u32,
    /// Pointer x minus the bar's left edge at press time.
    pub grab_offset: f32,
    /// Lane currently under the pointer during a transfer.
    pub target_lane: Option<UserId>,
    last_emitted: Option<(NaiveDate, NaiveDate)>,
}

impl DragSession {
    fn new(task: &Task, gesture: DragGesture, grab_offset: f32) -> Self {
        Self {
            task_id: task.id,
            gesture,
            original_start: task.start_date,
            original_end: task.end_date,
            original_assignee: task.assigned_to,
            working_days: calculate_working_days(task.start_date, task.end_date),
            grab_offset,
            target_lane: None,
            last_emitted: None,
        }
    }

    /// Dates the task would get if released at `pointer_x`.
    ///
    /// The end date keeps the original working-day length. Returns `None`
    /// when the geometry cannot be used.
    pub fn candidate(
        &self,
        pointer_x: f32,
        geometry: Option<TimelineGeometry>,
        window: &DateWindow,
    ) -> Option<(NaiveDate, NaiveDate)> {
        let geometry = geometry.filter(TimelineGeometry::is_usable)?;
        if !pointer_x.is_finite() || window.day_width <= 0.0 {
            return None;
        }
        let x = pointer_x - geometry.left - self.grab_offset;
        let start = window.date_at_index(window.day_index_at(x));
        if start == self.original_start {
            return Some((self.original_start, self.original_end));
        }
        let end = add_working_days(start, self.working_days.saturating_sub(1));
        Some((start, end))
    }
}

/// A reschedule or reassignment request for the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskUpdate {
    pub task_id: TaskId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub assigned_to: Option<UserId>,
}

impl TaskUpdate {
    pub fn to_patch(&self) -> TaskPatch {
        let patch = TaskPatch::reschedule(self.start_date, self.end_date);
        match self.assigned_to {
            Some(assignee) => patch.with_assignee(assignee),
            None => patch,
        }
    }
}

/// Owns at most one [`DragSession`].
#[derive(Debug, Default)]
pub struct DragController {
    session: Option<DragSession>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn active_task(&self) -> Option<TaskId> {
        self.session.as_ref().map(|s| s.task_id)
    }

    /// Start tracking the pointer for `task`. Ignored while another drag runs.
    pub fn begin_reposition(&mut self, task: &Task, grab_offset: f32) -> bool {
        self.begin(task, DragGesture::Reposition, grab_offset)
    }

    /// Pick `task` up for a drop on another lane. Ignored while another drag runs.
    pub fn begin_transfer(&mut self, task: &Task) -> bool {
        self.begin(task, DragGesture::Transfer, 0.0)
    }

    fn begin(&mut self, task: &Task, gesture: DragGesture, grab_offset: f32) -> bool {
        if let Some(active) = &self.session {
            log::debug!(
                "ignoring {:?} on task {}: task {} is already being dragged",
                gesture,
                task.id,
                active.task_id
            );
            return false;
        }
        log::debug!("{:?} drag started on task {}", gesture, task.id);
        self.session = Some(DragSession::new(task, gesture, grab_offset));
        true
    }

    /// Feed a pointer position during a reposition drag.
    ///
    /// Returns an update only when the candidate dates differ from the last
    /// ones emitted in this session.
    pub fn pointer_move(
        &mut self,
        pointer_x: f32,
        geometry: Option<TimelineGeometry>,
        window: &DateWindow,
    ) -> Option<TaskUpdate> {
        let session = self.session.as_mut()?;
        if session.gesture != DragGesture::Reposition {
            return None;
        }
        let candidate = session.candidate(pointer_x, geometry, window)?;
        let previous = session
            .last_emitted
            .unwrap_or((session.original_start, session.original_end));
        if candidate == previous {
            return None;
        }
        session.last_emitted = Some(candidate);
        Some(TaskUpdate {
            task_id: session.task_id,
            start_date: candidate.0,
            end_date: candidate.1,
            assigned_to: None,
        })
    }

    /// Record which lane a transfer is hovering.
    pub fn hover_lane(&mut self, assignee: UserId) {
        if let Some(session) = self.session.as_mut() {
            if session.gesture == DragGesture::Transfer {
                session.target_lane = Some(assignee);
            }
        }
    }

    /// Finish a transfer over `assignee`'s lane.
    ///
    /// The session ends whether or not an update comes out of it.
    pub fn drop_on_lane(
        &mut self,
        assignee: UserId,
        pointer_x: f32,
        geometry: Option<TimelineGeometry>,
        window: &DateWindow,
    ) -> Option<TaskUpdate> {
        let session = match self.session.take() {
            Some(s) if s.gesture == DragGesture::Transfer => s,
            other => {
                self.session = other;
                return None;
            }
        };
        let (start_date, end_date) = session.candidate(pointer_x, geometry, window)?;
        if assignee == session.original_assignee && start_date == session.original_start {
            log::debug!("task {} dropped where it was", session.task_id);
            return None;
        }
        log::debug!(
            "task {} dropped on lane {} at {}",
            session.task_id,
            assignee,
            start_date
        );
        Some(TaskUpdate {
            task_id: session.task_id,
            start_date,
            end_date,
            assigned_to: Some(assignee),
        })
    }

    /// End whatever session is active. Safe to call at any time.
    pub fn pointer_up(&mut self) -> Option<DragSession> {
        let ended = self.session.take();
        if let Some(session) = &ended {
            log::debug!("{:?} drag on task {} ended", session.gesture, session.task_id);
        }
        ended
    }

    /// Abort the active session without emitting anything.
    pub fn cancel(&mut self) {
        if self.pointer_up().is_some() {
            log::debug!("drag cancelled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartConfig;
    use uuid::Uuid;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    const LEFT: f32 = 250.0;

    fn geometry(window: &DateWindow) -> Option<TimelineGeometry> {
        Some(TimelineGeometry {
            left: LEFT,
            width: window.total_width(),
        })
    }

    fn setup() -> (Task, DateWindow) {
        let task = Task::new("Build", d(2024, 1, 8), d(2024, 1, 10), Uuid::new_v4());
        let window = DateWindow::derive(
            std::slice::from_ref(&task),
            None,
            d(2024, 1, 1),
            &ChartConfig::default(),
        );
        (task, window)
    }

    /// Screen x of the bar's left edge plus a grab point inside the bar.
    fn press_x(task: &Task, window: &DateWindow, grab: f32) -> f32 {
        LEFT + window.position(task).offset + grab
    }

    #[test]
    fn one_week_drag_keeps_working_days() {
        let (task, window) = setup();
        let mut drag = DragController::new();
        let grab = 12.0;
        assert!(drag.begin_reposition(&task, grab));

        let x = press_x(&task, &window, grab) + 7.0 * window.day_width;
        let update = drag.pointer_move(x, geometry(&window), &window).unwrap();

        assert_eq!(update.task_id, task.id);
        assert_eq!(update.start_date, d(2024, 1, 15));
        assert_eq!(update.end_date, d(2024, 1, 17));
        assert_eq!(update.assigned_to, None);
        assert_eq!(
            calculate_working_days(update.start_date, update.end_date),
            3
        );
    }

    #[test]
    fn moves_within_the_same_day_emit_once() {
        let (task, window) = setup();
        let mut drag = DragController::new();
        drag.begin_reposition(&task, 0.0);
        let base = press_x(&task, &window, 0.0);

        // Jitter that rounds back to the original day does nothing.
        assert!(drag
            .pointer_move(base + window.day_width * 0.3, geometry(&window), &window)
            .is_none());

        let first = drag.pointer_move(base + window.day_width, geometry(&window), &window);
        let again = drag.pointer_move(base + window.day_width * 1.2, geometry(&window), &window);
        assert!(first.is_some());
        assert!(again.is_none());
    }

    #[test]
    fn crossing_a_weekend_stretches_the_calendar_span() {
        let (task, window) = setup();
        let mut drag = DragController::new();
        drag.begin_reposition(&task, 0.0);
        // Mon 8 -> Thu 11: Thu, Fri, Mon.
        let x = press_x(&task, &window, 0.0) + 3.0 * window.day_width;
        let update = drag.pointer_move(x, geometry(&window), &window).unwrap();
        assert_eq!(update.start_date, d(2024, 1, 11));
        assert_eq!(update.end_date, d(2024, 1, 15));
    }

    #[test]
    fn second_press_is_ignored() {
        let (task, _window) = setup();
        let other = Task::new("Other", d(2024, 1, 9), d(2024, 1, 9), Uuid::new_v4());
        let mut drag = DragController::new();
        assert!(drag.begin_reposition(&task, 0.0));
        assert!(!drag.begin_reposition(&other, 0.0));
        assert!(!drag.begin_transfer(&other));
        assert_eq!(drag.active_task(), Some(task.id));
    }

    #[test]
    fn pointer_up_always_clears_and_is_idempotent() {
        let (task, _window) = setup();
        let mut drag = DragController::new();
        drag.begin_reposition(&task, 0.0);
        assert!(drag.pointer_up().is_some());
        assert!(!drag.is_dragging());
        assert!(drag.pointer_up().is_none());
        assert!(drag.begin_transfer(&task));
    }

    #[test]
    fn missing_geometry_is_a_no_op() {
        let (task, window) = setup();
        let mut drag = DragController::new();
        drag.begin_reposition(&task, 0.0);
        assert!(drag.pointer_move(900.0, None, &window).is_none());
        let zero = Some(TimelineGeometry {
            left: LEFT,
            width: 0.0,
        });
        assert!(drag.pointer_move(900.0, zero, &window).is_none());
        assert!(drag.is_dragging());
    }

    #[test]
    fn move_without_session_does_nothing() {
        let (_task, window) = setup();
        let mut drag = DragController::new();
        assert!(drag.pointer_move(400.0, geometry(&window), &window).is_none());
    }

    #[test]
    fn drop_on_other_lane_reassigns() {
        let (task, window) = setup();
        let target = Uuid::new_v4();
        let mut drag = DragController::new();
        assert!(drag.begin_transfer(&task));
        drag.hover_lane(target);
        assert_eq!(drag.session().and_then(|s| s.target_lane), Some(target));

        let x = LEFT + window.date_to_x(d(2024, 1, 15));
        let update = drag
            .drop_on_lane(target, x, geometry(&window), &window)
            .unwrap();

        assert_eq!(update.assigned_to, Some(target));
        assert_eq!(update.start_date, d(2024, 1, 15));
        assert_eq!(update.end_date, d(2024, 1, 17));
        assert!(!drag.is_dragging());

        let patch = update.to_patch();
        assert_eq!(patch.assigned_to, Some(target));
        assert!(patch.name.is_none());
        assert!(patch.status.is_none());
    }

    #[test]
    fn drop_without_geometry_still_ends_the_session() {
        let (task, window) = setup();
        let mut drag = DragController::new();
        drag.begin_transfer(&task);
        assert!(drag.drop_on_lane(Uuid::new_v4(), 300.0, None, &window).is_none());
        assert!(!drag.is_dragging());
    }

    #[test]
    fn drop_in_place_emits_nothing() {
        let (task, window) = setup();
        let mut drag = DragController::new();
        drag.begin_transfer(&task);
        let x = LEFT + window.date_to_x(task.start_date);
        assert!(drag
            .drop_on_lane(task.assigned_to, x, geometry(&window), &window)
            .is_none());
    }

    #[test]
    fn reposition_session_ignores_drops_and_transfer_ignores_moves() {
        let (task, window) = setup();
        let mut drag = DragController::new();

        drag.begin_reposition(&task, 0.0);
        assert!(drag
            .drop_on_lane(Uuid::new_v4(), 900.0, geometry(&window), &window)
            .is_none());
        assert!(drag.is_dragging());
        drag.pointer_up();

        drag.begin_transfer(&task);
        assert!(drag.pointer_move(900.0, geometry(&window), &window).is_none());
        assert!(drag.is_dragging());
    }

    #[test]
    fn weekend_only_task_keeps_a_single_day() {
        let saturday = d(2024, 1, 13);
        let task = Task::new("Deploy", saturday, d(2024, 1, 14), Uuid::new_v4());
        let window = DateWindow::derive(
            std::slice::from_ref(&task),
            None,
            d(2024, 1, 1),
            &ChartConfig::default(),
        );
        let mut drag = DragController::new();
        drag.begin_reposition(&task, 0.0);
        let x = LEFT + window.position(&task).offset + 2.0 * window.day_width;
        let update = drag.pointer_move(x, geometry(&window), &window).unwrap();
        assert_eq!(update.start_date, d(2024, 1, 15));
        assert_eq!(update.end_date, d(2024, 1, 15));
    }
}
