//! End-to-end scheduling flows: layout, drag, and store working together.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use pretty_assertions::assert_eq;
use team_gantt::config::ChartConfig;
use team_gantt::io::{MemoryStore, TaskStore};
use team_gantt::model::calendar::calculate_working_days;
use team_gantt::model::{
    group_by_assignee, DateWindow, DragController, NewUser, TaskFormData, TaskStatus, TimelineGeometry, User,
};

const LEFT: f32 = 280.0;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn add_user(store: &mut MemoryStore, name: &str) -> User {
    store
        .add_user(NewUser {
            name: name.into(),
            email: None,
        })
        .unwrap()
}

fn geometry(window: &DateWindow) -> Option<TimelineGeometry> {
    Some(TimelineGeometry {
        left: LEFT,
        width: window.total_width(),
    })
}

#[test]
fn dragging_a_bar_one_week_reschedules_through_the_store() {
    let mut store = MemoryStore::new();
    let ana = add_user(&mut store, "Ana");
    store
        .create_task(TaskFormData {
            name: "Build".into(),
            start_date: d(2024, 1, 8),
            end_date: d(2024, 1, 10),
            assigned_to: ana.id,
            status: TaskStatus::InProgress,
        })
        .unwrap();

    let tasks = store.fetch_tasks().unwrap();
    let window = DateWindow::derive(&tasks, None, d(2024, 1, 1), &ChartConfig::default());
    let task = &tasks[0];

    let mut drag = DragController::new();
    let grab = 0.4 * window.day_width;
    assert!(drag.begin_reposition(task, grab));

    // Walk the pointer across the week, one day at a time.
    let press = LEFT + window.position(task).offset + grab;
    let mut last = None;
    for step in 1..=7 {
        let x = press + step as f32 * window.day_width;
        if let Some(update) = drag.pointer_move(x, geometry(&window), &window) {
            last = Some(store.update_task(update.task_id, &update.to_patch()).unwrap());
        }
    }
    drag.pointer_up();

    let moved = last.unwrap();
    assert_eq!(moved.start_date, d(2024, 1, 15));
    assert_eq!(moved.end_date, d(2024, 1, 17));
    assert_eq!(moved.duration, Some(3));
    assert_eq!(moved.name, "Build");
    assert_eq!(moved.status, TaskStatus::InProgress);
    assert_eq!(moved.assigned_to, ana.id);
    assert!(!drag.is_dragging());
}

#[test]
fn dropping_on_another_lane_reassigns_and_keeps_other_fields() {
    let mut store = MemoryStore::new();
    let ana = add_user(&mut store, "Ana");
    let bruno = add_user(&mut store, "Bruno");
    store
        .create_task(TaskFormData {
            name: "Review".into(),
            start_date: d(2024, 1, 8),
            end_date: d(2024, 1, 10),
            assigned_to: ana.id,
            status: TaskStatus::InProgress,
        })
        .unwrap();

    let tasks = store.fetch_tasks().unwrap();
    let window = DateWindow::derive(&tasks, None, d(2024, 1, 1), &ChartConfig::default());

    let mut drag = DragController::new();
    assert!(drag.begin_transfer(&tasks[0]));
    drag.hover_lane(bruno.id);
    let x = LEFT + window.date_to_x(d(2024, 1, 10));
    let update = drag
        .drop_on_lane(bruno.id, x, geometry(&window), &window)
        .unwrap();
    drag.pointer_up();

    let stored = store.update_task(update.task_id, &update.to_patch()).unwrap();
    assert_eq!(stored.assigned_to, bruno.id);
    assert_eq!(stored.user.as_ref().map(|u| u.name.as_str()), Some("Bruno"));
    assert_eq!(stored.start_date, d(2024, 1, 10));
    assert_eq!(stored.end_date, d(2024, 1, 12));
    assert_eq!(stored.name, "Review");
    assert_eq!(stored.status, TaskStatus::InProgress);

    let tasks = store.fetch_tasks().unwrap();
    let users = store.fetch_users().unwrap();
    let lanes = group_by_assignee(&tasks, &users);
    assert_eq!(lanes.len(), 2);
    assert_eq!(lanes[0].label, "Ana");
    assert!(lanes[0].tasks.is_empty());
    assert_eq!(lanes[1].tasks.len(), 1);
}

#[test]
fn assignees_without_tasks_still_get_lanes_until_removed() {
    let mut store = MemoryStore::new();
    let ana = add_user(&mut store, "Ana");
    let carla = add_user(&mut store, "Carla");
    store
        .create_task(TaskFormData {
            name: "Plan".into(),
            start_date: d(2024, 3, 4),
            end_date: d(2024, 3, 6),
            assigned_to: ana.id,
            status: TaskStatus::Pending,
        })
        .unwrap();

    let tasks = store.fetch_tasks().unwrap();
    let lanes = group_by_assignee(&tasks, &store.fetch_users().unwrap());
    let labels: Vec<&str> = lanes.iter().map(|l| l.label.as_str()).collect();
    assert_eq!(labels, vec!["Ana", "Carla"]);
    assert!(lanes[1].tasks.is_empty());

    store.remove_user(carla.id).unwrap();
    let lanes = group_by_assignee(&tasks, &store.fetch_users().unwrap());
    assert_eq!(lanes.len(), 1);
    assert_eq!(lanes[0].assignee, ana.id);
}

#[test]
fn window_is_pure_padded_and_week_aligned() {
    let mut store = MemoryStore::new();
    let ana = add_user(&mut store, "Ana");
    for (start, end) in [(d(2024, 2, 14), d(2024, 2, 20)), (d(2024, 3, 1), d(2024, 3, 8))] {
        store
            .create_task(TaskFormData {
                name: "Work".into(),
                start_date: start,
                end_date: end,
                assigned_to: ana.id,
                status: TaskStatus::Pending,
            })
            .unwrap();
    }
    let tasks = store.fetch_tasks().unwrap();
    let config = ChartConfig::default();

    let first = DateWindow::derive(&tasks, None, d(2024, 1, 1), &config);
    let second = DateWindow::derive(&tasks, None, d(2024, 1, 1), &config);
    assert_eq!(first, second);

    assert!(first.start <= d(2024, 2, 14) - Duration::days(config.padding_days));
    assert!(first.end >= d(2024, 3, 8) + Duration::days(config.padding_days));
    assert_eq!(first.start.weekday(), Weekday::Sun);
    assert_eq!(first.end.weekday(), Weekday::Sat);
    assert_eq!(first.day_count() % 7, 0);
    assert!(first.day_width >= config.min_day_width && first.day_width <= config.max_day_width);

    for task in &tasks {
        let position = first.position(task);
        assert!(position.offset >= 0.0);
        assert!(position.offset + position.width <= first.total_width());
        assert_eq!(
            position.working_days,
            calculate_working_days(task.start_date, task.end_date)
        );
    }
}

#[test]
fn empty_schedule_shows_weeks_around_today() {
    let config = ChartConfig::default();
    let today = d(2024, 6, 12);
    let window = DateWindow::derive(&[], None, today, &config);
    assert!(window.contains(today));
    assert!(window.contains(d(2024, 7, 12)));
    assert_eq!(window.start.weekday(), config.week_start);
}
