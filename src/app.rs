use chrono::{Duration, NaiveDate};
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::error::Result;
use crate::io::{JsonStore, MemoryStore, TaskStore};
use crate::model::{
    group_by_assignee, DateWindow, DragController, NewUser, Task, TaskFormData, TaskId, TaskPatch, TaskStatus,
    TaskUpdate, User, UserId, WindowOverride,
};
use crate::ui;
use crate::ui::dialogs::TaskFormState;

/// Counts shown in the status bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub total: usize,
    pub in_progress: usize,
    pub done: usize,
}

/// Main application state.
pub struct GanttApp {
    store: Box<dyn TaskStore>,
    pub data_path: Option<PathBuf>,
    pub config: AppConfig,

    // Cached store contents. Only ever replaced by what the store confirms.
    pub tasks: Vec<Task>,
    pub users: Vec<User>,

    pub window_override: Option<WindowOverride>,
    pub drag: DragController,
    // Window the current drag started on. Held until the drag ends.
    drag_window: Option<DateWindow>,
    pub selected_task: Option<TaskId>,

    // Chart period controls
    pub period_start: NaiveDate,
    pub period_months: u32,

    // Dialog state
    pub task_form: Option<TaskFormState>,
    pub confirm_delete: Option<TaskId>,
    pub show_assignees: bool,
    pub new_user_name: String,
    pub new_user_email: String,
    pub show_about: bool,

    // Status message
    pub status_message: String,
}

impl GanttApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);
        ui::theme::apply_theme(&cc.egui_ctx);

        let config = AppConfig::load_or_default();
        let path = config.data_file();
        let today = chrono::Local::now().date_naive();

        match JsonStore::open(&path) {
            Ok(mut store) => {
                if store.is_new() {
                    if let Err(e) = seed_sample(&mut store, today) {
                        log::warn!("could not seed sample schedule: {}", e);
                    }
                }
                let mut app = Self::with_store(Box::new(store), config, today);
                app.data_path = Some(path);
                app
            }
            Err(e) => {
                log::error!("failed to open {:?}: {}", path, e);
                let mut app = Self::with_store(Box::new(MemoryStore::new()), config, today);
                app.status_message = format!("Could not open schedule, changes will not be saved: {}", e);
                app
            }
        }
    }

    /// Build the app around any store and load its contents.
    pub fn with_store(store: Box<dyn TaskStore>, config: AppConfig, today: NaiveDate) -> Self {
        let mut app = Self {
            store,
            data_path: None,
            config,
            tasks: Vec::new(),
            users: Vec::new(),
            window_override: None,
            drag: DragController::new(),
            drag_window: None,
            selected_task: None,
            period_start: today,
            period_months: 3,
            task_form: None,
            confirm_delete: None,
            show_assignees: false,
            new_user_name: String::new(),
            new_user_email: String::new(),
            show_about: false,
            status_message: "Ready".to_string(),
        };
        app.refresh();
        app
    }

    /// Reload tasks and users from the store.
    pub fn refresh(&mut self) {
        match self.store.fetch_tasks() {
            Ok(tasks) => self.tasks = tasks,
            Err(e) => self.report("Could not load tasks", &e),
        }
        match self.store.fetch_users() {
            Ok(users) => self.users = users,
            Err(e) => self.report("Could not load assignees", &e),
        }
        self.forget_missing();
    }

    /// Drop selection and drag state that point at tasks no longer present.
    fn forget_missing(&mut self) {
        if let Some(id) = self.drag.active_task() {
            if !self.tasks.iter().any(|t| t.id == id) {
                self.drag.cancel();
            }
        }
        if let Some(id) = self.selected_task {
            if !self.tasks.iter().any(|t| t.id == id) {
                self.selected_task = None;
            }
        }
    }

    fn report(&mut self, what: &str, error: &crate::error::GanttError) {
        log::error!("{}: {}", what, error);
        self.status_message = format!("{}: {}", what, error);
    }

    /// The window the chart shows for `today`.
    pub fn date_window(&self, today: NaiveDate) -> DateWindow {
        DateWindow::derive(&self.tasks, self.window_override, today, &self.config.chart)
    }

    /// The window to draw and drag against this frame.
    ///
    /// While a drag runs this is the window the drag started on, so the
    /// rescheduled task cannot move the scale under a still pointer.
    pub fn frame_window(&mut self, today: NaiveDate) -> DateWindow {
        if !self.drag.is_dragging() {
            self.drag_window = None;
        }
        match &self.drag_window {
            Some(window) => window.clone(),
            None => self.date_window(today),
        }
    }

    /// Keep `window` for the rest of a drag that is running after this frame.
    pub fn hold_window(&mut self, window: &DateWindow) {
        if !self.drag.is_dragging() {
            self.drag_window = None;
        } else if self.drag_window.is_none() {
            self.drag_window = Some(window.clone());
        }
    }

    pub fn counts(&self) -> TaskCounts {
        TaskCounts {
            total: self.tasks.len(),
            in_progress: self.tasks.iter().filter(|t| t.status == TaskStatus::InProgress).count(),
            done: self.tasks.iter().filter(|t| t.status == TaskStatus::Done).count(),
        }
    }

    // --- Task operations ---

    /// Send a drag result to the store and cache the confirmed task.
    pub fn apply_update(&mut self, update: TaskUpdate) {
        match self.store.update_task(update.task_id, &update.to_patch()) {
            Ok(task) => {
                self.status_message = if update.assigned_to.is_some() {
                    format!(
                        "Moved '{}' to {}",
                        task.name,
                        task.user.as_ref().map(|u| u.name.as_str()).unwrap_or("another lane")
                    )
                } else {
                    format!(
                        "Rescheduled '{}' ({} → {})",
                        task.name,
                        task.start_date.format("%Y-%m-%d"),
                        task.end_date.format("%Y-%m-%d")
                    )
                };
                self.replace_cached(task);
            }
            Err(e) => {
                self.report("Could not update task", &e);
                self.refresh();
            }
        }
    }

    fn replace_cached(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(cached) => *cached = task,
            None => self.tasks.push(task),
        }
        self.tasks.sort_by_key(|t| t.start_date);
    }

    /// Open the task form for a new task.
    pub fn open_new_task(&mut self, today: NaiveDate) {
        let Some(first) = self.users.first() else {
            self.status_message = "Add an assignee before creating tasks".to_string();
            self.show_assignees = true;
            return;
        };
        self.task_form = Some(TaskFormState::create(TaskFormData {
            name: String::new(),
            start_date: today,
            end_date: today + Duration::days(4),
            assigned_to: first.id,
            status: TaskStatus::Pending,
        }));
    }

    pub fn open_edit_task(&mut self, id: TaskId) {
        if let Some(task) = self.tasks.iter().find(|t| t.id == id) {
            self.selected_task = Some(id);
            self.task_form = Some(TaskFormState::edit(task));
        }
    }

    /// Create or update from the open form. Keeps the form open on failure.
    pub fn submit_task_form(&mut self) {
        let Some(state) = self.task_form.as_mut() else {
            return;
        };
        if let Err(message) = state.form.validate() {
            state.error = Some(message.to_string());
            return;
        }

        let result = match state.editing {
            Some(id) => self.store.update_task(id, &TaskPatch::from_form(&state.form)),
            None => self.store.create_task(state.form.clone()),
        };
        match result {
            Ok(task) => {
                self.status_message = match state.editing {
                    Some(_) => format!("Updated '{}'", task.name),
                    None => format!("Created '{}'", task.name),
                };
                self.selected_task = Some(task.id);
                self.task_form = None;
                self.refresh();
            }
            Err(e) => {
                log::error!("saving task failed: {}", e);
                state.error = Some(e.to_string());
            }
        }
    }

    pub fn delete_task(&mut self, id: TaskId) {
        let name = self
            .tasks
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.name.clone())
            .unwrap_or_default();
        match self.store.delete_task(id) {
            Ok(()) => {
                self.status_message = format!("Deleted '{}'", name);
                self.refresh();
            }
            Err(e) => self.report("Could not delete task", &e),
        }
    }

    // --- Assignees ---

    pub fn add_assignee(&mut self) {
        let email = self.new_user_email.trim();
        let data = NewUser {
            name: self.new_user_name.clone(),
            email: (!email.is_empty()).then(|| email.to_string()),
        };
        match self.store.add_user(data) {
            Ok(user) => {
                self.status_message = format!("Added assignee '{}'", user.name);
                self.new_user_name.clear();
                self.new_user_email.clear();
                self.refresh();
            }
            Err(e) => self.report("Could not add assignee", &e),
        }
    }

    pub fn remove_assignee(&mut self, id: UserId) {
        match self.store.remove_user(id) {
            Ok(()) => {
                self.status_message = "Assignee removed".to_string();
                self.refresh();
            }
            Err(e) => {
                log::warn!("remove assignee {} refused: {}", id, e);
                self.status_message = e.to_string();
            }
        }
    }

    // --- Chart period ---

    pub fn apply_period(&mut self) {
        let period = WindowOverride::months_from(self.period_start, self.period_months);
        self.window_override = Some(period);
        self.status_message = format!(
            "Showing {} to {}",
            period.start.format("%Y-%m-%d"),
            period.end.format("%Y-%m-%d")
        );
    }

    pub fn reset_period(&mut self) {
        self.window_override = None;
        self.status_message = "Showing all tasks".to_string();
    }

    // --- Files ---

    pub fn export_csv(&mut self) {
        if self.tasks.is_empty() {
            self.status_message = "Nothing to export, there are no tasks".to_string();
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name("team-gantt.csv")
            .save_file()
        {
            match crate::io::csv_export::export_csv(&self.tasks, &self.users, &path) {
                Ok(count) => {
                    log::info!("exported {} task(s) to {:?}", count, path);
                    self.status_message = format!("Exported {} tasks to CSV", count);
                }
                Err(e) => self.report("CSV export failed", &e),
            }
        }
    }

    pub fn open_data_folder(&mut self) {
        let Some(dir) = self.data_path.as_ref().and_then(|p| p.parent()) else {
            self.status_message = "Schedule is not stored on disk".to_string();
            return;
        };
        if let Err(e) = open::that(dir) {
            log::warn!("could not open {:?}: {}", dir, e);
            self.status_message = format!("Could not open {}: {}", dir.display(), e);
        }
    }
}

/// Populate an empty store with a small team and a few tasks.
pub fn seed_sample(store: &mut dyn TaskStore, today: NaiveDate) -> Result<()> {
    let people = [
        ("Ana Souza", "ana@example.com"),
        ("Bruno Lima", "bruno@example.com"),
        ("Carla Mendes", "carla@example.com"),
    ];
    let mut ids = Vec::with_capacity(people.len());
    for (name, email) in people {
        let user = store.add_user(NewUser {
            name: name.to_string(),
            email: Some(email.to_string()),
        })?;
        ids.push(user.id);
    }

    let tasks = [
        ("Requirements", -3, 2, 0, TaskStatus::Done),
        ("API design", 1, 6, 0, TaskStatus::InProgress),
        ("UI mockups", 0, 4, 1, TaskStatus::InProgress),
        ("Frontend build", 7, 18, 1, TaskStatus::Pending),
        ("Test plan", 3, 5, 2, TaskStatus::Pending),
    ];
    for (name, from, to, who, status) in tasks {
        store.create_task(TaskFormData {
            name: name.to_string(),
            start_date: today + Duration::days(from),
            end_date: today + Duration::days(to),
            assigned_to: ids[who],
            status,
        })?;
    }
    log::info!("seeded sample schedule with {} assignees", ids.len());
    Ok(())
}

impl eframe::App for GanttApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let today = chrono::Local::now().date_naive();

        // Top panel: menu and chart period controls
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui::controls::show_controls(self, today, ui);
        });

        // Bottom panel: status bar
        let counts = self.counts();
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .size(11.0)
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "Tasks: {}  ·  In progress: {}  ·  Done: {}",
                                counts.total, counts.in_progress, counts.done
                            ))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        let window = self.frame_window(today);
        let lanes = group_by_assignee(&self.tasks, &self.users);

        // Left panel: lanes overview
        let mut table_action = ui::lane_table::LaneTableAction::None;
        egui::SidePanel::left("lane_panel")
            .default_width(ui::theme::SIDE_PANEL_WIDTH)
            .min_width(200.0)
            .resizable(true)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_PANEL)
                    .inner_margin(egui::Margin::same(8.0))
                    .stroke(egui::Stroke::new(1.0, ui::theme::BORDER_SUBTLE)),
            )
            .show(ctx, |ui| {
                table_action = ui::lane_table::show_lane_table(&lanes, self.selected_task, ui);
            });

        // Central panel: Gantt chart
        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        let view = ui::gantt_chart::ChartView {
            lanes: &lanes,
            window: &window,
            week_start: self.config.chart.week_start,
            today,
        };
        let interaction = egui::CentralPanel::default()
            .frame(chart_frame)
            .show(ctx, |ui| {
                ui::gantt_chart::show_gantt_chart(&view, &mut self.drag, &mut self.selected_task, ui)
            })
            .inner;
        self.hold_window(&window);

        for update in interaction.updates {
            self.apply_update(update);
        }
        if let Some(id) = interaction.edit {
            self.open_edit_task(id);
        }
        if let Some(id) = interaction.delete {
            self.confirm_delete = Some(id);
        }

        match table_action {
            ui::lane_table::LaneTableAction::Select(id) => self.selected_task = Some(id),
            ui::lane_table::LaneTableAction::Edit(id) => self.open_edit_task(id),
            ui::lane_table::LaneTableAction::Delete(id) => self.confirm_delete = Some(id),
            ui::lane_table::LaneTableAction::Add => self.open_new_task(today),
            ui::lane_table::LaneTableAction::None => {}
        }

        // Dialogs
        if self.task_form.is_some() {
            ui::dialogs::show_task_dialog(self, ctx);
        }
        if self.confirm_delete.is_some() {
            ui::dialogs::show_delete_dialog(self, ctx);
        }
        if self.show_assignees {
            ui::dialogs::show_assignee_dialog(self, ctx);
        }
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
    }
}
