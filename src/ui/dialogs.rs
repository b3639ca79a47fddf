use egui::{Color32, Context, RichText, Window};
use egui_phosphor::regular as icons;

use crate::app::GanttApp;
use crate::model::calendar::calculate_working_days;
use crate::model::{Task, TaskFormData, TaskId, TaskStatus};
use crate::ui::theme;

/// An open create/edit form.
#[derive(Debug, Clone)]
pub struct TaskFormState {
    /// `None` while creating a new task.
    pub editing: Option<TaskId>,
    pub form: TaskFormData,
    pub error: Option<String>,
}

impl TaskFormState {
    pub fn create(form: TaskFormData) -> Self {
        Self {
            editing: None,
            form,
            error: None,
        }
    }

    pub fn edit(task: &Task) -> Self {
        Self {
            editing: Some(task.id),
            form: TaskFormData::from_task(task),
            error: None,
        }
    }
}

/// Render the "New Task" / "Edit Task" dialog.
pub fn show_task_dialog(app: &mut GanttApp, ctx: &Context) {
    let mut submit = false;
    let mut should_close = false;
    let users = app.users.clone();
    let Some(state) = app.task_form.as_mut() else {
        return;
    };
    let title = if state.editing.is_some() {
        "Edit Task"
    } else {
        "New Task"
    };

    Window::new(RichText::new(title).strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([theme::DIALOG_WIDTH, 0.0])
        .show(ctx, |ui| {
            ui.visuals_mut().extreme_bg_color = theme::BG_FIELD;
            ui.add_space(4.0);

            egui::Grid::new("task_form_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("Name").color(theme::TEXT_SECONDARY));
                    ui.add_sized(
                        [220.0, 24.0],
                        egui::TextEdit::singleline(&mut state.form.name).hint_text("Task name..."),
                    );
                    ui.end_row();

                    ui.label(RichText::new("Start").color(theme::TEXT_SECONDARY));
                    ui.add(egui_extras::DatePickerButton::new(&mut state.form.start_date).id_salt("task_dp_start"));
                    ui.end_row();

                    ui.label(RichText::new("End").color(theme::TEXT_SECONDARY));
                    ui.add(egui_extras::DatePickerButton::new(&mut state.form.end_date).id_salt("task_dp_end"));
                    ui.end_row();

                    ui.label(RichText::new("Assignee").color(theme::TEXT_SECONDARY));
                    let current = users
                        .iter()
                        .find(|u| u.id == state.form.assigned_to)
                        .map(|u| u.name.clone())
                        .unwrap_or_else(|| "Select...".to_string());
                    egui::ComboBox::from_id_salt("task_assignee")
                        .selected_text(current)
                        .width(220.0)
                        .show_ui(ui, |ui| {
                            for user in &users {
                                ui.selectable_value(&mut state.form.assigned_to, user.id, user.name.as_str());
                            }
                        });
                    ui.end_row();

                    ui.label(RichText::new("Status").color(theme::TEXT_SECONDARY));
                    ui.horizontal(|ui| {
                        for status in TaskStatus::all() {
                            ui.radio_value(&mut state.form.status, *status, status.label());
                        }
                    });
                    ui.end_row();
                });

            ui.add_space(4.0);
            ui.label(
                RichText::new(format!(
                    "{} working days",
                    calculate_working_days(state.form.start_date, state.form.end_date)
                ))
                .size(11.0)
                .color(theme::TEXT_DIM),
            );
            if let Some(error) = &state.error {
                ui.label(RichText::new(error).color(theme::TEXT_ERROR));
            }

            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                let save_btn = egui::Button::new(RichText::new("Save").color(Color32::WHITE))
                    .fill(theme::ACCENT)
                    .rounding(egui::Rounding::same(4.0));
                if ui.add_sized([80.0, 28.0], save_btn).clicked() {
                    submit = true;
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    should_close = true;
                }
            });
            ui.add_space(2.0);
        });

    if submit {
        app.submit_task_form();
    }
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.task_form = None;
    }
}

/// Ask before deleting a task.
pub fn show_delete_dialog(app: &mut GanttApp, ctx: &Context) {
    let Some(id) = app.confirm_delete else {
        return;
    };
    let name = app
        .tasks
        .iter()
        .find(|t| t.id == id)
        .map(|t| t.name.clone());
    let Some(name) = name else {
        app.confirm_delete = None;
        return;
    };

    let mut confirmed = false;
    let mut should_close = false;
    Window::new(RichText::new("Delete Task").strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([theme::DIALOG_WIDTH, 0.0])
        .show(ctx, |ui| {
            ui.add_space(4.0);
            ui.label(format!("Delete '{}'? This cannot be undone.", name));
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                let delete_btn = egui::Button::new(RichText::new("Delete").color(Color32::WHITE))
                    .fill(theme::DANGER)
                    .rounding(egui::Rounding::same(4.0));
                if ui.add_sized([80.0, 28.0], delete_btn).clicked() {
                    confirmed = true;
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    should_close = true;
                }
            });
            ui.add_space(2.0);
        });

    if confirmed {
        app.delete_task(id);
        app.confirm_delete = None;
    } else if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.confirm_delete = None;
    }
}

/// Add, list, and remove assignees.
pub fn show_assignee_dialog(app: &mut GanttApp, ctx: &Context) {
    let mut add = false;
    let mut remove = None;
    let mut should_close = false;

    Window::new(RichText::new("Assignees").strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([theme::DIALOG_WIDTH + 40.0, 0.0])
        .show(ctx, |ui| {
            ui.visuals_mut().extreme_bg_color = theme::BG_FIELD;
            ui.add_space(4.0);

            egui::Grid::new("assignee_form_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("Name").color(theme::TEXT_SECONDARY));
                    ui.add_sized(
                        [220.0, 24.0],
                        egui::TextEdit::singleline(&mut app.new_user_name).hint_text("Full name"),
                    );
                    ui.end_row();

                    ui.label(RichText::new("Email").color(theme::TEXT_SECONDARY));
                    ui.add_sized(
                        [220.0, 24.0],
                        egui::TextEdit::singleline(&mut app.new_user_email).hint_text("Optional"),
                    );
                    ui.end_row();
                });
            ui.add_space(4.0);
            let can_add = !app.new_user_name.trim().is_empty();
            if ui
                .add_enabled(can_add, egui::Button::new(format!("{}  Add Assignee", icons::PLUS)))
                .clicked()
            {
                add = true;
            }

            ui.add_space(6.0);
            ui.separator();

            if app.users.is_empty() {
                ui.label(RichText::new("No assignees yet.").color(theme::TEXT_DIM));
            }
            egui::ScrollArea::vertical().max_height(240.0).show(ui, |ui| {
                for user in &app.users {
                    let task_count = app.tasks.iter().filter(|t| t.assigned_to == user.id).count();
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(&user.name).strong());
                        if let Some(email) = &user.email {
                            ui.label(RichText::new(email).size(10.5).color(theme::TEXT_DIM));
                        }
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            let btn = ui.add(
                                egui::Button::new(RichText::new(icons::TRASH).color(theme::TEXT_DIM)).frame(false),
                            );
                            let hint = if task_count > 0 {
                                format!("Has {} task(s); reassign or delete them first", task_count)
                            } else {
                                "Remove assignee".to_string()
                            };
                            if btn.on_hover_text(hint).clicked() {
                                remove = Some(user.id);
                            }
                            ui.label(
                                RichText::new(format!("{} tasks", task_count))
                                    .size(10.5)
                                    .color(theme::TEXT_SECONDARY),
                            );
                        });
                    });
                }
            });

            ui.add_space(6.0);
            if ui.add_sized([80.0, 28.0], egui::Button::new("Close")).clicked() {
                should_close = true;
            }
            ui.add_space(2.0);
        });

    if add {
        app.add_assignee();
    }
    if let Some(id) = remove {
        app.remove_assignee(id);
    }
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_assignees = false;
    }
}

/// Render the "About" dialog.
pub fn show_about_dialog(app: &mut GanttApp, ctx: &Context) {
    let mut should_close = false;
    Window::new("About")
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([300.0, 180.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.heading(RichText::new("Team Gantt").strong());
                ui.add_space(2.0);
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION"))).color(theme::TEXT_SECONDARY),
                );
                ui.add_space(10.0);
                ui.label("Drag a bar to reschedule it.");
                ui.label("Drag its grip onto another lane to reassign it.");
                ui.add_space(14.0);
                if ui.add_sized([100.0, 28.0], egui::Button::new("Close")).clicked() {
                    should_close = true;
                }
            });
        });
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_about = false;
    }
}
