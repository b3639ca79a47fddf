use egui::{Color32, RichText, Ui};
use egui_phosphor::regular as icons;

use crate::model::{Lane, TaskId};
use crate::ui::theme;

/// Actions that the lane table can request.
pub enum LaneTableAction {
    None,
    Select(TaskId),
    Edit(TaskId),
    Delete(TaskId),
    Add,
}

/// Render the left-side overview: every lane and its tasks.
pub fn show_lane_table(lanes: &[Lane<'_>], selected_task: Option<TaskId>, ui: &mut Ui) -> LaneTableAction {
    let mut action = LaneTableAction::None;
    let task_count: usize = lanes.iter().map(|l| l.tasks.len()).sum();

    ui.add_space(2.0);
    ui.horizontal(|ui| {
        ui.label(
            RichText::new("Team")
                .strong()
                .size(15.0)
                .color(theme::TEXT_PRIMARY),
        );
        ui.add_space(4.0);
        ui.label(
            RichText::new(format!("({} lanes, {} tasks)", lanes.len(), task_count))
                .size(11.0)
                .color(theme::TEXT_DIM),
        );
    });
    ui.add_space(4.0);

    let btn = egui::Button::new(
        RichText::new(format!("{}  Add Task", icons::PLUS))
            .color(Color32::WHITE)
            .size(12.0),
    )
    .fill(theme::ACCENT)
    .rounding(egui::Rounding::same(5.0));
    if ui.add_sized([ui.available_width(), 30.0], btn).clicked() {
        action = LaneTableAction::Add;
    }

    ui.add_space(6.0);
    ui.separator();
    ui.add_space(2.0);

    if lanes.is_empty() {
        ui.label(
            RichText::new("No assignees yet. Add one from Manage Assignees.")
                .size(11.0)
                .color(theme::TEXT_DIM),
        );
        return action;
    }

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for (index, lane) in lanes.iter().enumerate() {
                ui.horizontal(|ui| {
                    let (dot_rect, _) = ui.allocate_exact_size(egui::vec2(8.0, 8.0), egui::Sense::hover());
                    ui.painter()
                        .circle_filled(dot_rect.center(), 4.0, theme::lane_accent(index));
                    let mut label = RichText::new(&lane.label).strong().size(12.5);
                    if !lane.known {
                        label = label.italics().color(theme::TEXT_SECONDARY);
                    }
                    ui.label(label);
                    ui.label(
                        RichText::new(lane.tasks.len().to_string())
                            .size(10.0)
                            .color(theme::TEXT_DIM),
                    );
                });

                if lane.tasks.is_empty() {
                    ui.horizontal(|ui| {
                        ui.add_space(16.0);
                        ui.label(RichText::new("No tasks").size(10.5).color(theme::TEXT_DIM));
                    });
                }

                for task in &lane.tasks {
                    let is_selected = selected_task == Some(task.id);
                    let frame = egui::Frame {
                        fill: if is_selected {
                            theme::BG_SELECTED
                        } else {
                            theme::BG_PANEL
                        },
                        rounding: egui::Rounding::same(4.0),
                        inner_margin: egui::Margin {
                            left: 16.0,
                            right: 6.0,
                            top: 3.0,
                            bottom: 3.0,
                        },
                        ..Default::default()
                    };

                    frame.show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.spacing_mut().item_spacing.x = 6.0;
                            let (dot_rect, _) = ui.allocate_exact_size(egui::vec2(6.0, 6.0), egui::Sense::hover());
                            ui.painter()
                                .circle_filled(dot_rect.center(), 3.0, theme::status_color(task.status));

                            let name = RichText::new(&task.name).size(12.0).color(if is_selected {
                                Color32::WHITE
                            } else {
                                theme::TEXT_PRIMARY
                            });
                            let name_resp = ui.add(egui::Label::new(name).truncate().sense(egui::Sense::click()));
                            if name_resp.double_clicked() {
                                action = LaneTableAction::Edit(task.id);
                            } else if name_resp.clicked() {
                                action = LaneTableAction::Select(task.id);
                            }

                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                ui.spacing_mut().item_spacing.x = 4.0;
                                let del = ui.add(
                                    egui::Button::new(RichText::new(icons::TRASH).size(11.0).color(theme::TEXT_DIM))
                                        .frame(false),
                                );
                                if del.on_hover_text("Delete task").clicked() {
                                    action = LaneTableAction::Delete(task.id);
                                }
                                let edit = ui.add(
                                    egui::Button::new(
                                        RichText::new(icons::PENCIL_SIMPLE).size(11.0).color(theme::TEXT_DIM),
                                    )
                                    .frame(false),
                                );
                                if edit.on_hover_text("Edit task").clicked() {
                                    action = LaneTableAction::Edit(task.id);
                                }
                                ui.label(
                                    RichText::new(format!(
                                        "{} → {}",
                                        task.start_date.format("%m/%d"),
                                        task.end_date.format("%m/%d")
                                    ))
                                    .size(10.0)
                                    .color(theme::TEXT_SECONDARY),
                                );
                            });
                        });
                    });
                    ui.add_space(1.0);
                }
                ui.add_space(6.0);
            }
        });

    action
}
