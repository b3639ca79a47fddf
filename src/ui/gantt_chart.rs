use chrono::{Datelike, NaiveDate, Weekday};
use egui::{Align2, Color32, CursorIcon, DragAndDrop, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};
use egui_phosphor::regular as icons;

use crate::model::calendar::is_weekend;
use crate::model::drag::DragGesture;
use crate::model::{DateWindow, DragController, Lane, Task, TaskId, TaskUpdate, TimelineGeometry, UserId};
use crate::ui::theme;

const ROW_HEIGHT: f32 = theme::ROW_HEIGHT;
const LANE_HEADER_HEIGHT: f32 = theme::LANE_HEADER_HEIGHT;
const HEADER_HEIGHT: f32 = theme::HEADER_HEIGHT;

/// What the user asked for while interacting with the chart this frame.
#[derive(Debug, Clone, Default)]
pub struct ChartInteraction {
    /// Reschedules and reassignments to send to the store, in order.
    pub updates: Vec<TaskUpdate>,
    pub edit: Option<TaskId>,
    pub delete: Option<TaskId>,
}

/// Everything the chart needs to draw one frame.
pub struct ChartView<'a, 'b> {
    pub lanes: &'b [Lane<'a>],
    pub window: &'b DateWindow,
    pub week_start: Weekday,
    pub today: NaiveDate,
}

struct LaneRect {
    assignee: UserId,
    rect: Rect,
}

/// Render the Gantt chart area (central panel).
pub fn show_gantt_chart(
    view: &ChartView<'_, '_>,
    drag: &mut DragController,
    selected_task: &mut Option<TaskId>,
    ui: &mut Ui,
) -> ChartInteraction {
    let mut interaction = ChartInteraction::default();
    let window = view.window;
    let available = ui.available_size();
    let timeline_width = window.total_width();
    let body_height: f32 = view.lanes.iter().map(lane_height).sum();
    let chart_height = HEADER_HEIGHT + body_height + 40.0;

    if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
        drag.cancel();
        DragAndDrop::clear_payload(ui.ctx());
    }

    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let (response, painter) = ui.allocate_painter(
                Vec2::new(timeline_width.max(available.x), chart_height.max(available.y)),
                Sense::click(),
            );
            let origin = response.rect.min;
            let geometry = timeline_geometry(response.rect, timeline_width);
            let mut consumed_click = false;

            painter.rect_filled(response.rect, 0.0, theme::BG_DARK);

            // Lane bands
            let mut lane_rects = Vec::with_capacity(view.lanes.len());
            let mut y = origin.y + HEADER_HEIGHT;
            for (index, lane) in view.lanes.iter().enumerate() {
                let height = lane_height(lane);
                let rect = Rect::from_min_size(Pos2::new(origin.x, y), Vec2::new(timeline_width, height));
                draw_lane_header(&painter, rect, lane, index);
                lane_rects.push(LaneRect {
                    assignee: lane.assignee,
                    rect,
                });
                y += height;
            }

            draw_day_grid(&painter, origin, window, view.week_start, chart_height);
            draw_timeline_header(&painter, origin, window, view.week_start);
            draw_today_line(&painter, origin, window, view.today, chart_height);

            let pointer = ui.input(|i| i.pointer.latest_pos());
            let released = ui.input(|i| i.pointer.any_released());

            // Drop target highlight while a bar is being carried
            let transfer_target = match drag.session() {
                Some(s) if s.gesture == DragGesture::Transfer => {
                    pointer.and_then(|p| lane_rects.iter().find(|l| l.rect.contains(p)))
                }
                _ => None,
            };
            if let Some(target) = transfer_target {
                drag.hover_lane(target.assignee);
                painter.rect_filled(target.rect, 0.0, theme::BG_DROP_TARGET);
                painter.rect_stroke(target.rect.shrink(1.0), 0.0, Stroke::new(1.0, theme::BORDER_ACCENT));
            }

            // Task bars
            for (lane, lane_rect) in view.lanes.iter().zip(&lane_rects) {
                for (row, task) in lane.tasks.iter().enumerate() {
                    let row_top = lane_rect.rect.top() + LANE_HEADER_HEIGHT + row as f32 * ROW_HEIGHT;
                    let is_selected = *selected_task == Some(task.id);
                    let is_carried = drag.active_task() == Some(task.id)
                        && drag.session().map(|s| s.gesture) == Some(DragGesture::Transfer);
                    let bar_rect = draw_task_bar(&painter, origin, window, task, row_top, is_selected, is_carried);

                    let bar_response = ui.interact(
                        bar_rect,
                        ui.make_persistent_id(("task-bar", task.id)),
                        Sense::click_and_drag(),
                    );
                    let grip_rect = Rect::from_min_size(
                        bar_rect.min,
                        Vec2::new(theme::GRIP_WIDTH.min(bar_rect.width()), bar_rect.height()),
                    );
                    let grip_response = ui.interact(
                        grip_rect,
                        ui.make_persistent_id(("task-grip", task.id)),
                        Sense::drag(),
                    );
                    grip_response.dnd_set_drag_payload(task.id);

                    if grip_response.drag_started() && drag.begin_transfer(task) {
                        *selected_task = Some(task.id);
                        consumed_click = true;
                    } else if bar_response.drag_started() {
                        // Measured from the task's own start, which may lie left of a clipped bar
                        let task_left = origin.x + window.date_to_x(task.start_date);
                        let grab_offset = bar_response
                            .interact_pointer_pos()
                            .map(|p| p.x - task_left)
                            .unwrap_or(0.0);
                        if drag.begin_reposition(task, grab_offset) {
                            *selected_task = Some(task.id);
                            consumed_click = true;
                        }
                    }

                    if bar_response.clicked() {
                        *selected_task = Some(task.id);
                        consumed_click = true;
                    }
                    if bar_response.double_clicked() {
                        interaction.edit = Some(task.id);
                    }

                    if grip_response.hovered() && !drag.is_dragging() {
                        ui.ctx().set_cursor_icon(CursorIcon::Grab);
                    } else if bar_response.hovered() && !drag.is_dragging() {
                        ui.ctx().set_cursor_icon(CursorIcon::ResizeHorizontal);
                    }

                    // Edit / delete affordances next to the hovered bar
                    let row_rect = Rect::from_min_size(
                        Pos2::new(origin.x, row_top),
                        Vec2::new(timeline_width, ROW_HEIGHT),
                    );
                    let row_hovered = pointer.is_some_and(|p| row_rect.contains(p));
                    if (row_hovered || is_selected) && !drag.is_dragging() {
                        let edit_rect = Rect::from_min_size(
                            Pos2::new(bar_rect.right() + 6.0, bar_rect.center().y - theme::ACTION_SIZE / 2.0),
                            Vec2::splat(theme::ACTION_SIZE),
                        );
                        let delete_rect = edit_rect.translate(Vec2::new(theme::ACTION_SIZE + 4.0, 0.0));
                        if action_button(ui, &painter, edit_rect, ("task-edit", task.id), icons::PENCIL_SIMPLE, theme::ACCENT)
                            .on_hover_text("Edit task")
                            .clicked()
                        {
                            interaction.edit = Some(task.id);
                            consumed_click = true;
                        }
                        if action_button(ui, &painter, delete_rect, ("task-delete", task.id), icons::TRASH, theme::DANGER)
                            .on_hover_text("Delete task")
                            .clicked()
                        {
                            interaction.delete = Some(task.id);
                            consumed_click = true;
                        }
                    }

                    if bar_response.hovered() && !drag.is_dragging() {
                        egui::show_tooltip_at_pointer(
                            ui.ctx(),
                            ui.layer_id(),
                            egui::Id::new(("task-tip", task.id)),
                            |ui| {
                                ui.strong(&task.name);
                                ui.label(format!(
                                    "{} → {}",
                                    task.start_date.format("%d/%m/%Y"),
                                    task.end_date.format("%d/%m/%Y"),
                                ));
                                ui.label(format!("{} working days", task.working_days()));
                                ui.label(task.status.label());
                                ui.label(
                                    egui::RichText::new("Drag to move · drag the grip to reassign")
                                        .small()
                                        .weak(),
                                );
                            },
                        );
                    }
                }
            }

            // Pointer tracking for an active session. The position is read
            // from the whole viewport, not from the bar that started the drag.
            match drag.session().map(|s| s.gesture) {
                Some(DragGesture::Reposition) => {
                    ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
                    if let Some(p) = pointer {
                        if let Some(update) = drag.pointer_move(p.x, geometry, window) {
                            interaction.updates.push(update);
                        }
                    }
                }
                Some(DragGesture::Transfer) => {
                    ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
                    let preview = pointer
                        .zip(transfer_target)
                        .zip(drag.session())
                        .and_then(|((p, target), s)| {
                            s.candidate(p.x, geometry, window).map(|dates| (target.rect, dates))
                        });
                    if let Some((lane_rect, (start, end))) = preview {
                        draw_drop_preview(&painter, origin, window, lane_rect, start, end);
                    }
                }
                None => {}
            }

            if released {
                if let (Some(p), Some(target)) = (pointer, transfer_target) {
                    let carried = DragAndDrop::take_payload::<TaskId>(ui.ctx());
                    if carried.as_deref().copied() == drag.active_task() {
                        if let Some(update) = drag.drop_on_lane(target.assignee, p.x, geometry, window) {
                            interaction.updates.push(update);
                        }
                    }
                }
                // Any release ends any session, wherever it happened.
                drag.pointer_up();
            }

            if response.clicked() && !consumed_click {
                *selected_task = None;
            }
        });

    interaction
}

fn lane_height(lane: &Lane<'_>) -> f32 {
    LANE_HEADER_HEIGHT + lane.tasks.len().max(1) as f32 * ROW_HEIGHT
}

/// Screen geometry of the day columns, or `None` when there is nothing to hit.
fn timeline_geometry(rect: Rect, timeline_width: f32) -> Option<TimelineGeometry> {
    if rect.width() <= 0.0 || timeline_width <= 0.0 {
        return None;
    }
    Some(TimelineGeometry {
        left: rect.left(),
        width: timeline_width,
    })
}

fn action_button(
    ui: &mut Ui,
    painter: &egui::Painter,
    rect: Rect,
    id_source: (&'static str, TaskId),
    icon: &str,
    hover_color: Color32,
) -> egui::Response {
    let response = ui.interact(rect, ui.make_persistent_id(id_source), Sense::click());
    let (fill, color) = if response.hovered() {
        (hover_color, Color32::WHITE)
    } else {
        (theme::BG_LANE_HEADER, theme::TEXT_SECONDARY)
    };
    painter.rect_filled(rect, Rounding::same(4.0), fill);
    painter.text(rect.center(), Align2::CENTER_CENTER, icon, theme::font_bar(), color);
    if response.hovered() {
        ui.ctx().set_cursor_icon(CursorIcon::PointingHand);
    }
    response
}

fn draw_lane_header(painter: &egui::Painter, lane_rect: Rect, lane: &Lane<'_>, index: usize) {
    let header = Rect::from_min_size(lane_rect.min, Vec2::new(lane_rect.width(), LANE_HEADER_HEIGHT));
    painter.rect_filled(header, 0.0, theme::BG_LANE_HEADER);
    painter.rect_filled(
        Rect::from_min_size(header.min, Vec2::new(3.0, header.height())),
        0.0,
        theme::lane_accent(index),
    );

    let label = if lane.known {
        lane.label.clone()
    } else {
        format!("{} (unknown)", lane.label)
    };
    let label_rect = painter.text(
        Pos2::new(header.left() + 10.0, header.center().y),
        Align2::LEFT_CENTER,
        format!("{}  {}", icons::USER, label),
        theme::font_header(),
        theme::TEXT_PRIMARY,
    );
    painter.text(
        Pos2::new(label_rect.right() + 8.0, header.center().y),
        Align2::LEFT_CENTER,
        match lane.tasks.len() {
            1 => "1 task".to_string(),
            n => format!("{} tasks", n),
        },
        theme::font_small(),
        theme::TEXT_DIM,
    );

    if lane.tasks.is_empty() {
        let empty = Rect::from_min_max(Pos2::new(lane_rect.left(), header.bottom()), lane_rect.max);
        painter.text(
            Pos2::new(empty.left() + 10.0, empty.center().y),
            Align2::LEFT_CENTER,
            "No tasks. Drop a bar here to assign one.",
            theme::font_small(),
            theme::TEXT_DIM,
        );
    }

    painter.line_segment(
        [
            Pos2::new(lane_rect.left(), lane_rect.bottom()),
            Pos2::new(lane_rect.right(), lane_rect.bottom()),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );
}

fn draw_day_grid(
    painter: &egui::Painter,
    origin: Pos2,
    window: &DateWindow,
    week_start: Weekday,
    height: f32,
) {
    let top = origin.y + HEADER_HEIGHT;
    let bottom = origin.y + height;
    for day in &window.days {
        let x = origin.x + window.date_to_x(*day);
        if is_weekend(*day) {
            painter.rect_filled(
                Rect::from_min_max(Pos2::new(x, top), Pos2::new(x + window.day_width, bottom)),
                0.0,
                theme::BG_WEEKEND,
            );
        }
        let stroke = if day.weekday() == week_start {
            Stroke::new(1.0, theme::WEEK_LINE)
        } else {
            Stroke::new(0.5, theme::GRID_LINE)
        };
        painter.line_segment([Pos2::new(x, top), Pos2::new(x, bottom)], stroke);
    }
}

fn draw_timeline_header(painter: &egui::Painter, origin: Pos2, window: &DateWindow, week_start: Weekday) {
    let width = window.total_width();
    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(width, HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );

    // Month row
    for span in window.month_spans() {
        let x = origin.x + window.date_to_x(span.first_day);
        let span_width = span.days as f32 * window.day_width;
        let rect = Rect::from_min_size(Pos2::new(x, origin.y), Vec2::new(span_width, theme::MONTH_ROW_HEIGHT));
        painter.with_clip_rect(rect).text(
            rect.center(),
            Align2::CENTER_CENTER,
            span.first_day.format("%B %Y").to_string(),
            theme::font_header(),
            theme::TEXT_PRIMARY,
        );
        painter.line_segment(
            [rect.left_top(), Pos2::new(x, origin.y + HEADER_HEIGHT)],
            Stroke::new(1.0, theme::BORDER_SUBTLE),
        );
    }
    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + theme::MONTH_ROW_HEIGHT),
            Pos2::new(origin.x + width, origin.y + theme::MONTH_ROW_HEIGHT),
        ],
        Stroke::new(0.5, theme::BORDER_SUBTLE),
    );

    // Day row
    let day_top = origin.y + theme::MONTH_ROW_HEIGHT;
    for day in &window.days {
        let x = origin.x + window.date_to_x(*day);
        let cell = Rect::from_min_size(Pos2::new(x, day_top), Vec2::new(window.day_width, theme::DAY_ROW_HEIGHT));
        let weekend = is_weekend(*day);
        if weekend {
            painter.rect_filled(cell, 0.0, theme::BG_WEEKEND);
        }
        let color = if weekend {
            theme::TEXT_DIM
        } else {
            theme::TEXT_SECONDARY
        };
        let weekday_letter = day.format("%a").to_string().chars().next().unwrap_or(' ');
        painter.text(
            Pos2::new(cell.center().x, cell.top() + 10.0),
            Align2::CENTER_CENTER,
            weekday_letter,
            theme::font_small(),
            color,
        );
        painter.text(
            Pos2::new(cell.center().x, cell.bottom() - 10.0),
            Align2::CENTER_CENTER,
            day.day().to_string(),
            theme::font_sub(),
            color,
        );
        if day.weekday() == week_start {
            painter.line_segment(
                [cell.left_top(), cell.left_bottom()],
                Stroke::new(1.0, theme::WEEK_LINE),
            );
        }
    }

    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + HEADER_HEIGHT),
            Pos2::new(origin.x + width, origin.y + HEADER_HEIGHT),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );
}

fn draw_today_line(painter: &egui::Painter, origin: Pos2, window: &DateWindow, today: NaiveDate, height: f32) {
    if !window.contains(today) {
        return;
    }
    let x = origin.x + window.date_to_x(today) + window.day_width / 2.0;
    painter.line_segment(
        [Pos2::new(x, origin.y + HEADER_HEIGHT), Pos2::new(x, origin.y + height)],
        Stroke::new(1.5, theme::TODAY_LINE),
    );

    let badge_w = 42.0;
    let badge_rect = Rect::from_min_size(
        Pos2::new(x - badge_w / 2.0, origin.y + HEADER_HEIGHT - 1.0),
        Vec2::new(badge_w, 14.0),
    );
    painter.rect_filled(badge_rect, Rounding::same(3.0), theme::TODAY_LINE);
    painter.text(
        badge_rect.center(),
        Align2::CENTER_CENTER,
        "Today",
        theme::font_small(),
        Color32::WHITE,
    );
}

fn draw_task_bar(
    painter: &egui::Painter,
    origin: Pos2,
    window: &DateWindow,
    task: &Task,
    row_top: f32,
    is_selected: bool,
    is_carried: bool,
) -> Rect {
    let position = window.position(task);
    let inset = theme::BAR_INSET;
    let bar_rect = Rect::from_min_size(
        Pos2::new(origin.x + position.offset, row_top + inset),
        Vec2::new(position.width, ROW_HEIGHT - inset * 2.0),
    );
    let rounding = Rounding::same(theme::BAR_ROUNDING);
    let fill = theme::status_color(task.status);
    let fill = if is_carried { fill.gamma_multiply(0.4) } else { fill };

    // Soft shadow
    painter.rect_filled(
        bar_rect.translate(Vec2::new(1.0, 2.0)),
        rounding,
        Color32::from_black_alpha(35),
    );
    painter.rect_filled(bar_rect, rounding, fill);
    painter.rect_filled(
        Rect::from_min_size(
            bar_rect.min,
            Vec2::new(bar_rect.width(), (bar_rect.height() * 0.45).max(4.0)),
        ),
        Rounding {
            nw: theme::BAR_ROUNDING,
            ne: theme::BAR_ROUNDING,
            sw: 0.0,
            se: 0.0,
        },
        Color32::from_white_alpha(25),
    );

    // Grip
    let grip = Rect::from_min_size(
        bar_rect.min,
        Vec2::new(theme::GRIP_WIDTH.min(bar_rect.width()), bar_rect.height()),
    );
    painter.rect_filled(
        grip,
        Rounding {
            nw: theme::BAR_ROUNDING,
            sw: theme::BAR_ROUNDING,
            ne: 0.0,
            se: 0.0,
        },
        Color32::from_black_alpha(40),
    );
    painter.text(
        grip.center(),
        Align2::CENTER_CENTER,
        icons::DOTS_THREE_VERTICAL,
        theme::font_small(),
        Color32::from_white_alpha(160),
    );

    if is_selected {
        painter.rect_stroke(
            bar_rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
    }

    // Name and "status • n working days", clipped to the bar
    let text_rect = Rect::from_min_max(Pos2::new(grip.right() + 4.0, bar_rect.top()), bar_rect.max);
    if text_rect.width() > 12.0 {
        let clipped = painter.with_clip_rect(text_rect);
        clipped.text(
            Pos2::new(text_rect.left(), text_rect.top() + 10.0),
            Align2::LEFT_CENTER,
            &task.name,
            theme::font_bar(),
            theme::TEXT_ON_BAR,
        );
        clipped.text(
            Pos2::new(text_rect.left(), text_rect.bottom() - 9.0),
            Align2::LEFT_CENTER,
            format!("{} • {} working days", task.status.label(), position.working_days),
            theme::font_small(),
            Color32::from_white_alpha(200),
        );
    }

    bar_rect
}

fn draw_drop_preview(
    painter: &egui::Painter,
    origin: Pos2,
    window: &DateWindow,
    lane_rect: Rect,
    start: NaiveDate,
    end: NaiveDate,
) {
    let x = origin.x + window.date_to_x(start);
    let days = ((end - start).num_days() + 1).max(1) as f32;
    let rect = Rect::from_min_size(
        Pos2::new(x, lane_rect.top() + 3.0),
        Vec2::new(days * window.day_width, LANE_HEADER_HEIGHT - 6.0),
    );
    painter.rect_filled(rect, Rounding::same(4.0), theme::BG_SELECTED);
    painter.rect_stroke(rect, Rounding::same(4.0), Stroke::new(1.0, theme::ACCENT));
    painter.text(
        Pos2::new(rect.left() + 4.0, rect.center().y),
        Align2::LEFT_CENTER,
        start.format("%d/%m").to_string(),
        theme::font_small(),
        theme::TEXT_PRIMARY,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_rect_has_no_geometry() {
        let rect = Rect::from_min_size(Pos2::new(10.0, 0.0), Vec2::new(0.0, 50.0));
        assert!(timeline_geometry(rect, 500.0).is_none());
        let rect = Rect::from_min_size(Pos2::new(10.0, 0.0), Vec2::new(800.0, 50.0));
        assert_eq!(
            timeline_geometry(rect, 500.0),
            Some(TimelineGeometry {
                left: 10.0,
                width: 500.0
            })
        );
    }
}
