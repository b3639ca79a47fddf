use chrono::NaiveDate;
use egui::{menu, RichText, Ui};
use egui_phosphor::regular as icons;

use crate::app::GanttApp;
use crate::ui::theme;

const PERIOD_MONTHS: [u32; 4] = [3, 4, 5, 6];

/// Render the menu bar and chart period controls.
pub fn show_controls(app: &mut GanttApp, today: NaiveDate, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_header()), |ui| {
            if ui.button("  Export CSV...").clicked() {
                app.export_csv();
                ui.close_menu();
            }
            if ui.button("  Open Data Folder").clicked() {
                app.open_data_folder();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Team  ").font(theme::font_header()), |ui| {
            if ui.button("  New Task").clicked() {
                app.open_new_task(today);
                ui.close_menu();
            }
            if ui.button("  Manage Assignees...").clicked() {
                app.show_assignees = true;
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Help  ").font(theme::font_header()), |ui| {
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        ui.separator();

        if ui.button(format!("{}  New Task", icons::PLUS)).clicked() {
            app.open_new_task(today);
        }

        ui.separator();

        // Chart period: start date and a span in months
        ui.label(RichText::new("Period").color(theme::TEXT_SECONDARY));
        ui.add(egui_extras::DatePickerButton::new(&mut app.period_start).id_salt("period_start"));
        egui::ComboBox::from_id_salt("period_months")
            .selected_text(format!("{} months", app.period_months))
            .width(90.0)
            .show_ui(ui, |ui| {
                for months in PERIOD_MONTHS {
                    ui.selectable_value(&mut app.period_months, months, format!("{} months", months));
                }
            });
        if ui.button("Apply").clicked() {
            app.apply_period();
        }
        let reset = ui.add_enabled(app.window_override.is_some(), egui::Button::new("Fit Tasks"));
        if reset.on_hover_text("Size the chart to the tasks again").clicked() {
            app.reset_period();
        }

        // Right-aligned visible range
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let window = app.frame_window(today);
            ui.label(
                RichText::new(format!(
                    "{} – {}",
                    window.start.format("%d %b %Y"),
                    window.end.format("%d %b %Y")
                ))
                .size(11.0)
                .weak(),
            );
        });
    });
}
