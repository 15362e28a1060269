// StashScope - ui/panels/summary.rs
//
// Load summary modal window.
// Shows row counts for the most recent load and lists the discarded rows.
// Config warnings are also listed.

use crate::app::state::AppState;
use crate::ui::theme;

/// Render the load summary dialog (if state.show_summary is true).
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    if !state.show_summary {
        return;
    }

    let mut open = true;
    egui::Window::new("Load Summary")
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .min_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            if let Some(ref summary) = state.load_summary {
                // -----------------------------------------------------------------
                // Overall statistics
                // -----------------------------------------------------------------
                ui.strong("Overview");
                egui::Grid::new("summary_overview")
                    .num_columns(2)
                    .spacing([16.0, 4.0])
                    .show(ui, |ui| {
                        ui.label("File:");
                        ui.label(egui::RichText::new(&summary.source_name).monospace());
                        ui.end_row();

                        ui.label("Columns:");
                        ui.label(summary.columns.len().to_string());
                        ui.end_row();

                        ui.label("Rows loaded:");
                        ui.label(summary.rows_loaded.to_string());
                        ui.end_row();

                        ui.label("Rows discarded:");
                        let colour = if summary.rows_discarded > 0 {
                            theme::NOTICE_COLOUR
                        } else {
                            ui.style().visuals.text_color()
                        };
                        ui.colored_label(colour, summary.rows_discarded.to_string());
                        ui.end_row();

                        ui.label("Duration:");
                        ui.label(format!("{:.3}s", summary.duration.as_secs_f64()));
                        ui.end_row();
                    });

                // -----------------------------------------------------------------
                // Discarded rows
                // -----------------------------------------------------------------
                if !summary.malformed.is_empty() {
                    ui.add_space(8.0);
                    ui.separator();
                    ui.strong("Discarded rows");
                    if summary.malformed.len() < summary.rows_discarded {
                        ui.label(
                            egui::RichText::new(format!(
                                "Showing the first {} of {}.",
                                summary.malformed.len(),
                                summary.rows_discarded
                            ))
                            .weak(),
                        );
                    }

                    egui::ScrollArea::vertical()
                        .id_salt("summary_malformed")
                        .max_height(240.0)
                        .show(ui, |ui| {
                            egui::Grid::new("summary_malformed_table")
                                .num_columns(3)
                                .striped(true)
                                .spacing([12.0, 3.0])
                                .show(ui, |ui| {
                                    ui.strong("Line");
                                    ui.strong("Fields");
                                    ui.strong("Content");
                                    ui.end_row();

                                    for row in &summary.malformed {
                                        ui.label(row.line_number.to_string());
                                        ui.label(format!("{}/{}", row.found, row.expected));
                                        ui.label(
                                            egui::RichText::new(&row.preview)
                                                .monospace()
                                                .size(11.5),
                                        );
                                        ui.end_row();
                                    }
                                });
                        });
                }
            } else {
                ui.label("No file has been loaded yet.");
            }

            // -----------------------------------------------------------------
            // Warnings
            // -----------------------------------------------------------------
            if !state.warnings.is_empty() {
                ui.add_space(8.0);
                ui.separator();
                ui.strong(format!("Warnings ({})", state.warnings.len()));

                egui::ScrollArea::vertical()
                    .id_salt("summary_warnings")
                    .max_height(120.0)
                    .show(ui, |ui| {
                        for warn in &state.warnings {
                            ui.label(
                                egui::RichText::new(warn)
                                    .color(theme::NOTICE_COLOUR)
                                    .size(11.5),
                            );
                        }
                    });
            }

            ui.add_space(8.0);
            ui.separator();
            if ui.button("Close").clicked() {
                state.show_summary = false;
            }
        });

    if !open {
        state.show_summary = false;
    }
}
