// StashScope - ui/panels/table.rs
//
// Virtual-scrolling record table.
//
// Uses `ScrollArea::show_rows` so only visible rows are laid out. Column
// headers are buttons; a click toggles the sort through the controller.
// Header clicks are collected and applied after the scroll area releases its
// borrow of `state.records`.

use crate::app::state::AppState;
use crate::core::datefmt::format_date;
use crate::core::model::Field;
use crate::ui::theme;

/// Render the table panel (central area, Table tab).
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    if state.records.is_empty() {
        ui.centered_and_justified(|ui| {
            ui.label("No records loaded.\nOpen a CSV file via File \u{2192} Open CSV.");
        });
        return;
    }

    let columns = Field::displayed();
    let col_width = (ui.available_width() / columns.len() as f32).max(80.0);
    let mut clicked: Option<Field> = None;

    egui::Grid::new("table_header")
        .num_columns(columns.len())
        .min_col_width(col_width)
        .max_col_width(col_width)
        .show(ui, |ui| {
            for &field in columns {
                let label = format!("{field}{}", state.sort_state.indicator(field));
                let button = egui::Button::new(egui::RichText::new(label).strong()).frame(false);
                if ui.add(button).on_hover_text("Sort by this column").clicked() {
                    clicked = Some(field);
                }
            }
            ui.end_row();
        });
    ui.separator();

    let rows = state.display_indices.len();
    if rows == 0 {
        ui.centered_and_justified(|ui| {
            ui.label("No records match the current filters.");
        });
    } else {
        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show_rows(ui, theme::ROW_HEIGHT, rows, |ui, row_range| {
                egui::Grid::new("table_rows")
                    .num_columns(columns.len())
                    .min_col_width(col_width)
                    .max_col_width(col_width)
                    .striped(true)
                    .start_row(row_range.start)
                    .show(ui, |ui| {
                        for display_idx in row_range {
                            let Some(record) = state
                                .display_indices
                                .get(display_idx)
                                .and_then(|&i| state.records.get(i))
                            else {
                                continue;
                            };
                            for &field in columns {
                                let raw = record.field(field);
                                let text = if field == Field::Date {
                                    format_date(raw)
                                } else {
                                    raw.to_string()
                                };
                                ui.add(egui::Label::new(text).truncate())
                                    .on_hover_text(raw);
                            }
                            ui.end_row();
                        }
                    });
            });
    }

    if let Some(field) = clicked {
        state.toggle_sort(field);
    }
}
