// StashScope - ui/panels/filters.rs
//
// Filter controls sidebar: one combo box per filterable column plus a
// Clear Filters button.

use crate::app::state::AppState;
use crate::core::model::Field;
use crate::util::constants::FILTER_ALL_LABEL;

/// Render the filter controls.
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let enabled = !state.records.is_empty();
    ui.add_enabled_ui(enabled, |ui| {
        for &field in Field::filterable() {
            let current = state.filter_state.get(field).map(str::to_string);
            let mut selected = current.clone();

            ui.label(format!("{field}:"));
            egui::ComboBox::from_id_salt(("filter", field.name()))
                .width(ui.available_width())
                .selected_text(current.as_deref().unwrap_or(FILTER_ALL_LABEL))
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut selected, None, FILTER_ALL_LABEL);
                    for option in state.filter_options.for_field(field) {
                        ui.selectable_value(&mut selected, Some(option.clone()), option.as_str());
                    }
                });
            ui.add_space(4.0);

            if selected != current {
                state.set_filter(field, selected);
            }
        }

        ui.separator();
        if ui
            .add_enabled(!state.filter_state.is_empty(), egui::Button::new("Clear Filters"))
            .clicked()
        {
            state.clear_filters();
        }
    });
}
