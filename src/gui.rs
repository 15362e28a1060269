// StashScope - gui.rs
//
// Top-level eframe::App implementation.
// Wires together all UI panels and routes menu actions to the controller.

use crate::app::state::{AppState, ExportKind, ViewTab};
use crate::platform::config::AppConfig;
use crate::ui;

/// The StashScope application.
pub struct StashScopeApp {
    pub state: AppState,
}

impl StashScopeApp {
    /// Create a new application instance with the given state.
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Ask for a CSV file and load it.
    fn open_csv(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("CSV files", &["csv"])
            .add_filter("All files", &["*"])
            .pick_file();
        // Errors are already reflected in the status bar by the controller.
        let _ = self.state.load_selected(picked);
    }

    /// Ask for a destination and run an export.
    fn export(&mut self, kind: ExportKind) {
        let dest = rfd::FileDialog::new()
            .add_filter(kind.label(), &[kind.extension()])
            .set_file_name(kind.default_file_name(&self.state.config))
            .save_file();
        if let Some(dest) = dest {
            let _ = self.state.export(kind, &dest);
        }
    }
}

/// Apply theme and font size from configuration.
pub fn apply_appearance(ctx: &egui::Context, config: &AppConfig) {
    ctx.set_visuals(if config.dark_mode {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    });

    let body = config.font_size;
    ctx.style_mut(|style| {
        for (text_style, font) in style.text_styles.iter_mut() {
            font.size = match text_style {
                egui::TextStyle::Heading => body * 1.3,
                egui::TextStyle::Small => body * 0.75,
                _ => body,
            };
        }
    });
}

impl eframe::App for StashScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let has_records = !self.state.records.is_empty();

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open CSV\u{2026}").clicked() {
                        ui.close_menu();
                        self.open_csv();
                    }
                    ui.separator();
                    // Exports stay enabled so an empty session reports why
                    // nothing was written.
                    if ui.button("Export CSV\u{2026}").clicked() {
                        ui.close_menu();
                        self.export(ExportKind::Csv);
                    }
                    if ui.button("Export JSON\u{2026}").clicked() {
                        ui.close_menu();
                        self.export(ExportKind::Json);
                    }
                    if ui.button("Export Timeline PNG\u{2026}").clicked() {
                        ui.close_menu();
                        self.export(ExportKind::Png);
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("View", |ui| {
                    if ui.button("Load Summary").clicked() {
                        self.state.show_summary = true;
                        ui.close_menu();
                    }
                    ui.add_enabled_ui(has_records, |ui| {
                        if ui.button("Clear Filters").clicked() {
                            self.state.clear_filters();
                            ui.close_menu();
                        }
                    });
                });
                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        self.state.show_about = true;
                        ui.close_menu();
                    }
                });
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.state.status_message);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let total = self.state.records.len();
                    let filtered = self.state.filtered_indices.len();
                    if total > 0 {
                        ui.label(format!("{filtered}/{total} records"));
                    }
                });
            });
        });

        // Left sidebar
        egui::SidePanel::left("sidebar")
            .default_width(ui::theme::SIDEBAR_WIDTH)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("sidebar_filters")
                    .auto_shrink([false; 2])
                    .show(ui, |ui| {
                        ui::panels::filters::render(ui, &mut self.state);
                    });
            });

        // Central panel: Table / Charts tabs
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.state.active_tab, ViewTab::Table, "Table");
                ui.selectable_value(&mut self.state.active_tab, ViewTab::Charts, "Charts");
            });
            ui.separator();
            match self.state.active_tab {
                ViewTab::Table => ui::panels::table::render(ui, &mut self.state),
                ViewTab::Charts => ui::panels::charts::render(ui, &self.state),
            }
        });

        // Dialogs (modal-ish)
        ui::panels::summary::render(ctx, &mut self.state);
        ui::panels::about::render(ctx, &mut self.state);
    }
}
