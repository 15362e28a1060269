// StashScope - app/state.rs
//
// Session controller. Holds the loaded records, filter and sort state, the
// live charts and the load summary, and exposes the commands the GUI and the
// headless CLI drive.
// Owned by the eframe::App implementation (or by main in headless mode).

use crate::app::charts::{ChartKind, ChartSet};
use crate::core::export;
use crate::core::filter::{self, FilterOptions, FilterState};
use crate::core::model::{Field, LoadSummary, Record};
use crate::core::parser;
use crate::core::raster;
use crate::core::sort::{self, SortState};
use crate::platform::config::AppConfig;
use crate::platform::fs;
use crate::util::error::{ExportError, LoadError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Central panel tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewTab {
    #[default]
    Table,
    Charts,
}

/// The three export targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Csv,
    Json,
    Png,
}

impl ExportKind {
    pub fn label(&self) -> &'static str {
        match self {
            ExportKind::Csv => "CSV",
            ExportKind::Json => "JSON",
            ExportKind::Png => "PNG",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportKind::Csv => "csv",
            ExportKind::Json => "json",
            ExportKind::Png => "png",
        }
    }

    /// Suggested file name from configuration.
    pub fn default_file_name<'a>(&self, config: &'a AppConfig) -> &'a str {
        match self {
            ExportKind::Csv => &config.csv_file_name,
            ExportKind::Json => &config.json_file_name,
            ExportKind::Png => &config.png_file_name,
        }
    }
}

/// Top-level application state.
#[derive(Debug)]
pub struct AppState {
    /// Validated configuration.
    pub config: AppConfig,

    /// Path of the loaded file (None before the first load or for text loads).
    pub source_path: Option<PathBuf>,

    /// All records of the current dataset in source order.
    pub records: Vec<Record>,

    /// Indices of records matching the current filter (into `records`).
    pub filtered_indices: Vec<usize>,

    /// `filtered_indices` reordered by the current sort; what the table shows.
    pub display_indices: Vec<usize>,

    /// Current filter configuration.
    pub filter_state: FilterState,

    /// Combo box choices, rebuilt on every load.
    pub filter_options: FilterOptions,

    /// Table sort. Survives filter changes and reloads.
    pub sort_state: SortState,

    /// Live charts over the filtered records.
    pub charts: ChartSet,

    /// Summary of the most recent successful load.
    pub load_summary: Option<LoadSummary>,

    /// Status message for the status bar.
    pub status_message: String,

    /// Non-fatal warnings (config validation and the like).
    pub warnings: Vec<String>,

    /// Whether to show the load summary dialog.
    pub show_summary: bool,

    /// Whether to show the About dialog.
    pub show_about: bool,

    /// Selected central tab.
    pub active_tab: ViewTab,

    /// Whether debug mode is enabled.
    pub debug_mode: bool,
}

impl AppState {
    pub fn new(config: AppConfig, debug_mode: bool) -> Self {
        Self {
            config,
            source_path: None,
            records: Vec::new(),
            filtered_indices: Vec::new(),
            display_indices: Vec::new(),
            filter_state: FilterState::default(),
            filter_options: FilterOptions::default(),
            sort_state: SortState::default(),
            charts: ChartSet::new(),
            load_summary: None,
            status_message: "Ready. Open a CSV file to begin.".to_string(),
            warnings: Vec::new(),
            show_summary: false,
            show_about: false,
            active_tab: ViewTab::default(),
            debug_mode,
        }
    }

    // -------------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------------

    /// Load the file picked by the user, if any.
    pub fn load_selected(&mut self, path: Option<PathBuf>) -> Result<usize, LoadError> {
        match path {
            Some(p) => self.load_file(&p),
            None => {
                let err = LoadError::NoFileSelected;
                self.status_message = err.to_string();
                Err(err)
            }
        }
    }

    /// Read and load a CSV file. Returns the number of records loaded.
    pub fn load_file(&mut self, path: &Path) -> Result<usize, LoadError> {
        let text = match fs::read_file_lossy(path) {
            Ok(t) => t,
            Err(e) => {
                let err = LoadError::Io {
                    path: path.to_path_buf(),
                    source: e,
                };
                tracing::warn!(error = %err, "Load failed");
                self.status_message = err.to_string();
                return Err(err);
            }
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let loaded = self.load_text(&name, &text)?;
        self.source_path = Some(path.to_path_buf());
        Ok(loaded)
    }

    /// Parse `text` and, if the header is valid, replace the whole session
    /// with its records. On failure the current session is left untouched.
    pub fn load_text(&mut self, source_name: &str, text: &str) -> Result<usize, LoadError> {
        let started = Instant::now();
        let parsed = match parser::parse_csv(text) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(source = source_name, error = %e, "Load rejected");
                self.status_message = e.to_string();
                return Err(e);
            }
        };

        let rows_loaded = parsed.records.len();
        let rows_discarded = parsed.malformed_count;

        self.source_path = None;
        self.records = parsed.records;
        self.filter_state = FilterState::default();
        self.filter_options = FilterOptions::from_records(&self.records);
        self.load_summary = Some(LoadSummary {
            source_name: source_name.to_string(),
            rows_loaded,
            rows_discarded,
            malformed: parsed.malformed,
            columns: parsed.columns.names().to_vec(),
            duration: started.elapsed(),
        });
        self.refresh();

        self.status_message = if rows_discarded > 0 {
            format!("Loaded {rows_loaded} records from {source_name} ({rows_discarded} malformed rows skipped).")
        } else {
            format!("Loaded {rows_loaded} records from {source_name}.")
        };
        self.show_summary = rows_discarded > 0;

        tracing::info!(
            source = source_name,
            rows = rows_loaded,
            discarded = rows_discarded,
            lines = parsed.lines_processed,
            "Dataset loaded"
        );
        Ok(rows_loaded)
    }

    // -------------------------------------------------------------------------
    // Filtering and sorting
    // -------------------------------------------------------------------------

    /// Set (or clear with `None` / empty) the predicate on a filterable field.
    pub fn set_filter(&mut self, field: Field, value: Option<String>) {
        if self.filter_state.set(field, value) {
            tracing::debug!(field = %field, value = ?self.filter_state.get(field), "Filter changed");
            self.refresh();
        }
    }

    /// Reset every predicate.
    pub fn clear_filters(&mut self) {
        if !self.filter_state.is_empty() {
            self.filter_state = FilterState::default();
            self.refresh();
        }
    }

    /// Header click on `field`.
    pub fn toggle_sort(&mut self, field: Field) {
        self.sort_state.toggle(field);
        tracing::debug!(column = %field, ascending = self.sort_state.ascending, "Sort changed");
        self.display_indices = sort::apply_sort(&self.records, &self.filtered_indices, &self.sort_state);
    }

    /// Recompute the filtered view, its sorted order and every chart.
    pub fn refresh(&mut self) {
        self.filtered_indices = filter::apply_filters(&self.records, &self.filter_state);
        self.display_indices = sort::apply_sort(&self.records, &self.filtered_indices, &self.sort_state);
        let visible: Vec<&Record> = self
            .filtered_indices
            .iter()
            .filter_map(|&i| self.records.get(i))
            .collect();
        self.charts.rebuild(&visible);
    }

    /// Records as the table shows them: filtered, then sorted.
    pub fn display_rows(&self) -> impl Iterator<Item = &Record> {
        self.display_indices
            .iter()
            .filter_map(|&i| self.records.get(i))
    }

    // -------------------------------------------------------------------------
    // Export
    // -------------------------------------------------------------------------

    /// Run an export and report the outcome in the status bar.
    pub fn export(&mut self, kind: ExportKind, dest: &Path) -> Result<usize, ExportError> {
        let result = match kind {
            ExportKind::Csv => self.export_csv(dest),
            ExportKind::Json => self.export_json(dest),
            ExportKind::Png => self.export_png(dest).map(|()| 1),
        };
        match &result {
            Ok(n) => {
                self.status_message = match kind {
                    ExportKind::Png => format!("Saved timeline chart to {}.", dest.display()),
                    _ => format!("Exported {n} records to {} ({}).", dest.display(), kind.label()),
                };
                tracing::info!(kind = kind.label(), count = n, path = %dest.display(), "Export complete");
            }
            Err(e) => {
                tracing::warn!(kind = kind.label(), error = %e, "Export failed");
                self.status_message = e.to_string();
            }
        }
        result
    }

    /// Write the filtered records (or all records when the filter matches
    /// nothing) as CSV, in source order. The table sort is not applied.
    pub fn export_csv(&self, dest: &Path) -> Result<usize, ExportError> {
        let source = export::export_source(&self.records, &self.filtered_indices)?;
        let writer = create(dest)?;
        export::export_csv(&source, writer, dest)
    }

    /// JSON counterpart of `export_csv`.
    pub fn export_json(&self, dest: &Path) -> Result<usize, ExportError> {
        let source = export::export_source(&self.records, &self.filtered_indices)?;
        let mut writer = create(dest)?;
        let n = export::export_json(&source, &mut writer, dest)?;
        flush(writer, dest)?;
        Ok(n)
    }

    /// Draw the timeline chart to a PNG sized from configuration.
    pub fn export_png(&self, dest: &Path) -> Result<(), ExportError> {
        let chart = self
            .charts
            .get(ChartKind::Timeline)
            .ok_or(ExportError::NoChartAvailable)?;
        let img = raster::render_timeline(
            chart,
            ChartKind::Timeline.title(),
            self.config.png_width,
            self.config.png_height,
        )
        .map_err(|message| ExportError::Render {
            path: dest.to_path_buf(),
            message,
        })?;
        let mut writer = create(dest)?;
        raster::write_png(&img, &mut writer, dest)?;
        flush(writer, dest)
    }
}

fn create(dest: &Path) -> Result<std::io::BufWriter<std::fs::File>, ExportError> {
    fs::create_export_file(dest).map_err(|e| ExportError::Io {
        path: dest.to_path_buf(),
        source: e,
    })
}

fn flush<W: Write>(mut writer: W, dest: &Path) -> Result<(), ExportError> {
    writer.flush().map_err(|e| ExportError::Io {
        path: dest.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Date,Id,League,Account,Action,Stash,Item\n\
                          2024-01-05 14:30,1,Standard,carol,added,Main,Orb\n\
                          2024-01-05 15:00,2,Hardcore,alice,removed,Dump,Gem\n\
                          2024-01-06 09:00,3,Standard,bob,added,Main,Ring";

    fn loaded() -> AppState {
        let mut state = AppState::new(AppConfig::default(), false);
        state.load_text("sample.csv", SAMPLE).unwrap();
        state
    }

    fn display_ids(state: &AppState) -> Vec<String> {
        state
            .display_rows()
            .map(|r| r.field(Field::Id).to_string())
            .collect()
    }

    #[test]
    fn test_load_populates_view_and_charts() {
        let state = loaded();
        assert_eq!(state.records.len(), 3);
        assert_eq!(state.filtered_indices, vec![0, 1, 2]);
        assert_eq!(state.filter_options.leagues, vec!["Hardcore", "Standard"]);
        assert_eq!(state.charts.handles().len(), 4);
        assert!(!state.show_summary);
    }

    #[test]
    fn test_missing_column_keeps_previous_session() {
        let mut state = loaded();
        let err = state.load_text("bad.csv", "Date,Id\n1,2").unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { column: "League" }));
        assert_eq!(state.records.len(), 3);
        assert_eq!(state.status_message, "Missing required column: League");
    }

    #[test]
    fn test_no_file_selected() {
        let mut state = AppState::new(AppConfig::default(), false);
        assert!(matches!(
            state.load_selected(None),
            Err(LoadError::NoFileSelected)
        ));
        assert_eq!(state.status_message, "Please select a CSV file first.");
    }

    #[test]
    fn test_filter_updates_view_and_charts() {
        let mut state = loaded();
        state.set_filter(Field::League, Some("Standard".into()));
        assert_eq!(state.filtered_indices, vec![0, 2]);
        let timeline = state.charts.get(ChartKind::Timeline).unwrap();
        assert_eq!(timeline.series.len(), 1);

        state.clear_filters();
        assert_eq!(state.filtered_indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_sort_survives_filter_and_reload() {
        let mut state = loaded();
        state.toggle_sort(Field::Account);
        assert_eq!(display_ids(&state), vec!["2", "3", "1"]);
        state.toggle_sort(Field::Account);
        assert_eq!(display_ids(&state), vec!["1", "3", "2"]);

        state.set_filter(Field::Action, Some("added".into()));
        assert_eq!(display_ids(&state), vec!["1", "3"]);

        state.load_text("again.csv", SAMPLE).unwrap();
        assert_eq!(state.sort_state.column, Some(Field::Account));
        assert!(!state.sort_state.ascending);
        assert!(state.filter_state.is_empty());
        assert_eq!(display_ids(&state), vec!["1", "3", "2"]);
    }

    #[test]
    fn test_malformed_rows_open_summary() {
        let mut state = AppState::new(AppConfig::default(), false);
        let text = format!("{SAMPLE}\nshort,row");
        state.load_text("sample.csv", &text).unwrap();
        assert!(state.show_summary);
        let summary = state.load_summary.as_ref().unwrap();
        assert_eq!(summary.rows_discarded, 1);
        assert_eq!(summary.malformed[0].line_number, 5);
    }

    #[test]
    fn test_export_without_data_creates_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(AppConfig::default(), false);

        let csv = dir.path().join("out.csv");
        assert!(matches!(
            state.export(ExportKind::Csv, &csv),
            Err(ExportError::EmptyDataset)
        ));
        assert!(!csv.exists());
        assert_eq!(state.status_message, "No data to export.");

        let png = dir.path().join("chart.png");
        assert!(matches!(
            state.export(ExportKind::Png, &png),
            Err(ExportError::NoChartAvailable)
        ));
        assert!(!png.exists());
    }

    #[test]
    fn test_export_zero_match_filter_uses_full_set() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = loaded();
        state.set_filter(Field::Account, Some("nobody".into()));
        assert!(state.filtered_indices.is_empty());

        let csv = dir.path().join("out.csv");
        assert_eq!(state.export(ExportKind::Csv, &csv).unwrap(), 3);
    }

    #[test]
    fn test_export_ignores_table_sort() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = loaded();
        state.toggle_sort(Field::Account);
        assert_eq!(display_ids(&state), vec!["2", "3", "1"]);

        let sorted = dir.path().join("sorted.csv");
        state.export(ExportKind::Csv, &sorted).unwrap();
        state.set_filter(Field::Account, Some("nobody".into()));
        let fallback = dir.path().join("fallback.csv");
        state.export(ExportKind::Csv, &fallback).unwrap();

        let ids = |path: &Path| -> Vec<String> {
            std::fs::read_to_string(path)
                .unwrap()
                .lines()
                .skip(1)
                .map(|l| l.split(',').nth(1).unwrap().to_string())
                .collect()
        };
        assert_eq!(ids(&sorted), vec!["1", "2", "3"]);
        assert_eq!(ids(&fallback), ids(&sorted));
    }

    #[test]
    fn test_export_png_uses_configured_size() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            png_width: 300,
            png_height: 150,
            ..AppConfig::default()
        };
        let mut state = AppState::new(config, false);
        state.load_text("sample.csv", SAMPLE).unwrap();

        let png = dir.path().join("chart.png");
        state.export(ExportKind::Png, &png).unwrap();
        let img = image::open(&png).unwrap().into_rgba8();
        assert_eq!(img.dimensions(), (300, 150));
    }
}
