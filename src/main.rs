// StashScope - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading and logging initialisation (debug mode support)
// 3. Headless export when any --export-* flag is given
// 4. Otherwise eframe GUI launch, with the file preloaded if one was given

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod gui;

// Re-export modules from the library crate so that `gui.rs` and other
// binary-side code can still use `crate::app::...`, `crate::core::...` etc.
pub use stashscope::app;

pub use stashscope::core;
pub use stashscope::platform;
pub use stashscope::ui;
pub use stashscope::util;

use crate::app::state::{AppState, ExportKind};
use crate::core::model::Field;
use crate::util::error::{LoadError, StashScopeError};
use clap::Parser;
use std::path::PathBuf;

/// StashScope - viewer for stash transaction CSV exports.
///
/// Opens the GUI by default. With any --export-* flag the file is loaded,
/// filtered and exported without a window.
#[derive(Parser, Debug)]
#[command(name = "StashScope", version, about)]
struct Cli {
    /// CSV file to load.
    file: Option<PathBuf>,

    /// Only keep records of this league.
    #[arg(long)]
    league: Option<String>,

    /// Only keep records of this account.
    #[arg(long)]
    account: Option<String>,

    /// Only keep records with this action.
    #[arg(long)]
    action: Option<String>,

    /// Write the (filtered) records as CSV to this path.
    #[arg(long = "export-csv", value_name = "OUT")]
    export_csv: Option<PathBuf>,

    /// Write the (filtered) records as JSON to this path.
    #[arg(long = "export-json", value_name = "OUT")]
    export_json: Option<PathBuf>,

    /// Write the timeline chart as PNG to this path.
    #[arg(long = "export-png", value_name = "OUT")]
    export_png: Option<PathBuf>,

    /// Use this config file instead of the platform default.
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

impl Cli {
    /// Requested exports in a fixed order.
    fn exports(&self) -> Vec<(ExportKind, PathBuf)> {
        [
            (ExportKind::Csv, &self.export_csv),
            (ExportKind::Json, &self.export_json),
            (ExportKind::Png, &self.export_png),
        ]
        .into_iter()
        .filter_map(|(kind, path)| path.clone().map(|p| (kind, p)))
        .collect()
    }
}

/// Load, filter and export without a window.
fn run_headless(cli: &Cli, state: &mut AppState) -> Result<(), StashScopeError> {
    let path = cli.file.as_deref().ok_or(LoadError::NoFileSelected)?;
    state.load_file(path)?;

    for (field, value) in [
        (Field::League, &cli.league),
        (Field::Account, &cli.account),
        (Field::Action, &cli.action),
    ] {
        state.set_filter(field, value.clone());
    }

    if state.filtered_indices.is_empty() && !state.filter_state.is_empty() {
        tracing::warn!("Filters match no records; exporting the full set");
    }

    for (kind, dest) in cli.exports() {
        state.export(kind, &dest)?;
        println!("{}", state.status_message);
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    // Config first: it may carry the log level.
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| platform::config::PlatformPaths::resolve().config_file());
    let (config, config_warnings) = platform::config::load_config(&config_path);

    util::logging::init(cli.debug, config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        config = %config_path.display(),
        "StashScope starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    let mut state = AppState::new(config, cli.debug);
    state.warnings = config_warnings;

    if !cli.exports().is_empty() {
        if let Err(e) = run_headless(&cli, &mut state) {
            tracing::error!(error = %e, "Headless run failed");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        return;
    }

    if let Some(ref path) = cli.file {
        // Failures are shown in the status bar once the window opens.
        let _ = state.load_file(path);
    }

    tracing::info!("Launching GUI");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{}",
                util::constants::APP_NAME,
                util::constants::APP_VERSION
            ))
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        util::constants::APP_NAME,
        native_options,
        Box::new(move |cc| {
            gui::apply_appearance(&cc.egui_ctx, &state.config);
            Ok(Box::new(gui::StashScopeApp::new(state)))
        }),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        eprintln!("Error: Failed to launch StashScope GUI: {e}");
        std::process::exit(1);
    }
}
