// StashScope - ui/theme.rs
//
// Chart colours and layout constants.
// No dependencies on app state or business logic.

use crate::core::raster::palette_colour;
use egui::Color32;

/// Colour of chart series `idx`. Shares the palette with PNG export so the
/// snapshot matches what is on screen.
pub fn series_colour(idx: usize) -> Color32 {
    let [r, g, b] = palette_colour(idx);
    Color32::from_rgb(r, g, b)
}

/// Colour for notices (errors surfaced in the status bar).
pub const NOTICE_COLOUR: Color32 = Color32::from_rgb(217, 119, 6); // Amber 600

/// Layout constants.
pub const SIDEBAR_WIDTH: f32 = 220.0;
pub const ROW_HEIGHT: f32 = 20.0;
pub const CHART_HEIGHT: f32 = 320.0;
pub const BAR_WIDTH: f64 = 0.7;
