// StashScope - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "StashScope";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "StashScope";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// CSV schema
// =============================================================================

/// Columns that must be present in the header row, in the order they are
/// checked. The first absent one is reported.
pub const REQUIRED_COLUMNS: &[&str] = &["Date", "Id", "League", "Account", "Action", "Stash", "Item"];

/// Byte-order mark stripped from the start of the first line.
pub const UTF8_BOM: char = '\u{feff}';

/// Field delimiter. Quoted fields containing the delimiter are not supported.
pub const FIELD_DELIMITER: char = ',';

/// Maximum number of malformed-row diagnostics retained per load.
/// The discarded-row count stays exact beyond this cap.
pub const MAX_MALFORMED_DIAGNOSTICS: usize = 1_000;

// =============================================================================
// Aggregation
// =============================================================================

/// Number of hour buckets in the hourly activity chart.
pub const HOURS_PER_DAY: usize = 24;

/// Time part assumed when a date value carries no space-separated time.
pub const DEFAULT_TIME_PART: &str = "00:00";

// =============================================================================
// Export
// =============================================================================

/// Default CSV export file name.
pub const DEFAULT_CSV_FILE_NAME: &str = "exported_data.csv";

/// Default JSON export file name.
pub const DEFAULT_JSON_FILE_NAME: &str = "exported_data.json";

/// Default timeline snapshot file name.
pub const DEFAULT_PNG_FILE_NAME: &str = "chart.png";

/// Default timeline snapshot size in pixels.
pub const DEFAULT_PNG_WIDTH: u32 = 1200;
pub const DEFAULT_PNG_HEIGHT: u32 = 600;

/// Bounds on the user-configurable snapshot size.
pub const MIN_PNG_DIMENSION: u32 = 100;
pub const MAX_PNG_DIMENSION: u32 = 8_192;

/// Padding (pixels) between the image border and the plot area.
pub const PNG_PLOT_MARGIN: u32 = 24;

/// Series colours shared by the on-screen charts and the PNG snapshot.
/// Cycled when there are more series than entries.
pub const SERIES_PALETTE: &[[u8; 3]] = &[
    [59, 130, 246],  // Blue 500
    [239, 68, 68],   // Red 500
    [34, 197, 94],   // Green 500
    [234, 179, 8],   // Yellow 500
    [168, 85, 247],  // Purple 500
    [20, 184, 166],  // Teal 500
    [249, 115, 22],  // Orange 500
    [236, 72, 153],  // Pink 500
    [99, 102, 241],  // Indigo 500
    [132, 204, 22],  // Lime 500
    [14, 165, 233],  // Sky 500
    [120, 113, 108], // Stone 500
];

// =============================================================================
// UI defaults
// =============================================================================

/// Default UI body font size in points.
pub const DEFAULT_FONT_SIZE: f32 = 14.5;

/// Minimum user-configurable UI font size (points).
pub const MIN_FONT_SIZE: f32 = 10.0;

/// Maximum user-configurable UI font size (points).
pub const MAX_FONT_SIZE: f32 = 24.0;

/// Label shown for an inactive filter.
pub const FILTER_ALL_LABEL: &str = "All";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Maximum length of a CSV line included in log output.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
