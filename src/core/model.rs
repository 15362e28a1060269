// StashScope - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use crate::util::constants::REQUIRED_COLUMNS;
use crate::util::error::LoadError;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::sync::Arc;

// =============================================================================
// Field (required columns)
// =============================================================================

/// The columns every stash transaction CSV must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Date,
    Id,
    League,
    Account,
    Action,
    Stash,
    Item,
}

impl Field {
    /// All required fields in header-check order.
    pub fn all() -> &'static [Field] {
        &[
            Field::Date,
            Field::Id,
            Field::League,
            Field::Account,
            Field::Action,
            Field::Stash,
            Field::Item,
        ]
    }

    /// Columns shown in the table, in display order. `Id` and `League` are
    /// parsed but not displayed.
    pub fn displayed() -> &'static [Field] {
        &[
            Field::Date,
            Field::Account,
            Field::Action,
            Field::Stash,
            Field::Item,
        ]
    }

    /// Fields that can be narrowed by the filter sidebar.
    pub fn filterable() -> &'static [Field] {
        &[Field::League, Field::Account, Field::Action]
    }

    /// Header name of this field.
    pub fn name(&self) -> &'static str {
        REQUIRED_COLUMNS[self.index()]
    }

    fn index(&self) -> usize {
        match self {
            Field::Date => 0,
            Field::Id => 1,
            Field::League => 2,
            Field::Account => 3,
            Field::Action => 4,
            Field::Stash => 5,
            Field::Item => 6,
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Columns (header-derived key set)
// =============================================================================

/// The key set shared by every record of one load.
///
/// Built from the header row. A repeated header name yields a single key at
/// its first position; the last column carrying that name supplies the value.
#[derive(Debug, PartialEq, Eq)]
pub struct Columns {
    /// Distinct names in first-seen header order.
    names: Vec<String>,
    /// For each raw header position, the slot in `names` it writes to.
    slots: Vec<usize>,
    /// Slot of each required field, indexed like `Field::all()`.
    required: [usize; 7],
}

impl Columns {
    /// Build the key set from trimmed header names.
    ///
    /// Fails with `MissingColumn` naming the first required column that is
    /// absent, checked in `REQUIRED_COLUMNS` order.
    pub fn from_header<S: AsRef<str>>(header: &[S]) -> Result<Self, LoadError> {
        let mut names: Vec<String> = Vec::new();
        let mut slots = Vec::with_capacity(header.len());
        for raw in header {
            let raw = raw.as_ref();
            let slot = match names.iter().position(|n| n == raw) {
                Some(existing) => existing,
                None => {
                    names.push(raw.to_string());
                    names.len() - 1
                }
            };
            slots.push(slot);
        }

        let mut required = [0usize; 7];
        for field in Field::all() {
            match names.iter().position(|n| n == field.name()) {
                Some(slot) => required[field.index()] = slot,
                None => {
                    return Err(LoadError::MissingColumn {
                        column: field.name(),
                    })
                }
            }
        }

        Ok(Self {
            names,
            slots,
            required,
        })
    }

    /// Distinct column names in header order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of fields a data row must have (raw header width, duplicates
    /// included).
    pub fn width(&self) -> usize {
        self.slots.len()
    }

    /// Number of distinct keys per record.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn slot_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

// =============================================================================
// Record
// =============================================================================

/// One parsed CSV row: field name to string value.
///
/// Values are stored as parsed (outer quotes already stripped). Records are
/// immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    columns: Arc<Columns>,
    values: Vec<String>,
}

impl Record {
    /// Build a record from the raw fields of one row.
    ///
    /// `fields` must have `columns.width()` entries; duplicate header names
    /// resolve to the last field. Returns `None` on a width mismatch.
    pub fn from_row(columns: &Arc<Columns>, fields: Vec<String>) -> Option<Self> {
        if fields.len() != columns.width() {
            return None;
        }
        let mut values = vec![String::new(); columns.len()];
        for (pos, value) in fields.into_iter().enumerate() {
            values[columns.slots[pos]] = value;
        }
        Some(Self {
            columns: Arc::clone(columns),
            values,
        })
    }

    /// Build a standalone record from `(name, value)` pairs.
    ///
    /// The key set is the required columns followed by any extra names in
    /// the order given. Required fields not supplied are empty.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let mut names: Vec<String> = REQUIRED_COLUMNS.iter().map(|s| s.to_string()).collect();
        for (name, _) in pairs {
            if !names.iter().any(|n| n == name) {
                names.push((*name).to_string());
            }
        }
        // Required columns occupy the first seven slots in Field order.
        let columns = Arc::new(Columns {
            slots: (0..names.len()).collect(),
            names,
            required: [0, 1, 2, 3, 4, 5, 6],
        });
        let mut values = vec![String::new(); columns.len()];
        for (name, value) in pairs {
            if let Some(slot) = columns.slot_of(name) {
                values[slot] = (*value).to_string();
            }
        }
        Self { columns, values }
    }

    /// Value of a required field.
    pub fn field(&self, field: Field) -> &str {
        &self.values[self.columns.required[field.index()]]
    }

    /// Value of any column by header name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.columns.slot_of(name).map(|slot| self.values[slot].as_str())
    }

    /// The key set this record belongs to.
    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    /// Values in key order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// `(name, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// =============================================================================
// Load diagnostics
// =============================================================================

/// A data row discarded because its field count differs from the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRow {
    /// 1-based line number in the source text (header is line 1).
    pub line_number: usize,
    pub expected: usize,
    pub found: usize,
    /// The raw line, truncated for display.
    pub preview: String,
}

impl std::fmt::Display for MalformedRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line {}: expected {} fields, found {}",
            self.line_number, self.expected, self.found
        )
    }
}

/// Summary of the most recent successful load.
#[derive(Debug, Clone, Default)]
pub struct LoadSummary {
    /// Display name of the loaded source (file name or "<stdin>").
    pub source_name: String,

    /// Records retained.
    pub rows_loaded: usize,

    /// Rows discarded for a field-count mismatch (exact, uncapped).
    pub rows_discarded: usize,

    /// Retained diagnostics (capped at MAX_MALFORMED_DIAGNOSTICS).
    pub malformed: Vec<MalformedRow>,

    /// Distinct column names in header order.
    pub columns: Vec<String>,

    /// Wall-clock load duration.
    pub duration: std::time::Duration,
}

// =============================================================================
// Chart series
// =============================================================================

/// One named numeric series aligned to a label axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series {
    pub name: String,
    pub values: Vec<u64>,
}

/// Labels plus one or more series, each with one value per label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

impl ChartData {
    /// Sum of every series at label index `idx` (stacked bar height).
    pub fn stacked_total(&self, idx: usize) -> u64 {
        self.series
            .iter()
            .filter_map(|s| s.values.get(idx))
            .sum()
    }

    /// Largest stacked total across all labels.
    pub fn max_stacked_total(&self) -> u64 {
        (0..self.labels.len())
            .map(|i| self.stacked_total(i))
            .max()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
