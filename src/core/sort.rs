// StashScope - core/sort.rs
//
// Table ordering. Sorting works on index views so the full record set is
// never reordered or copied.

use crate::core::model::{Field, Record};

/// Current table sort: column (if any) and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: Option<Field>,
    pub ascending: bool,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            column: None,
            ascending: true,
        }
    }
}

impl SortState {
    /// Header click: same column reverses direction, a different column
    /// becomes the sort column in ascending order.
    pub fn toggle(&mut self, column: Field) {
        if self.column == Some(column) {
            self.ascending = !self.ascending;
        } else {
            self.column = Some(column);
            self.ascending = true;
        }
    }

    /// Direction arrow for a column header, empty when not sorted on it.
    pub fn indicator(&self, column: Field) -> &'static str {
        match (self.column == Some(column), self.ascending) {
            (false, _) => "",
            (true, true) => " \u{25b2}",
            (true, false) => " \u{25bc}",
        }
    }
}

/// Return `view` (indices into `records`) ordered by plain string comparison
/// of `column`. The sort is stable; the input view is not modified.
///
/// Records lacking `column` sort as an empty string.
pub fn sorted_view(records: &[Record], view: &[usize], column: &str, ascending: bool) -> Vec<usize> {
    let mut out = view.to_vec();
    out.sort_by(|&a, &b| {
        let ord = value_of(records, a, column).cmp(value_of(records, b, column));
        if ascending {
            ord
        } else {
            ord.reverse()
        }
    });
    out
}

/// Apply a `SortState` to a view. With no sort column the view is returned
/// in its existing order.
pub fn apply_sort(records: &[Record], view: &[usize], sort: &SortState) -> Vec<usize> {
    match sort.column {
        Some(column) => sorted_view(records, view, column.name(), sort.ascending),
        None => view.to_vec(),
    }
}

/// Sort owned records by `column` and return a new vector.
pub fn sort_records(records: &[Record], column: &str, ascending: bool) -> Vec<Record> {
    let all: Vec<usize> = (0..records.len()).collect();
    sorted_view(records, &all, column, ascending)
        .into_iter()
        .map(|i| records[i].clone())
        .collect()
}

fn value_of<'a>(records: &'a [Record], idx: usize, column: &str) -> &'a str {
    records
        .get(idx)
        .and_then(|r| r.get(column))
        .unwrap_or("")
}
