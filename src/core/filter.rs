// StashScope - core/filter.rs
//
// Equality filter engine over the League, Account and Action columns.
// All active predicates are AND-combined.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::model::{Field, Record};

/// Complete filter state. An unset predicate passes every value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub league: Option<String>,
    pub account: Option<String>,
    pub action: Option<String>,
}

impl FilterState {
    /// Returns true if no predicates are active.
    pub fn is_empty(&self) -> bool {
        self.league.is_none() && self.account.is_none() && self.action.is_none()
    }

    /// Currently selected value for a filterable field.
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::League => self.league.as_deref(),
            Field::Account => self.account.as_deref(),
            Field::Action => self.action.as_deref(),
            _ => None,
        }
    }

    /// Set or clear the predicate on `field`.
    ///
    /// An empty value clears the predicate, matching the "All" entry.
    /// Fields other than League, Account and Action are ignored; returns
    /// whether the state changed.
    pub fn set(&mut self, field: Field, value: Option<String>) -> bool {
        let value = value.filter(|v| !v.is_empty());
        let slot = match field {
            Field::League => &mut self.league,
            Field::Account => &mut self.account,
            Field::Action => &mut self.action,
            other => {
                tracing::debug!(field = %other, "Ignoring filter on non-filterable field");
                return false;
            }
        };
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }
}

/// Apply filters to a slice of records, returning indices of matching records.
///
/// Indices are ascending, so the filtered view keeps source order.
pub fn apply_filters(records: &[Record], filter: &FilterState) -> Vec<usize> {
    if filter.is_empty() {
        return (0..records.len()).collect();
    }

    records
        .iter()
        .enumerate()
        .filter(|(_, record)| matches_all(record, filter))
        .map(|(idx, _)| idx)
        .collect()
}

/// Check if a single record matches all active predicates (exact,
/// case-sensitive).
pub fn matches_all(record: &Record, filter: &FilterState) -> bool {
    Field::filterable().iter().all(|&field| match filter.get(field) {
        Some(wanted) => record.field(field) == wanted,
        None => true,
    })
}

/// Distinct values of `field` in first-seen order, for the filter dropdowns.
pub fn distinct_values(records: &[Record], field: Field) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for record in records {
        let value = record.field(field);
        if seen.insert(value) {
            out.push(value.to_string());
        }
    }
    out
}

/// Dropdown options for each filterable field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub leagues: Vec<String>,
    pub accounts: Vec<String>,
    pub actions: Vec<String>,
}

impl FilterOptions {
    /// Collect options from the full record set.
    pub fn from_records(records: &[Record]) -> Self {
        Self {
            leagues: distinct_values(records, Field::League),
            accounts: distinct_values(records, Field::Account),
            actions: distinct_values(records, Field::Action),
        }
    }

    /// Options for one filterable field.
    pub fn for_field(&self, field: Field) -> &[String] {
        match field {
            Field::League => &self.leagues,
            Field::Account => &self.accounts,
            Field::Action => &self.actions,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(league: &str, account: &str, action: &str) -> Record {
        Record::from_pairs(&[
            ("League", league),
            ("Account", account),
            ("Action", action),
        ])
    }

    fn sample() -> Vec<Record> {
        vec![
            make_record("Standard", "alice", "added"),
            make_record("Hardcore", "bob", "added"),
            make_record("Standard", "bob", "removed"),
            make_record("standard", "carol", "added"),
        ]
    }

    #[test]
    fn test_empty_filter_returns_all() {
        let records = sample();
        let result = apply_filters(&records, &FilterState::default());
        assert_eq!(result, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_league_filter_preserves_order() {
        let records = sample();
        let filter = FilterState {
            league: Some("Standard".to_string()),
            ..Default::default()
        };
        let result = apply_filters(&records, &filter);
        assert_eq!(result, vec![0, 2]);
        assert!(result
            .iter()
            .all(|&i| records[i].field(Field::League) == "Standard"));
    }

    #[test]
    fn test_combined_filters() {
        let records = sample();
        let filter = FilterState {
            account: Some("bob".to_string()),
            action: Some("added".to_string()),
            ..Default::default()
        };
        assert_eq!(apply_filters(&records, &filter), vec![1]);
    }

    #[test]
    fn test_no_match_yields_empty() {
        let records = sample();
        let filter = FilterState {
            league: Some("Ruthless".to_string()),
            ..Default::default()
        };
        assert!(apply_filters(&records, &filter).is_empty());
    }

    #[test]
    fn test_set_empty_value_clears_predicate() {
        let mut filter = FilterState::default();
        assert!(filter.set(Field::League, Some("Standard".to_string())));
        assert!(!filter.set(Field::League, Some("Standard".to_string())));
        assert!(filter.set(Field::League, Some(String::new())));
        assert!(filter.is_empty());
    }

    #[test]
    fn test_set_on_non_filterable_field_ignored() {
        let mut filter = FilterState::default();
        assert!(!filter.set(Field::Item, Some("Orb".to_string())));
        assert!(filter.is_empty());
    }

    #[test]
    fn test_distinct_values_first_seen_order() {
        let records = sample();
        assert_eq!(
            distinct_values(&records, Field::League),
            vec!["Standard", "Hardcore", "standard"]
        );
        let options = FilterOptions::from_records(&records);
        assert_eq!(options.accounts, vec!["alice", "bob", "carol"]);
        assert_eq!(options.for_field(Field::Action), ["added", "removed"]);
    }
}
