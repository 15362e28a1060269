// StashScope - core/parser.rs
//
// CSV ingestion for stash transaction exports.
// Core layer: accepts text, never touches the filesystem directly.
//
// The format is deliberately naive: fields are split on every comma and only
// one outer pair of double quotes is removed. Quoted fields containing commas
// are not supported; files written by `core::export` round-trip through here.

use crate::core::model::{Columns, MalformedRow, Record};
use crate::util::constants::{FIELD_DELIMITER, MAX_MALFORMED_DIAGNOSTICS, UTF8_BOM};
use crate::util::error::LoadError;
use crate::util::logging::preview;
use std::sync::Arc;

/// Result of parsing one CSV text.
#[derive(Debug)]
pub struct ParseResult {
    /// Header-derived key set shared by every record.
    pub columns: Arc<Columns>,
    /// Retained records in source order.
    pub records: Vec<Record>,
    /// Discarded-row diagnostics (capped at MAX_MALFORMED_DIAGNOSTICS).
    pub malformed: Vec<MalformedRow>,
    /// Exact number of discarded rows.
    pub malformed_count: usize,
    /// Data lines processed (lines after the header).
    pub lines_processed: usize,
}

/// Parse CSV text into records.
///
/// Fails only when the header lacks a required column; rows whose field
/// count differs from the header are discarded and reported in
/// `ParseResult::malformed`.
pub fn parse_csv(content: &str) -> Result<ParseResult, LoadError> {
    let mut lines = split_lines(content);

    let header_line = lines.next().unwrap_or("");
    let header_line = header_line.strip_prefix(UTF8_BOM).unwrap_or(header_line);
    let header: Vec<&str> = header_line
        .split(FIELD_DELIMITER)
        .map(str::trim)
        .collect();

    let columns = Arc::new(Columns::from_header(&header)?);
    tracing::debug!(columns = columns.width(), "CSV header accepted");

    let mut records = Vec::new();
    let mut malformed = Vec::new();
    let mut malformed_count = 0usize;
    let mut lines_processed = 0usize;

    for (idx, line) in lines.enumerate() {
        lines_processed += 1;
        // Header is line 1.
        let line_number = idx + 2;

        let fields: Vec<String> = line
            .split(FIELD_DELIMITER)
            .map(|f| strip_outer_quotes(f).to_string())
            .collect();
        let found = fields.len();

        match Record::from_row(&columns, fields) {
            Some(record) => records.push(record),
            None => {
                malformed_count += 1;
                tracing::warn!(
                    line = line_number,
                    expected = columns.width(),
                    found,
                    content = %preview(line),
                    "Skipping malformed row"
                );
                if malformed.len() < MAX_MALFORMED_DIAGNOSTICS {
                    malformed.push(MalformedRow {
                        line_number,
                        expected: columns.width(),
                        found,
                        preview: preview(line),
                    });
                }
            }
        }
    }

    tracing::debug!(
        records = records.len(),
        discarded = malformed_count,
        lines = lines_processed,
        "CSV parse complete"
    );

    Ok(ParseResult {
        columns,
        records,
        malformed,
        malformed_count,
        lines_processed,
    })
}

/// Split on LF, dropping one CR immediately before each LF.
///
/// A lone CR is kept as content. An empty input yields one empty line, so
/// the header check reports the first required column as missing.
fn split_lines(content: &str) -> impl Iterator<Item = &str> {
    content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}

/// Remove one leading and one trailing double quote, each if present.
///
/// A lone `"` loses just that one character.
pub fn strip_outer_quotes(field: &str) -> &str {
    let field = field.strip_prefix('"').unwrap_or(field);
    field.strip_suffix('"').unwrap_or(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Field;

    const HEADER: &str = "Date,Id,League,Account,Action,Stash,Item";

    #[test]
    fn test_parse_basic_rows() {
        let text = format!(
            "{HEADER}\n2024-01-05 14:30,1,Standard,alice,added,Main,Orb\n\
             2024-01-05 15:00,2,Hardcore,bob,removed,Dump,Gem\n"
        );
        let result = parse_csv(&text).unwrap();
        assert_eq!(result.records.len(), 2);
        assert_eq!(result.records[0].field(Field::Account), "alice");
        assert_eq!(result.records[1].field(Field::League), "Hardcore");
        // Trailing empty line is discarded by the field-count check.
        assert_eq!(result.malformed_count, 1);
        assert_eq!(result.lines_processed, 3);
    }

    #[test]
    fn test_record_count_is_lines_minus_mismatches() {
        let text = format!(
            "{HEADER}\r\nd,1,L,a,x,s,i\r\nbroken,row\r\nd,2,L,a,x,s,i\r\nd,3,L,a,x,s,i,extra"
        );
        let result = parse_csv(&text).unwrap();
        assert_eq!(result.lines_processed, 4);
        assert_eq!(result.malformed_count, 2);
        assert_eq!(result.records.len(), result.lines_processed - result.malformed_count);
        assert_eq!(result.malformed[0].line_number, 3);
        assert_eq!(result.malformed[0].found, 2);
        assert_eq!(result.malformed[1].line_number, 5);
        assert_eq!(result.malformed[1].found, 8);
    }

    #[test]
    fn test_missing_column_fails_without_dataset() {
        let text = "Date,Id,League,Account,Action,Stash\nd,1,L,a,x,s\n";
        let err = parse_csv(text).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { column: "Item" }));
    }

    #[test]
    fn test_empty_input_reports_missing_date() {
        let err = parse_csv("").unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { column: "Date" }));
    }

    #[test]
    fn test_bom_and_header_whitespace_stripped() {
        let text = "\u{feff} Date , Id,League,Account,Action,Stash,Item \nd,1,L,a,x,s,i";
        let result = parse_csv(text).unwrap();
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].field(Field::Date), "d");
        assert_eq!(result.records[0].field(Field::Item), "i");
    }

    #[test]
    fn test_bom_only_stripped_from_first_line() {
        let text = format!("{HEADER}\n\u{feff}d,1,L,a,x,s,i");
        let result = parse_csv(&text).unwrap();
        assert_eq!(result.records[0].field(Field::Date), "\u{feff}d");
    }

    #[test]
    fn test_extra_columns_pass_through() {
        let text = format!("{HEADER},Note\nd,1,L,a,x,s,i,hello");
        let result = parse_csv(&text).unwrap();
        assert_eq!(result.records[0].get("Note"), Some("hello"));
        assert_eq!(result.columns.names().last().map(String::as_str), Some("Note"));
    }

    #[test]
    fn test_outer_quotes_stripped_once() {
        let text = format!("{HEADER}\n\"2024-01-05\",\"\"1\"\",L,\"a,x,s,i");
        let result = parse_csv(&text).unwrap();
        let rec = &result.records[0];
        assert_eq!(rec.field(Field::Date), "2024-01-05");
        assert_eq!(rec.field(Field::Id), "\"1\"");
        assert_eq!(rec.field(Field::Account), "a");
    }

    #[test]
    fn test_quoted_comma_splits_field() {
        // Embedded commas are not supported: the row gains a field and is dropped.
        let text = format!("{HEADER}\nd,1,L,\"smith, bob\",x,s,i");
        let result = parse_csv(&text).unwrap();
        assert!(result.records.is_empty());
        assert_eq!(result.malformed_count, 1);
    }

    #[test]
    fn test_lone_carriage_return_is_content() {
        let text = format!("{HEADER}\nd,1,L,a\rb,x,s,i");
        let result = parse_csv(&text).unwrap();
        assert_eq!(result.records[0].field(Field::Account), "a\rb");
    }

    #[test]
    fn test_strip_outer_quotes() {
        assert_eq!(strip_outer_quotes("\"abc\""), "abc");
        assert_eq!(strip_outer_quotes("\"abc"), "abc");
        assert_eq!(strip_outer_quotes("abc\""), "abc");
        assert_eq!(strip_outer_quotes("\""), "");
        assert_eq!(strip_outer_quotes("\"\""), "");
        assert_eq!(strip_outer_quotes("a\"b"), "a\"b");
    }
}
