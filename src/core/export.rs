// StashScope - core/export.rs
//
// CSV and JSON export of the current record set.
// Core layer: writes to any Write trait object.
//
// CSV output is the inverse of the naive parser: values are written exactly
// as stored, with no quoting, so a value holding a comma will not survive a
// round trip.

use crate::core::model::Record;
use crate::util::error::ExportError;
use std::io::Write;
use std::path::Path;

/// Choose the records to export: the filtered view when it is non-empty,
/// otherwise the full set.
///
/// Fails with `EmptyDataset` when both are empty.
pub fn export_source<'a>(
    records: &'a [Record],
    filtered: &[usize],
) -> Result<Vec<&'a Record>, ExportError> {
    let chosen: Vec<&Record> = if filtered.is_empty() {
        records.iter().collect()
    } else {
        filtered.iter().filter_map(|&i| records.get(i)).collect()
    };
    if chosen.is_empty() {
        return Err(ExportError::EmptyDataset);
    }
    Ok(chosen)
}

/// Export records to CSV.
///
/// Header row is the key order of the first record; each row holds that
/// record's values for those keys joined by commas. Rows are separated by
/// `\n` with no trailing newline. Returns the number of data rows written.
pub fn export_csv<W: Write>(
    records: &[&Record],
    mut writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let first = records.first().ok_or(ExportError::EmptyDataset)?;
    let header: Vec<&str> = first.columns().names().iter().map(String::as_str).collect();

    let csv_err = |e: csv::Error| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };

    let mut csv_writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    csv_writer.write_record(&header).map_err(csv_err)?;

    let mut count = 0;
    for record in records {
        let row = header.iter().map(|name| record.get(name).unwrap_or(""));
        csv_writer.write_record(row).map_err(csv_err)?;
        count += 1;
    }

    let mut bytes = csv_writer.into_inner().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e.into_error(),
    })?;
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
    }

    writer
        .write_all(&bytes)
        .and_then(|_| writer.flush())
        .map_err(|e| ExportError::Io {
            path: export_path.to_path_buf(),
            source: e,
        })?;

    tracing::debug!(rows = count, path = %export_path.display(), "CSV export written");
    Ok(count)
}

/// Export records to JSON format (array of objects in key order).
pub fn export_json<W: Write>(
    records: &[&Record],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    if records.is_empty() {
        return Err(ExportError::EmptyDataset);
    }
    serde_json::to_writer_pretty(writer, records).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::parse_csv;

    const SAMPLE: &str = "Date,Id,League,Account,Action,Stash,Item\n\
                          \"2024-01-05 14:30\",1,Standard,alice,added,Main,Orb\n\
                          2024-01-06 09:00,2,Hardcore,bob,removed,Dump,Gem";

    #[test]
    fn test_csv_export() {
        let parsed = parse_csv(SAMPLE).unwrap();
        let refs: Vec<&Record> = parsed.records.iter().collect();
        let mut buf = Vec::new();
        let count = export_csv(&refs, &mut buf, Path::new("out.csv")).unwrap();
        assert_eq!(count, 2);

        let output = String::from_utf8(buf).unwrap();
        assert_eq!(
            output,
            "Date,Id,League,Account,Action,Stash,Item\n\
             2024-01-05 14:30,1,Standard,alice,added,Main,Orb\n\
             2024-01-06 09:00,2,Hardcore,bob,removed,Dump,Gem"
        );
    }

    #[test]
    fn test_csv_export_does_not_requote() {
        let rec = Record::from_pairs(&[("Item", "say \"hi\""), ("Account", "a b")]);
        let mut buf = Vec::new();
        export_csv(&[&rec], &mut buf, Path::new("out.csv")).unwrap();
        let output = String::from_utf8(buf).unwrap();
        assert!(output.ends_with(",a b,,,say \"hi\""), "got {output:?}");
    }

    #[test]
    fn test_export_reparses_to_same_records() {
        let parsed = parse_csv(SAMPLE).unwrap();
        let refs: Vec<&Record> = parsed.records.iter().collect();
        let mut buf = Vec::new();
        export_csv(&refs, &mut buf, Path::new("out.csv")).unwrap();
        let reparsed = parse_csv(&String::from_utf8(buf).unwrap()).unwrap();
        assert_eq!(reparsed.records, parsed.records);
        assert_eq!(reparsed.malformed_count, 0);
    }

    #[test]
    fn test_source_prefers_filtered() {
        let parsed = parse_csv(SAMPLE).unwrap();
        let chosen = export_source(&parsed.records, &[1]).unwrap();
        assert_eq!(chosen.len(), 1);
        assert_eq!(chosen[0].get("Id"), Some("2"));
    }

    #[test]
    fn test_source_falls_back_to_full() {
        let parsed = parse_csv(SAMPLE).unwrap();
        let chosen = export_source(&parsed.records, &[]).unwrap();
        assert_eq!(chosen.len(), 2);
    }

    #[test]
    fn test_empty_dataset_produces_no_output() {
        let records: Vec<Record> = Vec::new();
        assert!(matches!(
            export_source(&records, &[]),
            Err(ExportError::EmptyDataset)
        ));
        let mut buf = Vec::new();
        let result = export_csv(&[], &mut buf, Path::new("out.csv"));
        assert!(matches!(result, Err(ExportError::EmptyDataset)));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_json_export() {
        let parsed = parse_csv(SAMPLE).unwrap();
        let refs: Vec<&Record> = parsed.records.iter().collect();
        let mut buf = Vec::new();
        let count = export_json(&refs, &mut buf, Path::new("out.json")).unwrap();
        assert_eq!(count, 2);

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value[0]["Account"], "alice");
        assert_eq!(value[1]["Item"], "Gem");
    }
}
