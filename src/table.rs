//! Tabular observation data and its CSV representation.
//!
//! Files are written as UTF-8 with a byte-order mark, which the warehouse
//! loaders and spreadsheet tools downstream expect.

use std::{
    fs::{self, File},
    io::Write,
    path::Path,
};

use tracing::debug;

use crate::error::TableError;

pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, Default, PartialEq)]
/// One data line, as `(column, value)` pairs in schema order.
pub struct ObservationRecord {
    pub fields: Vec<(String, String)>,
    /// Values on the line beyond the last schema column.
    pub extra_values: usize,
    /// Schema columns the line had no value for.
    pub missing_fields: usize,
}

impl ObservationRecord {
    /// Pairs schema columns with values, stopping at the shorter of the two.
    pub fn zip(schema: &[String], values: &[&str]) -> Self {
        let fields = schema
            .iter()
            .zip(values)
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect();

        ObservationRecord {
            fields,
            extra_values: values.len().saturating_sub(schema.len()),
            missing_fields: schema.len().saturating_sub(values.len()),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_truncated(&self) -> bool {
        self.extra_values > 0 || self.missing_fields > 0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationTable {
    pub schema: Vec<String>,
    pub records: Vec<ObservationRecord>,
}

impl ObservationTable {
    pub fn new(schema: Vec<String>) -> Self {
        ObservationTable {
            schema,
            records: Vec::new(),
        }
    }

    /// Zips a line's values against the schema and appends the record.
    /// Lines without any value are ignored.
    pub fn push_values(&mut self, values: &[&str]) {
        if values.is_empty() {
            return;
        }
        let record = ObservationRecord::zip(&self.schema, values);
        self.records.push(record);
    }

    /// Removes a column from the schema and every record, if present.
    pub fn drop_column(&mut self, name: &str) {
        self.schema.retain(|n| n != name);
        for record in &mut self.records {
            record.fields.retain(|(n, _)| n != name);
        }
    }

    /// Number of records whose value count did not match the schema.
    pub fn truncated_rows(&self) -> usize {
        self.records.iter().filter(|r| r.is_truncated()).count()
    }

    /// Writes the table with a header row. Columns a record has no value for
    /// are left empty.
    pub fn save_csv(&self, path: &Path) -> Result<(), TableError> {
        let rows = self.records.iter().map(|record| {
            self.schema
                .iter()
                .map(|name| record.get(name).unwrap_or("").to_string())
                .collect::<Vec<String>>()
        });

        write_csv(path, &self.schema, rows)?;
        debug!(path = %path.display(), rows = self.records.len(), "table saved");

        Ok(())
    }
}

/// Writes a BOM-prefixed CSV file, creating parent directories as needed.
pub fn write_csv<I>(path: &Path, headers: &[String], rows: I) -> Result<(), TableError>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let io_err = |source| TableError::Io {
        path: path.to_path_buf(),
        source,
    };
    let csv_err = |source| TableError::Csv {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut file = File::create(path).map_err(io_err)?;
    file.write_all(UTF8_BOM).map_err(io_err)?;

    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(file);
    writer.write_record(headers).map_err(csv_err)?;
    for row in rows {
        writer.write_record(&row).map_err(csv_err)?;
    }
    writer.flush().map_err(io_err)?;

    Ok(())
}

/// Reads a headed CSV file into its header row and data rows.
pub fn read_csv(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>), TableError> {
    let bytes = fs::read(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let content = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes[..]);

    let csv_err = |source| TableError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content);

    let headers = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok((headers, rows))
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn schema(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn should_zip_to_shorter_side() {
        let s = schema(&["A", "B", "C"]);

        let short = ObservationRecord::zip(&s, &["1", "2"]);
        assert_eq!(short.fields.len(), 2);
        assert_eq!(short.missing_fields, 1);
        assert_eq!(short.extra_values, 0);

        let long = ObservationRecord::zip(&s, &["1", "2", "3", "4", "5"]);
        assert_eq!(long.fields.len(), 3);
        assert_eq!(long.extra_values, 2);
        assert_eq!(long.get("C"), Some("3"));
    }

    #[test]
    fn should_drop_column_everywhere() {
        let mut table = ObservationTable::new(schema(&["STN", "BASIN", "LAT"]));
        table.push_values(&["100", "1", "37.5"]);
        table.drop_column("BASIN");

        assert_eq!(table.schema, schema(&["STN", "LAT"]));
        assert_eq!(table.records[0].get("BASIN"), None);
        assert_eq!(table.records[0].get("LAT"), Some("37.5"));
    }

    #[test]
    fn should_write_bom_and_read_back() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("20251010.csv");

        let mut table = ObservationTable::new(schema(&["TM", "STN", "NAME"]));
        table.push_values(&["20251010", "108", "서울"]);
        table.push_values(&["20251010", "159", "부산, 해운대"]);
        table.save_csv(&path).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));

        let (headers, rows) = read_csv(&path).unwrap();
        assert_eq!(headers, table.schema);
        assert_eq!(rows.len(), table.records.len());
        for (row, record) in rows.iter().zip(&table.records) {
            let values: Vec<&str> = record.fields.iter().map(|(_, v)| v.as_str()).collect();
            assert_eq!(row, &values);
        }
    }

    #[test]
    fn should_leave_missing_cells_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("short.csv");

        let mut table = ObservationTable::new(schema(&["A", "B", "C"]));
        table.push_values(&["1"]);
        table.save_csv(&path).unwrap();

        let (headers, rows) = read_csv(&path).unwrap();
        assert_eq!(headers, schema(&["A", "B", "C"]));
        assert_eq!(rows, vec![schema(&["1", "", ""])]);
        assert_eq!(table.truncated_rows(), 1);
    }
}
