//! Concatenates the per-day CSV files of a directory into one file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{
    error::TableError,
    table::{read_csv, write_csv},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSummary {
    pub files: usize,
    pub rows: usize,
    pub columns: usize,
}

/// Merges every `*.csv` in `dir`, ordered by file name, into `output`.
///
/// Columns are the union of all headers in first-seen order; cells a file
/// has no column for are left empty.
pub fn merge_dir(dir: &Path, output: &Path) -> Result<MergeSummary, TableError> {
    let files = csv_files(dir, output)?;
    if files.is_empty() {
        return Err(TableError::NoInputFiles(dir.to_path_buf()));
    }

    let mut columns: Vec<String> = Vec::new();
    let mut merged: Vec<Vec<(usize, String)>> = Vec::new();

    for file in &files {
        let (headers, rows) = read_csv(file)?;
        let positions: Vec<usize> = headers
            .iter()
            .map(|h| column_index(&mut columns, h))
            .collect();

        debug!(file = %file.display(), rows = rows.len(), "merging");

        for row in rows {
            merged.push(positions.iter().copied().zip(row).collect());
        }
    }

    let width = columns.len();
    let rows = merged.into_iter().map(|cells| {
        let mut row = vec![String::new(); width];
        for (i, value) in cells {
            row[i] = value;
        }
        row
    });

    let row_count = rows.len();
    write_csv(output, &columns, rows)?;

    info!(
        files = files.len(),
        rows = row_count,
        output = %output.display(),
        "merge complete"
    );

    Ok(MergeSummary {
        files: files.len(),
        rows: row_count,
        columns: width,
    })
}

fn column_index(columns: &mut Vec<String>, name: &str) -> usize {
    match columns.iter().position(|c| c == name) {
        Some(i) => i,
        None => {
            columns.push(name.to_string());
            columns.len() - 1
        }
    }
}

fn csv_files(dir: &Path, output: &Path) -> Result<Vec<PathBuf>, TableError> {
    let io_err = |source| TableError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "csv") && path != output {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::table::{ObservationTable, UTF8_BOM};

    fn write_table<const N: usize>(path: &Path, schema: &[&str], rows: &[[&str; N]]) {
        let mut table = ObservationTable::new(schema.iter().map(|s| s.to_string()).collect());
        for row in rows {
            table.push_values(row);
        }
        table.save_csv(path).unwrap();
    }

    #[test]
    fn should_concatenate_in_name_order() {
        let tmp = TempDir::new().unwrap();
        write_table(
            &tmp.path().join("20251011.csv"),
            &["TM", "STN"],
            &[["20251011", "108"]],
        );
        write_table(
            &tmp.path().join("20251010.csv"),
            &["TM", "STN"],
            &[["20251010", "108"], ["20251010", "159"]],
        );
        fs::write(tmp.path().join("notes.txt"), "ignored").unwrap();

        let output = tmp.path().join("out").join("merged.csv");
        let summary = merge_dir(tmp.path(), &output).unwrap();

        assert_eq!(
            summary,
            MergeSummary {
                files: 2,
                rows: 3,
                columns: 2,
            }
        );
        assert!(fs::read(&output).unwrap().starts_with(UTF8_BOM));

        let (headers, rows) = read_csv(&output).unwrap();
        assert_eq!(headers, vec!["TM", "STN"]);
        assert_eq!(rows[0], vec!["20251010", "108"]);
        assert_eq!(rows[2], vec!["20251011", "108"]);
    }

    #[test]
    fn should_union_columns() {
        let tmp = TempDir::new().unwrap();
        write_table(&tmp.path().join("a.csv"), &["TM", "STN"], &[["1", "90"]]);
        write_table(
            &tmp.path().join("b.csv"),
            &["TM", "TA_AVG"],
            &[["2", "15.2"]],
        );

        let output = tmp.path().join("merged.csv");
        merge_dir(tmp.path(), &output).unwrap();

        let (headers, rows) = read_csv(&output).unwrap();
        assert_eq!(headers, vec!["TM", "STN", "TA_AVG"]);
        assert_eq!(rows[0], vec!["1", "90", ""]);
        assert_eq!(rows[1], vec!["2", "", "15.2"]);
    }

    #[test]
    fn should_skip_existing_output_file() {
        let tmp = TempDir::new().unwrap();
        write_table(&tmp.path().join("a.csv"), &["TM"], &[["1"]]);

        let output = tmp.path().join("merged.csv");
        merge_dir(tmp.path(), &output).unwrap();
        let summary = merge_dir(tmp.path(), &output).unwrap();

        assert_eq!(summary.files, 1);
        assert_eq!(summary.rows, 1);
    }

    #[test]
    fn should_fail_for_empty_directory() {
        let tmp = TempDir::new().unwrap();
        let result = merge_dir(tmp.path(), &tmp.path().join("merged.csv"));

        assert!(matches!(result, Err(TableError::NoInputFiles(_))));
    }
}
