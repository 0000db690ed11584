//! Minute marine buoy responses (`kma_buoy.php`).
//!
//! The last two documentation lines hold field names and units. Data lines
//! carry a leading time token and a trailing terminator token around the
//! values, with commas between some of them.

use tracing::debug;

use super::{bucket_lines, ParsedResponse, COMMENT_MARKER};
use crate::{error::ParseError, table::ObservationTable};

/// Boilerplate documentation lines before the field explanation.
pub const EXPLANATION_SKIP_LEADING: usize = 5;
/// Documentation lines after the field explanation: its last line, then the
/// name and unit rows the schema is read from.
pub const EXPLANATION_SKIP_TRAILING: usize = 3;
/// Name and unit rows, counted from the end of the header.
const SCHEMA_ROWS: usize = 2;

pub fn parse(text: &str, explain: bool) -> Result<ParsedResponse, ParseError> {
    let (header, main) = bucket_lines(text, |line| line.starts_with(COMMENT_MARKER));

    if header.len() < SCHEMA_ROWS {
        return Err(ParseError::HeaderTooShort {
            expected: SCHEMA_ROWS,
            found: header.len(),
        });
    }

    let names = header[header.len() - 2];
    let units = header[header.len() - 1];
    let schema = names
        .split_whitespace()
        .zip(units.split_whitespace())
        .map(|(name, unit)| format!("{}_{}", name, unit))
        .collect();

    let mut table = ObservationTable::new(schema);
    for line in main {
        let cleaned = line.replace(',', "");
        let tokens: Vec<&str> = cleaned.split_whitespace().collect();
        table.push_values(inner_values(&tokens));
    }

    debug!(rows = table.records.len(), "parsed marine response");

    let explanation = explain.then(|| explanation_lines(&header));

    Ok(ParsedResponse { table, explanation })
}

/// Drops the first and last token of a data line.
fn inner_values<'a>(tokens: &'a [&'a str]) -> &'a [&'a str] {
    if tokens.len() > 2 {
        &tokens[1..tokens.len() - 1]
    } else {
        &[]
    }
}

fn explanation_lines(header: &[&str]) -> Vec<String> {
    let end = header.len().saturating_sub(EXPLANATION_SKIP_TRAILING);
    if EXPLANATION_SKIP_LEADING >= end {
        return Vec::new();
    }

    header[EXPLANATION_SKIP_LEADING..end]
        .iter()
        .map(|line| line.to_string())
        .collect()
}

// -- Tests -------------------------------------------------------------------
