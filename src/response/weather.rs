//! Daily surface observation responses (`kma_sfcdd.php`).
//!
//! The documentation block lists one field per line (`#  2. STN : ...`),
//! wrapped in fixed boilerplate: four lines before the field list and six
//! after it. The last line of the response is a closing marker.

use tracing::debug;

use super::{ParsedResponse, COMMENT_MARKER};
use crate::{error::ParseError, table::ObservationTable};

/// Boilerplate lines before the field list in the documentation block.
pub const HEADER_SKIP_LEADING: usize = 4;
/// Boilerplate lines after the field list, including the closing marker.
pub const HEADER_SKIP_TRAILING: usize = 6;

pub fn parse(text: &str, explain: bool) -> Result<ParsedResponse, ParseError> {
    let lines: Vec<&str> = text.lines().collect();

    let header: Vec<&str> = lines
        .iter()
        .filter(|line| line.starts_with(COMMENT_MARKER))
        .map(|line| line.trim_start_matches(COMMENT_MARKER))
        .collect();

    if header.is_empty() {
        return Err(ParseError::NoHeader);
    }
    if header.len() < HEADER_SKIP_LEADING + HEADER_SKIP_TRAILING {
        return Err(ParseError::HeaderTooShort {
            expected: HEADER_SKIP_LEADING + HEADER_SKIP_TRAILING,
            found: header.len(),
        });
    }

    // The data region is located from the untrimmed comment count: it starts
    // one line before the comment count and leaves out the final line.
    let data_start = header.len() - 1;
    let data_end = lines.len() - 1;
    let data_lines = if data_start < data_end {
        &lines[data_start..data_end]
    } else {
        &[][..]
    };

    let fields = &header[HEADER_SKIP_LEADING..header.len() - HEADER_SKIP_TRAILING];
    let schema = fields
        .iter()
        .enumerate()
        .map(|(i, line)| field_name(line, i + HEADER_SKIP_LEADING))
        .collect::<Result<Vec<String>, ParseError>>()?;

    let mut table = ObservationTable::new(schema);
    for line in data_lines {
        if line.trim().is_empty() {
            continue;
        }
        let values: Vec<&str> = line.split(',').collect();
        table.push_values(&values);
    }

    debug!(
        fields = table.schema.len(),
        rows = table.records.len(),
        "parsed daily weather response"
    );

    let explanation = explain.then(|| fields.iter().map(|f| f.trim().to_string()).collect());

    Ok(ParsedResponse { table, explanation })
}

/// The field name is the second whitespace token: `  2. STN  : ...` -> `STN`.
fn field_name(line: &str, index: usize) -> Result<String, ParseError> {
    line.split_whitespace()
        .nth(1)
        .and_then(|token| token.split_whitespace().last())
        .map(str::to_string)
        .ok_or_else(|| ParseError::MissingFieldName {
            index,
            line: line.to_string(),
        })
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a response with `fields` documented fields, `rows` data lines
    /// and a closing `#7777END` line.
    fn fixture(fields: &[&str], rows: &[&str]) -> String {
        let mut lines = vec![
            "#START7777".to_string(),
            "#--------------------------------".to_string(),
            "# 지상관측 일자료".to_string(),
            "#--------------------------------".to_string(),
        ];
        for (i, field) in fields.iter().enumerate() {
            lines.push(format!("# {:>2}. {:<6} : description", i + 1, field));
        }
        lines.push("#--------------------------------".to_string());
        lines.push("# remarks".to_string());
        lines.push("#  -9 : missing".to_string());
        lines.push("#--------------------------------".to_string());
        lines.push(format!("# {}", fields.join(" ")));
        lines.extend(rows.iter().map(|r| r.to_string()));
        lines.push("#7777END".to_string());

        lines.join("\n")
    }

    #[test]
    fn should_extract_schema_between_boilerplate() {
        let text = fixture(&["TM", "STN", "WS_AVG"], &["20251010,108,2.1,="]);
        let parsed = parse(&text, false).unwrap();

        assert_eq!(parsed.table.schema, vec!["TM", "STN", "WS_AVG"]);
        assert!(parsed.explanation.is_none());
    }

    #[test]
    fn should_count_schema_and_rows_from_header_size() {
        let fields = ["TM", "STN", "WS_AVG", "WR_DAY", "WD_MAX", "WS_MAX"];
        let rows = [
            "20251010,90,1.0,2,3,4",
            "20251010,93,1.1,2,3,4",
            "20251010,95,1.2,2,3,4",
        ];
        let text = fixture(&fields, &rows);

        let header_count = text.lines().filter(|l| l.starts_with('#')).count();
        let parsed = parse(&text, false).unwrap();

        assert_eq!(parsed.table.schema.len(), header_count - 10);
        assert_eq!(parsed.table.records.len(), rows.len());
        assert_eq!(parsed.table.records[2].get("STN"), Some("95"));
    }

    #[test]
    fn should_keep_offset_arithmetic_without_closing_marker() {
        let fields = ["TM", "STN", "WS_AVG", "WR_DAY", "WD_MAX", "WS_MAX"];
        let text = fixture(&fields, &["20251010,90,1", "20251010,93,2"]);
        let text = text.trim_end_matches("#7777END").trim_end();

        let parsed = parse(text, false).unwrap();

        // Starts at the last documentation line and drops the final data line
        assert_eq!(parsed.table.records.len(), 2);
        assert_eq!(
            parsed.table.records[0].get("TM"),
            Some("# TM STN WS_AVG WR_DAY WD_MAX WS_MAX")
        );
        assert_eq!(parsed.table.records[1].get("STN"), Some("90"));
    }

    #[test]
    fn should_return_explanation_lines() {
        let text = fixture(&["TM", "STN"], &["20251010,108"]);
        let parsed = parse(&text, true).unwrap();

        let explanation = parsed.explanation.unwrap();
        assert_eq!(explanation.len(), 2);
        assert!(explanation[0].starts_with("1. TM"));
    }

    #[test]
    fn should_reject_short_header() {
        let text = "#START7777\n# one\n# two\n20251010,108\n#7777END";

        assert_eq!(
            parse(text, false),
            Err(ParseError::HeaderTooShort {
                expected: 10,
                found: 4
            })
        );
    }

    #[test]
    fn should_reject_response_without_documentation() {
        assert_eq!(parse("20251010,108", false), Err(ParseError::NoHeader));
    }
}
