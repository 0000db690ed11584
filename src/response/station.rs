//! Station metadata responses (`stn_inf.php`).
//!
//! Field names and units are two documentation rows near the end of the
//! header block:
//!
//! ```text
//! #  STN_ID  LON      LAT     BASIN ...
//! #    ----  deg      deg     ----- ...
//! ```
//!
//! A unit of dashes means the field has no unit.

use tracing::debug;

use super::{bucket_lines, ParsedResponse, COMMENT_MARKER};
use crate::{error::ParseError, request::Network, table::ObservationTable};

/// Position of the field name row, counted from the end of the header.
pub const NAME_ROW_FROM_END: usize = 3;
/// Position of the unit row, counted from the end of the header.
pub const UNIT_ROW_FROM_END: usize = 2;
/// Column with no use for surface stations.
pub const SFC_DROPPED_COLUMN: &str = "BASIN";

pub fn parse(text: &str, network: Network) -> Result<ParsedResponse, ParseError> {
    let (header, main) = bucket_lines(text, |line| line.contains(COMMENT_MARKER));

    if header.len() < NAME_ROW_FROM_END {
        return Err(ParseError::HeaderTooShort {
            expected: NAME_ROW_FROM_END,
            found: header.len(),
        });
    }

    let names = header[header.len() - NAME_ROW_FROM_END];
    let units = header[header.len() - UNIT_ROW_FROM_END];
    let schema = names
        .split_whitespace()
        .zip(units.split_whitespace())
        .map(|(name, unit)| field_name(name, unit))
        .collect();

    let mut table = ObservationTable::new(schema);
    for line in main {
        let values: Vec<&str> = line.split_whitespace().collect();
        table.push_values(&values);
    }

    if network == Network::Sfc {
        table.drop_column(SFC_DROPPED_COLUMN);
    }

    debug!(
        network = network.code(),
        stations = table.records.len(),
        "parsed station response"
    );

    Ok(ParsedResponse {
        table,
        explanation: None,
    })
}

fn field_name(name: &str, unit: &str) -> String {
    if unit.contains('-') {
        name.to_string()
    } else {
        format!("{}_{}", name, unit)
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = "#START7777
# STN LON LAT BASIN
# - deg deg -
100 128.1 37.5 1
#7777END";

    #[test]
    fn should_join_names_and_units() {
        let parsed = parse(FIXTURE, Network::Buoy).unwrap();

        assert_eq!(
            parsed.table.schema,
            vec!["STN", "LON_deg", "LAT_deg", "BASIN"]
        );
        assert_eq!(parsed.table.records[0].get("BASIN"), Some("1"));
    }

    #[test]
    fn should_drop_basin_for_surface_stations() {
        let parsed = parse(FIXTURE, Network::Sfc).unwrap();

        assert_eq!(parsed.table.schema, vec!["STN", "LON_deg", "LAT_deg"]);
        assert_eq!(parsed.table.records.len(), 1);
        assert_eq!(
            parsed.table.records[0].fields,
            vec![
                ("STN".to_string(), "100".to_string()),
                ("LON_deg".to_string(), "128.1".to_string()),
                ("LAT_deg".to_string(), "37.5".to_string()),
            ]
        );
    }

    #[test]
    fn should_treat_any_line_with_marker_as_header() {
        let text = "#START7777
  # STN HT
  # - m
  90 17.5
#7777END";
        let parsed = parse(text, Network::Aws).unwrap();

        assert_eq!(parsed.table.schema, vec!["STN", "HT_m"]);
        assert_eq!(parsed.table.records[0].get("HT_m"), Some("17.5"));
    }

    #[test]
    fn should_ignore_blank_lines() {
        let text = format!("{}\n\n   \n", FIXTURE);
        let parsed = parse(&text, Network::Sfc).unwrap();

        assert_eq!(parsed.table.records.len(), 1);
    }

    #[test]
    fn should_reject_short_header() {
        let err = parse("# STN LON\n100 128.1", Network::Sfc).unwrap_err();
        assert_eq!(
            err,
            ParseError::HeaderTooShort {
                expected: 3,
                found: 1
            }
        );
    }
}
