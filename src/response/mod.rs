//! Parsing of the KMA API's plain-text responses.
//!
//! Every response is a block of `#`-prefixed documentation lines describing
//! the fields, followed by data lines and usually a closing `#` line. Where
//! exactly the field names sit inside the documentation differs per
//! endpoint, so each source has its own module with its offsets as
//! constants.

pub mod marine;
pub mod station;
pub mod weather;

use crate::{error::ParseError, request::Source, table::ObservationTable};

pub const COMMENT_MARKER: char = '#';

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResponse {
    pub table: ObservationTable,
    /// Field documentation lines, when the source provides and the request
    /// asked for them.
    pub explanation: Option<Vec<String>>,
}

pub fn parse(text: &str, source: Source, explain: bool) -> Result<ParsedResponse, ParseError> {
    match source {
        Source::WeatherDaily => weather::parse(text, explain),
        Source::StationInfo(network) => station::parse(text, network),
        Source::MarineMinute => marine::parse(text, explain),
    }
}

/// Strips leading comment markers and spaces from a documentation line.
fn strip_marker(line: &str) -> &str {
    line.trim_start_matches([COMMENT_MARKER, ' '])
}

/// Splits lines into documentation and data, using `is_header` to classify.
/// Documentation lines lose their leading markers, data lines are trimmed.
fn bucket_lines(text: &str, is_header: impl Fn(&str) -> bool) -> (Vec<&str>, Vec<&str>) {
    let mut header = Vec::new();
    let mut main = Vec::new();

    for line in text.lines() {
        if is_header(line) {
            header.push(strip_marker(line));
        } else {
            main.push(line.trim());
        }
    }

    (header, main)
}
