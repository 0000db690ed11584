//! Walks a closed date range one day at a time, stopping at the first
//! failed fetch.

use std::time::{Duration, Instant};

use chrono::{NaiveDate, NaiveDateTime};
use indicatif::ProgressBar;
use tracing::{info, warn};

use crate::{
    fetch::Fetch,
    request::{ObservationRequest, TimeKey},
};

#[derive(Debug, Clone, PartialEq)]
pub struct RangeOutcome {
    pub attempts: usize,
    pub succeeded: usize,
    /// The key the run stopped at, if a fetch failed.
    pub failed_at: Option<TimeKey>,
    pub elapsed: Duration,
}

impl RangeOutcome {
    pub fn completed(&self) -> bool {
        self.failed_at.is_none()
    }
}

/// Parses `2025-10-10` or `20251010`.
pub fn parse_day(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    let s = s.trim();
    if s.contains('-') {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
    } else {
        NaiveDate::parse_from_str(s, "%Y%m%d")
    }
}

/// Parses `2025-10-10 12:00`, `2025-10-10T12:00` or `202510101200`.
pub fn parse_minute(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    let s = s.trim();
    if s.contains('-') {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
    } else {
        NaiveDateTime::parse_from_str(s, "%Y%m%d%H%M")
    }
}

/// Number of one-day steps in `start..=end`.
pub fn step_count(start: TimeKey, end: TimeKey) -> u64 {
    let days = match (start, end) {
        (TimeKey::Day(s), TimeKey::Day(e)) => (e - s).num_days(),
        (TimeKey::Minute(s), TimeKey::Minute(e)) => (e - s).num_days(),
        _ => return 0,
    };

    if start > end {
        0
    } else {
        days as u64 + 1
    }
}

/// Fetches `template` once per day from `start` to `end` inclusive.
///
/// Minute keys advance by a whole day too, so the same minute of day is
/// sampled on every date. The first failure ends the run; nothing after it
/// is attempted.
pub async fn run_range<F>(
    fetcher: &F,
    template: &ObservationRequest,
    start: TimeKey,
    end: TimeKey,
    progress: &ProgressBar,
) -> RangeOutcome
where
    F: Fetch + ?Sized,
{
    let started = Instant::now();
    let mut attempts = 0;
    let mut succeeded = 0;
    let mut failed_at = None;
    let mut current = start;

    progress.set_length(step_count(start, end));

    while current <= end {
        attempts += 1;
        progress.set_message(current.to_string());

        if !fetcher.fetch(&template.at(current)).await {
            warn!(tm = %current, "stopping range at failed request");
            failed_at = Some(current);
            break;
        }

        succeeded += 1;
        progress.inc(1);

        match current.next_day() {
            Some(next) => current = next,
            None => break,
        }
    }

    let elapsed = started.elapsed();
    info!(
        attempts,
        succeeded,
        elapsed_secs = elapsed.as_secs_f64(),
        "range finished"
    );

    RangeOutcome {
        attempts,
        succeeded,
        failed_at,
        elapsed,
    }
}

// -- Tests -------------------------------------------------------------------
