use anyhow::{Context, Result};

use super::{fetch_range, template};
use crate::{
    cli::RangeArgs,
    config::ApiConfig,
    fetch::Fetcher,
    range::parse_minute,
    request::{Source, TimeKey},
};

/// Marine data has minute keys but is stepped one day at a time, so the
/// start's time of day is sampled on every date of the range.
pub async fn marine(range: &RangeArgs, api: &ApiConfig) -> Result<String> {
    let fetcher = Fetcher::new(api.clone())?;
    let template = template(Source::MarineMinute, range);

    let keys = match &range.start {
        None => None,
        Some(start) => {
            let start =
                parse_minute(start).with_context(|| format!("invalid start time `{}`", start))?;
            let end = match &range.end {
                Some(end) => {
                    parse_minute(end).with_context(|| format!("invalid end time `{}`", end))?
                }
                None => start,
            };
            Some((TimeKey::Minute(start), TimeKey::Minute(end)))
        }
    };

    fetch_range(&fetcher, &template, keys).await
}
