use anyhow::{Context, Result};

use super::{fetch_range, template};
use crate::{
    cli::RangeArgs,
    config::ApiConfig,
    fetch::Fetcher,
    range::parse_day,
    request::{Source, TimeKey},
};

pub async fn weather(range: &RangeArgs, api: &ApiConfig) -> Result<String> {
    let fetcher = Fetcher::new(api.clone())?;
    let template = template(Source::WeatherDaily, range);

    let keys = match &range.start {
        None => None,
        Some(start) => {
            let start =
                parse_day(start).with_context(|| format!("invalid start date `{}`", start))?;
            let end = match &range.end {
                Some(end) => {
                    parse_day(end).with_context(|| format!("invalid end date `{}`", end))?
                }
                None => start,
            };
            Some((TimeKey::Day(start), TimeKey::Day(end)))
        }
    };

    fetch_range(&fetcher, &template, keys).await
}
