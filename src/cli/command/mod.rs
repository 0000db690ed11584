pub mod marine;
pub mod merge;
pub mod stations;
pub mod sync;
pub mod weather;

use anyhow::{anyhow, Result};

pub use marine::marine;
pub use merge::merge;
pub use stations::stations;
pub use sync::sync;
pub use weather::weather;

use crate::{
    cli::{create_progress_bar, RangeArgs},
    fetch::Fetcher,
    range::run_range,
    request::{ObservationRequest, Source, StationFilter, TimeKey},
};

fn template(source: Source, args: &RangeArgs) -> ObservationRequest {
    let mut request = ObservationRequest::new(source);
    request.stations = StationFilter::parse(&args.stations);
    request.explain = !args.no_help;

    request
}

/// Fetches the latest data when no range is given, otherwise every day of
/// the range. Returns a message for the user.
async fn fetch_range(
    fetcher: &Fetcher,
    template: &ObservationRequest,
    range: Option<(TimeKey, TimeKey)>,
) -> Result<String> {
    let Some((start, end)) = range else {
        let path = fetcher.try_fetch(template).await?;
        return Ok(format!("File saved to `{}`", path.display()));
    };

    let bar = create_progress_bar(0, "Fetching...".to_string());
    let outcome = run_range(fetcher, template, start, end, &bar).await;
    bar.finish_and_clear();

    let elapsed = outcome.elapsed.as_secs_f64();
    if outcome.completed() {
        return Ok(format!(
            "Fetched {} file(s) in {:.1}s",
            outcome.succeeded, elapsed
        ));
    }

    let failed_at = outcome
        .failed_at
        .map(|key| key.to_string())
        .unwrap_or_default();
    Err(anyhow!(
        "stopped at {} after {} attempt(s), {} succeeded, in {:.1}s",
        failed_at,
        outcome.attempts,
        outcome.succeeded,
        elapsed
    ))
}
