//! Download station metadata and save to disk.

use anyhow::Result;

use crate::{
    cli::create_spinner,
    config::ApiConfig,
    fetch::Fetcher,
    request::{Network, ObservationRequest, Source, StationFilter},
};

pub async fn stations(network: Network, stations: &str, api: &ApiConfig) -> Result<String> {
    let fetcher = Fetcher::new(api.clone())?;

    let mut request = ObservationRequest::new(Source::StationInfo(network));
    request.stations = StationFilter::parse(stations);
    request.explain = false;

    let bar = create_spinner(format!("Downloading {} stations...", network.code()));
    let path = fetcher.try_fetch(&request).await;
    bar.finish_and_clear();

    Ok(format!("File saved to `{}`", path?.display()))
}
