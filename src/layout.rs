//! Where artifacts live under the data directory.

use std::path::{Path, PathBuf};

use crate::request::{Network, ObservationRequest, Source};

pub const WEATHER_DIR: &str = "weather_condition";
pub const MARINE_DIR: &str = "marine";
pub const WEATHER_META: &str = "weather_meta.txt";
pub const MARINE_META: &str = "marine_meta.txt";
pub const MERGED_WEATHER: &str = "merged_SFC.csv";
pub const MERGED_MARINE: &str = "merged_marine.csv";

/// File stem used when a request has no time-key.
const CURRENT_STEM: &str = "current";

/// The CSV file a request's table is written to.
pub fn output_path(data_dir: &Path, request: &ObservationRequest) -> PathBuf {
    let stem = request
        .time_key
        .map(|key| key.to_string())
        .unwrap_or_else(|| CURRENT_STEM.to_string());

    match request.source {
        Source::WeatherDaily => data_dir.join(WEATHER_DIR).join(format!("{}.csv", stem)),
        Source::MarineMinute => data_dir.join(MARINE_DIR).join(format!("{}.csv", stem)),
        Source::StationInfo(network) => data_dir.join(station_file_name(network)),
    }
}

/// The text file a source's field explanation is written to.
pub fn explanation_path(data_dir: &Path, source: Source) -> Option<PathBuf> {
    match source {
        Source::WeatherDaily => Some(data_dir.join(WEATHER_META)),
        Source::MarineMinute => Some(data_dir.join(MARINE_META)),
        Source::StationInfo(_) => None,
    }
}

pub fn station_file_name(network: Network) -> String {
    format!("stn_{}_info.csv", network.code())
}

// -- Tests -------------------------------------------------------------------
