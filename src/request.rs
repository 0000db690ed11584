//! Observation requests and the query parameters they map to.

use std::fmt;

use chrono::{Days, NaiveDate, NaiveDateTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Station networks served by the station metadata endpoint (`inf`).
pub enum Network {
    /// Surface (ground) observation
    Sfc,
    /// Automated weather station
    Aws,
    /// North Korea
    Nko,
    /// Ultraviolet
    Uv,
    /// Marine buoy
    Buoy,
}

impl Network {
    pub fn code(&self) -> &'static str {
        match self {
            Network::Sfc => "SFC",
            Network::Aws => "AWS",
            Network::Nko => "NKO",
            Network::Uv => "UV",
            Network::Buoy => "BUOY",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "SFC" => Some(Network::Sfc),
            "AWS" => Some(Network::Aws),
            "NKO" => Some(Network::Nko),
            "UV" => Some(Network::Uv),
            "BUOY" => Some(Network::Buoy),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    WeatherDaily,
    StationInfo(Network),
    MarineMinute,
}

impl Source {
    /// Path of the endpoint, relative to the API base URL.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Source::WeatherDaily => "/api/typ01/url/kma_sfcdd.php",
            Source::StationInfo(_) => "/api/typ01/url/stn_inf.php",
            Source::MarineMinute => "/api/typ01/url/kma_buoy.php",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
/// The temporal identifier of a request, also used as the output file stem.
pub enum TimeKey {
    Day(NaiveDate),
    Minute(NaiveDateTime),
}

impl TimeKey {
    /// The same key one calendar day later. Minute keys keep their time of day.
    pub fn next_day(&self) -> Option<TimeKey> {
        match self {
            TimeKey::Day(d) => d.succ_opt().map(TimeKey::Day),
            TimeKey::Minute(dt) => dt.checked_add_days(Days::new(1)).map(TimeKey::Minute),
        }
    }
}

impl fmt::Display for TimeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeKey::Day(d) => write!(f, "{}", d.format("%Y%m%d")),
            TimeKey::Minute(dt) => write!(f, "{}", dt.format("%Y%m%d%H%M")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StationFilter {
    #[default]
    All,
    Only(Vec<String>),
}

impl StationFilter {
    /// Parses `0`, `all` or an empty string as every station, otherwise a
    /// `:` or `,` separated list of station ids.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s == "0" || s.eq_ignore_ascii_case("all") {
            return StationFilter::All;
        }

        let ids: Vec<String> = s
            .split([':', ','])
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();

        if ids.is_empty() {
            StationFilter::All
        } else {
            StationFilter::Only(ids)
        }
    }

    /// The `stn` query value, or `None` when every station is requested.
    pub fn query_value(&self) -> Option<String> {
        match self {
            StationFilter::All => None,
            StationFilter::Only(ids) => Some(ids.join(":")),
        }
    }
}

/// `disp` value asking for comma separated rows, which the parsers expect.
const DISPLAY_CSV: &str = "1";

#[derive(Debug, Clone, PartialEq)]
pub struct ObservationRequest {
    pub source: Source,
    pub time_key: Option<TimeKey>,
    pub stations: StationFilter,
    /// Ask the API to include the field explanation block (`help`).
    pub explain: bool,
}

impl ObservationRequest {
    pub fn new(source: Source) -> Self {
        ObservationRequest {
            source,
            time_key: None,
            stations: StationFilter::All,
            explain: true,
        }
    }

    pub fn at(&self, time_key: TimeKey) -> Self {
        ObservationRequest {
            time_key: Some(time_key),
            ..self.clone()
        }
    }

    /// Query parameters in the order the API documents them, without the
    /// auth key.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Source::StationInfo(network) = self.source {
            pairs.push(("inf", network.code().to_string()));
        }
        if let Some(time_key) = &self.time_key {
            pairs.push(("tm", time_key.to_string()));
        }
        if let Some(stn) = self.stations.query_value() {
            pairs.push(("stn", stn));
        }
        // The station endpoint has no `disp` parameter
        if !matches!(self.source, Source::StationInfo(_)) {
            pairs.push(("disp", DISPLAY_CSV.to_string()));
        }
        pairs.push(("help", if self.explain { "1" } else { "0" }.to_string()));

        pairs
    }
}

// -- Tests -------------------------------------------------------------------
