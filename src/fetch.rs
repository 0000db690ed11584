//! Fetches one observation request, parses it and saves it to disk.

use std::{fs, path::PathBuf};

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::{
    config::ApiConfig,
    error::FetchError,
    layout::{explanation_path, output_path},
    request::ObservationRequest,
    response,
};

#[async_trait]
pub trait Fetch {
    /// Returns `true` when the request was fetched, parsed and written.
    async fn fetch(&self, request: &ObservationRequest) -> bool;
}

#[derive(Debug)]
pub struct Fetcher {
    client: reqwest::Client,
    config: ApiConfig,
}

impl Fetcher {
    pub fn new(config: ApiConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("kma-etl/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Fetcher { client, config })
    }

    pub fn url(&self, request: &ObservationRequest) -> String {
        format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            request.source.endpoint()
        )
    }

    /// Downloads, parses and saves the request, returning the CSV path.
    pub async fn try_fetch(&self, request: &ObservationRequest) -> Result<PathBuf, FetchError> {
        let url = self.url(request);
        let mut query = request.query_pairs();
        query.push(("authKey", self.config.auth_key.clone()));

        debug!(%url, tm = ?request.time_key.map(|k| k.to_string()), "requesting");
        let response = self.client.get(&url).query(&query).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status(),
                url,
            });
        }

        let text = response.text().await?;
        let parsed = response::parse(&text, request.source, request.explain)?;

        let truncated = parsed.table.truncated_rows();
        if truncated > 0 {
            warn!(
                rows = truncated,
                "value count differed from the schema; rows were truncated to fit"
            );
        }

        let path = output_path(&self.config.data_dir, request);
        parsed.table.save_csv(&path)?;

        if let (Some(lines), Some(meta_path)) = (
            parsed.explanation,
            explanation_path(&self.config.data_dir, request.source),
        ) {
            fs::write(&meta_path, lines.join("\n")).map_err(|source| FetchError::Io {
                path: meta_path.clone(),
                source,
            })?;
        }

        info!(
            path = %path.display(),
            rows = parsed.table.records.len(),
            "observations saved"
        );

        Ok(path)
    }
}

#[async_trait]
impl Fetch for Fetcher {
    async fn fetch(&self, request: &ObservationRequest) -> bool {
        match self.try_fetch(request).await {
            Ok(_) => true,
            Err(e) => {
                error!(source = ?request.source, "fetch failed: {}", e);
                false
            }
        }
    }
}

// -- Tests -------------------------------------------------------------------
