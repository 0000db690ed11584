use std::path::Path;

use anyhow::Result;

use crate::{
    config::StorageConfig,
    sync::{default_mapping, sync_all, S3Store, SyncMode},
};

pub async fn sync(data_dir: &Path, checksum: bool, storage: &StorageConfig) -> Result<String> {
    let store = S3Store::new(storage)?;
    let mode = if checksum {
        SyncMode::Checksum
    } else {
        SyncMode::Size
    };

    let mapping = default_mapping(data_dir);
    let report = sync_all(&store, &mapping, mode).await?;

    Ok(format!(
        "{} uploaded ({} new, {} replaced), {} already up to date",
        report.uploads(),
        report.created,
        report.replaced,
        report.skipped
    ))
}
