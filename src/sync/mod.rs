//! Pushes local artifacts to object storage, skipping ones already there.
//!
//! For each `(local path, remote key)` pair the remote object's size is
//! compared with the local file's:
//!
//! - no remote object: upload
//! - same size: skip
//! - different size: delete the remote object, then upload
//!
//! Equal sizes are taken as "already synchronised", so a changed file of the
//! same length is skipped. [`SyncMode::Checksum`] additionally compares
//! BLAKE3 digests when the sizes match.

pub mod s3;

use std::{
    fs,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tracing::info;

use crate::{error::SyncError, layout, request::Network};

pub use s3::S3Store;

/// Prefix of every remote key in the default mapping.
pub const REMOTE_PREFIX: &str = "raw/";

#[async_trait]
pub trait RemoteStore {
    /// Size of the object in bytes, or `None` when the key does not exist.
    async fn head_size(&self, key: &str) -> Result<Option<u64>, SyncError>;
    async fn delete(&self, key: &str) -> Result<(), SyncError>;
    async fn upload(&self, key: &str, content: &[u8]) -> Result<(), SyncError>;
    async fn download(&self, key: &str) -> Result<Vec<u8>, SyncError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    /// Equal sizes mean the object is up to date.
    #[default]
    Size,
    /// Equal sizes are confirmed with a content digest.
    Checksum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Created,
    Replaced,
    Skipped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncEntry {
    pub local_path: PathBuf,
    pub remote_key: String,
    pub local_size: u64,
}

impl SyncEntry {
    pub fn new(local_path: &Path, remote_key: &str) -> Result<Self, SyncError> {
        let local_size = fs::metadata(local_path)
            .map_err(|source| SyncError::LocalFile {
                path: local_path.to_path_buf(),
                source,
            })?
            .len();

        Ok(SyncEntry {
            local_path: local_path.to_path_buf(),
            remote_key: remote_key.to_string(),
            local_size,
        })
    }

    fn file_name(&self) -> String {
        self.local_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.local_path.display().to_string())
    }

    fn read(&self) -> Result<Vec<u8>, SyncError> {
        fs::read(&self.local_path).map_err(|source| SyncError::LocalFile {
            path: self.local_path.clone(),
            source,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub created: usize,
    pub replaced: usize,
    pub skipped: usize,
}

impl SyncReport {
    pub fn uploads(&self) -> usize {
        self.created + self.replaced
    }

    fn record(&mut self, action: SyncAction) {
        match action {
            SyncAction::Created => self.created += 1,
            SyncAction::Replaced => self.replaced += 1,
            SyncAction::Skipped => self.skipped += 1,
        }
    }
}

/// The artifacts the pipeline produces and where they go in the bucket.
pub fn default_mapping(data_dir: &Path) -> Vec<(PathBuf, String)> {
    [
        layout::MERGED_WEATHER.to_string(),
        layout::MERGED_MARINE.to_string(),
        layout::station_file_name(Network::Sfc),
        layout::station_file_name(Network::Buoy),
        layout::MARINE_META.to_string(),
        layout::WEATHER_META.to_string(),
    ]
    .into_iter()
    .map(|name| (data_dir.join(&name), format!("{}{}", REMOTE_PREFIX, name)))
    .collect()
}

/// Brings one remote object in line with its local file.
pub async fn sync<S>(store: &S, entry: &SyncEntry, mode: SyncMode) -> Result<SyncAction, SyncError>
where
    S: RemoteStore + ?Sized,
{
    let name = entry.file_name();

    let action = match store.head_size(&entry.remote_key).await? {
        None => {
            info!("{}: not in storage, uploading", name);
            SyncAction::Created
        }
        Some(remote_size) if remote_size == entry.local_size => {
            if mode == SyncMode::Size || same_content(store, entry).await? {
                info!("{}: already in storage, skipping", name);
                return Ok(SyncAction::Skipped);
            }
            info!("{}: content differs, replacing", name);
            store.delete(&entry.remote_key).await?;
            SyncAction::Replaced
        }
        Some(remote_size) => {
            info!(
                local = entry.local_size,
                remote = remote_size,
                "{}: size differs, replacing",
                name
            );
            store.delete(&entry.remote_key).await?;
            SyncAction::Replaced
        }
    };

    store.upload(&entry.remote_key, &entry.read()?).await?;
    info!("{}: uploaded to {}", name, entry.remote_key);

    Ok(action)
}

/// Syncs every pair in order. The first error aborts the run.
pub async fn sync_all<S>(
    store: &S,
    mapping: &[(PathBuf, String)],
    mode: SyncMode,
) -> Result<SyncReport, SyncError>
where
    S: RemoteStore + ?Sized,
{
    let mut report = SyncReport::default();

    for (local_path, remote_key) in mapping {
        let entry = SyncEntry::new(local_path, remote_key)?;
        let action = sync(store, &entry, mode).await?;
        report.record(action);
    }

    Ok(report)
}

async fn same_content<S>(store: &S, entry: &SyncEntry) -> Result<bool, SyncError>
where
    S: RemoteStore + ?Sized,
{
    let remote = store.download(&entry.remote_key).await?;
    let local = entry.read()?;

    Ok(blake3::hash(&remote) == blake3::hash(&local))
}

// -- Tests -------------------------------------------------------------------
