//! [`RemoteStore`] backed by an S3-compatible bucket.

use anyhow::{Context, Result};
use async_trait::async_trait;
use s3::{creds::Credentials, Bucket, Region};
use tracing::{debug, info};

use super::RemoteStore;
use crate::{config::StorageConfig, error::SyncError};

#[derive(Debug)]
pub struct S3Store {
    bucket: Box<Bucket>,
}

impl S3Store {
    pub fn new(config: &StorageConfig) -> Result<Self> {
        info!(
            bucket = %config.bucket,
            endpoint = ?config.endpoint,
            "connecting to S3"
        );

        let credentials = if config.access_key.is_some() && config.secret_key.is_some() {
            Credentials::new(
                config.access_key.as_deref(),
                config.secret_key.as_deref(),
                None,
                None,
                None,
            )
            .context("Failed to create S3 credentials")?
        } else {
            Credentials::default().context(
                "Failed to load S3 credentials from environment. \
                 Set AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY",
            )?
        };

        let region = match &config.endpoint {
            Some(endpoint) => Region::Custom {
                region: config.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => config.region.parse().context("Invalid S3 region")?,
        };

        let bucket = Bucket::new(&config.bucket, region, credentials)
            .context("Failed to create S3 bucket handle")?
            .with_path_style();

        Ok(S3Store { bucket })
    }
}

fn storage_error(key: &str, reason: impl ToString) -> SyncError {
    SyncError::Storage {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn expect_success(key: &str, operation: &str, status: u16) -> Result<(), SyncError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(storage_error(
            key,
            format!("{} returned status {}", operation, status),
        ))
    }
}

#[async_trait]
impl RemoteStore for S3Store {
    async fn head_size(&self, key: &str) -> Result<Option<u64>, SyncError> {
        let (head, status) =
            self.bucket
                .head_object(key)
                .await
                .map_err(|e| SyncError::Metadata {
                    key: key.to_string(),
                    reason: e.to_string(),
                })?;

        debug!(key, status, "head object");

        match status {
            404 => Ok(None),
            200..=299 => Ok(Some(head.content_length.unwrap_or(0).max(0) as u64)),
            _ => Err(SyncError::Metadata {
                key: key.to_string(),
                reason: format!("head returned status {}", status),
            }),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), SyncError> {
        let response = self
            .bucket
            .delete_object(key)
            .await
            .map_err(|e| storage_error(key, e))?;

        expect_success(key, "delete", response.status_code())
    }

    async fn upload(&self, key: &str, content: &[u8]) -> Result<(), SyncError> {
        let response = self
            .bucket
            .put_object(key, content)
            .await
            .map_err(|e| storage_error(key, e))?;

        expect_success(key, "upload", response.status_code())
    }

    async fn download(&self, key: &str) -> Result<Vec<u8>, SyncError> {
        let response = self
            .bucket
            .get_object(key)
            .await
            .map_err(|e| storage_error(key, e))?;

        expect_success(key, "download", response.status_code())?;

        Ok(response.as_slice().to_vec())
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    const OBJECT_PATH: &str = "/kma-raw/raw/a.csv";

    fn store(server: &MockServer) -> S3Store {
        S3Store::new(&StorageConfig {
            bucket: "kma-raw".to_string(),
            region: "us-east-1".to_string(),
            endpoint: Some(server.uri()),
            access_key: Some("test-access".to_string()),
            secret_key: Some("test-secret".to_string()),
        })
        .unwrap()
    }

    async fn mount(server: &MockServer, verb: &str, response: ResponseTemplate) {
        Mock::given(method(verb))
            .and(path(OBJECT_PATH))
            .respond_with(response)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn should_report_missing_object_as_none() {
        let server = MockServer::start().await;
        mount(&server, "HEAD", ResponseTemplate::new(404)).await;

        let size = store(&server).head_size("raw/a.csv").await.unwrap();
        assert_eq!(size, None);
    }

    #[tokio::test]
    async fn should_read_size_from_head() {
        let server = MockServer::start().await;
        mount(
            &server,
            "HEAD",
            ResponseTemplate::new(200)
                .insert_header("content-length", "42")
                .set_body_bytes(vec![b'x'; 42]),
        )
        .await;

        let size = store(&server).head_size("raw/a.csv").await.unwrap();
        assert_eq!(size, Some(42));
    }

    #[tokio::test]
    async fn should_fail_metadata_on_denied_head() {
        let server = MockServer::start().await;
        mount(&server, "HEAD", ResponseTemplate::new(403)).await;

        let err = store(&server).head_size("raw/a.csv").await.unwrap_err();
        match err {
            SyncError::Metadata { key, reason } => {
                assert_eq!(key, "raw/a.csv");
                assert!(reason.contains("403"));
            }
            other => panic!("expected metadata error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn should_upload_and_delete_on_success() {
        let server = MockServer::start().await;
        mount(&server, "PUT", ResponseTemplate::new(200)).await;
        mount(&server, "DELETE", ResponseTemplate::new(204)).await;

        let store = store(&server);
        store.upload("raw/a.csv", b"TM,STN\n").await.unwrap();
        store.delete("raw/a.csv").await.unwrap();
    }

    #[tokio::test]
    async fn should_fail_storage_on_rejected_upload() {
        let server = MockServer::start().await;
        mount(&server, "PUT", ResponseTemplate::new(500)).await;

        let err = store(&server)
            .upload("raw/a.csv", b"TM,STN\n")
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Storage { ref key, .. } if key == "raw/a.csv"));
    }

    #[tokio::test]
    async fn should_fail_storage_on_rejected_delete() {
        let server = MockServer::start().await;
        mount(&server, "DELETE", ResponseTemplate::new(403)).await;

        let err = store(&server).delete("raw/a.csv").await.unwrap_err();
        assert!(matches!(err, SyncError::Storage { ref reason, .. } if reason.contains("403")));
    }
}
