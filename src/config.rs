//! Runtime configuration passed explicitly to the fetcher and the sync gate.

use std::path::PathBuf;

use clap::Args;

pub const DEFAULT_BASE_URL: &str = "https://apihub.kma.go.kr";

#[derive(Args, Debug, Clone)]
/// KMA API hub access and output location.
pub struct ApiConfig {
    /// API hub authentication key
    #[arg(long, env = "KMA_AUTH_KEY", hide_env_values = true)]
    pub auth_key: String,

    /// API hub base URL
    #[arg(long, env = "KMA_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Directory that receives the CSV files
    #[arg(long, env = "KMA_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,
}

#[derive(Args, Debug, Clone)]
/// S3-compatible bucket the artifacts are synchronised to.
pub struct StorageConfig {
    /// Bucket name
    #[arg(long, env = "AWS_BUCKET")]
    pub bucket: String,

    /// Region, e.g. `ap-northeast-2`
    #[arg(long, env = "AWS_REGION", default_value = "ap-northeast-2")]
    pub region: String,

    /// Custom endpoint for S3-compatible services such as MinIO
    #[arg(long, env = "S3_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Access key; read from the standard AWS variables when absent
    #[arg(long, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    pub access_key: Option<String>,

    /// Secret key; read from the standard AWS variables when absent
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,
}
