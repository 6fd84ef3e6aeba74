use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::{Client as S3Client, config::Credentials};

use crate::{
    config::StorageConfig,
    error::{AppError, Result},
};

pub async fn load_s3_client(storage: &StorageConfig) -> Result<S3Client> {
    let aws_access_key = std::env::var("AWS_ACCESS_KEY_ID")
        .map_err(|_| AppError::ConfigError("AWS_ACCESS_KEY_ID not set".to_string()))?;

    let aws_secret_key = std::env::var("AWS_SECRET_ACCESS_KEY")
        .map_err(|_| AppError::ConfigError("AWS_SECRET_ACCESS_KEY not set".to_string()))?;

    let credentials = Credentials::new(
        aws_access_key,
        aws_secret_key,
        None,
        None,
        "env-credentials",
    );

    let shared = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(storage.region.clone()))
        .credentials_provider(credentials)
        .load()
        .await;

    let mut builder = aws_sdk_s3::config::Builder::from(&shared);

    // S3-compatible providers generally only accept path-style addressing.
    if let Some(ref endpoint) = storage.endpoint {
        builder = builder.endpoint_url(endpoint).force_path_style(true);
    }

    let s3_client = S3Client::from_conf(builder.build());

    tracing::info!(bucket = %storage.bucket, "S3 client initialized");

    Ok(s3_client)
}
