use std::sync::Arc;

use aws_sdk_s3::config::Region;
use tracing::info;

use crate::config::AppConfig;
use crate::services::storage::S3ObjectStorage;

pub async fn setup_storage(config: &AppConfig) -> Arc<S3ObjectStorage> {
    info!(
        "☁️  S3 Storage: {} (Bucket: {})",
        config.storage_endpoint, config.storage_bucket
    );

    let aws_config = aws_config::from_env()
        .endpoint_url(&config.storage_endpoint)
        .region(Region::new("us-east-1"))
        .credentials_provider(aws_sdk_s3::config::Credentials::new(
            config.storage_access_key.clone(),
            config.storage_secret_key.clone(),
            None,
            None,
            "static",
        ))
        .load()
        .await;

    let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
        .force_path_style(true)
        .build();

    let s3_client = aws_sdk_s3::Client::from_conf(s3_config);

    // Ensure bucket exists
    match s3_client
        .head_bucket()
        .bucket(&config.storage_bucket)
        .send()
        .await
    {
        Ok(_) => info!("✅ Bucket '{}' is ready", config.storage_bucket),
        Err(_) => {
            info!(
                "🪣 Bucket '{}' not found, creating...",
                config.storage_bucket
            );
            if let Err(e) = s3_client
                .create_bucket()
                .bucket(&config.storage_bucket)
                .send()
                .await
            {
                tracing::error!(
                    "❌ Failed to create bucket '{}': {}",
                    config.storage_bucket,
                    e
                );
            } else {
                info!("✅ Bucket '{}' created successfully", config.storage_bucket);
            }
        }
    }

    Arc::new(S3ObjectStorage::new(
        s3_client,
        config.storage_bucket.clone(),
        config.public_url_base.clone(),
    ))
}
