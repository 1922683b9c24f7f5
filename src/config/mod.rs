use std::env;

/// Runtime configuration for the catalog service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// S3-compatible endpoint, e.g. a local MinIO instance.
    pub storage_endpoint: String,

    pub storage_access_key: String,

    pub storage_secret_key: String,

    /// Bucket holding the uploaded model binaries.
    pub storage_bucket: String,

    /// Key prefix under which uploaded assets are stored (default: "public").
    pub storage_prefix: String,

    /// Base URL advertised to clients for fetching stored objects.
    /// Falls back to the storage endpoint (path-style access).
    pub public_url_base: String,

    /// Maximum accepted upload size in bytes (default: 64 MB).
    pub max_upload_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_endpoint: "http://127.0.0.1:9000".to_string(),
            storage_access_key: "minioadmin".to_string(),
            storage_secret_key: "minioadmin".to_string(),
            storage_bucket: "3d-models".to_string(),
            storage_prefix: "public".to_string(),
            public_url_base: "http://127.0.0.1:9000".to_string(),
            max_upload_size: 64 * 1024 * 1024,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let default = Self::default();

        let storage_endpoint =
            env::var("MINIO_ENDPOINT").unwrap_or(default.storage_endpoint);

        Self {
            storage_access_key: env::var("MINIO_ACCESS_KEY")
                .unwrap_or(default.storage_access_key),

            storage_secret_key: env::var("MINIO_SECRET_KEY")
                .unwrap_or(default.storage_secret_key),

            storage_bucket: env::var("MINIO_BUCKET").unwrap_or(default.storage_bucket),

            storage_prefix: env::var("MODEL_KEY_PREFIX").unwrap_or(default.storage_prefix),

            // Public reads default to the same endpoint the service writes to.
            public_url_base: env::var("PUBLIC_URL_BASE")
                .unwrap_or_else(|_| storage_endpoint.clone()),

            max_upload_size: env::var("MAX_UPLOAD_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_upload_size),

            storage_endpoint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.storage_bucket, "3d-models");
        assert_eq!(config.storage_prefix, "public");
        assert_eq!(config.max_upload_size, 64 * 1024 * 1024);
    }

    #[test]
    fn test_public_url_falls_back_to_endpoint() {
        unsafe {
            env::remove_var("PUBLIC_URL_BASE");
            env::remove_var("MINIO_ENDPOINT");
        }
        let config = AppConfig::from_env();
        assert_eq!(config.public_url_base, config.storage_endpoint);
    }
}
