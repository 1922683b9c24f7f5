use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("metadata fetch failed: {0}")]
    Metadata(String),

    #[error("asset load failed: {0}")]
    AssetLoad(String),
}
