//! Error types for the re-identification pipeline

use thiserror::Error;

/// Result type alias for the re-identification pipeline
pub type Result<T> = std::result::Result<T, ReidError>;

/// Errors that can occur while loading, persisting or reconciling tracks
#[derive(Error, Debug)]
pub enum ReidError {
    #[error("Track archive error: {0}")]
    ArchiveError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl ReidError {
    pub fn archive<S: Into<String>>(msg: S) -> Self {
        Self::ArchiveError(msg.into())
    }
}
