use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmojifyError {
    #[error("failed to decode image: {0}")]
    DecodeError(String),

    #[error("image dimensions are zero")]
    ZeroDimensions,

    #[error("failed to encode image: {0}")]
    EncodeError(String),

    #[error("quality must be between 0.0 and 1.0, got {0}")]
    InvalidQuality(f32),

    #[error("scale factor must be > 0.0, got {0}")]
    InvalidScaleFactor(f64),

    #[error("threshold must be between 0.0 and 1.0, got {0}")]
    InvalidThreshold(f64),

    #[error("display width and height must be > 0")]
    InvalidDisplaySize,

    #[error("failed to load emoji asset {path}: {message}")]
    AssetError { path: PathBuf, message: String },
}
