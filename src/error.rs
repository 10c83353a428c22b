use dfxp_vod_lib::VodError;
use thiserror::Error;

/// Main error type for the converter
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Decoder error: {0}")]
    Decoder(#[from] VodError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not a DFXP document: {0}")]
    NotDfxp(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
