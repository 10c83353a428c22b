use thiserror::Error;

/// Main error type for the DFXP subtitle decoder
#[derive(Error, Debug)]
pub enum VodError {
    /// The buffer is not a DFXP document, or a cue body rendered to nothing
    #[error("Not found")]
    NotFound,

    /// The document could not be parsed, not even partially
    #[error("Bad data: {0}")]
    BadData(String),

    /// A request-scoped buffer could not be allocated
    #[error("Allocation failed: {0}")]
    AllocFailed(String),

    /// An internal invariant was violated (e.g. a cue body overran its measured size)
    #[error("Unexpected: {0}")]
    Unexpected(String),
}

/// Outward status codes of the format contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VodStatus {
    Ok,
    NotFound,
    BadData,
    AllocFailed,
    Unexpected,
}

impl VodError {
    /// Map the error to the status reported to the host pipeline
    pub fn status(&self) -> VodStatus {
        match self {
            VodError::NotFound => VodStatus::NotFound,
            VodError::BadData(_) => VodStatus::BadData,
            VodError::AllocFailed(_) => VodStatus::AllocFailed,
            VodError::Unexpected(_) => VodStatus::Unexpected,
        }
    }
}

impl From<std::collections::TryReserveError> for VodError {
    fn from(e: std::collections::TryReserveError) -> Self {
        VodError::AllocFailed(e.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, VodError>;
