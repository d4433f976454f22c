//! Error types for lyricfetch

use crate::providers::ProviderError;
use crate::scheduler::BatchReport;
use thiserror::Error;

/// Result alias for resolver, scheduler and sink operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

#[derive(Debug, Error)]
pub enum FetchError {
    /// lyricfetch-common error (configuration, input, lookups)
    #[error(transparent)]
    Common(#[from] lyricfetch_common::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Reading or writing audio file tags failed
    #[error("Tag error: {0}")]
    Tags(String),

    /// Provider setup failed (HTTP client construction)
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Batch stopped by the user; carries everything gathered so far
    #[error("Interrupted after {} songs", .0.resolved)]
    Interrupted(Box<BatchReport>),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<lofty::error::LoftyError> for FetchError {
    fn from(err: lofty::error::LoftyError) -> Self {
        FetchError::Tags(err.to_string())
    }
}
