//! Application-level errors (wraps domain and data-source errors)

use thiserror::Error;

use crate::domain::DomainError;
use crate::infrastructure::SourceError;

/// Application errors wrap domain errors and data-source failures.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Source(#[from] SourceError),

    #[error("config error: {message}")]
    Config { message: String },
}

impl ApplicationError {
    /// True for caller bugs that must not be retried.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::Domain(DomainError::InvalidArgument(_)))
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
