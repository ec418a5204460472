//! Data-source errors (the transport side of the ports)

use std::path::Path;

use thiserror::Error;

/// Failure reported by a data source. Always recoverable from the tree's
/// point of view: a failed fetch leaves the tree consistent and retryable.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("data source rejected the request: {message}")]
    Transport { message: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed payload: {context}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl SourceError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create an I/O error with path context. A missing file becomes `NotFound`.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            return Self::NotFound(path.display().to_string());
        }
        Self::Io {
            context: path.display().to_string(),
            source,
        }
    }

    pub fn decode(path: &Path, source: serde_json::Error) -> Self {
        Self::Decode {
            context: path.display().to_string(),
            source,
        }
    }
}

/// Result type for data-source operations.
pub type SourceResult<T> = Result<T, SourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_maps_to_not_found() {
        let err = SourceError::io(
            Path::new("content/nodes/7.json"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, SourceError::NotFound(p) if p == "content/nodes/7.json"));
    }

    #[test]
    fn test_other_io_errors_keep_source() {
        let err = SourceError::io(
            Path::new("tree.json"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "I/O error: tree.json");
        assert!(std::error::Error::source(&err).is_some());
    }
}
