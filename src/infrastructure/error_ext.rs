//! Error conversion helpers for payload file access
//!
//! Provides extension traits for cleaner error handling with path context.

use std::io;
use std::path::Path;

use crate::infrastructure::{SourceError, SourceResult};

/// Extension trait for converting `io::Result` to `SourceResult` with context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// tokio::fs::read_to_string(&path).await
    ///     .with_path_context(&path)?;
    /// ```
    fn with_path_context(self, path: &Path) -> SourceResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, path: &Path) -> SourceResult<T> {
        self.map_err(|e| SourceError::io(path, e))
    }
}
