//! Infrastructure layer: port traits, real adapters and DI container
//!
//! This layer implements the data-source boundary and wires up services.

pub mod di;
pub mod error;
pub mod error_ext;
pub mod traits;

pub use error::{SourceError, SourceResult};
