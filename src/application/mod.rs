//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic and depends on the port traits.

pub mod cache;
pub mod error;
pub mod events;
pub mod services;

pub use cache::{TreeCache, TreeResult};
pub use error::{ApplicationError, ApplicationResult};
pub use events::{TreeEvent, TreeEvents, DEFAULT_EVENT_CAPACITY};
