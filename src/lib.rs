//! Lazily-populated navigation trees.
//!
//! A section tree is fetched once per cache key and kept in an arena; node
//! children are loaded on demand from a [`DataSource`](infrastructure::traits::DataSource)
//! and replaced wholesale on every reload.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
