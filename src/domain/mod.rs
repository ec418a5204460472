//! Domain layer: tree structure and its rules
//!
//! This layer is independent of external concerns (no I/O, no async, no config loading).

pub mod arena;
pub mod entities;
pub mod error;
pub mod normalize;

pub use arena::{LoadTicket, NodeData, NodeId, TreeArena, TreeNode};
pub use entities::*;
pub use error::DomainError;
pub use normalize::{build_tree, default_route, normalize, root_node, Branch};

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
