//! Tree normalizer: prepares a batch of sibling payloads for attachment.
//!
//! Every batch goes through here before it reaches an arena, including the
//! root's own children on initial load.

use crate::domain::arena::{NodeData, NodeId, TreeArena, TreeNode};
use crate::domain::entities::{NodePayload, TreeRootPayload};
use crate::domain::error::DomainError;

/// A normalized node not yet inserted into an arena, with its nested children.
#[derive(Debug, Clone)]
pub struct Branch {
    pub node: TreeNode,
    pub children: Vec<Branch>,
}

/// Default editor route for a node without one.
pub fn default_route(section: &str, id: &str) -> String {
    format!("{section}/edit/{id}")
}

/// Normalize `payloads` as children of `parent`.
///
/// Sets `level` (the given one, else `parent_level + 1`), fills an empty
/// `route_path` with `<section>/edit/<id>` and points `parent` at `parent`.
/// Nested payload children are normalized one level deeper; their parent
/// link is fixed when the branch is attached.
pub fn normalize(
    parent: NodeId,
    parent_level: u32,
    payloads: Vec<NodePayload>,
    section: &str,
    level: Option<u32>,
) -> Vec<Branch> {
    let level = level.unwrap_or(parent_level + 1);
    payloads
        .into_iter()
        .map(|payload| to_branch(Some(parent), level, payload, section))
        .collect()
}

fn to_branch(parent: Option<NodeId>, level: u32, payload: NodePayload, section: &str) -> Branch {
    let NodePayload {
        id,
        name,
        icon,
        route_path,
        menu_url,
        has_children,
        meta_data,
        children,
    } = payload;

    let route_path = match route_path {
        Some(route) if !route.is_empty() => route,
        _ => default_route(section, &id),
    };

    let mut node = TreeNode::new(
        NodeData {
            id,
            name,
            section: section.to_string(),
            icon,
            route_path,
            menu_url,
            meta_data,
        },
        level,
        parent,
    );
    node.has_children = has_children || !children.is_empty();

    let children = children
        .into_iter()
        .map(|child| to_branch(None, level + 1, child, section))
        .collect();

    Branch { node, children }
}

/// Build an arena from an application tree payload.
///
/// The root keeps level 0 and whatever route it was given; its children (and
/// any nested payload children) are normalized against it.
pub fn build_tree(mut payload: TreeRootPayload, section: &str) -> Result<TreeArena, DomainError> {
    let children = std::mem::take(&mut payload.children);
    let expanded = !children.is_empty();
    payload.has_children |= expanded;

    let mut tree = TreeArena::new(root_node(payload, section));
    let root = tree.root();
    tree.attach_children(root, normalize(root, 0, children, section, None))?;
    if let Some(node) = tree.get_node_mut(root) {
        node.expanded = expanded;
    }
    Ok(tree)
}

/// Build the root node of an application tree. Its children are not included;
/// they are normalized separately against the inserted root.
pub fn root_node(payload: NodePayload, section: &str) -> TreeNode {
    let mut node = TreeNode::new(
        NodeData {
            id: payload.id,
            name: payload.name,
            section: section.to_string(),
            icon: payload.icon,
            route_path: payload.route_path.unwrap_or_default(),
            menu_url: payload.menu_url,
            meta_data: payload.meta_data,
        },
        0,
        None,
    );
    node.has_children = payload.has_children || !payload.children.is_empty();
    node
}
