use std::fmt;

use generational_arena::{Arena, Index};
use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::domain::entities::{MetaData, TREE_TYPE_KEY};
use crate::domain::error::DomainError;
use crate::domain::normalize::Branch;

/// Stable handle to a node. Becomes stale once the node is removed or its
/// parent's children are replaced.
pub type NodeId = Index;

/// Data payload for tree nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    pub id: String,
    pub name: String,
    /// Section the node was loaded for
    pub section: String,
    pub icon: Option<String>,
    /// Editor route; defaulted to `<section>/edit/<id>` on normalization
    pub route_path: String,
    pub menu_url: Option<String>,
    pub meta_data: MetaData,
}

impl NodeData {
    /// True if this node carries a truthy tree-root marker.
    ///
    /// `null`, `false`, `0` and `""` do not count as a marker.
    pub fn is_tree_root(&self) -> bool {
        match self.meta_data.get(TREE_TYPE_KEY) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(_) | Value::Object(_)) => true,
        }
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.id)
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub data: NodeData,
    /// Depth below the tree root; the root itself is level 0
    pub level: u32,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<NodeId>,
    /// Indices of child nodes in the arena, in source order
    pub children: Vec<NodeId>,
    pub expanded: bool,
    pub loading: bool,
    pub has_children: bool,
    load_generation: u64,
}

impl TreeNode {
    pub fn new(data: NodeData, level: u32, parent: Option<NodeId>) -> Self {
        Self {
            data,
            level,
            parent,
            children: Vec::new(),
            expanded: false,
            loading: false,
            has_children: false,
            load_generation: 0,
        }
    }
}

/// Proof that a child load was started; required to complete or fail it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub node: NodeId,
    generation: u64,
}

/// Arena-based tree structure.
///
/// Parent links are arena indices, so the tree has no ownership cycles.
/// Whenever children are replaced or cleared, the old subtrees are freed from
/// the arena and their handles stop resolving.
#[derive(Debug)]
pub struct TreeArena {
    arena: Arena<TreeNode>,
    root: NodeId,
}

impl TreeArena {
    /// Create a tree holding only `root`.
    pub fn new(mut root: TreeNode) -> Self {
        root.parent = None;
        root.level = 0;
        let mut arena = Arena::new();
        let root = arena.insert(root);
        Self { arena, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, idx: NodeId) -> bool {
        self.arena.contains(idx)
    }

    pub fn get_node(&self, idx: NodeId) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: NodeId) -> Option<&mut TreeNode> {
        self.arena.get_mut(idx)
    }

    fn node(&self, idx: NodeId) -> Result<&TreeNode, DomainError> {
        self.arena.get(idx).ok_or(DomainError::UnknownNode(idx))
    }

    fn node_mut(&mut self, idx: NodeId) -> Result<&mut TreeNode, DomainError> {
        self.arena.get_mut(idx).ok_or(DomainError::UnknownNode(idx))
    }

    /// Children of `idx` in order; empty for unknown handles.
    pub fn children(&self, idx: NodeId) -> &[NodeId] {
        self.arena
            .get(idx)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    // ------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------

    /// Direct child of `idx` whose id equals `id`.
    pub fn child(&self, idx: NodeId, id: impl AsRef<str>) -> Option<NodeId> {
        let id = id.as_ref();
        self.children(idx)
            .iter()
            .copied()
            .find(|&c| self.arena.get(c).is_some_and(|n| n.data.id == id))
    }

    /// Descendant of `idx` with the given id.
    ///
    /// Direct children are checked first, then each child with loaded
    /// children is searched depth-first, left to right.
    pub fn descendant(&self, idx: NodeId, id: impl AsRef<str>) -> Option<NodeId> {
        let id = id.as_ref();
        if let Some(found) = self.child(idx, id) {
            return Some(found);
        }
        self.children(idx)
            .iter()
            .filter(|&&c| !self.children(c).is_empty())
            .find_map(|&c| self.descendant(c, id))
    }

    /// Nearest node, starting at `idx` itself, that carries the tree-root marker.
    pub fn tree_root(&self, idx: NodeId) -> Option<NodeId> {
        self.ancestors(idx)
            .find(|&a| self.arena.get(a).is_some_and(|n| n.data.is_tree_root()))
    }

    /// `idx` followed by its parent chain up to the arena root.
    pub fn ancestors(&self, idx: NodeId) -> Ancestors<'_> {
        Ancestors {
            arena: self,
            next: self.contains(idx).then_some(idx),
        }
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self, self.root)
    }

    /// Pre-order walk of the subtree rooted at `idx`.
    pub fn subtree(&self, idx: NodeId) -> TreeIterator<'_> {
        TreeIterator::new(self, idx)
    }

    pub fn depth(&self) -> usize {
        self.calculate_depth(self.root)
    }

    fn calculate_depth(&self, node_idx: NodeId) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    // ------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------

    /// Replace the children of `parent` wholesale with `branches`.
    ///
    /// Previous children and their subtrees are freed. Nested branch children
    /// are attached recursively with their parent links pointing at the
    /// freshly inserted nodes.
    #[instrument(level = "debug", skip(self, branches), fields(count = branches.len()))]
    pub fn attach_children(
        &mut self,
        parent: NodeId,
        branches: Vec<Branch>,
    ) -> Result<Vec<NodeId>, DomainError> {
        let old = std::mem::take(&mut self.node_mut(parent)?.children);
        self.free_subtrees(&old);

        let mut ids = Vec::with_capacity(branches.len());
        for branch in branches {
            ids.push(self.insert_branch(parent, branch));
        }
        self.node_mut(parent)?.children = ids.clone();
        Ok(ids)
    }

    fn insert_branch(&mut self, parent: NodeId, branch: Branch) -> NodeId {
        let Branch { mut node, children } = branch;
        node.parent = Some(parent);
        node.children.clear();
        let idx = self.arena.insert(node);

        if !children.is_empty() {
            let nested: Vec<NodeId> = children
                .into_iter()
                .map(|child| self.insert_branch(idx, child))
                .collect();
            if let Some(inserted) = self.arena.get_mut(idx) {
                inserted.children = nested;
                inserted.has_children = true;
            }
        }
        idx
    }

    /// Collapse `idx` and drop its children. No-op on an already cleared node.
    pub fn clear_children(&mut self, idx: NodeId) -> Result<(), DomainError> {
        let node = self.node_mut(idx)?;
        node.expanded = false;
        node.has_children = false;
        let old = std::mem::take(&mut node.children);
        if !old.is_empty() {
            trace!(?idx, count = old.len(), "clearing children");
            self.free_subtrees(&old);
        }
        Ok(())
    }

    /// Detach `idx` from its parent and free its subtree.
    ///
    /// Fails with `InvalidState` for the tree root and for a node its parent
    /// does not list (a broken parent link is never silently ignored).
    #[instrument(level = "debug", skip(self))]
    pub fn remove_node(&mut self, idx: NodeId) -> Result<(), DomainError> {
        let parent = self.node(idx)?.parent.ok_or_else(|| {
            DomainError::InvalidState("cannot remove a node that doesn't have a parent".into())
        })?;

        let siblings = &mut self.node_mut(parent)?.children;
        let pos = siblings.iter().position(|&c| c == idx).ok_or_else(|| {
            DomainError::InvalidState(format!(
                "node {idx:?} is not listed among its parent's children"
            ))
        })?;
        siblings.remove(pos);
        self.free_subtrees(&[idx]);
        Ok(())
    }

    fn free_subtrees(&mut self, roots: &[NodeId]) {
        for &root in roots {
            let doomed: Vec<NodeId> = PostOrderIterator::new(self, root).map(|(i, _)| i).collect();
            for idx in doomed {
                self.arena.remove(idx);
            }
        }
    }

    // ------------------------------------------------------------
    // Load lifecycle
    // ------------------------------------------------------------

    /// Clear the node's children and mark it as loading.
    pub fn begin_load(&mut self, idx: NodeId) -> Result<LoadTicket, DomainError> {
        self.clear_children(idx)?;
        let node = self.node_mut(idx)?;
        node.loading = true;
        node.load_generation += 1;
        Ok(LoadTicket {
            node: idx,
            generation: node.load_generation,
        })
    }

    /// Install loaded children, if the ticket is still the node's latest load.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        branches: Vec<Branch>,
    ) -> Result<Vec<NodeId>, DomainError> {
        self.check_ticket(ticket)?;
        let ids = self.attach_children(ticket.node, branches)?;
        let node = self.node_mut(ticket.node)?;
        node.loading = false;
        node.expanded = true;
        node.has_children = true;
        debug!(node = ?ticket.node, count = ids.len(), "children installed");
        Ok(ids)
    }

    /// Reset the loading flag after a failed fetch.
    pub fn fail_load(&mut self, ticket: LoadTicket) -> Result<(), DomainError> {
        self.check_ticket(ticket)?;
        self.node_mut(ticket.node)?.loading = false;
        Ok(())
    }

    fn check_ticket(&self, ticket: LoadTicket) -> Result<(), DomainError> {
        let node = self.node(ticket.node)?;
        if node.load_generation != ticket.generation {
            return Err(DomainError::LoadSuperseded(ticket.node));
        }
        Ok(())
    }
}

pub struct Ancestors<'a> {
    arena: &'a TreeArena,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.arena.get_node(current).and_then(|n| n.parent);
        Some(current)
    }
}

pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<NodeId>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena, start: NodeId) -> Self {
        Self {
            arena,
            stack: vec![start],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

struct PostOrderIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<(NodeId, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a TreeArena, start: NodeId) -> Self {
        Self {
            arena,
            stack: vec![(start, false)],
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
