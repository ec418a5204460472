//! Rendering of arena trees as `termtree` trees for terminal output.

use termtree::Tree;

use crate::domain::{NodeId, TreeArena, TreeNode};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

fn label(node: &TreeNode) -> String {
    // `+` marks a node whose children exist but were not loaded
    if node.has_children && node.children.is_empty() {
        format!("{} +", node.data)
    } else {
        node.data.to_string()
    }
}

impl TreeNodeConvert for TreeArena {
    fn to_tree_string(&self) -> Tree<String> {
        fn build_tree(arena: &TreeArena, node_idx: NodeId, parent_tree: &mut Tree<String>) {
            for &child_idx in arena.children(node_idx) {
                if let Some(child) = arena.get_node(child_idx) {
                    let mut child_tree = Tree::new(label(child));
                    build_tree(arena, child_idx, &mut child_tree);
                    parent_tree.push(child_tree);
                }
            }
        }

        match self.get_node(self.root()) {
            Some(root) => {
                let mut tree = Tree::new(label(root));
                build_tree(self, self.root(), &mut tree);
                tree
            }
            None => Tree::new("Empty tree".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{build_tree, NodePayload};

    #[test]
    fn test_render_marks_unloaded_nodes() {
        let mut folder = NodePayload::new("2", "Blog");
        folder.has_children = true;
        let payload =
            NodePayload::new("-1", "Content").with_children(vec![NodePayload::new("1", "Home"), folder]);
        let tree = build_tree(payload, "content").unwrap();

        let rendered = tree.to_tree_string().to_string();

        assert!(rendered.starts_with("Content [-1]"));
        assert!(rendered.contains("Home [1]"));
        assert!(rendered.contains("Blog [2] +"));
    }
}
