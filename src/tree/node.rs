//! Containment tree node types

use crate::types::{path_join, Hash};
use serde::{Deserialize, Serialize};

/// Path of the synthetic root every pinned hash hangs from
pub const ROOT_PATH: &str = "/";

/// One entry in the containment tree.
///
/// Children are owned exclusively by their parent. The same hash may still occur at several
/// places in the tree when an object is reachable through more than one pin; hash equality,
/// not node identity, is what reduction compares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub hash: Hash,
    pub path: String,
    pub name: String,
    pub size: u64,
    pub is_directory: bool,
    /// Set by reduction on the root's direct children; `true` until then
    pub is_top: bool,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(hash: &str, path: &str, name: &str, size: u64, is_directory: bool) -> Self {
        Self {
            hash: hash.to_string(),
            path: path.to_string(),
            name: name.to_string(),
            size,
            is_directory,
            is_top: true,
            children: Vec::new(),
        }
    }

    /// Synthetic root of a pin forest
    pub fn root() -> Self {
        Self::new(ROOT_PATH, ROOT_PATH, ROOT_PATH, 0, true)
    }

    /// Node for `hash` placed under `parent_path`
    pub fn under(parent_path: &str, hash: &str, name: &str, size: u64, is_directory: bool) -> Self {
        Self::new(hash, &path_join(parent_path, &[hash]), name, size, is_directory)
    }

    pub fn is_root(&self) -> bool {
        self.path == ROOT_PATH
    }

    /// Append `child`, taking ownership of it.
    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Order direct children by size, largest first. Equal sizes keep their relative order.
    pub fn sort_child(&mut self) {
        self.children.sort_by(|a, b| b.size.cmp(&a.size));
    }

    /// `sort_child` applied to every node of the subtree
    pub fn sort_all(&mut self) {
        let mut stack: Vec<&mut Node> = vec![self];
        while let Some(node) = stack.pop() {
            node.sort_child();
            stack.extend(node.children.iter_mut());
        }
    }

    /// First node in pre-order (this node included) whose hash equals `hash`.
    ///
    /// Uses an explicit stack, so deep trees cannot overflow the call stack. Owned children
    /// make the structure acyclic, so every node is visited at most once.
    pub fn find(&self, hash: &str) -> Option<&Node> {
        let mut stack: Vec<&Node> = vec![self];
        while let Some(node) = stack.pop() {
            if node.hash == hash {
                return Some(node);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    /// Number of nodes in the subtree, this node included
    pub fn count(&self) -> usize {
        let mut total = 0;
        let mut stack: Vec<&Node> = vec![self];
        while let Some(node) = stack.pop() {
            total += 1;
            stack.extend(node.children.iter());
        }
        total
    }

    /// Pre-order walk yielding `(depth, node)`, depth 0 being this node.
    pub fn walk(&self) -> Vec<(usize, &Node)> {
        let mut visited = Vec::new();
        let mut stack: Vec<(usize, &Node)> = vec![(0, self)];
        while let Some((depth, node)) = stack.pop() {
            visited.push((depth, node));
            stack.extend(node.children.iter().rev().map(|child| (depth + 1, child)));
        }
        visited
    }
}
