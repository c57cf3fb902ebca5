//! Path lookup and traversal APIs for configuration trees

use crate::node::ConfigNode;
use crate::{Error, Result};
use tracing::debug;

/// Visitor over the leaves of a configuration tree
pub trait Traversal {
    /// Visit a leaf. `path` includes the leaf's own key.
    fn leaf(&mut self, path: &[String], value: Option<&str>);

    /// Called before descending into a block; return `false` to skip it
    fn enter(&mut self, _path: &[String]) -> bool {
        true
    }

    /// Called after all children of a block were visited
    fn leave(&mut self, _path: &[String]) {}
}

/// Follow `path` from `root`, returning the node at its end.
///
/// An empty path returns `root` itself.
pub fn get_path<'a, S: AsRef<str>>(root: &'a ConfigNode, path: &[S]) -> Option<&'a ConfigNode> {
    path.iter()
        .try_fold(root, |current, key| current.get(key.as_ref()))
}

/// Store `node` at `path`, creating intermediate blocks as needed.
///
/// The last write to a path wins. An intermediate leaf standing where a
/// block is needed is replaced by a block.
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] when `path` is empty.
pub fn set_path(root: &mut ConfigNode, path: &[String], node: ConfigNode) -> Result<()> {
    let Some((last, parents)) = path.split_last() else {
        return Err(Error::invalid_path(path, "path must not be empty"));
    };

    let mut current = root;
    for key in parents {
        if current.is_leaf() {
            debug!(key = %key, "Replacing leaf with block");
            *current = ConfigNode::block();
        }
        let ConfigNode::Block(children) = current else {
            unreachable!("leaf was replaced by a block above");
        };
        let child = children.entry(key.clone()).or_insert_with(ConfigNode::block);
        if child.is_leaf() {
            debug!(key = %key, "Replacing leaf with block");
            *child = ConfigNode::block();
        }
        current = child;
    }

    current.insert(last.clone(), node);
    Ok(())
}

/// Walk the tree using a visitor
pub fn walk<T: Traversal>(root: &ConfigNode, visitor: &mut T) {
    let mut path = Vec::new();
    match root {
        ConfigNode::Leaf(value) => visitor.leaf(&path, value.as_deref()),
        ConfigNode::Block(children) => {
            for (key, child) in children {
                walk_recursive(key, child, visitor, &mut path);
            }
        }
    }
}

fn walk_recursive<T: Traversal>(
    key: &str,
    node: &ConfigNode,
    visitor: &mut T,
    path: &mut Vec<String>,
) {
    path.push(key.to_string());
    match node {
        ConfigNode::Leaf(value) => visitor.leaf(path, value.as_deref()),
        ConfigNode::Block(children) => {
            if visitor.enter(path) {
                for (child_key, child) in children {
                    walk_recursive(child_key, child, visitor, path);
                }
                visitor.leave(path);
            }
        }
    }
    path.pop();
}

/// Collect every leaf with its full key path, in source order
pub fn leaves(root: &ConfigNode) -> Vec<(Vec<String>, Option<String>)> {
    struct Collector(Vec<(Vec<String>, Option<String>)>);

    impl Traversal for Collector {
        fn leaf(&mut self, path: &[String], value: Option<&str>) {
            self.0.push((path.to_vec(), value.map(str::to_string)));
        }
    }

    let mut collector = Collector(Vec::new());
    walk(root, &mut collector);
    collector.0
}
