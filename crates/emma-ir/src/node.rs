//! Tree model for hierarchical configurations

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A node in a hierarchical configuration tree.
///
/// `key { ... }` blocks become [`ConfigNode::Block`] and `key value;`
/// statements become [`ConfigNode::Leaf`]. Children keep source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigNode {
    /// Statement value; `None` for bare statements such as `disable;`
    Leaf(Option<String>),

    /// Named children
    Block(IndexMap<String, ConfigNode>),
}

impl ConfigNode {
    /// Create an empty block
    pub fn block() -> Self {
        Self::Block(IndexMap::new())
    }

    /// Create a leaf holding a value
    pub fn leaf(value: impl Into<String>) -> Self {
        Self::Leaf(Some(value.into()))
    }

    /// Create a bare leaf without a value
    pub fn flag() -> Self {
        Self::Leaf(None)
    }

    /// Check if this node is a leaf
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Check if this node is a block
    pub fn is_block(&self) -> bool {
        matches!(self, Self::Block(_))
    }

    /// Leaf value, if this is a leaf carrying one
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Leaf(value) => value.as_deref(),
            Self::Block(_) => None,
        }
    }

    /// Children of a block
    pub fn as_block(&self) -> Option<&IndexMap<String, ConfigNode>> {
        match self {
            Self::Block(children) => Some(children),
            Self::Leaf(_) => None,
        }
    }

    /// Mutable children of a block
    pub fn as_block_mut(&mut self) -> Option<&mut IndexMap<String, ConfigNode>> {
        match self {
            Self::Block(children) => Some(children),
            Self::Leaf(_) => None,
        }
    }

    /// Look up a direct child
    pub fn get(&self, key: &str) -> Option<&ConfigNode> {
        self.as_block().and_then(|children| children.get(key))
    }

    /// Insert or replace a direct child, returning the previous node.
    ///
    /// A leaf receiving a child is turned into a block first.
    pub fn insert(&mut self, key: impl Into<String>, node: ConfigNode) -> Option<ConfigNode> {
        if self.is_leaf() {
            *self = Self::block();
        }
        match self {
            Self::Block(children) => children.insert(key.into(), node),
            Self::Leaf(_) => None,
        }
    }

    /// True for leaves and for blocks without children
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Leaf(_) => false,
            Self::Block(children) => children.is_empty(),
        }
    }

    /// Number of leaves below (and including) this node
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Block(children) => children.values().map(ConfigNode::leaf_count).sum(),
        }
    }
}

impl Default for ConfigNode {
    fn default() -> Self {
        Self::block()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_insert_keeps_order() {
        let mut root = ConfigNode::block();
        root.insert("system", ConfigNode::block());
        root.insert("interfaces", ConfigNode::block());
        root.insert("version", ConfigNode::leaf("12.3"));

        let keys: Vec<&String> = root.as_block().unwrap().keys().collect();
        assert_eq!(keys, ["system", "interfaces", "version"]);
    }

    #[test]
    fn test_replacing_child_keeps_position() {
        let mut root = ConfigNode::block();
        root.insert("a", ConfigNode::leaf("1"));
        root.insert("b", ConfigNode::leaf("2"));
        let previous = root.insert("a", ConfigNode::leaf("3"));

        assert_eq!(previous, Some(ConfigNode::leaf("1")));
        let entries: Vec<(&str, Option<&str>)> = root
            .as_block()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.as_str(), v.value()))
            .collect();
        assert_eq!(entries, [("a", Some("3")), ("b", Some("2"))]);
    }

    #[test]
    fn test_leaf_becomes_block_on_insert() {
        let mut node = ConfigNode::leaf("x");
        node.insert("child", ConfigNode::flag());

        assert!(node.is_block());
        assert_eq!(node.get("child"), Some(&ConfigNode::flag()));
    }

    #[test]
    fn test_leaf_count_and_empty() {
        let mut root = ConfigNode::block();
        assert!(root.is_empty());

        let mut ntp = ConfigNode::block();
        ntp.insert("server", ConfigNode::leaf("10.0.0.1"));
        ntp.insert("boot-server", ConfigNode::leaf("10.0.0.2"));
        root.insert("ntp", ntp);
        root.insert("disable", ConfigNode::flag());

        assert!(!root.is_empty());
        assert_eq!(root.leaf_count(), 3);
    }

    #[test]
    fn test_serializes_like_plain_mapping() {
        let mut root = ConfigNode::block();
        let mut system = ConfigNode::block();
        system.insert("host-name", ConfigNode::leaf("r1"));
        system.insert("disable", ConfigNode::flag());
        root.insert("system", system);

        let json = serde_json::to_string(&root).unwrap();
        assert_eq!(json, r#"{"system":{"host-name":"r1","disable":null}}"#);

        let back: ConfigNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, root);
    }
}
