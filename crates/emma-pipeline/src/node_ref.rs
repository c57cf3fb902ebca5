//! References to nodes of the external store

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Separator between the components of a human-friendly identifier
pub const HFID_SEPARATOR: &str = "__";

/// A node addressed by UUID or by human-friendly identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRef {
    Id(Uuid),
    Hfid(Vec<String>),
}

impl NodeRef {
    /// A UUID when the text is one, otherwise HFID components split on `__`.
    ///
    /// Text without a separator is a single component; empty text is a
    /// single empty component.
    pub fn parse(text: &str) -> Self {
        match Uuid::parse_str(text) {
            Ok(id) => Self::Id(id),
            Err(_) => Self::Hfid(text.split(HFID_SEPARATOR).map(str::to_string).collect()),
        }
    }

    pub fn id(&self) -> Option<Uuid> {
        match self {
            Self::Id(id) => Some(*id),
            Self::Hfid(_) => None,
        }
    }

    pub fn hfid(&self) -> Option<&[String]> {
        match self {
            Self::Hfid(components) => Some(components),
            Self::Id(_) => None,
        }
    }
}

impl FromStr for NodeRef {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Hfid(components) => f.write_str(&components.join(HFID_SEPARATOR)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid() {
        let text = "6a1f3c2e-8b4d-4f0a-9c3e-2d5b7a9e1f00";
        let node = NodeRef::parse(text);

        assert!(matches!(node, NodeRef::Id(_)));
        assert_eq!(node.to_string(), text);
    }

    #[test]
    fn test_hfid_components() {
        assert_eq!(
            NodeRef::parse("dc1__rack-4__r1").hfid(),
            Some(&["dc1".to_string(), "rack-4".to_string(), "r1".to_string()][..])
        );
        assert_eq!(NodeRef::parse("r1"), NodeRef::Hfid(vec!["r1".to_string()]));
        assert_eq!(NodeRef::parse(""), NodeRef::Hfid(vec![String::new()]));
    }

    #[test]
    fn test_display_round_trip() {
        let node: NodeRef = "site__r1".parse().unwrap();
        assert_eq!(node.to_string(), "site__r1");
        assert_eq!(node.id(), None);
    }
}
