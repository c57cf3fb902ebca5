//! Render configuration trees back to brace-delimited text

use emma_ir::ConfigNode;
use std::fmt::Write;

const INDENT: usize = 4;

/// Render the entries of a tree at the top level.
///
/// A leaf passed as the root renders as its bare value.
pub fn render(root: &ConfigNode) -> String {
    let mut out = String::new();
    match root {
        ConfigNode::Block(children) => {
            for (key, child) in children {
                render_entry(&mut out, key, child, 0);
            }
        }
        ConfigNode::Leaf(value) => {
            if let Some(value) = value {
                out.push_str(value);
                out.push('\n');
            }
        }
    }
    out
}

/// Render a single entry nested inside its ancestor blocks.
///
/// `render_wrapped(&["system", "ntp"], "server", &leaf)` produces
/// `system {\n    ntp {\n        server 10.0.0.1;\n    }\n}\n`.
pub fn render_wrapped<S: AsRef<str>>(ancestors: &[S], key: &str, node: &ConfigNode) -> String {
    let mut out = String::new();
    for (depth, ancestor) in ancestors.iter().enumerate() {
        let _ = writeln!(out, "{}{} {{", pad(depth), ancestor.as_ref());
    }
    render_entry(&mut out, key, node, ancestors.len());
    for depth in (0..ancestors.len()).rev() {
        let _ = writeln!(out, "{}}}", pad(depth));
    }
    out
}

/// One-line form of a leaf: its full key path followed by the value
pub fn flat_line<S: AsRef<str>>(path: &[S], value: Option<&str>) -> String {
    let keys: Vec<&str> = path.iter().map(AsRef::as_ref).collect();
    match value {
        Some(value) if !value.is_empty() => format!("{} {value};", keys.join(" ")),
        _ => format!("{};", keys.join(" ")),
    }
}

fn render_entry(out: &mut String, key: &str, node: &ConfigNode, depth: usize) {
    match node {
        ConfigNode::Leaf(value) => {
            let _ = match value.as_deref() {
                Some(value) if !value.is_empty() => writeln!(out, "{}{key} {value};", pad(depth)),
                _ => writeln!(out, "{}{key};", pad(depth)),
            };
        }
        ConfigNode::Block(children) => {
            let _ = writeln!(out, "{}{key} {{", pad(depth));
            for (child_key, child) in children {
                render_entry(out, child_key, child, depth + 1);
            }
            let _ = writeln!(out, "{}}}", pad(depth));
        }
    }
}

fn pad(depth: usize) -> String {
    " ".repeat(depth * INDENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ntp_tree() -> ConfigNode {
        let mut ntp = ConfigNode::block();
        ntp.insert("server", ConfigNode::leaf("10.0.0.1"));
        ntp.insert("disable", ConfigNode::flag());
        let mut system = ConfigNode::block();
        system.insert("host-name", ConfigNode::leaf("r1"));
        system.insert("ntp", ntp);
        let mut root = ConfigNode::block();
        root.insert("system", system);
        root
    }

    #[test]
    fn test_render_indents_four_spaces() {
        assert_eq!(
            render(&ntp_tree()),
            "system {\n    host-name r1;\n    ntp {\n        server 10.0.0.1;\n        disable;\n    }\n}\n"
        );
    }

    #[test]
    fn test_render_wrapped() {
        assert_eq!(
            render_wrapped(&["system", "ntp"], "server", &ConfigNode::leaf("10.0.0.1")),
            "system {\n    ntp {\n        server 10.0.0.1;\n    }\n}\n"
        );
        assert_eq!(
            render_wrapped::<&str>(&[], "version", &ConfigNode::leaf("12.3")),
            "version 12.3;\n"
        );
    }

    #[test]
    fn test_flat_line() {
        assert_eq!(flat_line(&["vlans", "v10", "vlan-id"], Some("10")), "vlans v10 vlan-id 10;");
        assert_eq!(flat_line(&["system", "disable"], None), "system disable;");
    }

    #[test]
    fn test_render_leaf_root() {
        assert_eq!(render(&ConfigNode::leaf("x")), "x\n");
        assert_eq!(render(&ConfigNode::flag()), "");
    }
}
