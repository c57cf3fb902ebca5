use std::fs;
use std::path::PathBuf;

use emma_adapter_junos::{JunosParser, JunosSegmenter, SegmentationMode, render};
use emma_ir::{ConfigNode, UNCAPTURED, get_path, leaves};

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn fixture() -> String {
    fs::read_to_string(repo_root().join("testdata/configs/r2_junos.conf"))
        .expect("junos fixture should load")
}

#[test]
fn fixture_segments_follow_registry_order() {
    let parsed = JunosSegmenter::new().parse(&fixture());

    assert_eq!(
        parsed.names().collect::<Vec<_>>(),
        [
            "system",
            "ntp",
            "services",
            "interfaces",
            "protocols",
            "bgp",
            "ospf",
            "routing_options",
            "snmp",
            UNCAPTURED
        ]
    );
    for (name, blocks) in parsed.iter().filter(|(name, _)| *name != UNCAPTURED) {
        assert_eq!(blocks.len(), 1, "{name}");
    }
    assert_eq!(
        parsed.uncaptured(),
        ["version 20.4R3;", "vlans v10 vlan-id 10;"]
    );
}

#[test]
fn registry_instance_holds_the_whole_block() -> anyhow::Result<()> {
    let parser = JunosParser::new();
    let source = parser.parse(&fixture())?;
    let parsed = JunosSegmenter::new().segment(&source);

    let interfaces = parser.parse(&parsed.get("interfaces").unwrap()[0])?;
    assert_eq!(get_path(&interfaces, &["interfaces"]), get_path(&source, &["interfaces"]));

    let routing = parser.parse(&parsed.get("routing_options").unwrap()[0])?;
    assert_eq!(
        get_path(&routing, &["routing-options", "autonomous-system"]).and_then(ConfigNode::value),
        Some("65001")
    );
    Ok(())
}

#[test]
fn split_entries_gives_one_instance_per_entry() {
    let parsed = JunosSegmenter::new()
        .with_mode(SegmentationMode::SplitEntries)
        .parse(&fixture());

    let counts: Vec<(&str, usize)> = parsed
        .iter()
        .filter(|(name, _)| *name != UNCAPTURED)
        .map(|(name, blocks)| (name, blocks.len()))
        .collect();
    assert_eq!(
        counts,
        [
            ("system", 4),
            ("ntp", 1),
            ("services", 2),
            ("interfaces", 3),
            ("protocols", 2),
            ("bgp", 1),
            ("ospf", 1),
            ("routing_options", 2),
            ("snmp", 2)
        ]
    );
    assert_eq!(
        parsed.get("interfaces").unwrap()[1],
        "interfaces {\n    ge-0/0/1 {\n        disable;\n    }\n}\n"
    );
}

#[test]
fn rendered_tree_reparses_to_the_same_tree() -> anyhow::Result<()> {
    let parser = JunosParser::new();
    let tree = parser.parse(&fixture())?;

    let rendered = render(&tree);
    let reparsed = parser.parse(&rendered)?;

    assert_eq!(reparsed, tree);
    assert_eq!(serde_json::to_value(&reparsed)?, serde_json::to_value(&tree)?);
    Ok(())
}

#[test]
fn every_instance_reparses_to_a_subtree_of_the_source() -> anyhow::Result<()> {
    let parser = JunosParser::new();
    let source = parser.parse(&fixture())?;
    let parsed = JunosSegmenter::new().segment(&source);

    for (name, blocks) in parsed.iter() {
        if name == UNCAPTURED {
            continue;
        }
        for block in blocks {
            let instance = parser.parse(block)?;
            for (path, value) in leaves(&instance) {
                let original = get_path(&source, &path).and_then(ConfigNode::value);
                assert_eq!(original, value.as_deref(), "{name}: {path:?}");
            }
        }
    }
    Ok(())
}

#[test]
fn last_statement_wins_for_duplicate_keys() -> anyhow::Result<()> {
    // duplicate `server` leaves collapse to the last one
    let tree = JunosParser::new().parse(&fixture())?;
    assert_eq!(
        get_path(&tree, &["system", "ntp", "server"]).and_then(ConfigNode::value),
        Some("10.0.0.2")
    );
    Ok(())
}

#[test]
fn segmentation_is_idempotent() {
    let segmenter = JunosSegmenter::new();
    let text = fixture();

    assert_eq!(segmenter.parse(&text), segmenter.parse(&text));
}
