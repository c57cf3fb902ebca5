use emma_ir::{
    ConfigNode, ParsedConfig, RecordSet, Traversal, UNCAPTURED, Value, get_path, leaves,
    page_count, paginate, set_path, walk,
};
use indexmap::IndexMap;

fn path(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| (*k).to_string()).collect()
}

#[test]
fn tree_built_by_paths_walks_in_source_order() {
    let mut root = ConfigNode::block();
    set_path(&mut root, &path(&["interfaces", "ge-0/0/0", "description"]), ConfigNode::leaf("uplink")).unwrap();
    set_path(&mut root, &path(&["interfaces", "ge-0/0/0", "disable"]), ConfigNode::flag()).unwrap();
    set_path(&mut root, &path(&["interfaces", "ge-0/0/1", "mtu"]), ConfigNode::leaf("9000")).unwrap();

    struct Depth {
        deepest: usize,
        entered: Vec<String>,
    }

    impl Traversal for Depth {
        fn leaf(&mut self, path: &[String], _value: Option<&str>) {
            self.deepest = self.deepest.max(path.len());
        }

        fn enter(&mut self, path: &[String]) -> bool {
            self.entered.push(path.join(" "));
            true
        }
    }

    let mut visitor = Depth {
        deepest: 0,
        entered: Vec::new(),
    };
    walk(&root, &mut visitor);

    assert_eq!(visitor.deepest, 3);
    assert_eq!(
        visitor.entered,
        ["interfaces", "interfaces ge-0/0/0", "interfaces ge-0/0/1"]
    );
    assert_eq!(leaves(&root).len(), 3);
    assert_eq!(
        get_path(&root, &["interfaces", "ge-0/0/0", "disable"]),
        Some(&ConfigNode::flag())
    );
}

#[test]
fn parsed_config_round_trips_through_json() {
    let mut parsed = ParsedConfig::new();
    parsed.push_block("ntp", "ntp server 10.0.0.1\n");
    parsed.push_block(UNCAPTURED, "hostname r1");

    let json = serde_json::to_string(&parsed).unwrap();
    assert_eq!(json, r#"{"ntp":["ntp server 10.0.0.1\n"],"uncaptured":["hostname r1"]}"#);

    let back: ParsedConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, parsed);
}

#[test]
fn record_set_prepares_upload_payloads() {
    let mut first = IndexMap::new();
    first.insert("vlan_id".to_string(), Value::from(10));
    first.insert("name".to_string(), Value::from("users"));

    let mut second = IndexMap::new();
    second.insert("vlan_id".to_string(), Value::from(20));

    let mut set = RecordSet::from_records([first, second]);
    set.ensure_columns(["vlan_id", "name", "status"]);
    set.apply_default("status", "active");

    let payloads: Vec<IndexMap<String, Value>> =
        (0..set.len()).map(|i| set.row_values(i).unwrap()).collect();

    assert_eq!(payloads[0].len(), 3);
    assert_eq!(payloads[1].len(), 2);
    assert!(!payloads[1].contains_key("name"));
    assert_eq!(payloads[1].get("status"), Some(&Value::from("active")));
}

#[test]
fn pagination_covers_all_items_once() {
    let items: Vec<usize> = (0..20).collect();
    let pages = page_count(items.len(), 6);

    let collected: Vec<usize> = (0..pages)
        .flat_map(|page| paginate(&items, 6, page).iter().copied())
        .collect();

    assert_eq!(pages, 4);
    assert_eq!(collected, items);
}
