use std::fs;
use std::path::PathBuf;

use emma_adapter_ios::IosParser;
use emma_extract::{FieldExtractor, RuleSet, records_from_matches};
use emma_ir::Value;

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn ios_segment(name: &str) -> Vec<String> {
    let text = fs::read_to_string(repo_root().join("testdata/configs/r1_ios.cfg"))
        .expect("ios fixture should load");
    IosParser::new()
        .parse(&text)
        .get(name)
        .map(<[String]>::to_vec)
        .unwrap_or_default()
}

#[test]
fn vlan_rules_produce_one_record_per_block() -> anyhow::Result<()> {
    let rules = RuleSet::from_file(&repo_root().join("testdata/rules/vlan.yaml"))?;
    let extractor = FieldExtractor::new(&rules);
    let records = records_from_matches(&extractor.extract_all(&ios_segment("vlan")));

    assert!(extractor.skipped().is_empty());
    assert_eq!(records.columns(), ["vlan_id", "name"]);
    assert_eq!(records.len(), 3);
    assert_eq!(
        records.column_values("name").unwrap(),
        [&Value::from("users"), &Value::from("voice"), &Value::from("printers")]
    );
    Ok(())
}

#[test]
fn json_rules_capture_optional_flags() -> anyhow::Result<()> {
    let rules = RuleSet::from_file(&repo_root().join("testdata/rules/ntp.json"))?;
    let records =
        records_from_matches(&FieldExtractor::new(&rules).extract_all(&ios_segment("ntp")));

    assert_eq!(records.len(), 2);
    assert_eq!(records.get(0, "address"), Some(&Value::from("10.0.0.1")));
    assert!(records.get(0, "prefer").is_some_and(Value::is_null));
    assert_eq!(records.get(1, "prefer"), Some(&Value::from("prefer")));
    Ok(())
}

#[test]
fn invalid_rule_does_not_change_other_fields() -> anyhow::Result<()> {
    let blocks = ios_segment("interface");
    let valid = RuleSet::from_yaml(
        "name: '^interface\\s+(\\S+)'\ndescription: 'description (.+?)$'\n",
    )?;
    let with_broken = valid.clone().with_rule("address", r"ip address ((\S+)");

    let baseline = FieldExtractor::new(&valid);
    let tolerant = FieldExtractor::new(&with_broken);

    assert_eq!(tolerant.skipped().len(), 1);
    assert_eq!(tolerant.skipped()[0].field, "address");
    assert_eq!(tolerant.extract_all(&blocks), baseline.extract_all(&blocks));
    assert_eq!(tolerant.extract_all(&blocks)[0]["description"][0].value, "uplink to core");
    Ok(())
}

#[test]
fn extraction_is_deterministic() {
    let rules = RuleSet::new().with_rule("neighbor", r"neighbor (\S+)");
    let extractor = FieldExtractor::new(&rules);
    let blocks = ios_segment("bgp");

    let first = extractor.extract_all(&blocks);
    assert_eq!(first[0]["neighbor"].len(), 2);
    assert_eq!(first, extractor.extract_all(&blocks));
}
