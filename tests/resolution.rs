//! End-to-end resolution of in-memory providers

use serde_json::{json, Value};
use tagtree::tags::{resolve_all, resolve_provider, TagRow, TagType};
use tagtree::{Config, Error, MemorySource, Node, ResolvedProvider, TagProviderRecord};

const MOTOR: &str = "11111111-0000-0000-0000-000000000000";
const CELL: &str = "22222222-0000-0000-0000-000000000000";
const PUMP1: &str = "33333333-0000-0000-0000-000000000000";
const PUMP2: &str = "44444444-0000-0000-0000-000000000000";
const LINE1: &str = "55555555-0000-0000-0000-000000000000";
const AREA: &str = "66666666-0000-0000-0000-000000000000";
const BIG: &str = "77777777-0000-0000-0000-000000000000";

fn record(id: i32, name: &str) -> TagProviderRecord {
    TagProviderRecord {
        id,
        name: name.to_string(),
        uuid: format!("provider-{}", id),
        description: None,
        enabled: true,
        type_id: "STANDARD".to_string(),
        allow_back_fill: false,
    }
}

fn row(id: &str, folder: Option<&str>, config: Value) -> TagRow {
    TagRow {
        id: id.to_string(),
        provider_id: 1,
        folder_id: folder.map(str::to_string),
        config: Some(config.to_string()),
        rank: 0,
        name: None,
    }
}

fn member(prefix: &str, suffix: &str) -> String {
    format!("{}{}", prefix, suffix)
}

fn resolve(rows: Vec<TagRow>) -> ResolvedProvider {
    resolve_provider(record(1, "default"), rows, &Config::default()).unwrap()
}

fn find<'a>(provider: &'a ResolvedProvider, id: &str) -> &'a Node {
    provider
        .root
        .find(id)
        .unwrap_or_else(|| panic!("node {} not in tree", id))
}

fn motor_rows() -> Vec<TagRow> {
    vec![
        row(
            MOTOR,
            Some("_types_"),
            json!({ "name": "Motor", "tagType": "UdtType", "engUnit": "RPM" }),
        ),
        row(
            &member(MOTOR, "/speed"),
            Some(MOTOR),
            json!({ "name": "Speed", "tagType": "AtomicTag", "dataType": "Float4", "engHigh": 1800 }),
        ),
        row(
            &member(MOTOR, "/status"),
            Some(MOTOR),
            json!({ "name": "Status", "tagType": "Folder" }),
        ),
        row(
            &member(MOTOR, "/status/running"),
            Some(&member(MOTOR, "/status")),
            json!({ "name": "Running", "tagType": "AtomicTag", "dataType": "Boolean" }),
        ),
    ]
}

fn pumps() -> Vec<TagRow> {
    let mut rows = motor_rows();
    rows.push(row(
        PUMP1,
        None,
        json!({ "name": "Pump1", "tagType": "UdtInstance", "typeId": "Motor" }),
    ));
    rows.push(row(
        PUMP2,
        None,
        json!({ "name": "Pump2", "tagType": "UdtInstance", "typeId": "Motor", "engUnit": "GPM" }),
    ));
    rows
}

fn count_atomic_outside_types(provider: &ResolvedProvider) -> usize {
    let mut count = 0;
    for tag in provider.tags() {
        tag.walk(&mut |node| {
            if node.tag_type() == Some(&TagType::AtomicTag) {
                count += 1;
            }
        });
    }
    count
}

#[test]
fn folder_with_one_atomic_child() {
    let provider = resolve(vec![
        row(AREA, None, json!({ "name": "Area", "tagType": "Folder" })),
        row(
            &member(AREA, "/level"),
            Some(AREA),
            json!({ "name": "Level", "tagType": "AtomicTag" }),
        ),
    ]);

    let area = find(&provider, AREA);
    assert_eq!(area.children().len(), 1);
    assert_eq!(area.children()[0].display_name(), "Level");
    assert_eq!(provider.statistics.total_folders, 1);
    assert_eq!(provider.statistics.total_atomic_tags, 1);
    assert_eq!(provider.statistics.total_orphaned_tags(), 0);
}

#[test]
fn instances_inherit_unless_they_override() {
    let provider = resolve(pumps());

    let pump1 = find(&provider, PUMP1);
    let pump2 = find(&provider, PUMP2);
    let motor = find(&provider, MOTOR);

    assert_eq!(pump1.config.eng_unit, Some(json!("RPM")));
    assert_eq!(pump2.config.eng_unit, Some(json!("GPM")));
    assert_eq!(motor.config.eng_unit, Some(json!("RPM")));

    // inherited structure is complete and re-keyed
    let running = find(&provider, &member(PUMP1, "/status/running"));
    assert!(running.inferred);
    assert_eq!(running.folder_id, Some(member(PUMP1, "/status")));
    assert_eq!(pump1.subtree_len(), motor.subtree_len());
    assert_eq!(pump1.config.tag_type, Some(TagType::UdtInstance));
}

#[test]
fn member_rows_override_inherited_tags() {
    let mut rows = pumps();
    rows.push(row(
        &member(PUMP1, "/speed"),
        Some(PUMP1),
        json!({ "name": "Speed", "engHigh": 3600, "documentation": "local" }),
    ));

    let provider = resolve(rows);

    let speed = find(&provider, &member(PUMP1, "/speed"));
    assert!(!speed.inferred);
    assert_eq!(speed.config.eng_high, Some(json!(3600)));
    assert_eq!(speed.config.data_type, Some(json!("Float4")));
    assert_eq!(speed.config.documentation, Some(json!("local")));

    let other = find(&provider, &member(PUMP2, "/speed"));
    assert_eq!(other.config.eng_high, Some(json!(1800)));
    assert!(other.config.documentation.is_none());

    let pump1 = find(&provider, PUMP1);
    let speeds = pump1
        .children()
        .iter()
        .filter(|child| child.display_name() == "Speed")
        .count();
    assert_eq!(speeds, 1);
}

#[test]
fn nested_instances_carry_the_outer_identity() {
    let mut rows = motor_rows();
    rows.push(row(
        CELL,
        Some("_types_"),
        json!({ "name": "Cell", "tagType": "UdtType" }),
    ));
    rows.push(row(
        &member(CELL, "/m1"),
        Some(CELL),
        json!({ "name": "M1", "tagType": "UdtInstance", "typeId": "Motor" }),
    ));
    rows.push(row(
        LINE1,
        None,
        json!({ "name": "Line1", "tagType": "UdtInstance", "typeId": "cell" }),
    ));

    let provider = resolve(rows);

    let m1 = find(&provider, &member(LINE1, "/m1"));
    assert_eq!(m1.folder_id.as_deref(), Some(LINE1));
    assert_eq!(m1.config.eng_unit, Some(json!("RPM")));

    let running = find(&provider, &member(LINE1, "/m1/status/running"));
    assert_eq!(running.folder_id, Some(member(LINE1, "/m1/status")));

    let line1 = find(&provider, LINE1);
    let mut foreign = Vec::new();
    line1.walk(&mut |node| {
        if !node.id.starts_with(LINE1) {
            foreign.push(node.id.clone());
        }
    });
    assert!(foreign.is_empty(), "ids outside Line1: {:?}", foreign);

    assert_eq!(provider.statistics.total_udt_instances, 2);
    assert_eq!(provider.statistics.total_udt_definitions, 2);
}

#[test]
fn definitions_extend_definitions_with_deep_overrides() {
    let mut rows = motor_rows();
    // Big extends Motor and overrides a tag whose folder exists only by inheritance
    rows.push(row(
        BIG,
        Some("_types_"),
        json!({ "name": "Big", "tagType": "UdtType", "typeId": "Motor" }),
    ));
    rows.push(row(
        &member(BIG, "/status/running"),
        Some(&member(BIG, "/status")),
        json!({ "name": "Running", "documentation": "big" }),
    ));
    rows.push(row(
        PUMP1,
        None,
        json!({ "name": "Pump1", "tagType": "UdtInstance", "typeId": "Big" }),
    ));
    rows.push(row(
        &member(PUMP1, "/status/running"),
        Some(&member(PUMP1, "/status")),
        json!({ "engUnit": "s" }),
    ));
    // Cell holds two Motors; Line1 overrides a tag inside the second one
    rows.push(row(
        CELL,
        Some("_types_"),
        json!({ "name": "Cell", "tagType": "UdtType" }),
    ));
    for name in ["a", "b"] {
        rows.push(row(
            &member(CELL, &format!("/{}", name)),
            Some(CELL),
            json!({ "name": name.to_uppercase(), "tagType": "UdtInstance", "typeId": "Motor" }),
        ));
    }
    rows.push(row(
        LINE1,
        None,
        json!({ "name": "Line1", "tagType": "UdtInstance", "typeId": "Cell" }),
    ));
    rows.push(row(
        &member(LINE1, "/b/status/running"),
        Some(&member(LINE1, "/b/status")),
        json!({ "documentation": "line" }),
    ));

    let provider = resolve(rows);
    assert_eq!(provider.statistics.total_orphaned_tags(), 0);

    let big_running = find(&provider, &member(BIG, "/status/running"));
    assert!(!big_running.inferred);
    assert_eq!(big_running.config.documentation, Some(json!("big")));
    assert_eq!(big_running.config.data_type, Some(json!("Boolean")));

    let pump1 = find(&provider, PUMP1);
    assert_eq!(pump1.config.eng_unit, Some(json!("RPM")));
    let running = find(&provider, &member(PUMP1, "/status/running"));
    assert!(!running.inferred);
    assert_eq!(running.display_name(), "Running");
    assert_eq!(running.config.eng_unit, Some(json!("s")));
    assert_eq!(running.config.documentation, Some(json!("big")));
    assert_eq!(running.config.data_type, Some(json!("Boolean")));
    assert_eq!(running.folder_id, Some(member(PUMP1, "/status")));

    let overridden = find(&provider, &member(LINE1, "/b/status/running"));
    assert!(!overridden.inferred);
    assert_eq!(overridden.config.documentation, Some(json!("line")));
    assert_eq!(overridden.config.data_type, Some(json!("Boolean")));

    let untouched = find(&provider, &member(LINE1, "/a/status/running"));
    assert!(untouched.inferred);
    assert!(untouched.config.documentation.is_none());
    assert_eq!(untouched.config.data_type, Some(json!("Boolean")));
}

#[test]
fn dangling_folder_is_orphaned_exactly_once() {
    let provider = resolve(vec![
        row(AREA, None, json!({ "name": "Area", "tagType": "Folder" })),
        row(
            PUMP1,
            Some("ghost-id-not-present"),
            json!({ "name": "Lost", "tagType": "AtomicTag" }),
        ),
    ]);

    let orphans = &provider.statistics.orphaned_tags;
    assert_eq!(orphans.len(), 1);
    assert_eq!(orphans[0].id, PUMP1);
    assert_eq!(orphans[0].folder_id.as_deref(), Some("ghost-id-not-present"));
    assert!(provider.root.find(PUMP1).is_none());
    assert_eq!(provider.statistics.total_atomic_tags, 0);
}

#[test]
fn missing_definition_keeps_the_instance() {
    let provider = resolve(vec![row(
        PUMP1,
        None,
        json!({ "name": "Pump1", "tagType": "UdtInstance", "typeId": "Gone/Motor" }),
    )]);

    let pump = find(&provider, PUMP1);
    assert!(pump.children().is_empty());
    assert_eq!(provider.statistics.total_udt_instances, 1);
}

#[test]
fn resolution_is_deterministic() {
    let mut shuffled = pumps();
    shuffled.reverse();

    let a = resolve(pumps());
    let b = resolve(shuffled);

    assert_eq!(a.root, b.root);
    assert_eq!(a.statistics, b.statistics);
    assert_eq!(
        serde_json::to_string(&a.root).unwrap(),
        serde_json::to_string(&b.root).unwrap()
    );
}

#[test]
fn instances_are_isolated() {
    let mut provider = resolve(pumps());

    let pump1 = provider.root.find_mut(PUMP1).unwrap();
    pump1.config.tags[0].config.eng_unit = Some(json!("changed"));
    pump1.config.tags.truncate(1);

    let pump2 = find(&provider, PUMP2);
    assert_eq!(pump2.children().len(), 2);
    assert!(pump2.children()[0].config.eng_unit.is_none());
    assert_eq!(find(&provider, MOTOR).children().len(), 2);
}

#[test]
fn atomic_tag_count_matches_tree() {
    let mut rows = pumps();
    rows.push(row(AREA, None, json!({ "name": "Area", "tagType": "Folder" })));
    rows.push(row(
        &member(AREA, "/level"),
        Some(AREA),
        json!({ "name": "Level", "tagType": "AtomicTag", "valueSource": "opc" }),
    ));

    let provider = resolve(rows);

    // Pump1 and Pump2 each inherit Speed and Running
    assert_eq!(provider.statistics.total_atomic_tags, 5);
    assert_eq!(
        provider.statistics.total_atomic_tags,
        count_atomic_outside_types(&provider)
    );
    assert_eq!(provider.statistics.data_types.get("Float4"), Some(&2));
    assert_eq!(provider.statistics.data_types.get("Boolean"), Some(&2));
    assert_eq!(provider.statistics.value_sources.get("opc"), Some(&1));
    assert_eq!(provider.statistics.value_sources.get("memory"), Some(&4));
}

#[test]
fn cyclic_inheritance_is_an_error() {
    let a = "aaaaaaaa-0000-0000-0000-000000000000";
    let b = "bbbbbbbb-0000-0000-0000-000000000000";
    let err = resolve_provider(
        record(1, "default"),
        vec![
            row(a, Some("_types_"), json!({ "name": "A", "tagType": "UdtType", "typeId": "B" })),
            row(b, Some("_types_"), json!({ "name": "B", "tagType": "UdtType", "typeId": "A" })),
        ],
        &Config::default(),
    )
    .unwrap_err();

    assert!(matches!(err, Error::CyclicInheritance { .. }));
    assert!(err.is_provider_fatal());
}

#[test]
fn malformed_rows_are_dropped() {
    let mut rows = vec![row(AREA, None, json!({ "name": "Area", "tagType": "Folder" }))];
    rows.push(TagRow {
        config: Some("{ not json".to_string()),
        ..row(&member(AREA, "/bad"), Some(AREA), Value::Null)
    });
    rows.push(TagRow {
        config: None,
        ..row(&member(AREA, "/empty"), Some(AREA), Value::Null)
    });

    let provider = resolve(rows);

    assert_eq!(provider.dropped_rows, 2);
    assert!(find(&provider, AREA).children().is_empty());
}

#[test]
fn unknown_properties_survive_export() {
    let provider = resolve(vec![row(
        AREA,
        None,
        json!({
            "name": "Area",
            "tagType": "Folder",
            "vendorExtension": { "color": "red" },
            "tooltip": "x"
        }),
    )]);

    let exported = tagtree::export::provider_json(&provider, false).unwrap();
    let area = &exported["tags"][0];
    assert_eq!(area["vendorExtension"], json!({ "color": "red" }));
    assert_eq!(area["tooltip"], json!("x"));
    assert!(area.get("tags").is_none());
}

#[test]
fn one_broken_provider_does_not_stop_the_rest() {
    let mut source = MemorySource::default();
    source.add_provider(record(1, "default"));
    source.add_provider(record(2, "broken"));
    source.add_rows(pumps());
    source.add_rows(vec![TagRow {
        provider_id: 2,
        ..row(
            MOTOR,
            Some("_types_"),
            json!({ "name": "Motor", "tagType": "UdtType", "typeId": "Motor" }),
        )
    }]);

    let backup = resolve_all(&source, &Config::default()).unwrap();

    assert_eq!(backup.providers.len(), 1);
    assert_eq!(backup.failed, vec!["broken".to_string()]);
    assert_eq!(backup.totals.total_udt_instances, 2);
}
