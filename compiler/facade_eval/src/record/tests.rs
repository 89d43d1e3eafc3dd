use super::*;
use crate::test_helpers::client_schema;
use facade_ir::{FieldType, Primitive};
use facade_schema::SchemaSet;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn every_definition_gets_a_record() {
    let schema = client_schema();
    let names: Vec<&str> = schema.records().iter().map(|r| r.name()).collect();
    for expected in ["Entity", "Error", "FullStatus", "Node", "StatusParams", "StringsResult"] {
        assert!(names.contains(&expected), "missing {expected}");
    }
    assert_eq!(schema.records().len(), schema.set().handles().len());
}

#[test]
fn fields_follow_declaration_order() {
    let schema = client_schema();
    let params = schema.record("StatusParams", None).expect("record");
    let hosts: Vec<&str> = params.parameters().collect();
    assert_eq!(hosts, vec!["patterns", "include_storage", "type_"]);
    assert_eq!(params.names().to_wire("include_storage"), Some("include-storage"));
    assert_eq!(params.names().to_host("type"), Some("type_"));
}

#[test]
fn self_reference_resolves_to_the_same_record() {
    let schema = client_schema();
    let node = schema.record("Node", None).expect("record");
    let children = &node.fields()[1];
    assert_eq!(children.ty, FieldType::sequence(FieldType::Ref(node.handle())));
    let resolved = schema.records().resolve(node.handle(), None).expect("resolved");
    assert!(Arc::ptr_eq(resolved, node));
}

#[test]
fn resolve_falls_back_to_default_version() {
    let text = json!([
        {"Name": "Client", "Version": 1, "Schema": {"definitions": {
            "Status": {"type": "object", "properties": {"a": {"type": "string"}}}
        }}},
        {"Name": "Client", "Version": 3, "Schema": {"definitions": {
            "Status": {"type": "object", "properties": {
                "a": {"type": "string"}, "b": {"type": "integer"}
            }}
        }}}
    ])
    .to_string();
    let set = SchemaSet::from_json(&text).expect("compile");
    let table = RecordTable::synthesize(set.handles(), set.kinds());
    let handle = set.handles().get("Status").expect("handle");

    assert_eq!(table.versions(handle), vec![Version(1), Version(3)]);
    assert_eq!(table.default_version(handle), Some(Version(3)));
    assert_eq!(table.resolve(handle, Some(Version(1))).map(|r| r.fields().len()), Some(1));
    assert_eq!(table.resolve(handle, Some(Version(2))).map(|r| r.version()), Some(Version(3)));
    assert_eq!(
        table.resolve(handle, None).map(|r| r.fields()[1].ty.clone()),
        Some(FieldType::Primitive(Primitive::Int))
    );
}

#[test]
fn colliding_wire_names_stay_distinct() {
    let record = CompiledRecordType::new(
        "Odd",
        TypeHandleRegistry::new().handle_for("Odd"),
        Version(1),
        vec![
            FieldSpec::new("agent-status", Primitive::String),
            FieldSpec::new("agent_status", Primitive::String),
        ],
    );
    let hosts: Vec<&str> = record.parameters().collect();
    assert_eq!(hosts, vec!["agent_status", "agent_status_"]);
    assert_eq!(record.names().to_wire("agent_status_"), Some("agent_status"));
}
