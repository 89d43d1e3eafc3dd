use super::*;
use crate::test_helpers::client_schema;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn construct_fills_missing_trailing_fields_with_omitted() {
    let schema = client_schema();
    let params = schema.record("StatusParams", None).expect("record");

    let record = Record::construct(params, vec![Value::from(vec!["app/0"])]).expect("construct");
    assert_eq!(record.get("patterns"), Some(&Value::List(vec![Value::from("app/0")])));
    assert_eq!(record.get("include_storage"), Some(&Value::Omitted));
    assert_eq!(record.get("type_"), Some(&Value::Omitted));
}

#[test]
fn construct_rejects_too_many_values() {
    let schema = client_schema();
    let entity = schema.record("Entity", None).expect("record");
    let err = Record::construct(entity, vec![Value::from("a"), Value::from("b")]).expect_err("arity");
    assert!(matches!(
        err,
        EvalError::Arity { expected: 1, found: 2, .. }
    ));
}

#[test]
fn wire_mapping_uses_wire_names_and_skips_omitted() {
    let schema = client_schema();
    let params = schema.record("StatusParams", None).expect("record");
    let mut record = Record::empty(params);
    record.set("include_storage", true).expect("field");
    record.set("type_", "machine").expect("field");

    assert_eq!(
        serde_json::Value::Object(record.to_wire()),
        json!({"include-storage": true, "type": "machine"})
    );
    assert_eq!(record.get_wire("type"), Some(&Value::from("machine")));
}

#[test]
fn set_rejects_wire_names() {
    let schema = client_schema();
    let params = schema.record("StatusParams", None).expect("record");
    let mut record = Record::empty(params);
    assert!(matches!(
        record.set("include-storage", true),
        Err(EvalError::UnknownArgument { .. })
    ));
}

#[test]
fn display_lists_present_fields() {
    let schema = client_schema();
    let entity = schema.record("Entity", None).expect("record");
    let record = Record::construct(entity, vec![Value::from("machine-0")]).expect("construct");
    assert_eq!(record.to_string(), r#"Entity(tag="machine-0")"#);
}

#[test]
fn omitted_map_entries_are_not_rendered() {
    let mut entries = BTreeMap::new();
    entries.insert("a".to_owned(), Value::Int(1));
    entries.insert("b".to_owned(), Value::Omitted);
    assert_eq!(Value::Map(entries).to_json(), json!({"a": 1}));
}
