use super::*;
use facade_ir::{FieldSpec, FieldType, Primitive};
use pretty_assertions::assert_eq;
use serde_json::json;

fn pinger_document() -> String {
    json!([{
        "Name": "Pinger",
        "Version": 1,
        "Schema": {
            "type": "object",
            "properties": {
                "Ping": {"type": "object", "properties": {
                    "Result": {"$ref": "#/definitions/PingResult"}
                }},
                "Stop": {"type": "object"}
            },
            "definitions": {
                "PingResult": {"type": "object", "properties": {"Result": {"type": "boolean"}}}
            }
        }
    }])
    .to_string()
}

#[test]
fn extracts_operations_and_result_variants() {
    let set = SchemaSet::from_json(&pinger_document()).expect("compile");
    let facade = set.facade("Pinger", None).expect("facade");
    assert_eq!(facade.version, Version(1));

    let names: Vec<&str> = facade.operations.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["Ping", "Stop"]);

    let ping = &facade.operations["Ping"];
    assert_eq!(ping.params, None);
    assert_eq!(ping.result, set.handles().get("PingResult"));
    assert_eq!(
        ping.result_variants,
        vec![FieldSpec::new("Result", Primitive::Bool)]
    );

    let stop = &facade.operations["Stop"];
    assert_eq!(stop.params, None);
    assert_eq!(stop.result, None);
}

#[test]
fn same_named_types_coexist_across_versions() {
    let text = json!([
        {"Name": "Client", "Version": 1, "Schema": {"definitions": {
            "Status": {"type": "object", "properties": {"a": {"type": "string"}}}
        }}},
        {"Name": "Client", "Version": 2, "Schema": {"definitions": {
            "Status": {"type": "object", "properties": {
                "a": {"type": "string"}, "b": {"type": "integer"}
            }}
        }}}
    ])
    .to_string();
    let set = SchemaSet::from_json(&text).expect("compile");

    assert_eq!(set.kinds().versions("Status"), vec![Version(1), Version(2)]);
    assert_eq!(set.kinds().lookup("Status", None).map(<[FieldSpec]>::len), Some(2));
    assert_eq!(
        set.kinds().lookup("Status", Some(Version(1))).map(<[FieldSpec]>::len),
        Some(1)
    );
    assert_eq!(set.facade("Client", None).map(|f| f.version), Some(Version(2)));
    assert_eq!(
        set.facade("Client", Some(Version(1))).map(|f| f.version),
        Some(Version(1))
    );
}

#[test]
fn first_document_wins_for_same_version() {
    let text = json!([
        {"Name": "A", "Version": 1, "Schema": {"definitions": {
            "Error": {"type": "object", "properties": {"message": {"type": "string"}}}
        }}},
        {"Name": "B", "Version": 1, "Schema": {"definitions": {
            "Error": {"type": "object", "properties": {"other": {"type": "string"}}}
        }}}
    ])
    .to_string();
    let set = SchemaSet::from_json(&text).expect("compile");
    assert_eq!(
        set.kinds().lookup("Error", Some(Version(1))),
        Some([FieldSpec::new("message", Primitive::String)].as_slice())
    );
}

#[test]
fn success_variant_skips_error() {
    let text = json!([{"Name": "Client", "Version": 1, "Schema": {
        "properties": {"Status": {"type": "object", "properties": {
            "Result": {"$ref": "#/definitions/StatusResult"}
        }}},
        "definitions": {
            "Error": {"type": "object", "properties": {"message": {"type": "string"}}},
            "FullStatus": {"type": "object", "properties": {"model": {"type": "string"}}},
            "StatusResult": {"type": "object", "properties": {
                "Error": {"$ref": "#/definitions/Error"},
                "Status": {"$ref": "#/definitions/FullStatus"}
            }}
        }
    }}])
    .to_string();
    let set = SchemaSet::from_json(&text).expect("compile");
    let op = &set.facade("Client", None).expect("facade").operations["Status"];
    assert!(op.is_multi_variant());
    let success = op.success_variant().expect("success variant");
    assert_eq!(success.wire_name, "Status");
    assert_eq!(
        success.ty,
        FieldType::Ref(set.handles().get("FullStatus").expect("handle"))
    );
}

#[test]
fn unresolved_params_reference_aborts() {
    let text = json!([{"Name": "Client", "Version": 1, "Schema": {
        "properties": {"Watch": {"type": "object", "properties": {
            "Params": {"$ref": "#/definitions/Missing"}
        }}},
        "definitions": {}
    }}])
    .to_string();
    let err = SchemaSet::from_json(&text).expect_err("unresolved");
    assert_eq!(err.code(), "E1001");
    assert!(err.to_string().contains("Watch.Params"));
}

#[test]
fn inline_signature_is_rejected() {
    let text = json!([{"Name": "Client", "Version": 1, "Schema": {
        "properties": {"Watch": {"type": "object", "properties": {
            "Params": {"type": "object", "properties": {}}
        }}}
    }}])
    .to_string();
    assert!(matches!(
        SchemaSet::from_json(&text),
        Err(SchemaError::Malformed { .. })
    ));
}
