use super::*;
use crate::test_helpers::{client_schema, RecordingTransport};
use crate::CompiledSchema;
use facade_rt::TransportError;
use facade_schema::SchemaSet;
use pretty_assertions::assert_eq;
use serde_json::json;

fn compile(document: &serde_json::Value) -> CompiledSchema {
    CompiledSchema::synthesize(SchemaSet::from_json(&document.to_string()).expect("compile"))
}

#[test]
fn ping_decodes_the_result_record() {
    let schema = client_schema();
    let transport = RecordingTransport::replying(json!({"Response": {"Result": true}}));
    let client = schema.connect("Client", None, &transport).expect("facade");

    let outcome = client.call("Ping", vec![]).expect("call");
    let record = outcome.response().expect("response");
    let record = record.as_record().expect("record");
    assert_eq!(record.ty().name(), "PingResult");
    assert_eq!(record.get("result"), Some(&Value::Bool(true)));

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        serde_json::to_value(&sent[0]).expect("envelope"),
        json!({"Type": "Client", "Request": "Ping", "Version": 1, "Params": {}})
    );
}

#[test]
fn positional_arguments_follow_field_order() {
    let schema = client_schema();
    let transport = RecordingTransport::replying(json!({"Response": {"model": "default"}}));
    let op = schema.facade("Client", None).expect("facade").operation("FullStatus").expect("op");
    assert_eq!(op.parameters(), vec!["patterns", "include_storage", "type_"]);

    let outcome = op
        .call(
            &transport,
            vec![Value::from(vec!["app/0"]), Value::Omitted, Value::from("machine")],
        )
        .expect("call");

    assert_eq!(
        serde_json::Value::Object(transport.sent()[0].params.clone()),
        json!({"patterns": ["app/0"], "type": "machine"})
    );
    let status = outcome.response().expect("response");
    let status = status.as_record().expect("record");
    assert_eq!(status.ty().name(), "FullStatus");
    assert_eq!(status.get("model"), Some(&Value::from("default")));
}

#[test]
fn named_arguments_use_host_identifiers() {
    let schema = client_schema();
    let transport = RecordingTransport::replying(json!({"Response": {}}));
    let client = schema.connect("Client", None, &transport).expect("facade");

    client
        .call_named("FullStatus", [("include_storage", Value::Bool(true))])
        .expect("call");
    assert_eq!(
        serde_json::Value::Object(transport.sent()[0].params.clone()),
        json!({"include-storage": true})
    );

    let err = client
        .call_named("FullStatus", [("include-storage", Value::Bool(true))])
        .expect_err("wire name is not a parameter");
    assert!(matches!(
        err,
        EvalError::UnknownArgument { ref target, ref name }
            if target == "Client.FullStatus" && name == "include-storage"
    ));
    assert_eq!(transport.sent().len(), 1);
}

#[test]
fn error_reply_decodes_into_the_error_record() {
    let schema = client_schema();
    let transport = RecordingTransport::replying(json!({
        "Error": {"message": "permission denied", "code": "unauthorized access"}
    }));
    let client = schema.connect("Client", None, &transport).expect("facade");

    let outcome = client.call("FullStatus", vec![]).expect("call");
    assert!(outcome.is_error());
    let error = outcome.error().expect("error");
    let error = error.as_record().expect("record");
    assert_eq!(error.ty().name(), "Error");
    assert_eq!(error.get("message"), Some(&Value::from("permission denied")));
}

#[test]
fn non_record_variant_is_unwrapped_from_the_payload() {
    let schema = client_schema();
    let transport = RecordingTransport::replying(json!({"Response": {"Result": ["a", "b"]}}));
    let client = schema.connect("Client", None, &transport).expect("facade");
    let outcome = client.call("Tags", vec![]).expect("call");
    assert_eq!(
        outcome.response(),
        Some(Value::List(vec![Value::from("a"), Value::from("b")]))
    );

    let transport = RecordingTransport::replying(json!({"Response": ["c"]}));
    let client = schema.connect("Client", None, &transport).expect("facade");
    let outcome = client.call("Tags", vec![]).expect("call");
    assert_eq!(outcome.response(), Some(Value::List(vec![Value::from("c")])));
}

#[test]
fn absent_reply_is_not_a_zero_valued_result() {
    let schema = client_schema();
    let transport = RecordingTransport::replying(json!({}));
    let client = schema.connect("Client", None, &transport).expect("facade");

    let outcome = client.call("FullStatus", vec![]).expect("call");
    assert!(outcome.is_absent());
    assert_eq!(transport.sent().len(), 1);
}

#[test]
fn null_response_is_an_empty_record() {
    let schema = client_schema();
    let transport = RecordingTransport::replying(json!({"Response": null}));
    let client = schema.connect("Client", None, &transport).expect("facade");

    let outcome = client.call("Ping", vec![]).expect("call");
    let record = outcome.response().expect("response");
    assert_eq!(record.as_record().and_then(|r| r.get("result")), Some(&Value::Omitted));
}

#[test]
fn operations_without_result_return_the_raw_payload() {
    let schema = client_schema();
    let transport = RecordingTransport::replying(json!({"Response": null}));
    let client = schema.connect("Client", None, &transport).expect("facade");
    assert_eq!(client.call("Stop", vec![]).expect("call").response(), Some(Value::Null));

    let transport = RecordingTransport::replying(json!({"Response": {"ok": 1}}));
    let client = schema.connect("Client", None, &transport).expect("facade");
    assert_eq!(
        client.call("Stop", vec![]).expect("call").response(),
        Some(Value::Any(json!({"ok": 1})))
    );
}

#[test]
fn too_many_arguments_never_reach_the_transport() {
    let schema = client_schema();
    let transport = RecordingTransport::replying(json!({"Response": {}}));
    let client = schema.connect("Client", None, &transport).expect("facade");

    let err = client.call("Stop", vec![Value::Int(1)]).expect_err("arity");
    assert!(matches!(err, EvalError::Arity { expected: 0, found: 1, .. }));

    let err = client
        .call("Tags", vec![Value::Omitted, Value::Omitted])
        .expect_err("arity");
    assert_eq!(err.to_string(), "Client.Tags takes at most 1 argument(s), got 2");
    assert!(transport.sent().is_empty());
}

#[test]
fn type_mismatch_is_reported_before_sending() {
    let schema = client_schema();
    let transport = RecordingTransport::replying(json!({"Response": {}}));
    let client = schema.connect("Client", None, &transport).expect("facade");

    let err = client
        .call("FullStatus", vec![Value::from("not-a-list")])
        .expect_err("mismatch");
    assert!(matches!(
        err,
        EvalError::Mismatch { ref path, .. } if path == "FullStatus.patterns"
    ));
    assert!(transport.sent().is_empty());
}

#[test]
fn unknown_operation_is_an_error() {
    let schema = client_schema();
    let transport = RecordingTransport::replying(json!({}));
    let client = schema.connect("Client", None, &transport).expect("facade");
    assert!(matches!(
        client.call("Reboot", vec![]),
        Err(EvalError::UnknownOperation { .. })
    ));
}

#[test]
fn transport_failures_propagate() {
    let schema = client_schema();
    let transport = facade_rt::from_fn(|_| Err(TransportError::new("connection reset")));
    let client = schema.connect("Client", None, transport).expect("facade");
    let err = client.call("Ping", vec![]).expect_err("transport");
    assert_eq!(err.to_string(), "transport failure: connection reset");
}

#[test]
fn first_success_variant_wins() {
    let schema = compile(&json!([{"Name": "Watcher", "Version": 2, "Schema": {
        "properties": {"Next": {"type": "object", "properties": {
            "Result": {"$ref": "#/definitions/NextResult"}
        }}},
        "definitions": {
            "Delta": {"type": "object", "properties": {"id": {"type": "string"}}},
            "Removal": {"type": "object", "properties": {"gone": {"type": "boolean"}}},
            "NextResult": {"type": "object", "properties": {
                "Delta": {"$ref": "#/definitions/Delta"},
                "Removal": {"$ref": "#/definitions/Removal"}
            }}
        }
    }}]));
    let op = schema.facade("Watcher", None).expect("facade").operation("Next").expect("op");
    assert!(matches!(
        op.result_rule(),
        ResultRule::Variant(variant) if variant.wire_name == "Delta"
    ));

    let transport = RecordingTransport::replying(json!({"Response": {"id": "x", "gone": true}}));
    let outcome = op.call(&transport, vec![]).expect("call");
    let record = outcome.response().expect("response");
    let record = record.as_record().expect("record");
    assert_eq!(record.ty().name(), "Delta");
    assert_eq!(record.get("id"), Some(&Value::from("x")));
    assert_eq!(transport.sent()[0].version, 2);
}

#[test]
fn error_without_definition_stays_untyped() {
    let schema = compile(&json!([{"Name": "Pinger", "Version": 1, "Schema": {
        "properties": {"Ping": {"type": "object", "properties": {
            "Result": {"$ref": "#/definitions/PingResult"}
        }}},
        "definitions": {
            "PingResult": {"type": "object", "properties": {"Result": {"type": "boolean"}}}
        }
    }}]));
    let transport = RecordingTransport::replying(json!({"Error": {"message": "down"}}));
    let client = schema.connect("Pinger", None, &transport).expect("facade");

    let outcome = client.call("Ping", vec![]).expect("call");
    assert_eq!(outcome.error(), Some(Value::Any(json!({"message": "down"}))));
}

#[test]
fn record_variant_is_read_from_the_whole_payload() {
    let schema = client_schema();
    let transport = RecordingTransport::replying(json!({"Response": {"Status": {"model": "nested"}}}));
    let client = schema.connect("Client", None, &transport).expect("facade");

    let status = client.call("FullStatus", vec![]).expect("call").response().expect("response");
    let status = status.as_record().expect("record");
    assert_eq!(status.ty().name(), "FullStatus");
    assert_eq!(status.get("model"), Some(&Value::Omitted));
    assert_eq!(status.get("machines"), Some(&Value::Omitted));
}
