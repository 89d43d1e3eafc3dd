use super::*;
use crate::test_helpers::{client_document, client_schema, RecordingTransport};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn facades_are_looked_up_by_name_and_version() {
    let schema = client_schema();
    let facade = schema.facade("Client", None).expect("facade");
    assert_eq!(facade.version(), Version(1));

    let names: Vec<&str> = facade.operations().map(|op| op.name()).collect();
    assert_eq!(names, vec!["FullStatus", "Ping", "Stop", "Tags", "Tree"]);

    assert!(matches!(
        schema.facade("Client", Some(Version(7))),
        Err(EvalError::UnknownFacade { version: Some(Version(7)), .. })
    ));
    assert_eq!(
        schema.facade("Nope", None).expect_err("unknown").to_string(),
        "no facade Nope"
    );
}

#[test]
fn record_lookup_respects_explicit_versions() {
    let schema = client_schema();
    assert!(schema.record("Entity", Some(Version(1))).is_some());
    assert!(schema.record("Entity", Some(Version(2))).is_none());
    assert!(schema.record("Missing", None).is_none());
}

#[test]
fn compiled_schema_is_shareable_across_threads() {
    let schema = std::sync::Arc::new(client_schema());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let schema = std::sync::Arc::clone(&schema);
            std::thread::spawn(move || {
                let transport = RecordingTransport::replying(json!({"Response": {"Result": "false"}}));
                let client = schema.connect("Client", None, transport).expect("facade");
                client.call("Ping", vec![]).expect("call")
            })
        })
        .collect();
    for handle in handles {
        let outcome = handle.join().expect("thread");
        let record = outcome.response().expect("response");
        assert_eq!(
            record.as_record().and_then(|r| r.get("result")),
            Some(&crate::Value::Bool(false))
        );
    }
}

#[test]
fn newest_facade_version_is_the_default() {
    let mut document = client_document();
    let mut v2 = document[0].clone();
    v2["Version"] = json!(2);
    document.as_array_mut().expect("array").push(v2);

    let set = SchemaSet::from_json(&document.to_string()).expect("compile");
    let schema = CompiledSchema::synthesize(set);
    assert_eq!(schema.facades().len(), 2);
    assert_eq!(schema.facade("Client", None).map(|f| f.version()).ok(), Some(Version(2)));
    assert_eq!(
        schema.facade("Client", Some(Version(1))).map(|f| f.version()).ok(),
        Some(Version(1))
    );
}
