//! Shared fixtures for unit tests.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Mutex;

use facade_rt::{Envelope, Transport, TransportError};
use facade_schema::SchemaSet;
use serde_json::{json, Value as Json};

use crate::CompiledSchema;

/// A small `Client` facade exercising every result shape.
pub fn client_document() -> Json {
    json!([{
        "Name": "Client",
        "Version": 1,
        "Schema": {
            "type": "object",
            "properties": {
                "FullStatus": {"type": "object", "properties": {
                    "Params": {"$ref": "#/definitions/StatusParams"},
                    "Result": {"$ref": "#/definitions/StatusResult"}
                }},
                "Ping": {"type": "object", "properties": {
                    "Result": {"$ref": "#/definitions/PingResult"}
                }},
                "Stop": {"type": "object"},
                "Tags": {"type": "object", "properties": {
                    "Params": {"$ref": "#/definitions/Entities"},
                    "Result": {"$ref": "#/definitions/StringsResult"}
                }},
                "Tree": {"type": "object", "properties": {
                    "Result": {"$ref": "#/definitions/Node"}
                }}
            },
            "definitions": {
                "Entities": {"type": "object", "properties": {
                    "entities": {"type": "array", "items": {"$ref": "#/definitions/Entity"}}
                }},
                "Entity": {"type": "object", "properties": {"tag": {"type": "string"}}},
                "Error": {"type": "object", "properties": {
                    "message": {"type": "string"},
                    "code": {"type": "string"}
                }},
                "FullStatus": {"type": "object", "properties": {
                    "model": {"type": "string"},
                    "machines": {"type": "object", "patternProperties": {
                        ".*": {"$ref": "#/definitions/MachineStatus"}
                    }}
                }},
                "MachineStatus": {"type": "object", "properties": {
                    "id": {"type": "string"},
                    "agent-status": {"type": "string"}
                }},
                "Node": {"type": "object", "properties": {
                    "name": {"type": "string"},
                    "children": {"type": "array", "items": {"$ref": "#/definitions/Node"}}
                }},
                "PingResult": {"type": "object", "properties": {"Result": {"type": "boolean"}}},
                "StatusParams": {"type": "object", "properties": {
                    "patterns": {"type": "array", "items": {"type": "string"}},
                    "include-storage": {"type": "boolean"},
                    "type": {"type": "string"}
                }},
                "StatusResult": {"type": "object", "properties": {
                    "Error": {"$ref": "#/definitions/Error"},
                    "Status": {"$ref": "#/definitions/FullStatus"}
                }},
                "StringsResult": {"type": "object", "properties": {
                    "Error": {"$ref": "#/definitions/Error"},
                    "Result": {"type": "array", "items": {"type": "string"}}
                }}
            }
        }
    }])
}

pub fn client_schema() -> CompiledSchema {
    let set = SchemaSet::from_json(&client_document().to_string()).expect("fixture compiles");
    CompiledSchema::synthesize(set)
}

/// Transport returning a canned reply and recording every envelope.
pub struct RecordingTransport {
    reply: Json,
    sent: Mutex<Vec<Envelope>>,
}

impl RecordingTransport {
    pub fn replying(reply: Json) -> Self {
        RecordingTransport {
            reply,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<Envelope> {
        self.sent.lock().unwrap().clone()
    }
}

impl Transport for RecordingTransport {
    fn rpc(&self, envelope: &Envelope) -> Result<Json, TransportError> {
        self.sent.lock().unwrap().push(envelope.clone());
        Ok(self.reply.clone())
    }
}
