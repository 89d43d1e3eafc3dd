//! Type-checked conversion between host values and wire JSON.
//!
//! Encoding checks every argument against its declared [`FieldType`] before
//! anything is sent. Decoding is lenient where servers are: booleans accept
//! their string and integer spellings, unknown keys are ignored and missing
//! keys become [`Value::Omitted`].

use std::collections::BTreeMap;
use std::sync::Arc;

use facade_ir::{FieldType, Primitive, Version};
use serde_json::{Map, Number};

use crate::error::mismatch;
use crate::record::{CompiledRecordType, RecordTable};
use crate::{EvalError, Record, Value};

/// Converts values for one schema version.
pub(crate) struct Marshal<'a> {
    pub(crate) records: &'a RecordTable,
    pub(crate) version: Version,
}

impl Marshal<'_> {
    /// Encode `value` as `ty`. Returns `None` for omitted values.
    pub(crate) fn encode(&self, value: &Value, ty: &FieldType, path: &str) -> Result<Option<serde_json::Value>, EvalError> {
        if value.is_omitted() {
            return Ok(None);
        }
        if matches!(value, Value::Null) {
            return Ok(Some(serde_json::Value::Null));
        }
        let json = match (ty, value) {
            (FieldType::Primitive(Primitive::Any), value) => value.to_json(),
            (FieldType::Primitive(Primitive::String), Value::Str(s)) => serde_json::Value::String(s.clone()),
            (FieldType::Primitive(Primitive::Int), Value::Int(n)) => serde_json::Value::from(*n),
            (FieldType::Primitive(Primitive::Float), Value::Float(f)) => Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .ok_or_else(|| mismatch(path, "finite float", f.to_string()))?,
            #[allow(clippy::cast_precision_loss)]
            (FieldType::Primitive(Primitive::Float), Value::Int(n)) => serde_json::Value::from(*n as f64),
            (FieldType::Primitive(Primitive::Bool), Value::Bool(b)) => serde_json::Value::Bool(*b),
            (FieldType::Ref(_), Value::Any(json)) => json.clone(),
            (FieldType::Ref(handle), Value::Record(record)) if record.ty().handle() == *handle => {
                serde_json::Value::Object(self.encode_record(record, path)?)
            }
            (FieldType::Sequence(inner), Value::List(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    let item_path = format!("{path}[{i}]");
                    out.push(self.encode(item, inner, &item_path)?.unwrap_or(serde_json::Value::Null));
                }
                serde_json::Value::Array(out)
            }
            (FieldType::Map(inner), Value::Map(entries)) => {
                let mut out = Map::new();
                for (key, entry) in entries {
                    let entry_path = format!("{path}.{key}");
                    if let Some(json) = self.encode(entry, inner, &entry_path)? {
                        out.insert(key.clone(), json);
                    }
                }
                serde_json::Value::Object(out)
            }
            (ty, value) => return Err(mismatch(path, self.expected(ty), value.describe())),
        };
        Ok(Some(json))
    }

    /// Encode every non-omitted field of `record` under its wire name.
    pub(crate) fn encode_record(&self, record: &Record, path: &str) -> Result<Map<String, serde_json::Value>, EvalError> {
        let ty = record.ty();
        let mut out = Map::new();
        for (index, (spec, value)) in ty.fields().iter().zip(record.values()).enumerate() {
            let field_path = format!("{path}.{}", ty.names().host(index));
            if let Some(json) = self.encode(value, &spec.ty, &field_path)? {
                out.insert(spec.wire_name.clone(), json);
            }
        }
        Ok(out)
    }

    /// Decode a wire value as `ty`.
    pub(crate) fn decode(&self, json: &serde_json::Value, ty: &FieldType, path: &str) -> Result<Value, EvalError> {
        if json.is_null() {
            return Ok(Value::Null);
        }
        match ty {
            FieldType::Primitive(primitive) => decode_primitive(json, *primitive, path),
            FieldType::Ref(handle) => match self.records.resolve(*handle, Some(self.version)) {
                Some(record_ty) => match json {
                    serde_json::Value::Object(map) => self.decode_record(record_ty, map, path).map(Value::Record),
                    other => Err(mismatch(path, record_ty.name(), json_kind(other))),
                },
                None => Ok(Value::Any(json.clone())),
            },
            FieldType::Sequence(inner) => match json {
                serde_json::Value::Array(items) => items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| self.decode(item, inner, &format!("{path}[{i}]")))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::List),
                other => Err(mismatch(path, "list", json_kind(other))),
            },
            FieldType::Map(inner) => match json {
                serde_json::Value::Object(map) => map
                    .iter()
                    .map(|(key, entry)| Ok((key.clone(), self.decode(entry, inner, &format!("{path}.{key}"))?)))
                    .collect::<Result<BTreeMap<_, _>, EvalError>>()
                    .map(Value::Map),
                other => Err(mismatch(path, "map", json_kind(other))),
            },
        }
    }

    /// Decode a wire mapping into a record of `ty`.
    pub(crate) fn decode_record(
        &self,
        ty: &Arc<CompiledRecordType>,
        map: &Map<String, serde_json::Value>,
        path: &str,
    ) -> Result<Record, EvalError> {
        let mut fields = vec![Value::Omitted; ty.fields().len()];
        for (wire, json) in map {
            let Some(index) = ty.names().wire_index(wire) else {
                tracing::trace!(record = ty.name(), key = %wire, "ignoring unknown wire key");
                continue;
            };
            let field_path = format!("{path}.{}", ty.names().host(index));
            fields[index] = self.decode(json, &ty.fields()[index].ty, &field_path)?;
        }
        Ok(Record::from_parts(Arc::clone(ty), fields))
    }

    fn expected(&self, ty: &FieldType) -> String {
        match ty {
            FieldType::Primitive(primitive) => primitive.name().to_owned(),
            FieldType::Ref(handle) => self
                .records
                .resolve(*handle, Some(self.version))
                .map_or_else(|| "record".to_owned(), |record| record.name().to_owned()),
            FieldType::Sequence(inner) => format!("list of {}", self.expected(inner)),
            FieldType::Map(inner) => format!("map of {}", self.expected(inner)),
        }
    }
}

fn decode_primitive(json: &serde_json::Value, primitive: Primitive, path: &str) -> Result<Value, EvalError> {
    let decoded = match primitive {
        Primitive::Any => Some(Value::Any(json.clone())),
        Primitive::String => json.as_str().map(Value::from),
        Primitive::Int => json.as_i64().map(Value::Int),
        Primitive::Float => json.as_f64().map(Value::Float),
        Primitive::Bool => facade_rt::coerce_bool(json).map(Value::Bool),
    };
    decoded.ok_or_else(|| mismatch(path, primitive.name(), json_kind(json)))
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
