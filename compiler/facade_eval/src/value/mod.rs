//! Dynamic host values passed to and returned from stubs.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Number};

use crate::record::CompiledRecordType;
use crate::EvalError;

/// A host value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Not sent on the wire. Also what missing reply fields decode to.
    Omitted,
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Untyped JSON, for `object` kinds and error payloads without a record.
    Any(serde_json::Value),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Record(Record),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Omitted => "omitted",
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Any(_) => "any",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Record(_) => "record",
        }
    }

    /// Type name for diagnostics; records report their own name.
    pub fn describe(&self) -> String {
        match self {
            Value::Record(record) => record.ty().name().to_owned(),
            other => other.type_name().to_owned(),
        }
    }

    pub fn is_omitted(&self) -> bool {
        matches!(self, Value::Omitted)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Untyped JSON rendering. Omitted values render as `null` here;
    /// records and maps leave them out.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Omitted | Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(n) => serde_json::Value::from(*n),
            Value::Float(f) => Number::from_f64(*f).map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::Any(json) => json.clone(),
            Value::List(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .filter(|(_, v)| !v.is_omitted())
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Record(record) => serde_json::Value::Object(record.to_wire()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

/// Instance of a synthesized record type.
///
/// Fields are stored in the type's field order; absent ones are
/// [`Value::Omitted`].
#[derive(Clone, Debug)]
pub struct Record {
    ty: Arc<CompiledRecordType>,
    fields: Vec<Value>,
}

impl Record {
    /// Build a record from positional values. Missing trailing values are
    /// omitted.
    pub fn construct(ty: &Arc<CompiledRecordType>, args: Vec<Value>) -> Result<Self, EvalError> {
        let expected = ty.fields().len();
        if args.len() > expected {
            return Err(EvalError::Arity {
                target: ty.name().to_owned(),
                expected,
                found: args.len(),
            });
        }
        let mut fields = args;
        fields.resize(expected, Value::Omitted);
        Ok(Record {
            ty: Arc::clone(ty),
            fields,
        })
    }

    /// A record with every field omitted.
    pub fn empty(ty: &Arc<CompiledRecordType>) -> Self {
        Record {
            ty: Arc::clone(ty),
            fields: vec![Value::Omitted; ty.fields().len()],
        }
    }

    pub fn ty(&self) -> &Arc<CompiledRecordType> {
        &self.ty
    }

    /// Field by host identifier.
    pub fn get(&self, host: &str) -> Option<&Value> {
        self.ty.names().host_index(host).map(|i| &self.fields[i])
    }

    /// Field by wire name.
    pub fn get_wire(&self, wire: &str) -> Option<&Value> {
        self.ty.names().wire_index(wire).map(|i| &self.fields[i])
    }

    /// Replace a field by host identifier.
    pub fn set(&mut self, host: &str, value: impl Into<Value>) -> Result<(), EvalError> {
        let Some(index) = self.ty.names().host_index(host) else {
            return Err(EvalError::UnknownArgument {
                target: self.ty.name().to_owned(),
                name: host.to_owned(),
            });
        };
        self.fields[index] = value.into();
        Ok(())
    }

    /// Field values in field order.
    pub fn values(&self) -> &[Value] {
        &self.fields
    }

    /// `(host identifier, value)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.ty
            .names()
            .pairs()
            .map(|(host, _)| host)
            .zip(&self.fields)
    }

    /// Wire mapping of the record; omitted fields are left out.
    pub fn to_wire(&self) -> Map<String, serde_json::Value> {
        self.ty
            .names()
            .pairs()
            .zip(&self.fields)
            .filter(|(_, value)| !value.is_omitted())
            .map(|((_, wire), value)| (wire.to_owned(), value.to_json()))
            .collect()
    }

    pub(crate) fn from_parts(ty: Arc<CompiledRecordType>, fields: Vec<Value>) -> Self {
        Record { ty, fields }
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        let same_type = Arc::ptr_eq(&self.ty, &other.ty)
            || (self.ty.name() == other.ty.name() && self.ty.version() == other.ty.version());
        same_type && self.fields == other.fields
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.ty.name())?;
        let mut first = true;
        for (host, value) in self.iter().filter(|(_, v)| !v.is_omitted()) {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{host}={}", value.to_json())?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests;
