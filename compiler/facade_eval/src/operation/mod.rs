//! Callable stubs for facade operations.
//!
//! A [`CompiledOperation`] marshals its arguments into an [`Envelope`],
//! calls the transport exactly once and maps the reply onto the declared
//! result.

use std::collections::BTreeMap;
use std::sync::Arc;

use facade_ir::{FieldSpec, FieldType, TypeHandle, Version};
use facade_rt::{Envelope, Outcome, Reply, Transport};
use facade_schema::{FacadeSpec, OperationSpec};
use serde_json::Map;

use crate::marshal::Marshal;
use crate::record::{CompiledRecordType, RecordTable};
use crate::{EvalError, Record, Value};

/// What a successful reply is decoded into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResultRule {
    /// No `Result` declared: the payload is returned as is.
    Raw,
    /// Zero or one variant: the `Result` record itself.
    Record(TypeHandle),
    /// Several variants: the first one not named `Error`.
    Variant(FieldSpec),
}

impl ResultRule {
    pub fn for_operation(spec: &OperationSpec) -> Self {
        match (spec.result, spec.is_multi_variant()) {
            (None, _) => ResultRule::Raw,
            (Some(_), true) => match spec.success_variant() {
                Some(variant) => ResultRule::Variant(variant.clone()),
                None => spec.result.map_or(ResultRule::Raw, ResultRule::Record),
            },
            (Some(handle), false) => ResultRule::Record(handle),
        }
    }
}

/// One remote operation bound to its facade's name and version.
#[derive(Debug)]
pub struct CompiledOperation {
    facade: String,
    version: Version,
    name: String,
    params: Option<Arc<CompiledRecordType>>,
    rule: ResultRule,
    error: Option<Arc<CompiledRecordType>>,
    records: Arc<RecordTable>,
}

impl CompiledOperation {
    #[tracing::instrument(level = "trace", skip_all, fields(operation = %spec.name))]
    pub fn compile(
        facade: &FacadeSpec,
        spec: &OperationSpec,
        error: Option<TypeHandle>,
        records: &Arc<RecordTable>,
    ) -> Self {
        let params = spec
            .params
            .and_then(|handle| records.resolve(handle, Some(facade.version)))
            .cloned();
        let error = error
            .and_then(|handle| records.resolve(handle, Some(facade.version)))
            .cloned();
        CompiledOperation {
            facade: facade.name.clone(),
            version: facade.version,
            name: spec.name.clone(),
            params,
            rule: ResultRule::for_operation(spec),
            error,
            records: Arc::clone(records),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn facade(&self) -> &str {
        &self.facade
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn result_rule(&self) -> &ResultRule {
        &self.rule
    }

    /// The params record type, if the operation takes arguments.
    pub fn params(&self) -> Option<&Arc<CompiledRecordType>> {
        self.params.as_ref()
    }

    /// The record error replies decode into, if the schema defines one.
    pub fn error_type(&self) -> Option<&Arc<CompiledRecordType>> {
        self.error.as_ref()
    }

    /// Host identifiers of the parameters, in call order.
    pub fn parameters(&self) -> Vec<&str> {
        self.params
            .as_deref()
            .map(|params| params.parameters().collect())
            .unwrap_or_default()
    }

    /// Call with positional arguments. Missing trailing arguments are
    /// omitted.
    pub fn call<T: Transport + ?Sized>(
        &self,
        transport: &T,
        args: Vec<Value>,
    ) -> Result<Outcome<Value, Value>, EvalError> {
        let envelope = self.envelope(args)?;
        self.send(transport, &envelope)
    }

    /// Call with arguments keyed by host identifier.
    pub fn call_named<'a, T, I>(&self, transport: &T, args: I) -> Result<Outcome<Value, Value>, EvalError>
    where
        T: Transport + ?Sized,
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        let envelope = self.envelope_named(args)?;
        self.send(transport, &envelope)
    }

    /// Build the request envelope for positional arguments.
    pub fn envelope(&self, args: Vec<Value>) -> Result<Envelope, EvalError> {
        let params = match &self.params {
            Some(ty) => Some(Record::construct(ty, args).map_err(|err| self.retarget(err))?),
            None if args.is_empty() => None,
            None => {
                return Err(EvalError::Arity {
                    target: self.qualified(),
                    expected: 0,
                    found: args.len(),
                })
            }
        };
        self.envelope_for(params.as_ref())
    }

    /// Build the request envelope for named arguments.
    pub fn envelope_named<'a, I>(&self, args: I) -> Result<Envelope, EvalError>
    where
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        let mut params = self.params.as_ref().map(Record::empty);
        for (name, value) in args {
            match params.as_mut() {
                Some(record) => record.set(name, value).map_err(|err| self.retarget(err))?,
                None => {
                    return Err(EvalError::UnknownArgument {
                        target: self.qualified(),
                        name: name.to_owned(),
                    })
                }
            }
        }
        self.envelope_for(params.as_ref())
    }

    fn envelope_for(&self, params: Option<&Record>) -> Result<Envelope, EvalError> {
        let wire = match params {
            Some(record) => self.marshal().encode_record(record, &self.name)?,
            None => Map::new(),
        };
        Ok(Envelope::new(&self.facade, &self.name, self.version.0, wire))
    }

    #[tracing::instrument(level = "debug", skip_all, fields(facade = %self.facade, operation = %self.name))]
    fn send<T: Transport + ?Sized>(&self, transport: &T, envelope: &Envelope) -> Result<Outcome<Value, Value>, EvalError> {
        let reply = Reply::classify(transport.rpc(envelope)?);
        self.map_reply(reply)
    }

    /// Map a classified reply onto the declared result.
    pub fn map_reply(&self, reply: Reply) -> Result<Outcome<Value, Value>, EvalError> {
        let marshal = self.marshal();
        match reply {
            Reply::Error(payload) => {
                let error = match (&self.error, payload) {
                    (Some(ty), serde_json::Value::Object(map)) => {
                        Value::Record(marshal.decode_record(ty, &map, "Error")?)
                    }
                    (_, other) => Value::Any(other),
                };
                Ok(Outcome::Error(error))
            }
            Reply::Response(payload) => self.decode_success(&marshal, payload).map(Outcome::Response),
            Reply::Absent => {
                tracing::warn!(
                    facade = %self.facade,
                    operation = %self.name,
                    "reply carried neither Error nor Response"
                );
                Ok(Outcome::Absent)
            }
        }
    }

    fn decode_success(&self, marshal: &Marshal<'_>, payload: serde_json::Value) -> Result<Value, EvalError> {
        match &self.rule {
            ResultRule::Raw => Ok(match payload {
                serde_json::Value::Null => Value::Null,
                other => Value::Any(other),
            }),
            ResultRule::Record(handle) => self.decode_whole(marshal, *handle, payload),
            ResultRule::Variant(variant) => match &variant.ty {
                FieldType::Ref(handle) if self.records.resolve(*handle, Some(self.version)).is_some() => {
                    tracing::trace!(variant = %variant.wire_name, "record variant decoded from the whole payload");
                    self.decode_whole(marshal, *handle, payload)
                }
                ty => {
                    let member = facade_rt::select_member(payload, &variant.wire_name);
                    marshal.decode(&member, ty, &variant.wire_name)
                }
            },
        }
    }

    /// Decode the whole payload as the record behind `handle`; `null` is an
    /// empty record.
    fn decode_whole(&self, marshal: &Marshal<'_>, handle: TypeHandle, payload: serde_json::Value) -> Result<Value, EvalError> {
        let Some(ty) = self.records.resolve(handle, Some(self.version)) else {
            return Ok(Value::Any(payload));
        };
        match payload {
            serde_json::Value::Null => Ok(Value::Record(Record::empty(ty))),
            serde_json::Value::Object(map) => marshal.decode_record(ty, &map, ty.name()).map(Value::Record),
            other => Err(crate::error::mismatch(ty.name(), ty.name(), other.to_string())),
        }
    }

    fn marshal(&self) -> Marshal<'_> {
        Marshal {
            records: &self.records,
            version: self.version,
        }
    }

    fn qualified(&self) -> String {
        format!("{}.{}", self.facade, self.name)
    }

    /// Report params-record errors against the operation rather than the
    /// params record.
    fn retarget(&self, err: EvalError) -> EvalError {
        match err {
            EvalError::Arity { expected, found, .. } => EvalError::Arity {
                target: self.qualified(),
                expected,
                found,
            },
            EvalError::UnknownArgument { name, .. } => EvalError::UnknownArgument {
                target: self.qualified(),
                name,
            },
            other => other,
        }
    }
}

/// A facade with every operation compiled.
#[derive(Debug)]
pub struct CompiledFacade {
    name: String,
    version: Version,
    operations: BTreeMap<String, CompiledOperation>,
}

impl CompiledFacade {
    #[tracing::instrument(level = "debug", skip_all, fields(facade = %spec.name, version = %spec.version))]
    pub fn compile(spec: &FacadeSpec, error: Option<TypeHandle>, records: &Arc<RecordTable>) -> Self {
        let operations = spec
            .operations
            .values()
            .map(|op| (op.name.clone(), CompiledOperation::compile(spec, op, error, records)))
            .collect::<BTreeMap<_, _>>();
        tracing::debug!(operations = operations.len(), "facade compiled");
        CompiledFacade {
            name: spec.name.clone(),
            version: spec.version,
            operations,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Operations in sorted name order.
    pub fn operations(&self) -> impl Iterator<Item = &CompiledOperation> + '_ {
        self.operations.values()
    }

    pub fn operation(&self, name: &str) -> Result<&CompiledOperation, EvalError> {
        self.operations.get(name).ok_or_else(|| EvalError::UnknownOperation {
            facade: self.name.clone(),
            operation: name.to_owned(),
        })
    }
}

/// A compiled facade bound to a transport.
pub struct FacadeClient<T> {
    facade: Arc<CompiledFacade>,
    transport: T,
}

impl<T: Transport> FacadeClient<T> {
    pub fn new(facade: Arc<CompiledFacade>, transport: T) -> Self {
        FacadeClient { facade, transport }
    }

    pub fn facade(&self) -> &CompiledFacade {
        &self.facade
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Call `operation` with positional arguments.
    pub fn call(&self, operation: &str, args: Vec<Value>) -> Result<Outcome<Value, Value>, EvalError> {
        self.facade.operation(operation)?.call(&self.transport, args)
    }

    /// Call `operation` with arguments keyed by host identifier.
    pub fn call_named<'a, I>(&self, operation: &str, args: I) -> Result<Outcome<Value, Value>, EvalError>
    where
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        self.facade
            .operation(operation)?
            .call_named(&self.transport, args)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests;
