//! Rust client source generation.
//!
//! Produces one serde struct per `(definition, version)` and one client
//! struct per facade descriptor. Every runtime path in the output goes
//! through [`EmitOptions::runtime_crate`], so a generated file only needs
//! that crate in scope.

use std::sync::Arc;

use facade_eval::{CompiledFacade, CompiledOperation, CompiledRecordType, CompiledSchema, ResultRule};
use facade_ir::{host_identifier, type_identifier, FieldType, Primitive, TypeHandle, Version};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{EmitOptions, Emitter, StringEmitter};

/// First line of every generated file.
pub const HEADER: &str = "// Generated by facadec from an interface document. Do not edit.";

/// Methods every generated facade struct defines itself.
const FACADE_METHODS: &[&str] = &["connect", "transport"];

/// Type parameter of generated facade structs; no record may take this name.
const TRANSPORT_PARAM: &str = "T";

/// Generator state: names and field types are fixed up front so record and
/// facade output agree on them.
pub struct RustGenerator<'a> {
    schema: &'a CompiledSchema,
    options: &'a EmitOptions,
    /// Records sorted by `(name, version)`.
    records: Vec<&'a Arc<CompiledRecordType>>,
    type_names: FxHashMap<(TypeHandle, Version), String>,
    /// Rendered field types (without the `Option`), per record.
    field_types: FxHashMap<(TypeHandle, Version), Vec<String>>,
    facade_names: Vec<String>,
}

impl<'a> RustGenerator<'a> {
    #[tracing::instrument(level = "debug", skip_all, fields(records = schema.records().len()))]
    pub fn new(schema: &'a CompiledSchema, options: &'a EmitOptions) -> Self {
        let mut records: Vec<_> = schema.records().iter().collect();
        records.sort_by(|a, b| (a.name(), a.version()).cmp(&(b.name(), b.version())));

        let mut used: FxHashSet<String> = std::iter::once(TRANSPORT_PARAM.to_owned()).collect();
        let mut type_names = FxHashMap::default();
        for record in &records {
            let base = type_identifier(record.name());
            let candidate = if schema.records().default_version(record.handle()) == Some(record.version()) {
                base
            } else {
                format!("{base}V{}", record.version())
            };
            type_names.insert((record.handle(), record.version()), claim(&mut used, candidate));
        }

        let facade_names = schema
            .facades()
            .iter()
            .map(|facade| {
                let newest = schema
                    .facade(facade.name(), None)
                    .map(|f| f.version())
                    .ok();
                let base = type_identifier(&format!("{}Facade", facade.name()));
                let candidate = if newest == Some(facade.version()) {
                    base
                } else {
                    format!("{base}V{}", facade.version())
                };
                claim(&mut used, candidate)
            })
            .collect();

        let mut generator = RustGenerator {
            schema,
            options,
            records,
            type_names,
            field_types: FxHashMap::default(),
            facade_names,
        };
        generator.field_types = generator.render_field_types();
        generator
    }

    /// Rust type name of a record.
    pub fn type_name(&self, handle: TypeHandle, version: Version) -> Option<&str> {
        self.type_names.get(&(handle, version)).map(String::as_str)
    }

    /// Rust type name of the facade at `index` in document order.
    pub fn facade_type_name(&self, index: usize) -> Option<&str> {
        self.facade_names.get(index).map(String::as_str)
    }

    /// Generate the whole file into a string.
    pub fn generate_string(&self) -> String {
        let mut out = StringEmitter::with_capacity(4096);
        self.generate(&mut out);
        out.trim_trailing_blank_lines();
        out.ensure_trailing_newline();
        out.output()
    }

    /// Generate the whole file.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn generate<E: Emitter>(&self, out: &mut E) {
        out.emit_line(0, HEADER);
        out.emit_newline();
        for record in &self.records {
            self.emit_record(out, record);
            out.emit_newline();
        }
        for (index, facade) in self.schema.facades().iter().enumerate() {
            self.emit_facade(out, &self.facade_names[index], facade);
            out.emit_newline();
        }
        tracing::debug!(
            records = self.records.len(),
            facades = self.facade_names.len(),
            "client source generated"
        );
    }

    fn emit_record<E: Emitter>(&self, out: &mut E, record: &CompiledRecordType) {
        let rt = &self.options.runtime_crate;
        let key = (record.handle(), record.version());
        let name = &self.type_names[&key];
        let types = &self.field_types[&key];

        if self.options.doc_comments {
            out.emit_line(0, &format!("/// `{}` record, schema version {}.", record.name(), record.version()));
        }
        out.emit_line(
            0,
            &format!("#[derive(Clone, Debug, Default, PartialEq, {rt}::serde::Serialize, {rt}::serde::Deserialize)]"),
        );
        out.emit_line(0, &format!("#[serde(crate = \"{rt}::serde\")]"));
        if record.fields().is_empty() {
            out.emit_line(0, &format!("pub struct {name} {{}}"));
        } else {
            out.emit_line(0, &format!("pub struct {name} {{"));
            for (index, ((host, wire), ty)) in record.names().pairs().zip(types).enumerate() {
                let lenient = if record.fields()[index].ty == FieldType::Primitive(Primitive::Bool) {
                    format!(", deserialize_with = \"{rt}::lenient_bool\"")
                } else {
                    String::new()
                };
                out.emit_line(
                    1,
                    &format!("#[serde(rename = {wire:?}, default, skip_serializing_if = \"Option::is_none\"{lenient})]"),
                );
                out.emit_line(1, &format!("pub {host}: Option<{ty}>,"));
            }
            out.emit_line(0, "}");
        }
        out.emit_newline();

        out.emit_line(0, &format!("impl {name} {{"));
        emit_table(out, "TO_WIRE", "Host identifier to wire name.", record.names().pairs());
        emit_table(
            out,
            "TO_HOST",
            "Wire name to host identifier.",
            record.names().pairs().map(|(host, wire)| (wire, host)),
        );
        out.emit_newline();
        if record.fields().len() > 7 {
            out.emit_line(1, "#[allow(clippy::too_many_arguments)]");
        }
        let args = record
            .names()
            .pairs()
            .zip(types)
            .map(|((host, _), ty)| format!("{host}: Option<{ty}>"))
            .collect::<Vec<_>>()
            .join(", ");
        let inits = record.parameters().collect::<Vec<_>>().join(", ");
        out.emit_line(1, &format!("pub fn new({args}) -> Self {{"));
        out.emit_line(2, &format!("Self {{ {inits} }}"));
        out.emit_line(1, "}");
        out.emit_line(0, "}");
    }

    fn emit_facade<E: Emitter>(&self, out: &mut E, name: &str, facade: &CompiledFacade) {
        let rt = &self.options.runtime_crate;
        if self.options.doc_comments {
            out.emit_line(0, &format!("/// `{}` facade, version {}.", facade.name(), facade.version()));
        }
        let tp = TRANSPORT_PARAM;
        out.emit_line(0, &format!("pub struct {name}<{tp}: {rt}::Transport> {{"));
        out.emit_line(1, &format!("transport: {tp},"));
        out.emit_line(0, "}");
        out.emit_newline();

        out.emit_line(0, &format!("impl<{tp}: {rt}::Transport> {name}<{tp}> {{"));
        out.emit_line(1, &format!("pub const NAME: &'static str = {:?};", facade.name()));
        out.emit_line(1, &format!("pub const VERSION: u32 = {};", facade.version().0));
        out.emit_newline();
        out.emit_line(1, &format!("pub fn connect(transport: {tp}) -> Self {{"));
        out.emit_line(2, "Self { transport }");
        out.emit_line(1, "}");
        out.emit_newline();
        out.emit_line(1, &format!("pub fn transport(&self) -> &{tp} {{"));
        out.emit_line(2, "&self.transport");
        out.emit_line(1, "}");

        let mut used: FxHashSet<String> = FACADE_METHODS.iter().map(|m| (*m).to_owned()).collect();
        for operation in facade.operations() {
            let method = claim(&mut used, host_identifier(&snake_case(operation.name())));
            out.emit_newline();
            self.emit_operation(out, &method, operation);
        }
        out.emit_line(0, "}");
    }

    fn emit_operation<E: Emitter>(&self, out: &mut E, method: &str, operation: &CompiledOperation) {
        let rt = &self.options.runtime_crate;
        let params = operation.params().and_then(|ty| {
            let key = (ty.handle(), ty.version());
            Some((ty, self.type_names.get(&key)?, self.field_types.get(&key)?))
        });
        let (result_type, decode) = self.result_mapping(operation);
        let error_type = operation
            .error_type()
            .and_then(|ty| self.type_name(ty.handle(), ty.version()))
            .map_or_else(|| format!("{rt}::serde_json::Value"), str::to_owned);

        if self.options.doc_comments {
            out.emit_line(1, &format!("/// Calls `{}.{}`.", operation.facade(), operation.name()));
            if let Some((ty, _, types)) = params {
                out.emit_line(1, "///");
                for ((host, _), field_ty) in ty.names().pairs().zip(types) {
                    out.emit_line(1, &format!("/// - `{host}`: `{field_ty}`"));
                }
            }
            out.emit_line(1, "///");
            out.emit_line(1, &format!("/// Returns `{result_type}`."));
        }

        let mut signature = vec!["&self".to_owned()];
        if let Some((ty, _, types)) = params {
            if types.len() > 6 {
                out.emit_line(1, "#[allow(clippy::too_many_arguments)]");
            }
            signature.extend(
                ty.names()
                    .pairs()
                    .zip(types)
                    .map(|((host, _), field_ty)| format!("{host}: Option<{field_ty}>")),
            );
        }
        out.emit_line(1, &format!("pub fn {method}("));
        for arg in &signature {
            out.emit_line(2, &format!("{arg},"));
        }
        out.emit_line(
            1,
            &format!(") -> Result<{rt}::Outcome<{result_type}, {error_type}>, {rt}::CallError> {{"),
        );

        let wire_params = match params {
            Some((ty, type_name, _)) => {
                let args = ty.parameters().collect::<Vec<_>>().join(", ");
                out.emit_line(2, &format!("let params = {type_name}::new({args});"));
                format!("{rt}::params_of(&params)?")
            }
            None => format!("{rt}::serde_json::Map::new()"),
        };
        out.emit_line(
            2,
            &format!(
                "let envelope = {rt}::Envelope::new(Self::NAME, {:?}, Self::VERSION, {wire_params});",
                operation.name()
            ),
        );
        out.emit_line(2, &format!("{rt}::dispatch(&self.transport, &envelope)?.{decode}"));
        out.emit_line(1, "}");
    }

    /// Success type and the `Reply` decode call producing it.
    fn result_mapping(&self, operation: &CompiledOperation) -> (String, String) {
        let rt = &self.options.runtime_crate;
        let version = operation.version();
        let raw = || (format!("{rt}::serde_json::Value"), "decode_raw()".to_owned());
        match operation.result_rule() {
            ResultRule::Raw => raw(),
            ResultRule::Record(handle) => match self.resolve_name(*handle, version) {
                Some(name) => (name.to_owned(), "decode_record()".to_owned()),
                None => raw(),
            },
            ResultRule::Variant(variant) => {
                if let FieldType::Ref(handle) = &variant.ty {
                    if let Some(name) = self.resolve_name(*handle, version) {
                        return (name.to_owned(), "decode_record()".to_owned());
                    }
                }
                (
                    format!("Option<{}>", self.rust_type(&variant.ty, version, false)),
                    format!("decode_member({:?})", variant.wire_name),
                )
            }
        }
    }

    fn resolve_name(&self, handle: TypeHandle, version: Version) -> Option<&str> {
        let record = self.schema.records().resolve(handle, Some(version))?;
        self.type_name(record.handle(), record.version())
    }

    fn rust_type(&self, ty: &FieldType, version: Version, boxed: bool) -> String {
        let rt = &self.options.runtime_crate;
        match ty {
            FieldType::Primitive(Primitive::String) => "String".to_owned(),
            FieldType::Primitive(Primitive::Int) => "i64".to_owned(),
            FieldType::Primitive(Primitive::Float) => "f64".to_owned(),
            FieldType::Primitive(Primitive::Bool) => "bool".to_owned(),
            FieldType::Primitive(Primitive::Any) => format!("{rt}::serde_json::Value"),
            FieldType::Ref(handle) => match self.resolve_name(*handle, version) {
                Some(name) if boxed => format!("Box<{name}>"),
                Some(name) => name.to_owned(),
                None => format!("{rt}::serde_json::Value"),
            },
            FieldType::Sequence(inner) => format!("Vec<{}>", self.rust_type(inner, version, false)),
            FieldType::Map(inner) => format!(
                "::std::collections::BTreeMap<String, {}>",
                self.rust_type(inner, version, false)
            ),
        }
    }

    /// Render every record's field types, boxing direct references that
    /// close a cycle.
    fn render_field_types(&self) -> FxHashMap<(TypeHandle, Version), Vec<String>> {
        let index: FxHashMap<(TypeHandle, Version), usize> = self
            .records
            .iter()
            .enumerate()
            .map(|(i, r)| ((r.handle(), r.version()), i))
            .collect();
        let direct_target = |record: &CompiledRecordType, ty: &FieldType| -> Option<usize> {
            let FieldType::Ref(handle) = ty else {
                return None;
            };
            let target = self.schema.records().resolve(*handle, Some(record.version()))?;
            index.get(&(target.handle(), target.version())).copied()
        };
        let edges: Vec<Vec<usize>> = self
            .records
            .iter()
            .map(|record| {
                record
                    .fields()
                    .iter()
                    .filter_map(|field| direct_target(record, &field.ty))
                    .collect()
            })
            .collect();

        self.records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let types = record
                    .fields()
                    .iter()
                    .map(|field| {
                        let boxed = direct_target(record, &field.ty).is_some_and(|t| reaches(&edges, t, i));
                        self.rust_type(&field.ty, record.version(), boxed)
                    })
                    .collect();
                ((record.handle(), record.version()), types)
            })
            .collect()
    }
}

/// Whether `to` is reachable from `from` along direct references.
fn reaches(edges: &[Vec<usize>], from: usize, to: usize) -> bool {
    let mut seen = vec![false; edges.len()];
    let mut stack = vec![from];
    while let Some(node) = stack.pop() {
        if node == to {
            return true;
        }
        if std::mem::replace(&mut seen[node], true) {
            continue;
        }
        stack.extend(edges[node].iter().copied());
    }
    false
}

/// Take `candidate`, or the first `_`-suffixed variant not taken yet.
fn claim(used: &mut FxHashSet<String>, mut candidate: String) -> String {
    while used.contains(&candidate) {
        candidate.push('_');
    }
    used.insert(candidate.clone());
    candidate
}

fn emit_table<'n, E: Emitter>(
    out: &mut E,
    name: &str,
    doc: &str,
    pairs: impl Iterator<Item = (&'n str, &'n str)>,
) {
    let entries: Vec<String> = pairs.map(|(from, to)| format!("({from:?}, {to:?}),")).collect();
    out.emit_line(1, &format!("/// {doc}"));
    if entries.is_empty() {
        out.emit_line(1, &format!("pub const {name}: &'static [(&'static str, &'static str)] = &[];"));
        return;
    }
    out.emit_line(1, &format!("pub const {name}: &'static [(&'static str, &'static str)] = &["));
    for entry in &entries {
        out.emit_line(2, entry);
    }
    out.emit_line(1, "];");
}

/// `FullStatus` → `full_status`, `APIHostPorts` → `api_host_ports`.
pub fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_uppercase() {
            out.push(c);
            continue;
        }
        let boundary = match i.checked_sub(1).map(|p| chars[p]) {
            Some(prev) if prev.is_ascii_lowercase() || prev.is_ascii_digit() => true,
            Some(prev) if prev.is_ascii_uppercase() => chars.get(i + 1).is_some_and(char::is_ascii_lowercase),
            _ => false,
        };
        if boundary {
            out.push('_');
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}
