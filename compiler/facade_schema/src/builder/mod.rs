//! Type builder: compiles definition nodes into ordered field lists.
//!
//! # Rules
//!
//! - Object properties keep declaration order. A `$ref` property becomes a
//!   handle reference; an inline object with structure is flattened into
//!   the parent; anything else maps to a primitive.
//! - `patternProperties` supports only the catch-all `.*` key and compiles
//!   to a string-keyed map.
//! - Arrays compile to sequences, nesting once per `array` level.
//!
//! References only allocate handles. The builder never descends into a
//! referenced definition, which is what keeps self-referential graphs from
//! recursing.

use facade_ir::{FieldSpec, FieldType, KindRegistry, Primitive, TypeHandleRegistry};
use serde_json::{Map, Value};

use crate::{SchemaDocument, SchemaError};

/// The only `patternProperties` key the builder understands.
pub const CATCH_ALL_PATTERN: &str = ".*";

/// Compiles the definitions of one document.
pub struct TypeBuilder<'a> {
    doc: &'a SchemaDocument,
    handles: &'a mut TypeHandleRegistry,
}

impl<'a> TypeBuilder<'a> {
    pub fn new(doc: &'a SchemaDocument, handles: &'a mut TypeHandleRegistry) -> Self {
        TypeBuilder { doc, handles }
    }

    /// Compile every definition of the document into `kinds`.
    ///
    /// Definitions already registered for the document's version are
    /// skipped. Returns the number of definitions compiled.
    #[tracing::instrument(level = "debug", skip_all, fields(
        facade = self.doc.name(),
        version = self.doc.version().0,
    ))]
    pub fn build_definitions(&mut self, kinds: &mut KindRegistry) -> Result<usize, SchemaError> {
        let doc = self.doc;
        let Some(definitions) = doc.definitions()? else {
            return Ok(0);
        };

        let version = doc.version();
        let mut built = 0;
        for (name, node) in definitions {
            // Every definition gets a handle, referenced or not.
            self.handles.handle_for(name);
            if kinds.contains(name, version) {
                tracing::debug!(definition = %name, %version, "already compiled, skipping");
                continue;
            }
            let fields = self.build_definition(name, node)?;
            kinds.register(name, version, fields);
            built += 1;
        }

        tracing::debug!(built, "definitions compiled");
        Ok(built)
    }

    /// Compile one top-level definition.
    ///
    /// Aliases (`{"$ref": ...}` definitions) are followed; the resolved node
    /// must be an object.
    pub fn build_definition(&mut self, name: &str, node: &Value) -> Result<Vec<FieldSpec>, SchemaError> {
        let node = self.doc.deref(node, name)?;
        match node.get("type").and_then(Value::as_str) {
            Some("object") => {}
            None if node.contains_key("properties") || node.contains_key("patternProperties") => {}
            Some(kind) => {
                return Err(SchemaError::UnsupportedDefinition {
                    facade: self.doc.name().to_owned(),
                    definition: name.to_owned(),
                    kind: kind.to_owned(),
                });
            }
            None => {
                return Err(SchemaError::MissingKind {
                    facade: self.doc.name().to_owned(),
                    context: name.to_owned(),
                });
            }
        }
        self.build_object(node, name, name)
    }

    /// Compile an object node.
    ///
    /// `name` is the field name a `patternProperties` map is stored under;
    /// `context` is the dotted path used in diagnostics.
    fn build_object(
        &mut self,
        node: &Map<String, Value>,
        name: &str,
        context: &str,
    ) -> Result<Vec<FieldSpec>, SchemaError> {
        let mut fields = Vec::new();

        if let Some(props) = node.get("properties") {
            let props = self.object_keyword(props, context, "properties")?;
            for (prop_name, prop) in props {
                let prop_context = format!("{context}.{prop_name}");
                let prop = self.doc.as_object(prop, &prop_context)?;

                if let Some(target) = self.doc.ref_target(prop, &prop_context)? {
                    let handle = self.handles.handle_for(target);
                    tracing::trace!(field = %prop_name, ?handle, "reference");
                    fields.push(FieldSpec::new(prop_name.clone(), FieldType::Ref(handle)));
                    continue;
                }

                match self.kind(prop, &prop_context)? {
                    "array" => {
                        let ty = self.build_array(prop, &prop_context)?;
                        fields.push(FieldSpec::new(prop_name.clone(), ty));
                    }
                    "object" if has_structure(prop) => {
                        let nested = self.build_object(prop, prop_name, &prop_context)?;
                        tracing::trace!(field = %prop_name, spliced = nested.len(), "flattened inline object");
                        fields.extend(nested);
                    }
                    kind => {
                        let primitive = self.primitive(kind, &prop_context)?;
                        fields.push(FieldSpec::new(prop_name.clone(), primitive));
                    }
                }
            }
        }

        if let Some(patterns) = node.get("patternProperties") {
            let patterns = self.object_keyword(patterns, context, "patternProperties")?;
            fields.push(self.build_pattern(patterns, name, context)?);
        }

        Ok(fields)
    }

    /// Compile a `patternProperties` table to a single map field.
    fn build_pattern(
        &mut self,
        patterns: &Map<String, Value>,
        name: &str,
        context: &str,
    ) -> Result<FieldSpec, SchemaError> {
        let unsupported: Vec<String> = patterns
            .keys()
            .filter(|key| key.as_str() != CATCH_ALL_PATTERN)
            .cloned()
            .collect();
        let value = match patterns.get(CATCH_ALL_PATTERN) {
            Some(value) if unsupported.is_empty() => value,
            _ => {
                return Err(SchemaError::UnsupportedPattern {
                    facade: self.doc.name().to_owned(),
                    context: context.to_owned(),
                    patterns: patterns.keys().cloned().collect(),
                });
            }
        };

        let value_context = format!("{context}.{CATCH_ALL_PATTERN}");
        let value = self.doc.as_object(value, &value_context)?;
        let inner = if let Some(target) = self.doc.ref_target(value, &value_context)? {
            FieldType::Ref(self.handles.handle_for(target))
        } else {
            match self.kind(value, &value_context)? {
                "array" => self.build_array(value, &value_context)?,
                kind => self.primitive(kind, &value_context)?.into(),
            }
        };
        Ok(FieldSpec::new(name, FieldType::map(inner)))
    }

    /// Compile an array node to a sequence type.
    fn build_array(&mut self, node: &Map<String, Value>, context: &str) -> Result<FieldType, SchemaError> {
        let Some(items) = node.get("items") else {
            return Ok(FieldType::sequence(Primitive::Any.into()));
        };
        let items_context = format!("{context}[]");
        let items = self.doc.as_object(items, &items_context)?;

        if let Some(target) = self.doc.ref_target(items, &items_context)? {
            return Ok(FieldType::sequence(FieldType::Ref(self.handles.handle_for(target))));
        }
        let inner = match self.kind(items, &items_context)? {
            "array" => self.build_array(items, &items_context)?,
            kind => self.primitive(kind, &items_context)?.into(),
        };
        Ok(FieldType::sequence(inner))
    }

    /// The `type` keyword of a node.
    fn kind<'n>(&self, node: &'n Map<String, Value>, context: &str) -> Result<&'n str, SchemaError> {
        match node.get("type") {
            Some(Value::String(kind)) => Ok(kind),
            Some(other) => Err(SchemaError::UnknownKind {
                facade: self.doc.name().to_owned(),
                context: context.to_owned(),
                kind: other.to_string(),
            }),
            None => Err(SchemaError::MissingKind {
                facade: self.doc.name().to_owned(),
                context: context.to_owned(),
            }),
        }
    }

    fn primitive(&self, kind: &str, context: &str) -> Result<Primitive, SchemaError> {
        Primitive::from_kind(kind).ok_or_else(|| SchemaError::UnknownKind {
            facade: self.doc.name().to_owned(),
            context: context.to_owned(),
            kind: kind.to_owned(),
        })
    }

    fn object_keyword<'n>(
        &self,
        value: &'n Value,
        context: &str,
        keyword: &str,
    ) -> Result<&'n Map<String, Value>, SchemaError> {
        value
            .as_object()
            .ok_or_else(|| self.doc.malformed(context, &format!("`{keyword}` must be an object")))
    }
}

/// An inline object whose fields can be spliced into its parent.
fn has_structure(node: &Map<String, Value>) -> bool {
    node.contains_key("properties") || node.contains_key("patternProperties")
}
