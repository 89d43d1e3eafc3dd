//! Interface-document model.
//!
//! An interface document is a JSON array of facade descriptors:
//!
//! ```text
//! [{"Name": "Pinger", "Version": 1, "Schema": {"definitions": {..}, "properties": {..}}}]
//! ```
//!
//! `SchemaDocument` wraps one descriptor and answers the questions the type
//! builder asks: where are the definitions, what does a `$ref` point at.

use facade_ir::{reference_name, Version, DEFINITIONS_PREFIX};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::SchemaError;

/// Longest chain of definition aliases followed before giving up.
const MAX_ALIAS_DEPTH: usize = 32;

/// One entry of the interface document as it appears on disk.
#[derive(Clone, Debug, Deserialize)]
pub struct FacadeDescriptor {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Version")]
    pub version: u32,
    #[serde(rename = "Schema")]
    pub schema: Map<String, Value>,
}

/// Parse an interface document into its facade descriptors.
pub fn parse_descriptors(text: &str) -> Result<Vec<FacadeDescriptor>, SchemaError> {
    Ok(serde_json::from_str(text)?)
}

/// One facade's schema, bound to its name and version.
#[derive(Clone, Debug)]
pub struct SchemaDocument {
    name: String,
    version: Version,
    schema: Map<String, Value>,
}

impl SchemaDocument {
    pub fn new(descriptor: FacadeDescriptor) -> Self {
        SchemaDocument {
            name: descriptor.name,
            version: Version(descriptor.version),
            schema: descriptor.schema,
        }
    }

    /// Facade name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Facade version; definitions of this document are registered under it.
    pub fn version(&self) -> Version {
        self.version
    }

    /// The raw schema object.
    pub fn schema(&self) -> &Map<String, Value> {
        &self.schema
    }

    /// The `definitions` table, if the document has one.
    pub fn definitions(&self) -> Result<Option<&Map<String, Value>>, SchemaError> {
        self.keyword_object("definitions")
    }

    /// The facade-level `properties` table (one entry per operation).
    pub fn operations(&self) -> Result<Option<&Map<String, Value>>, SchemaError> {
        self.keyword_object("properties")
    }

    fn keyword_object(&self, keyword: &str) -> Result<Option<&Map<String, Value>>, SchemaError> {
        match self.schema.get(keyword) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map)),
            Some(_) => Err(self.malformed(keyword, "expected an object")),
        }
    }

    /// Look up the definition a `$ref` (or bare name) points at.
    pub fn resolve_definition(&self, reference: &str) -> Option<&Value> {
        if !reference.starts_with(DEFINITIONS_PREFIX) && reference.contains('#') {
            return None;
        }
        self.schema
            .get("definitions")
            .and_then(Value::as_object)
            .and_then(|defs| defs.get(reference_name(reference)))
    }

    /// Read the `$ref` of `node`, checking that it resolves.
    ///
    /// Returns `Ok(None)` when the node is not a reference.
    pub fn ref_target<'n>(
        &self,
        node: &'n Map<String, Value>,
        context: &str,
    ) -> Result<Option<&'n str>, SchemaError> {
        let Some(reference) = node.get("$ref") else {
            return Ok(None);
        };
        let Some(reference) = reference.as_str() else {
            return Err(self.malformed(context, "`$ref` must be a string"));
        };
        if self.resolve_definition(reference).is_none() {
            return Err(SchemaError::UnresolvedRef {
                facade: self.name.clone(),
                context: context.to_owned(),
                reference: reference.to_owned(),
            });
        }
        Ok(Some(reference))
    }

    /// Follow `$ref` indirection until a concrete node is reached.
    pub fn deref<'a>(
        &'a self,
        node: &'a Value,
        context: &str,
    ) -> Result<&'a Map<String, Value>, SchemaError> {
        let mut current = self.as_object(node, context)?;
        for _ in 0..MAX_ALIAS_DEPTH {
            let Some(target) = self.ref_target(current, context)? else {
                return Ok(current);
            };
            // ref_target already checked the target exists
            let Some(next) = self.resolve_definition(target) else {
                break;
            };
            current = self.as_object(next, context)?;
        }
        Err(self.malformed(context, "definition aliases do not terminate"))
    }

    /// View `node` as a JSON object or fail with a `Malformed` error.
    pub fn as_object<'a>(
        &self,
        node: &'a Value,
        context: &str,
    ) -> Result<&'a Map<String, Value>, SchemaError> {
        node.as_object()
            .ok_or_else(|| self.malformed(context, "expected a schema object"))
    }

    pub(crate) fn malformed(&self, context: &str, message: &str) -> SchemaError {
        SchemaError::Malformed {
            facade: self.name.clone(),
            context: context.to_owned(),
            message: message.to_owned(),
        }
    }
}
