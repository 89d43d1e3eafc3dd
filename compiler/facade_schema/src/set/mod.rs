//! The compiled schema set: registries plus facade specs for a whole
//! interface document.

use facade_ir::{KindRegistry, TypeHandleRegistry, Version};

use crate::facade::build_facade;
use crate::{parse_descriptors, FacadeDescriptor, FacadeSpec, SchemaDocument, SchemaError, TypeBuilder};

/// Registries and facades built from one document set.
///
/// Built once, read-only afterwards.
#[derive(Clone, Debug, Default)]
pub struct SchemaSet {
    handles: TypeHandleRegistry,
    kinds: KindRegistry,
    facades: Vec<FacadeSpec>,
}

impl SchemaSet {
    /// Parse and compile an interface document.
    pub fn from_json(text: &str) -> Result<Self, SchemaError> {
        Self::build(parse_descriptors(text)?)
    }

    /// Compile a list of facade descriptors.
    ///
    /// All definitions of all documents are compiled before any facade is
    /// extracted, so operations can name types from any document. On error
    /// nothing is returned.
    #[tracing::instrument(level = "debug", skip_all, fields(documents = descriptors.len()))]
    pub fn build(descriptors: Vec<FacadeDescriptor>) -> Result<Self, SchemaError> {
        let docs: Vec<SchemaDocument> = descriptors.into_iter().map(SchemaDocument::new).collect();

        let mut handles = TypeHandleRegistry::new();
        let mut kinds = KindRegistry::new();
        for doc in &docs {
            TypeBuilder::new(doc, &mut handles).build_definitions(&mut kinds)?;
        }

        let mut facades = Vec::with_capacity(docs.len());
        for doc in &docs {
            facades.push(build_facade(doc, &mut handles, &kinds)?);
        }

        tracing::debug!(
            types = handles.len(),
            facades = facades.len(),
            "schema set compiled"
        );
        Ok(SchemaSet {
            handles,
            kinds,
            facades,
        })
    }

    pub fn handles(&self) -> &TypeHandleRegistry {
        &self.handles
    }

    pub fn kinds(&self) -> &KindRegistry {
        &self.kinds
    }

    /// Facades in document order.
    pub fn facades(&self) -> &[FacadeSpec] {
        &self.facades
    }

    /// Find a facade by name; without a version the highest one is returned.
    pub fn facade(&self, name: &str, version: Option<Version>) -> Option<&FacadeSpec> {
        let mut candidates = self.facades.iter().filter(|f| f.name == name);
        match version {
            Some(v) => candidates.find(|f| f.version == v),
            None => candidates.max_by_key(|f| f.version),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests;
