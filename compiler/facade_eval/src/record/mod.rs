//! Record type synthesis.
//!
//! Every handle of the schema set gets a slot; every version registered for
//! the handle's name becomes a [`CompiledRecordType`] in that slot. Slots
//! are allocated before any body is filled, so references between records
//! (including cycles) are plain handles resolved at use time.

use std::collections::BTreeMap;
use std::sync::Arc;

use facade_ir::{default_version, FieldNames, FieldSpec, KindRegistry, TypeHandle, TypeHandleRegistry, Version};

/// A constructible record type materialized from one `(name, version)`
/// definition.
#[derive(Debug)]
pub struct CompiledRecordType {
    name: String,
    handle: TypeHandle,
    version: Version,
    fields: Vec<FieldSpec>,
    names: FieldNames,
}

impl CompiledRecordType {
    pub fn new(name: impl Into<String>, handle: TypeHandle, version: Version, fields: Vec<FieldSpec>) -> Self {
        let names = FieldNames::assign(fields.iter().map(|f| f.wire_name.as_str()));
        CompiledRecordType {
            name: name.into(),
            handle,
            version,
            fields,
            names,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handle(&self) -> TypeHandle {
        self.handle
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Host ↔ wire translation tables.
    pub fn names(&self) -> &FieldNames {
        &self.names
    }

    /// Host identifiers in field order.
    pub fn parameters(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.pairs().map(|(host, _)| host)
    }
}

#[derive(Debug, Default)]
struct Slot {
    versions: BTreeMap<Version, Arc<CompiledRecordType>>,
    default: Option<Version>,
}

/// All record types of a schema set, indexed by handle.
#[derive(Debug, Default)]
pub struct RecordTable {
    slots: Vec<Slot>,
}

impl RecordTable {
    /// Materialize a record type for every `(handle, version)`.
    #[tracing::instrument(level = "debug", skip_all, fields(handles = handles.len()))]
    pub fn synthesize(handles: &TypeHandleRegistry, kinds: &KindRegistry) -> Self {
        let mut slots: Vec<Slot> = std::iter::repeat_with(Slot::default).take(handles.len()).collect();

        for (handle, name) in handles.iter() {
            let slot = &mut slots[handle.raw() as usize];
            for version in kinds.versions(name) {
                let Some(fields) = kinds.lookup(name, Some(version)) else {
                    continue;
                };
                let record = CompiledRecordType::new(name, handle, version, fields.to_vec());
                tracing::trace!(record = name, %version, fields = fields.len(), "record synthesized");
                slot.versions.insert(version, Arc::new(record));
            }
            slot.default = default_version(slot.versions.keys().copied());
            if slot.default.is_none() {
                tracing::warn!(name, "handle has no definition; values of this type stay untyped");
            }
        }

        RecordTable { slots }
    }

    /// Record for `handle` at `version`, falling back to the default
    /// version of the type.
    pub fn resolve(&self, handle: TypeHandle, version: Option<Version>) -> Option<&Arc<CompiledRecordType>> {
        let slot = self.slots.get(handle.raw() as usize)?;
        version
            .and_then(|v| slot.versions.get(&v))
            .or_else(|| slot.default.and_then(|v| slot.versions.get(&v)))
    }

    /// Versions synthesized for `handle`, ascending.
    pub fn versions(&self, handle: TypeHandle) -> Vec<Version> {
        self.slots
            .get(handle.raw() as usize)
            .map(|slot| slot.versions.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Default version of `handle`, if it has any definition.
    pub fn default_version(&self, handle: TypeHandle) -> Option<Version> {
        self.slots.get(handle.raw() as usize).and_then(|slot| slot.default)
    }

    /// Every synthesized record, by handle then version.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<CompiledRecordType>> + '_ {
        self.slots.iter().flat_map(|slot| slot.versions.values())
    }

    /// Number of synthesized records.
    pub fn len(&self) -> usize {
        self.slots.iter().map(|slot| slot.versions.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests;
