//! Versioned registry of compiled definitions.
//!
//! Interface documents evolve, and one process may talk to several
//! controller API versions at once, so definitions are keyed by
//! `(name, version)` rather than by name alone.
//!
//! # Design
//!
//! - `FxHashMap` from name to a `BTreeMap` of versions
//! - Default resolution goes through [`default_version`], never through
//!   map iteration order

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use crate::{FieldSpec, Version};

/// Pick the version used when a caller does not ask for one.
///
/// The highest registered version wins.
pub fn default_version<I>(versions: I) -> Option<Version>
where
    I: IntoIterator<Item = Version>,
{
    versions.into_iter().max()
}

/// Registry of field lists keyed by `(name, version)`.
#[derive(Clone, Debug, Default)]
pub struct KindRegistry {
    kinds: FxHashMap<String, BTreeMap<Version, Vec<FieldSpec>>>,
}

impl KindRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or overwrite) the field list for `(name, version)`.
    ///
    /// Other versions of the same name are left untouched.
    pub fn register(&mut self, name: &str, version: Version, fields: Vec<FieldSpec>) {
        self.kinds
            .entry(name.to_owned())
            .or_default()
            .insert(version, fields);
    }

    /// Look up the fields of `name`.
    ///
    /// With `version == None` the [`default_version`] is used. Returns `None`
    /// when the name is unknown or the requested version is not registered.
    pub fn lookup(&self, name: &str, version: Option<Version>) -> Option<&[FieldSpec]> {
        let versions = self.kinds.get(name)?;
        let version = match version {
            Some(v) => v,
            None => default_version(versions.keys().copied())?,
        };
        versions.get(&version).map(Vec::as_slice)
    }

    /// Check whether `(name, version)` has been registered.
    pub fn contains(&self, name: &str, version: Version) -> bool {
        self.kinds
            .get(name)
            .is_some_and(|versions| versions.contains_key(&version))
    }

    /// Registered versions of `name`, ascending.
    pub fn versions(&self, name: &str) -> Vec<Version> {
        self.kinds
            .get(name)
            .map(|versions| versions.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Resolve the version to use for `name` when `requested` is preferred.
    ///
    /// Returns `requested` if it is registered, otherwise the default version.
    pub fn resolve_version(&self, name: &str, requested: Version) -> Option<Version> {
        if self.contains(name, requested) {
            return Some(requested);
        }
        default_version(self.versions(name))
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Check if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
