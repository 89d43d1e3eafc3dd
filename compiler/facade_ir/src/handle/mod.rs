//! Forward-reference handles for named schema types.
//!
//! A `TypeHandle` is a stable slot index handed out the first time a type
//! name is mentioned, long before (or without) its body being compiled.
//! Record bodies are filled in a later pass, so mutually recursive
//! definitions only ever need each other's handle.

use std::fmt;

use rustc_hash::FxHashMap;

/// Prefix of a local `$ref` target inside an interface document.
pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Opaque handle standing for a named type.
///
/// Handles compare by index. Only the registry that produced a handle can
/// resolve it back to a name.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct TypeHandle(u32);

impl TypeHandle {
    /// Get the raw slot index.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHandle({})", self.0)
    }
}

/// Normalize a `$ref` value (or a bare name) to the referenced type name.
///
/// `#/definitions/Foo` and `Foo` both name `Foo`.
pub fn reference_name(reference: &str) -> &str {
    match reference.strip_prefix(DEFINITIONS_PREFIX) {
        Some(rest) => rest.rsplit('/').next().unwrap_or(rest),
        None => reference,
    }
}

/// Bidirectional mapping between type names and handles.
///
/// # Invariants
///
/// - Exactly one handle per (normalized) name.
/// - `name_of(handle_for(n)) == reference_name(n)`.
/// - Handles are never removed; the registry lives as long as the compiled
///   schema set.
#[derive(Clone, Debug, Default)]
pub struct TypeHandleRegistry {
    by_name: FxHashMap<String, TypeHandle>,
    names: Vec<String>,
}

impl TypeHandleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the handle for `name`, allocating a new slot on first sight.
    ///
    /// Accepts either a bare name or a `#/definitions/...` reference.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` distinct names are registered.
    pub fn handle_for(&mut self, name: &str) -> TypeHandle {
        let name = reference_name(name);
        if let Some(&handle) = self.by_name.get(name) {
            return handle;
        }

        let slot = u32::try_from(self.names.len())
            .unwrap_or_else(|_| panic!("type handle registry exceeded {} slots", u32::MAX));
        let handle = TypeHandle(slot);
        self.names.push(name.to_owned());
        self.by_name.insert(name.to_owned(), handle);
        handle
    }

    /// Look up an existing handle without allocating.
    pub fn get(&self, name: &str) -> Option<TypeHandle> {
        self.by_name.get(reference_name(name)).copied()
    }

    /// Resolve a handle back to its name.
    ///
    /// # Panics
    /// Panics if `handle` was not produced by this registry.
    pub fn name_of(&self, handle: TypeHandle) -> &str {
        match self.try_name_of(handle) {
            Some(name) => name,
            None => panic!("{handle:?} was not produced by this registry"),
        }
    }

    /// Resolve a handle back to its name, or `None` for a foreign handle.
    pub fn try_name_of(&self, handle: TypeHandle) -> Option<&str> {
        self.names.get(handle.index()).map(String::as_str)
    }

    /// Iterate `(handle, name)` pairs in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeHandle, &str)> + '_ {
        (0u32..)
            .zip(&self.names)
            .map(|(slot, name)| (TypeHandle(slot), name.as_str()))
    }

    /// Number of allocated handles.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if no handle has been allocated.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
