//! Wire-name to host-identifier translation.
//!
//! Wire names come straight from the interface document (`model-tag`,
//! `Results`, `type`). Host identifiers must be valid Rust field names that
//! never shadow a keyword or a primitive/prelude name. The rule is a pure
//! function over fixed tables, so it gives the same answer at generation
//! time and at run time.

use rustc_hash::FxHashMap;

/// Rust keywords: strict, reserved for future use, and weak.
const RUST_KEYWORDS: &[&str] = &[
    // strict
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while",
    // reserved
    "abstract", "become", "box", "do", "final", "gen", "macro", "override", "priv", "try",
    "typeof", "unsized", "virtual", "yield",
    // weak
    "macro_rules", "raw", "safe", "union",
];

/// Lower-case built-in names: primitive types, prelude functions, crate roots.
const RUST_BUILTINS: &[&str] = &[
    "bool", "char", "str", "u8", "u16", "u32", "u64", "u128", "usize", "i8", "i16", "i32",
    "i64", "i128", "isize", "f32", "f64", "drop", "std", "core", "alloc", "_",
];

/// Upper-case prelude names a generated type must not shadow.
const RUST_PRELUDE_TYPES: &[&str] = &[
    "Self", "Option", "Some", "None", "Result", "Ok", "Err", "Vec", "String", "Box", "Copy",
    "Clone", "Send", "Sync", "Sized", "Unpin", "Default", "Drop", "Eq", "PartialEq", "Ord",
    "PartialOrd", "Fn", "FnMut", "FnOnce", "Iterator", "IntoIterator", "Extend", "ToString",
    "ToOwned", "From", "Into", "TryFrom", "TryInto", "AsRef", "AsMut",
];

/// Check whether `ident` needs the disambiguating suffix.
pub fn is_reserved(ident: &str) -> bool {
    RUST_KEYWORDS.contains(&ident) || RUST_BUILTINS.contains(&ident)
}

/// Replace every character that cannot appear in an identifier by `_` and
/// make sure the result does not start with a digit.
fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 1);
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c);
        } else {
            out.push('_');
        }
    }
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Convert a wire field name to a host identifier.
///
/// Separators become `_`, the result is lower-cased, and a trailing `_` is
/// appended when it collides with a keyword or built-in name.
pub fn host_identifier(wire: &str) -> String {
    let mut ident = sanitize(wire).to_ascii_lowercase();
    if is_reserved(&ident) {
        ident.push('_');
    }
    ident
}

/// Convert a definition or facade name to a host type identifier.
///
/// Case is preserved; prelude names and keywords get a trailing `_`.
pub fn type_identifier(name: &str) -> String {
    let mut ident = sanitize(name);
    if RUST_PRELUDE_TYPES.contains(&ident.as_str()) || RUST_KEYWORDS.contains(&ident.as_str()) {
        ident.push('_');
    }
    ident
}

/// Per-record translation tables between wire names and host identifiers.
///
/// Built once from the record's ordered wire names. Two wire names that
/// normalize to the same identifier are kept apart by extra `_` suffixes on
/// the later one, so both directions stay lossless.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldNames {
    host: Vec<String>,
    wire: Vec<String>,
    by_host: FxHashMap<String, usize>,
    by_wire: FxHashMap<String, usize>,
}

impl FieldNames {
    /// Assign host identifiers to `wire_names`, in order.
    pub fn assign<'a, I>(wire_names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut names = FieldNames::default();
        for wire in wire_names {
            let mut host = host_identifier(wire);
            while names.by_host.contains_key(&host) {
                host.push('_');
            }
            let index = names.host.len();
            names.by_host.insert(host.clone(), index);
            names.by_wire.entry(wire.to_owned()).or_insert(index);
            names.host.push(host);
            names.wire.push(wire.to_owned());
        }
        names
    }

    /// Host identifier → wire name.
    pub fn to_wire(&self, host: &str) -> Option<&str> {
        self.by_host.get(host).map(|&i| self.wire[i].as_str())
    }

    /// Wire name → host identifier.
    pub fn to_host(&self, wire: &str) -> Option<&str> {
        self.by_wire.get(wire).map(|&i| self.host[i].as_str())
    }

    /// Field position of a host identifier.
    pub fn host_index(&self, host: &str) -> Option<usize> {
        self.by_host.get(host).copied()
    }

    /// Field position of a wire name.
    pub fn wire_index(&self, wire: &str) -> Option<usize> {
        self.by_wire.get(wire).copied()
    }

    /// Host identifier of the field at `index`.
    pub fn host(&self, index: usize) -> &str {
        &self.host[index]
    }

    /// Wire name of the field at `index`.
    pub fn wire(&self, index: usize) -> &str {
        &self.wire[index]
    }

    /// `(host, wire)` pairs in field order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.host
            .iter()
            .zip(&self.wire)
            .map(|(h, w)| (h.as_str(), w.as_str()))
    }

    pub fn len(&self) -> usize {
        self.host.len()
    }

    pub fn is_empty(&self) -> bool {
        self.host.is_empty()
    }
}

#[cfg(test)]
mod tests;
