//! Field and type model shared by every compilation phase.

use std::fmt;

use crate::TypeHandle;

/// Schema version of a facade (and of the definitions it carries).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Version(pub u32);

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Version {
    fn from(v: u32) -> Self {
        Version(v)
    }
}

/// Host primitive a schema kind maps to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Primitive {
    /// `string`
    String,
    /// `integer`
    Int,
    /// `float` or `number`
    Float,
    /// `boolean`
    Bool,
    /// `object` without further structure.
    Any,
}

impl Primitive {
    /// Map a schema `type` keyword to a primitive.
    ///
    /// Returns `None` for `array` (handled structurally) and for unknown kinds.
    pub fn from_kind(kind: &str) -> Option<Self> {
        match kind {
            "string" => Some(Primitive::String),
            "integer" => Some(Primitive::Int),
            "float" | "number" => Some(Primitive::Float),
            "boolean" => Some(Primitive::Bool),
            "object" => Some(Primitive::Any),
            _ => None,
        }
    }

    /// Human-readable name used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Primitive::String => "string",
            Primitive::Int => "int",
            Primitive::Float => "float",
            Primitive::Bool => "bool",
            Primitive::Any => "any",
        }
    }
}

/// Type of a single record field.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum FieldType {
    /// A host primitive.
    Primitive(Primitive),
    /// Reference to another named record.
    Ref(TypeHandle),
    /// Homogeneous sequence.
    Sequence(Box<FieldType>),
    /// Map from string keys to values of the inner type.
    Map(Box<FieldType>),
}

impl FieldType {
    pub fn sequence(inner: FieldType) -> Self {
        FieldType::Sequence(Box::new(inner))
    }

    pub fn map(inner: FieldType) -> Self {
        FieldType::Map(Box::new(inner))
    }

    /// The referenced handle, if this is a direct reference.
    pub fn as_ref_handle(&self) -> Option<TypeHandle> {
        match self {
            FieldType::Ref(handle) => Some(*handle),
            _ => None,
        }
    }

    /// Every handle mentioned anywhere inside this type.
    pub fn handles(&self) -> Vec<TypeHandle> {
        let mut out = Vec::new();
        self.collect_handles(&mut out);
        out
    }

    fn collect_handles(&self, out: &mut Vec<TypeHandle>) {
        match self {
            FieldType::Primitive(_) => {}
            FieldType::Ref(handle) => out.push(*handle),
            FieldType::Sequence(inner) | FieldType::Map(inner) => inner.collect_handles(out),
        }
    }
}

impl From<Primitive> for FieldType {
    fn from(p: Primitive) -> Self {
        FieldType::Primitive(p)
    }
}

/// One field of a compiled definition: wire name plus type.
///
/// Field order inside a definition is declaration order and drives the
/// parameter order of generated stubs.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FieldSpec {
    pub wire_name: String,
    pub ty: FieldType,
}

impl FieldSpec {
    pub fn new(wire_name: impl Into<String>, ty: impl Into<FieldType>) -> Self {
        FieldSpec {
            wire_name: wire_name.into(),
            ty: ty.into(),
        }
    }
}
