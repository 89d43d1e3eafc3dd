//! Facade IR - shared type model for the facade compiler
//!
//! This crate holds the data every later phase agrees on:
//! - `TypeHandle` / `TypeHandleRegistry` for forward references
//! - `KindRegistry` for compiled field lists keyed by `(name, version)`
//! - `FieldSpec` / `FieldType` / `Primitive` describing record fields
//! - The wire-name ↔ host-identifier naming rule
//!
//! # Design Philosophy
//!
//! - **Handles before bodies**: a name gets a stable slot index the first
//!   time it is referenced; bodies are filled in later.
//! - **Explicit versions**: nothing relies on insertion order to pick the
//!   "current" definition of a type.

mod field;
mod handle;
mod kind_registry;
pub mod naming;

pub use field::{FieldSpec, FieldType, Primitive, Version};
pub use handle::{reference_name, TypeHandle, TypeHandleRegistry, DEFINITIONS_PREFIX};
pub use kind_registry::{default_version, KindRegistry};
pub use naming::{host_identifier, type_identifier, FieldNames};
