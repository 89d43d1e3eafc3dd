//! Facade Schema - interface documents to registries and facade specs
//!
//! ```text
//! JSON document
//!     │  parse_descriptors()
//!     ▼
//! SchemaDocument (one per facade)
//!     │  TypeBuilder::build_definitions()
//!     ▼
//! TypeHandleRegistry + KindRegistry
//!     │  build_facade()
//!     ▼
//! FacadeSpec / OperationSpec
//! ```
//!
//! `SchemaSet::build` runs the whole pipeline. Any `SchemaError` aborts it.

mod builder;
mod document;
mod error;
mod facade;
mod set;

pub use builder::{TypeBuilder, CATCH_ALL_PATTERN};
pub use document::{parse_descriptors, FacadeDescriptor, SchemaDocument};
pub use error::SchemaError;
pub use facade::{build_facade, FacadeSpec, OperationSpec, ERROR_VARIANT};
pub use set::SchemaSet;
