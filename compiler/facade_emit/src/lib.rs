//! Facade Emit - Rust client source for compiled schemas
//!
//! [`RustGenerator`] walks a [`facade_eval::CompiledSchema`] and writes
//! record structs and facade clients through an [`Emitter`]. The output
//! depends only on the runtime crate named in [`EmitOptions`].

mod emitter;
mod generator;
mod options;

pub use emitter::{Emitter, FileEmitter, StringEmitter};
pub use generator::{snake_case, RustGenerator, HEADER};
pub use options::EmitOptions;

use facade_eval::CompiledSchema;

/// Generate client source for `schema` into a string.
pub fn generate_rust(schema: &CompiledSchema, options: &EmitOptions) -> String {
    RustGenerator::new(schema, options).generate_string()
}
