//! Facade Compiler
//!
//! Driver over the facade crates: read an interface-definition document,
//! compile it into a [`CompiledSchema`], and either call it directly or
//! generate Rust client source from it.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Once;

use facade_emit::{EmitOptions, FileEmitter, RustGenerator};
use facade_eval::{CompiledSchema, ResultRule};
use facade_ir::FieldType;
use facade_schema::{SchemaError, SchemaSet};
use thiserror::Error;

pub use facade_emit;
pub use facade_eval;
pub use facade_ir;
pub use facade_rt;
pub use facade_schema;

/// Failure of a driver step.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("[{}] invalid interface document", .0.code())]
    Schema(#[from] SchemaError),
}

static TRACING_INIT: Once = Once::new();

/// Install the log subscriber, once, and only when `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

/// Compile an interface document held in memory.
pub fn compile_str(text: &str) -> Result<CompiledSchema, CompileError> {
    let set = SchemaSet::from_json(text)?;
    Ok(CompiledSchema::synthesize(set))
}

/// Read and compile an interface document.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn compile_path(path: &Path) -> Result<CompiledSchema, CompileError> {
    let text = std::fs::read_to_string(path).map_err(|source| CompileError::Read {
        path: path.to_owned(),
        source,
    })?;
    compile_str(&text)
}

/// Generate client source for `schema` into a string.
pub fn generate_string(schema: &CompiledSchema, options: &EmitOptions) -> String {
    RustGenerator::new(schema, options).generate_string()
}

/// Generate client source for `schema` into the file at `output`.
#[tracing::instrument(level = "debug", skip_all, fields(output = %output.display()))]
pub fn generate(schema: &CompiledSchema, options: &EmitOptions, output: &Path) -> Result<(), CompileError> {
    let write_error = |source: std::io::Error| CompileError::Write {
        path: output.to_owned(),
        source,
    };
    let mut emitter = FileEmitter::new(output).map_err(write_error)?;
    RustGenerator::new(schema, options).generate(&mut emitter);
    emitter.finish().map_err(write_error)?;
    tracing::info!("client source written");
    Ok(())
}

/// Human-readable listing of every facade and operation.
///
/// One header line per facade, then one line per operation with its
/// parameters and result type.
pub fn list(schema: &CompiledSchema) -> String {
    let handles = schema.set().handles();
    let mut out = String::new();
    for facade in schema.facades() {
        let _ = writeln!(out, "{} v{}", facade.name(), facade.version());
        for op in facade.operations() {
            let result = match op.result_rule() {
                ResultRule::Raw => "()".to_owned(),
                ResultRule::Record(handle) => handles.name_of(*handle).to_owned(),
                ResultRule::Variant(variant) => match &variant.ty {
                    FieldType::Ref(handle) => handles.name_of(*handle).to_owned(),
                    _ => variant.wire_name.clone(),
                },
            };
            let _ = writeln!(out, "    {}({}) -> {result}", op.name(), op.parameters().join(", "));
        }
    }
    out
}
