//! Generation settings.

/// How generated client source is shaped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmitOptions {
    /// Emit doc comments listing each operation's arguments and result.
    pub doc_comments: bool,
    /// Path of the runtime crate in the generated code.
    pub runtime_crate: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        EmitOptions {
            doc_comments: true,
            runtime_crate: "facade_rt".to_owned(),
        }
    }
}
