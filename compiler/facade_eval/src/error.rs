//! Errors raised by dynamic stubs and record construction.

use facade_ir::Version;
use facade_rt::TransportError;
use thiserror::Error;

/// Per-call failure of a dynamic stub.
///
/// None of these mutate compiled state; the same stub can be called again.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("{target} takes at most {expected} argument(s), got {found}")]
    Arity {
        target: String,
        expected: usize,
        found: usize,
    },
    #[error("{target} has no parameter or field named `{name}`")]
    UnknownArgument { target: String, name: String },
    #[error("facade {facade} has no operation `{operation}`")]
    UnknownOperation { facade: String, operation: String },
    #[error("no facade {facade}{}", version.map(|v| format!(" at version {v}")).unwrap_or_default())]
    UnknownFacade {
        facade: String,
        version: Option<Version>,
    },
    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    Mismatch {
        path: String,
        expected: String,
        found: String,
    },
    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub(crate) fn mismatch(path: &str, expected: impl Into<String>, found: impl Into<String>) -> EvalError {
    EvalError::Mismatch {
        path: path.to_owned(),
        expected: expected.into(),
        found: found.into(),
    }
}
