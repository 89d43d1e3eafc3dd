//! Schema resolution errors.
//!
//! Every variant is fatal for the document set being compiled: no facade
//! from a set that produced a `SchemaError` is handed out.

use thiserror::Error;

/// Failure to turn an interface document into definitions and facades.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The input is not valid JSON or not an array of facade descriptors.
    #[error("malformed interface document: {0}")]
    Document(#[from] serde_json::Error),

    /// A `$ref` does not name a local definition.
    #[error("facade `{facade}`: cannot resolve reference `{reference}` at `{context}`")]
    UnresolvedRef {
        facade: String,
        context: String,
        reference: String,
    },

    /// `patternProperties` uses a key pattern other than the catch-all.
    #[error(
        "facade `{facade}`: `{context}` uses patternProperties {patterns:?}; only \".*\" is supported"
    )]
    UnsupportedPattern {
        facade: String,
        context: String,
        patterns: Vec<String>,
    },

    /// A node declares a `type` this compiler does not know.
    #[error("facade `{facade}`: `{context}` declares unknown type kind `{kind}`")]
    UnknownKind {
        facade: String,
        context: String,
        kind: String,
    },

    /// A node has neither a `type` nor a `$ref`.
    #[error("facade `{facade}`: `{context}` has neither a type nor a $ref")]
    MissingKind { facade: String, context: String },

    /// A top-level definition that cannot become a record.
    #[error("facade `{facade}`: definition `{definition}` is `{kind}`; only objects become records")]
    UnsupportedDefinition {
        facade: String,
        definition: String,
        kind: String,
    },

    /// Structurally wrong schema content (wrong JSON shape for a keyword).
    #[error("facade `{facade}`: {message} at `{context}`")]
    Malformed {
        facade: String,
        context: String,
        message: String,
    },
}

impl SchemaError {
    /// Stable diagnostic code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::Document(_) => "E1000",
            SchemaError::UnresolvedRef { .. } => "E1001",
            SchemaError::UnsupportedPattern { .. } => "E1002",
            SchemaError::UnknownKind { .. } => "E1003",
            SchemaError::MissingKind { .. } => "E1004",
            SchemaError::UnsupportedDefinition { .. } => "E1005",
            SchemaError::Malformed { .. } => "E1006",
        }
    }
}
