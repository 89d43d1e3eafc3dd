//! Facade and operation specs extracted from a document's `properties`.

use std::collections::BTreeMap;

use facade_ir::{FieldSpec, KindRegistry, TypeHandle, TypeHandleRegistry, Version};
use serde_json::{Map, Value};

use crate::{SchemaDocument, SchemaError};

/// Name of the reserved error variant / definition.
pub const ERROR_VARIANT: &str = "Error";

/// One remote operation of a facade.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationSpec {
    pub name: String,
    /// The `Params` record, if the operation takes arguments.
    pub params: Option<TypeHandle>,
    /// The `Result` record, if the operation returns anything.
    pub result: Option<TypeHandle>,
    /// Fields of the `Result` record, in declaration order.
    pub result_variants: Vec<FieldSpec>,
}

impl OperationSpec {
    /// Whether result resolution has to choose between several variants.
    pub fn is_multi_variant(&self) -> bool {
        self.result_variants.len() > 1
    }

    /// The variant a successful reply is decoded into when there are
    /// several: the first one not named `Error`.
    pub fn success_variant(&self) -> Option<&FieldSpec> {
        self.result_variants
            .iter()
            .find(|variant| variant.wire_name != ERROR_VARIANT)
    }
}

/// A named, versioned collection of operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FacadeSpec {
    pub name: String,
    pub version: Version,
    /// Operations by name, iterated in sorted order.
    pub operations: BTreeMap<String, OperationSpec>,
}

/// Extract the facade spec of `doc`.
///
/// Must run after every document's definitions are in `kinds`, since result
/// variants are read from the registry.
#[tracing::instrument(level = "debug", skip_all, fields(facade = doc.name()))]
pub fn build_facade(
    doc: &SchemaDocument,
    handles: &mut TypeHandleRegistry,
    kinds: &KindRegistry,
) -> Result<FacadeSpec, SchemaError> {
    let mut operations = BTreeMap::new();

    if let Some(props) = doc.operations()? {
        for (name, method) in props {
            let method = doc.as_object(method, name)?;
            let (params, result) = match method.get("properties") {
                Some(signature) => {
                    let signature = doc.as_object(signature, name)?;
                    (
                        signature_ref(doc, handles, signature, name, "Params")?,
                        signature_ref(doc, handles, signature, name, "Result")?,
                    )
                }
                None => (None, None),
            };

            let result_variants = match result {
                Some(handle) => {
                    let result_name = handles.name_of(handle);
                    kinds
                        .resolve_version(result_name, doc.version())
                        .and_then(|version| kinds.lookup(result_name, Some(version)))
                        .map(<[FieldSpec]>::to_vec)
                        .unwrap_or_default()
                }
                None => Vec::new(),
            };

            tracing::trace!(
                operation = %name,
                has_params = params.is_some(),
                variants = result_variants.len(),
                "operation"
            );
            operations.insert(
                name.clone(),
                OperationSpec {
                    name: name.clone(),
                    params,
                    result,
                    result_variants,
                },
            );
        }
    }

    tracing::debug!(operations = operations.len(), "facade extracted");
    Ok(FacadeSpec {
        name: doc.name().to_owned(),
        version: doc.version(),
        operations,
    })
}

/// Resolve `Params` / `Result` of an operation signature to a handle.
fn signature_ref(
    doc: &SchemaDocument,
    handles: &mut TypeHandleRegistry,
    signature: &Map<String, Value>,
    operation: &str,
    slot: &str,
) -> Result<Option<TypeHandle>, SchemaError> {
    let Some(node) = signature.get(slot) else {
        return Ok(None);
    };
    let context = format!("{operation}.{slot}");
    let node = doc.as_object(node, &context)?;
    match doc.ref_target(node, &context)? {
        Some(target) => Ok(Some(handles.handle_for(target))),
        None => Err(SchemaError::Malformed {
            facade: doc.name().to_owned(),
            context,
            message: "operation signatures must reference a definition".to_owned(),
        }),
    }
}
