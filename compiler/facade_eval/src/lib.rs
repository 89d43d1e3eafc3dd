//! Facade Eval - schema sets turned into live records and stubs
//!
//! ```text
//! SchemaSet
//!     │  RecordTable::synthesize()
//!     ▼
//! CompiledRecordType per (name, version)
//!     │  CompiledFacade::compile()
//!     ▼
//! CompiledOperation ──► Envelope ──► Transport::rpc ──► Reply ──► Outcome<Value, Value>
//! ```
//!
//! [`CompiledSchema::synthesize`] runs both steps. Calls go through
//! [`FacadeClient`] or directly through a [`CompiledOperation`].

mod error;
mod marshal;
mod operation;
mod record;
mod schema;
mod value;

pub use error::EvalError;
pub use operation::{CompiledFacade, CompiledOperation, FacadeClient, ResultRule};
pub use record::{CompiledRecordType, RecordTable};
pub use schema::CompiledSchema;
pub use value::{Record, Value};

#[cfg(test)]
mod test_helpers;
