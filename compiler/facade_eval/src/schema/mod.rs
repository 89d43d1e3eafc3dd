//! The compiled schema: record types plus callable facades.

use std::sync::Arc;

use facade_ir::Version;
use facade_rt::Transport;
use facade_schema::{SchemaSet, ERROR_VARIANT};

use crate::operation::{CompiledFacade, FacadeClient};
use crate::record::{CompiledRecordType, RecordTable};
use crate::EvalError;

/// Everything synthesized from one [`SchemaSet`].
///
/// Immutable once built; share it through an `Arc`.
#[derive(Debug)]
pub struct CompiledSchema {
    set: SchemaSet,
    records: Arc<RecordTable>,
    facades: Vec<Arc<CompiledFacade>>,
}

impl CompiledSchema {
    /// Synthesize record types, then compile every facade against them.
    #[tracing::instrument(level = "debug", skip_all, fields(facades = set.facades().len()))]
    pub fn synthesize(set: SchemaSet) -> Self {
        let records = Arc::new(RecordTable::synthesize(set.handles(), set.kinds()));
        let error = set.handles().get(ERROR_VARIANT);
        let facades = set
            .facades()
            .iter()
            .map(|spec| Arc::new(CompiledFacade::compile(spec, error, &records)))
            .collect();
        tracing::debug!(records = records.len(), "schema synthesized");
        CompiledSchema { set, records, facades }
    }

    pub fn set(&self) -> &SchemaSet {
        &self.set
    }

    pub fn records(&self) -> &Arc<RecordTable> {
        &self.records
    }

    /// Facades in document order.
    pub fn facades(&self) -> &[Arc<CompiledFacade>] {
        &self.facades
    }

    /// Find a facade; without a version the highest one is returned.
    pub fn facade(&self, name: &str, version: Option<Version>) -> Result<&Arc<CompiledFacade>, EvalError> {
        let mut candidates = self.facades.iter().filter(|f| f.name() == name);
        let found = match version {
            Some(v) => candidates.find(|f| f.version() == v),
            None => candidates.max_by_key(|f| f.version()),
        };
        found.ok_or_else(|| EvalError::UnknownFacade {
            facade: name.to_owned(),
            version,
        })
    }

    /// Record type by name; without a version the default one is returned.
    pub fn record(&self, name: &str, version: Option<Version>) -> Option<&Arc<CompiledRecordType>> {
        let handle = self.set.handles().get(name)?;
        match version {
            Some(v) => self.records.resolve(handle, Some(v)).filter(|r| r.version() == v),
            None => self.records.resolve(handle, None),
        }
    }

    /// Bind a facade to a transport.
    pub fn connect<T: Transport>(
        &self,
        name: &str,
        version: Option<Version>,
        transport: T,
    ) -> Result<FacadeClient<T>, EvalError> {
        let facade = self.facade(name, version)?;
        Ok(FacadeClient::new(Arc::clone(facade), transport))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests;
