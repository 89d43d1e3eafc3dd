//! Request envelope and the transport capability consumed by stubs.
//!
//! The transport owns connections, framing, correlation, retries and
//! cancellation. Stubs call [`Transport::rpc`] exactly once per operation
//! call and never retry.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Request wrapper handed to the transport.
///
/// Serializes as `{"Type", "Request", "Version", "Params"}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Facade name.
    #[serde(rename = "Type")]
    pub facade: String,
    /// Operation name.
    #[serde(rename = "Request")]
    pub request: String,
    /// Facade version.
    #[serde(rename = "Version")]
    pub version: u32,
    /// Parameters keyed by wire name.
    #[serde(rename = "Params")]
    pub params: Map<String, Value>,
}

impl Envelope {
    pub fn new(
        facade: impl Into<String>,
        request: impl Into<String>,
        version: u32,
        params: Map<String, Value>,
    ) -> Self {
        Envelope {
            facade: facade.into(),
            request: request.into(),
            version,
            params,
        }
    }
}

/// Failure reported by a transport implementation.
#[derive(Debug, Error)]
#[error("transport failure: {message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        TransportError {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        TransportError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The `rpc(envelope) -> reply` capability.
///
/// The reply is the raw reply mapping; it should carry exactly one of
/// `Error` or `Response`. Implementations take `&self` so one transport can
/// serve concurrent calls; any ordering guarantee is theirs to give.
pub trait Transport {
    fn rpc(&self, envelope: &Envelope) -> Result<Value, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn rpc(&self, envelope: &Envelope) -> Result<Value, TransportError> {
        (**self).rpc(envelope)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn rpc(&self, envelope: &Envelope) -> Result<Value, TransportError> {
        (**self).rpc(envelope)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn rpc(&self, envelope: &Envelope) -> Result<Value, TransportError> {
        (**self).rpc(envelope)
    }
}

/// Adapter turning a closure into a [`Transport`].
pub struct FnTransport<F>(F);

impl<F> Transport for FnTransport<F>
where
    F: Fn(&Envelope) -> Result<Value, TransportError>,
{
    fn rpc(&self, envelope: &Envelope) -> Result<Value, TransportError> {
        (self.0)(envelope)
    }
}

/// Wrap a closure as a transport.
pub fn from_fn<F>(f: F) -> FnTransport<F>
where
    F: Fn(&Envelope) -> Result<Value, TransportError>,
{
    FnTransport(f)
}
