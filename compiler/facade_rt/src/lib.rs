//! Facade Runtime - what a facade stub needs at call time
//!
//! Generated clients and the dynamic stubs both go through here:
//! build an [`Envelope`], hand it to a [`Transport`] once, classify the
//! [`Reply`] and map it to an [`Outcome`].

mod lenient;
mod reply;
mod transport;

pub use lenient::{coerce_bool, lenient_bool};
pub use reply::{select_member, CallError, Outcome, Reply, ERROR_KEY, RESPONSE_KEY};
pub use transport::{from_fn, Envelope, FnTransport, Transport, TransportError};

// Generated clients reach serde through these paths.
pub use serde;
pub use serde_json;

/// Serialize a parameter record into envelope params.
///
/// Records serialize to a mapping; anything else is an encoding error.
pub fn params_of<P: serde::Serialize>(params: &P) -> Result<serde_json::Map<String, serde_json::Value>, CallError> {
    match serde_json::to_value(params).map_err(CallError::Encode)? {
        serde_json::Value::Object(map) => Ok(map),
        serde_json::Value::Null => Ok(serde_json::Map::new()),
        other => Err(CallError::Encode(serde::ser::Error::custom(format!(
            "parameters must serialize to a mapping, got {other}"
        )))),
    }
}

/// Send one request and classify the reply.
#[tracing::instrument(level = "debug", skip_all, fields(facade = %envelope.facade, request = %envelope.request))]
pub fn dispatch<T: Transport + ?Sized>(transport: &T, envelope: &Envelope) -> Result<Reply, CallError> {
    let raw = transport.rpc(envelope)?;
    tracing::trace!(reply = %raw, "reply received");
    Ok(Reply::classify(raw))
}
