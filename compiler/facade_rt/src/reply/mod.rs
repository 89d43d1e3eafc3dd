//! Reply classification and typed result mapping.
//!
//! A reply mapping carrying `Error` is an error reply, even if `Response`
//! is also present. A mapping with `Response` (possibly `null`) is a
//! success. Anything else is "absent": the call neither failed nor
//! answered.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::TransportError;

/// Reply key holding the failure record.
pub const ERROR_KEY: &str = "Error";
/// Reply key holding the success payload.
pub const RESPONSE_KEY: &str = "Response";

/// Failure of a single stub call.
#[derive(Debug, Error)]
pub enum CallError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("failed to encode parameters: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode reply: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Result of an operation call that reached the remote side.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome<T, E> {
    /// Success payload mapped to the declared result type.
    Response(T),
    /// The remote side reported an error.
    Error(E),
    /// The reply carried neither `Error` nor `Response`.
    Absent,
}

impl<T, E> Outcome<T, E> {
    pub fn is_response(&self) -> bool {
        matches!(self, Outcome::Response(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Outcome::Absent)
    }

    pub fn response(self) -> Option<T> {
        match self {
            Outcome::Response(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(self) -> Option<E> {
        match self {
            Outcome::Error(err) => Some(err),
            _ => None,
        }
    }

    pub fn as_response(&self) -> Option<&T> {
        match self {
            Outcome::Response(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U, E> {
        match self {
            Outcome::Response(value) => Outcome::Response(f(value)),
            Outcome::Error(err) => Outcome::Error(err),
            Outcome::Absent => Outcome::Absent,
        }
    }
}

/// A classified reply, still untyped.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    Error(Value),
    /// Success payload; `Null` when the remote returned `Response: null`.
    Response(Value),
    Absent,
}

impl Reply {
    /// Classify a raw reply.
    ///
    /// A `null` `Error` counts as no error.
    pub fn classify(reply: Value) -> Reply {
        let Value::Object(mut map) = reply else {
            return Reply::Absent;
        };
        match map.remove(ERROR_KEY) {
            Some(Value::Null) | None => {}
            Some(err) => return Reply::Error(err),
        }
        match map.remove(RESPONSE_KEY) {
            Some(payload) => Reply::Response(payload),
            None => Reply::Absent,
        }
    }

    /// Decode a success payload as a record.
    ///
    /// `Response: null` decodes like an empty mapping, so every field of
    /// the record is omitted.
    pub fn decode_record<T, E>(self) -> Result<Outcome<T, E>, CallError>
    where
        T: DeserializeOwned,
        E: DeserializeOwned,
    {
        self.decode_with(|payload| match payload {
            Value::Null => Value::Object(Map::new()),
            other => other,
        })
    }

    /// Decode a success payload into one variant of a multi-variant result.
    ///
    /// If the payload is a mapping holding `member`, only that entry is
    /// decoded; otherwise the whole payload is.
    pub fn decode_member<T, E>(self, member: &str) -> Result<Outcome<T, E>, CallError>
    where
        T: DeserializeOwned,
        E: DeserializeOwned,
    {
        self.decode_with(|payload| select_member(payload, member))
    }

    /// Keep the success payload as raw JSON.
    pub fn decode_raw<E>(self) -> Result<Outcome<Value, E>, CallError>
    where
        E: DeserializeOwned,
    {
        self.decode_with(|payload| payload)
    }

    fn decode_with<T, E>(self, prepare: impl FnOnce(Value) -> Value) -> Result<Outcome<T, E>, CallError>
    where
        T: DeserializeOwned,
        E: DeserializeOwned,
    {
        match self {
            Reply::Error(err) => serde_json::from_value(err)
                .map(Outcome::Error)
                .map_err(CallError::Decode),
            Reply::Response(payload) => serde_json::from_value(prepare(payload))
                .map(Outcome::Response)
                .map_err(CallError::Decode),
            Reply::Absent => {
                tracing::warn!("reply carried neither Error nor Response");
                Ok(Outcome::Absent)
            }
        }
    }
}

/// Pick `member` out of a mapping payload, or keep the whole payload.
pub fn select_member(payload: Value, member: &str) -> Value {
    match payload {
        Value::Object(mut map) if map.contains_key(member) => {
            map.remove(member).unwrap_or(Value::Null)
        }
        other => other,
    }
}
