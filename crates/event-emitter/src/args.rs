//! Positional JSON arguments for the default `Emitter<[Value]>`.
//!
//! A listener receives `&[Value]`. A position past the end of the slice, or
//! holding `null`, reads as unset: [`arg`] returns `Ok(None)` for both.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::{EmitterError, Result};

/// Serialize `value` into positional arguments.
///
/// `()` (or anything serializing to `null`) produces no arguments, a tuple or
/// sequence produces one argument per element, and any other value produces
/// a single argument.
pub fn to_args<T: Serialize>(value: T) -> Result<Vec<Value>> {
    match serde_json::to_value(value).map_err(EmitterError::Encode)? {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items),
        other => Ok(vec![other]),
    }
}

/// Decode the argument at `index`.
pub fn arg<T: DeserializeOwned>(args: &[Value], index: usize) -> Result<Option<T>> {
    match args.get(index) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|source| EmitterError::Decode { index, source }),
    }
}
