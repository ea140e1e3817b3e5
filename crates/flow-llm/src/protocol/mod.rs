//! Wire format types for the Flow endpoints
//!
//! Pure serde structs matching the JSON each endpoint expects, plus the
//! shared step that folds caller extras into a serialized body.

pub mod completion;
pub mod invocation;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::FlowError;
use crate::types::Extras;

/// Serialize `wire` and merge `extras` into it
///
/// Null-valued extras are dropped. Extras may add or replace any key
/// except those listed in `protected`, which stay as `wire` set them.
pub fn build_payload<T: Serialize>(
    wire: &T,
    extras: &Extras,
    protected: &[&str],
) -> Result<Map<String, Value>, FlowError> {
    let Value::Object(mut payload) =
        serde_json::to_value(wire).map_err(|e| FlowError::InvalidRequest(format!("unserializable payload: {e}")))?
    else {
        return Err(FlowError::InvalidRequest("payload must serialize to an object".to_owned()));
    };

    for (key, value) in extras {
        if value.is_null() {
            continue;
        }
        if protected.contains(&key.as_str()) {
            tracing::debug!(key = %key, "ignoring extra parameter that would replace a fixed field");
            continue;
        }
        payload.insert(key.clone(), value.clone());
    }

    Ok(payload)
}
