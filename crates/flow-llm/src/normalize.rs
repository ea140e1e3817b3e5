//! Mapping of arbitrary completion replies onto [`NormalizedResponse`]
//!
//! Every field is read independently. A missing key, a `null`, or a value
//! of the wrong JSON type all resolve to the field's default, so a sparse
//! or partly malformed reply still produces a complete response.

use serde_json::{Map, Value};

use crate::types::response::CHAT_COMPLETION_OBJECT;
use crate::types::{Choice, ChoiceMessage, NormalizedResponse, PromptTokensDetails, Usage};

/// Normalize a decoded completion reply
///
/// `requested_model` labels the response when the reply names no model and
/// `now` stands in for a missing `created` timestamp.
pub fn normalize_completion(body: &Value, requested_model: &str, now: u64) -> NormalizedResponse {
    let empty = Map::new();
    let root = body.as_object().unwrap_or(&empty);

    NormalizedResponse {
        id: string_field(root, "id").unwrap_or_default().to_owned(),
        object: CHAT_COMPLETION_OBJECT.to_owned(),
        created: u64_field(root, "created").unwrap_or(now),
        model: string_field(root, "model").unwrap_or(requested_model).to_owned(),
        choices: array_field(root, "choices")
            .map(|choices| choices.iter().map(normalize_choice).collect())
            .unwrap_or_default(),
        usage: normalize_usage(object_field(root, "usage").unwrap_or(&empty)),
        prompt_filter_results: array_field(root, "prompt_filter_results").cloned().unwrap_or_default(),
        system_fingerprint: string_field(root, "system_fingerprint").unwrap_or_default().to_owned(),
    }
}

fn normalize_choice(choice: &Value) -> Choice {
    let empty = Map::new();
    let choice = choice.as_object().unwrap_or(&empty);

    Choice {
        index: u64_field(choice, "index")
            .and_then(|i| u32::try_from(i).ok())
            .unwrap_or(0),
        message: object_field(choice, "message")
            .map(normalize_message)
            .unwrap_or_default(),
        finish_reason: string_field(choice, "finish_reason").unwrap_or("stop").to_owned(),
        content_filter_results: object_field(choice, "content_filter_results").cloned().unwrap_or_default(),
        logprobs: choice.get("logprobs").filter(|v| !v.is_null()).cloned(),
    }
}

fn normalize_message(message: &Map<String, Value>) -> ChoiceMessage {
    let defaults = ChoiceMessage::default();

    ChoiceMessage {
        role: string_field(message, "role").map_or(defaults.role, str::to_owned),
        content: string_field(message, "content").map_or(defaults.content, str::to_owned),
        refusal: string_field(message, "refusal").map(str::to_owned),
        tool_calls: array_field(message, "tool_calls").cloned().unwrap_or(defaults.tool_calls),
    }
}

fn normalize_usage(usage: &Map<String, Value>) -> Usage {
    let cached_tokens = object_field(usage, "prompt_tokens_details")
        .and_then(|details| u64_field(details, "cached_tokens"))
        .unwrap_or(0);

    Usage {
        completion_tokens: u64_field(usage, "completion_tokens").unwrap_or(0),
        completion_tokens_details: object_field(usage, "completion_tokens_details").cloned().unwrap_or_default(),
        prompt_tokens: u64_field(usage, "prompt_tokens").unwrap_or(0),
        prompt_tokens_details: PromptTokensDetails { cached_tokens },
        total_tokens: u64_field(usage, "total_tokens").unwrap_or(0),
    }
}

fn string_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key).and_then(Value::as_str)
}

fn u64_field(map: &Map<String, Value>, key: &str) -> Option<u64> {
    map.get(key).and_then(Value::as_u64)
}

fn array_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Vec<Value>> {
    map.get(key).and_then(Value::as_array)
}

fn object_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    map.get(key).and_then(Value::as_object)
}
