//! JSON payload codec
//!
//! On disk, every value is wrapped in a `{"t": "<tag>", "v": <payload>}`
//! envelope so the tag survives the round trip — plain JSON numbers cannot
//! distinguish an `I32` from a `U64`. The envelope is applied uniformly at
//! every nesting level, and the top-level payload is a JSON object mapping
//! store keys to envelopes:
//!
//! ```json
//! {
//!   "retries":  { "t": "i32",  "v": 3 },
//!   "timeout":  { "t": "f64",  "v": 1.5 },
//!   "verbose":  { "t": "bool", "v": true },
//!   "hosts":    { "t": "arr",  "v": [ { "t": "str", "v": "a" } ] }
//! }
//! ```
//!
//! Decoding is strict: a missing tag, an unknown tag, a payload whose JSON
//! type disagrees with its tag, or an out-of-range integer is a
//! `JsonParserError` — never a silent fallback.
//!
//! Encoding goes through `serde_json::Value`, whose object map is
//! BTreeMap-backed, so payload bytes are deterministic for a given map.

use crate::error::{Result, StoreError};
use crate::value::{Value, ValueMap};
use serde_json::{Map, Number, Value as JsonValue};

/// Wire names of the value tags. Part of the on-disk format; frozen.
mod wire {
    pub const NULL: &str = "null";
    pub const BOOL: &str = "bool";
    pub const I32: &str = "i32";
    pub const U32: &str = "u32";
    pub const I64: &str = "i64";
    pub const U64: &str = "u64";
    pub const F64: &str = "f64";
    pub const STR: &str = "str";
    pub const ARR: &str = "arr";
    pub const OBJ: &str = "obj";
}

/// Serialize a store map to payload bytes.
pub fn to_payload_bytes(map: &ValueMap) -> Result<Vec<u8>> {
    let doc = encode_map(map)?;
    serde_json::to_vec(&doc)
        .map_err(|e| StoreError::json_parser(format!("failed to serialize payload: {e}")))
}

/// Parse payload bytes back into a store map.
pub fn from_payload_bytes(bytes: &[u8]) -> Result<ValueMap> {
    let doc: JsonValue = serde_json::from_slice(bytes)
        .map_err(|e| StoreError::json_parser(format!("invalid JSON: {e}")))?;
    decode_map(doc)
}

/// Encode a store map as a top-level JSON object of envelopes.
pub fn encode_map(map: &ValueMap) -> Result<JsonValue> {
    let mut obj = Map::new();
    for (key, value) in map {
        obj.insert(key.clone(), encode_value(value)?);
    }
    Ok(JsonValue::Object(obj))
}

/// Decode a top-level JSON object of envelopes into a store map.
pub fn decode_map(doc: JsonValue) -> Result<ValueMap> {
    let JsonValue::Object(obj) = doc else {
        return Err(StoreError::json_parser(
            "payload top level is not a JSON object",
        ));
    };
    let mut map = ValueMap::with_capacity(obj.len());
    for (key, value) in obj {
        let decoded = decode_value(value)
            .map_err(|e| StoreError::json_parser(format!("key {key:?}: {e}")))?;
        map.insert(key, decoded);
    }
    Ok(map)
}

/// Encode one value as its tagged envelope.
pub fn encode_value(value: &Value) -> Result<JsonValue> {
    let (tag, payload) = match value {
        Value::Null => (wire::NULL, JsonValue::Null),
        Value::Bool(b) => (wire::BOOL, JsonValue::Bool(*b)),
        Value::I32(n) => (wire::I32, JsonValue::Number(Number::from(*n))),
        Value::U32(n) => (wire::U32, JsonValue::Number(Number::from(*n))),
        Value::I64(n) => (wire::I64, JsonValue::Number(Number::from(*n))),
        Value::U64(n) => (wire::U64, JsonValue::Number(Number::from(*n))),
        Value::F64(f) => {
            let number = Number::from_f64(*f).ok_or_else(|| {
                StoreError::json_parser(format!("cannot encode non-finite float {f}"))
            })?;
            (wire::F64, JsonValue::Number(number))
        }
        Value::String(s) => (wire::STR, JsonValue::String(s.clone())),
        Value::Array(items) => {
            let encoded: Result<Vec<JsonValue>> = items.iter().map(encode_value).collect();
            (wire::ARR, JsonValue::Array(encoded?))
        }
        Value::Object(map) => {
            let mut obj = Map::new();
            for (key, child) in map {
                obj.insert(key.clone(), encode_value(child)?);
            }
            (wire::OBJ, JsonValue::Object(obj))
        }
    };

    let mut envelope = Map::new();
    envelope.insert("t".to_string(), JsonValue::String(tag.to_string()));
    envelope.insert("v".to_string(), payload);
    Ok(JsonValue::Object(envelope))
}

/// Decode one tagged envelope back into a value.
pub fn decode_value(doc: JsonValue) -> Result<Value> {
    let JsonValue::Object(mut obj) = doc else {
        return Err(StoreError::json_parser("value is not a tagged envelope"));
    };

    let tag = match obj.remove("t") {
        Some(JsonValue::String(tag)) => tag,
        Some(_) => return Err(StoreError::json_parser("envelope tag is not a string")),
        None => return Err(StoreError::json_parser("envelope is missing its tag")),
    };
    let payload = obj
        .remove("v")
        .ok_or_else(|| StoreError::json_parser(format!("envelope {tag:?} is missing its payload")))?;
    if !obj.is_empty() {
        return Err(StoreError::json_parser(format!(
            "envelope {tag:?} carries unexpected fields"
        )));
    }

    match tag.as_str() {
        wire::NULL => match payload {
            JsonValue::Null => Ok(Value::Null),
            other => Err(mismatch(&tag, &other)),
        },
        wire::BOOL => match payload {
            JsonValue::Bool(b) => Ok(Value::Bool(b)),
            other => Err(mismatch(&tag, &other)),
        },
        wire::I32 => {
            let wide = integer_payload(&tag, &payload)?;
            i32::try_from(wide)
                .map(Value::I32)
                .map_err(|_| StoreError::json_parser(format!("{wide} is out of range for i32")))
        }
        wire::U32 => {
            let wide = unsigned_payload(&tag, &payload)?;
            u32::try_from(wide)
                .map(Value::U32)
                .map_err(|_| StoreError::json_parser(format!("{wide} is out of range for u32")))
        }
        wire::I64 => integer_payload(&tag, &payload).map(Value::I64),
        wire::U64 => unsigned_payload(&tag, &payload).map(Value::U64),
        wire::F64 => match payload.as_f64() {
            Some(f) => Ok(Value::F64(f)),
            None => Err(mismatch(&tag, &payload)),
        },
        wire::STR => match payload {
            JsonValue::String(s) => Ok(Value::String(s)),
            other => Err(mismatch(&tag, &other)),
        },
        wire::ARR => match payload {
            JsonValue::Array(items) => {
                let decoded: Result<Vec<Value>> = items.into_iter().map(decode_value).collect();
                Ok(Value::Array(decoded?))
            }
            other => Err(mismatch(&tag, &other)),
        },
        wire::OBJ => match payload {
            JsonValue::Object(entries) => {
                let mut map = ValueMap::with_capacity(entries.len());
                for (key, child) in entries {
                    map.insert(key, decode_value(child)?);
                }
                Ok(Value::Object(map))
            }
            other => Err(mismatch(&tag, &other)),
        },
        unknown => Err(StoreError::json_parser(format!(
            "unknown value tag {unknown:?}"
        ))),
    }
}

fn integer_payload(tag: &str, payload: &JsonValue) -> Result<i64> {
    payload.as_i64().ok_or_else(|| mismatch(tag, payload))
}

fn unsigned_payload(tag: &str, payload: &JsonValue) -> Result<u64> {
    payload.as_u64().ok_or_else(|| mismatch(tag, payload))
}

fn mismatch(tag: &str, payload: &JsonValue) -> StoreError {
    let kind = match payload {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    };
    StoreError::json_parser(format!("payload for tag {tag:?} is {kind}"))
}
