//! # JSON <-> D-Bus Value Codec
//!
//! Bridges the `serde_json::Value`s the router works with and the `zvariant::Value`s `zbus`
//! puts on the wire.
//!
//! ## How it works
//!
//! 1. **Encoding (JSON -> D-Bus)**: scalars only. Booleans become `b`, integers `x` (or `t` when
//!    they do not fit an `i64`), floats `d` and strings `s`. Nothing is coerced towards the
//!    declared signature of the target method or property; a mismatch is reported by the remote
//!    side.
//! 2. **Decoding (D-Bus -> JSON)**: basic types map to JSON scalars, variants are unwrapped,
//!    arrays and structures become JSON arrays and dictionaries become JSON objects.
use serde_json::{Map, Number, Value as Json};
use zvariant::Value;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("JSON {0} values cannot be sent over the bus")]
    UnsupportedJson(&'static str),
    #[error("D-Bus values of type '{0}' cannot be represented as JSON")]
    UnsupportedWireType(String),
}

/// Encodes a JSON scalar as a D-Bus value.
pub fn to_value(json: &Json) -> Result<Value<'_>, CodecError> {
    match json {
        Json::Bool(b) => Ok(Value::from(*b)),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::from(u))
            } else {
                // serde_json numbers are either i64, u64 or f64
                Ok(Value::from(n.as_f64().unwrap_or_default()))
            }
        }
        Json::String(s) => Ok(Value::from(s.as_str())),
        Json::Null => Err(CodecError::UnsupportedJson("null")),
        Json::Array(_) => Err(CodecError::UnsupportedJson("array")),
        Json::Object(_) => Err(CodecError::UnsupportedJson("object")),
    }
}

/// Decodes a D-Bus value into JSON.
pub fn to_json(value: &Value<'_>) -> Result<Json, CodecError> {
    let json = match value {
        Value::U8(v) => Json::from(*v),
        Value::Bool(v) => Json::from(*v),
        Value::I16(v) => Json::from(*v),
        Value::U16(v) => Json::from(*v),
        Value::I32(v) => Json::from(*v),
        Value::U32(v) => Json::from(*v),
        Value::I64(v) => Json::from(*v),
        Value::U64(v) => Json::from(*v),
        // NaN and infinities have no JSON representation
        Value::F64(v) => Number::from_f64(*v).map(Json::Number).unwrap_or(Json::Null),
        Value::Str(s) => Json::from(s.as_str()),
        Value::Signature(s) => Json::from(s.to_string()),
        Value::ObjectPath(p) => Json::from(p.as_str()),
        Value::Value(inner) => to_json(inner)?,
        Value::Array(array) => Json::Array(array.iter().map(to_json).collect::<Result<_, _>>()?),
        Value::Dict(dict) => {
            let mut map = Map::new();
            for (key, value) in dict.iter() {
                map.insert(key_to_string(key), to_json(value)?);
            }
            Json::Object(map)
        }
        Value::Structure(structure) => Json::Array(
            structure
                .fields()
                .iter()
                .map(to_json)
                .collect::<Result<_, _>>()?,
        ),
        #[allow(unreachable_patterns)]
        other => {
            return Err(CodecError::UnsupportedWireType(
                other.value_signature().to_string(),
            ));
        }
    };

    Ok(json)
}

fn key_to_string(key: &Value<'_>) -> String {
    match key {
        Value::Str(s) => s.as_str().to_string(),
        Value::ObjectPath(p) => p.as_str().to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_encode_scalars() {
        assert_eq!(to_value(&json!(true)).unwrap(), Value::Bool(true));
        assert_eq!(to_value(&json!(-5)).unwrap(), Value::I64(-5));
        assert_eq!(to_value(&json!(u64::MAX)).unwrap(), Value::U64(u64::MAX));
        assert_eq!(to_value(&json!(0.5)).unwrap(), Value::F64(0.5));
        assert_eq!(to_value(&json!("Song")).unwrap(), Value::from("Song"));
    }

    #[test]
    fn test_encode_rejects_composites() {
        assert!(matches!(
            to_value(&json!(null)),
            Err(CodecError::UnsupportedJson("null"))
        ));
        assert!(matches!(
            to_value(&json!([1, 2])),
            Err(CodecError::UnsupportedJson("array"))
        ));
        assert!(matches!(
            to_value(&json!({"a": 1})),
            Err(CodecError::UnsupportedJson("object"))
        ));
    }

    #[test]
    fn test_decode_metadata_dictionary() {
        let mut metadata: HashMap<&str, Value<'_>> = HashMap::new();
        metadata.insert("xesam:title", Value::new("Song"));
        metadata.insert("xesam:artist", Value::new(vec!["A", "B"]));
        metadata.insert("mpris:length", Value::new(180_000_000i64));
        let value = Value::from(metadata);

        let json = to_json(&value).unwrap();

        assert_eq!(
            json,
            json!({
                "xesam:title": "Song",
                "xesam:artist": ["A", "B"],
                "mpris:length": 180_000_000i64,
            })
        );
    }

    #[test]
    fn test_decode_scalars() {
        assert_eq!(to_json(&Value::U8(7)).unwrap(), json!(7));
        assert_eq!(to_json(&Value::F64(f64::NAN)).unwrap(), json!(null));
        assert_eq!(
            to_json(&Value::new(Value::from("nested"))).unwrap(),
            json!("nested")
        );
    }
}
