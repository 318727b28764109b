//! Compact serialization codec
//!
//! Segments are Base64URL (no padding) encodings of canonical JSON: object
//! keys sorted at every depth, no whitespace. Canonicalization is done here
//! rather than left to `serde_json`'s map type so that signing the same
//! header and payload always yields the same bytes.

use crate::error::{Error, Result};
use crate::limits::{MAX_DECODED_PAYLOAD_SIZE, MAX_TOKEN_LENGTH};
use crate::utils::base64url;

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Serialize `value` to canonical JSON and Base64URL-encode it
pub fn encode_segment<T>(value: &T) -> Result<String>
where
    T: Serialize + ?Sized,
{
    Ok(base64url::encode_bytes(&canonical_json(value)?))
}

/// Serialize `value` to canonical JSON bytes
pub(crate) fn canonical_json<T>(value: &T) -> Result<Vec<u8>>
where
    T: Serialize + ?Sized,
{
    let value = serde_json::to_value(value).map_err(|e| Error::Serialization(e.to_string()))?;
    serde_json::to_vec(&canonicalize(value)).map_err(|e| Error::Serialization(e.to_string()))
}

/// Decode a Base64URL segment into a JSON object
pub fn decode_segment(segment: &str) -> Result<BTreeMap<String, Value>> {
    decode_segment_bounded(segment, MAX_DECODED_PAYLOAD_SIZE)
}

pub(crate) fn decode_segment_bounded(
    segment: &str,
    max_size: usize,
) -> Result<BTreeMap<String, Value>> {
    let bytes = base64url::decode_bytes(segment, max_size)?;
    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|e| Error::MalformedSegment(format!("JSON parsing failed: {e}")))?;

    match value {
        Value::Object(map) => Ok(map.into_iter().collect()),
        other => Err(Error::MalformedSegment(format!(
            "expected a JSON object, found {}",
            kind_of(&other)
        ))),
    }
}

/// Split a token into its header, payload and signature segments
pub fn split_token(token: &str) -> Result<(&str, &str, &str)> {
    if token.len() > MAX_TOKEN_LENGTH {
        return Err(Error::MalformedToken(format!(
            "Token too large: {} bytes (maximum: {} bytes)",
            token.len(),
            MAX_TOKEN_LENGTH
        )));
    }

    let mut parts = token.split('.');
    let (Some(header), Some(payload), Some(signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(Error::MalformedToken(
            "expected three segments separated by '.'".into(),
        ));
    };

    if header.is_empty() || payload.is_empty() || signature.is_empty() {
        return Err(Error::MalformedToken("token has an empty segment".into()));
    }

    Ok((header, payload, signature))
}

/// Sort object keys recursively
pub(crate) fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = map
                .into_iter()
                .map(|(key, value)| (key, canonicalize(value)))
                .collect();
            Value::Object(sorted.into_iter().collect::<Map<String, Value>>())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_segment_compact() {
        assert_eq!(
            encode_segment(&json!({"alg": "HS256", "typ": "JWT"})).unwrap(),
            "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9"
        );
        assert_eq!(encode_segment(&json!({"sub": "1"})).unwrap(), "eyJzdWIiOiIxIn0");
    }

    #[test]
    fn test_encode_segment_sorts_keys() {
        let a = encode_segment(&json!({"typ": "JWT", "alg": "HS256"})).unwrap();
        let b = encode_segment(&json!({"alg": "HS256", "typ": "JWT"})).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_canonicalize_nested() {
        let value = canonicalize(json!({"b": {"z": 1, "a": [{"y": 1, "x": 2}]}, "a": 0}));
        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#"{"a":0,"b":{"a":[{"x":2,"y":1}],"z":1}}"#
        );
    }

    #[test]
    fn test_decode_segment() {
        let map = decode_segment("eyJzdWIiOiIxIn0").unwrap();
        assert_eq!(map.get("sub"), Some(&json!("1")));
    }

    #[test]
    fn test_decode_segment_invalid_base64() {
        assert!(matches!(
            decode_segment("!!!"),
            Err(Error::MalformedSegment(_))
        ));
    }

    #[test]
    fn test_decode_segment_invalid_json() {
        let segment = base64url::encode_bytes(b"not json");
        assert!(matches!(
            decode_segment(&segment),
            Err(Error::MalformedSegment(_))
        ));
    }

    #[test]
    fn test_decode_segment_not_an_object() {
        for json in ["[1,2]", "\"text\"", "42", "null"] {
            let segment = base64url::encode_bytes(json.as_bytes());
            assert!(matches!(
                decode_segment(&segment),
                Err(Error::MalformedSegment(_))
            ));
        }
    }

    #[test]
    fn test_split_token() {
        assert_eq!(split_token("a.b.c").unwrap(), ("a", "b", "c"));
    }

    #[test]
    fn test_split_token_wrong_count() {
        for token in ["", "a", "a.b", "a.b.c.d", "a.b.c."] {
            assert!(
                matches!(split_token(token), Err(Error::MalformedToken(_))),
                "{token:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_split_token_empty_segment() {
        for token in [".b.c", "a..c", "a.b.", ".."] {
            assert!(
                matches!(split_token(token), Err(Error::MalformedToken(_))),
                "{token:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_split_token_too_large() {
        let token = format!("{}.b.c", "a".repeat(MAX_TOKEN_LENGTH));
        assert!(matches!(
            split_token(&token),
            Err(Error::MalformedToken(_))
        ));
    }
}
