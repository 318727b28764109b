use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// A signed token in compact serialization
///
/// Only produced by [`sign`](crate::sign); never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Token {
    value: String,
}

impl Token {
    pub(crate) fn from_parts(signing_input: String, signature_b64: &str) -> Self {
        let mut value = signing_input;
        value.push('.');
        value.push_str(signature_b64);
        Self { value }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }

    /// The `header.payload` part covered by the signature
    pub fn signing_input(&self) -> &str {
        match self.value.rfind('.') {
            Some(idx) => &self.value[..idx],
            None => &self.value,
        }
    }

    /// The Base64URL signature segment
    pub fn signature(&self) -> &str {
        match self.value.rfind('.') {
            Some(idx) => &self.value[idx + 1..],
            None => "",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl From<Token> for String {
    fn from(token: Token) -> Self {
        token.value
    }
}

/// Shared HMAC key
///
/// Cheap to clone and share across threads. `Debug` never prints the bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret {
    bytes: Arc<[u8]>,
}

impl Secret {
    pub fn new(bytes: impl AsRef<[u8]>) -> Self {
        Self {
            bytes: bytes.as_ref().into(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret")
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}

impl AsRef<[u8]> for Secret {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<Vec<u8>> for Secret {
    fn from(value: Vec<u8>) -> Self {
        Self {
            bytes: value.into(),
        }
    }
}
