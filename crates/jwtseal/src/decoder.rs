//! Structural decoding without verification
//!
//! [`decode`] is for introspection and debugging. Nothing it returns is
//! authenticated; use [`TokenValidator`](crate::TokenValidator) before
//! trusting any claim.

use crate::claims::Payload;
use crate::codec;
use crate::error::{Error, Result};
use crate::header::Header;
use crate::limits::{MAX_DECODED_HEADER_SIZE, MAX_DECODED_PAYLOAD_SIZE};

use chrono::{DateTime, Utc};

/// A token split and decoded, but not verified
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    header: Header,
    payload: Payload,
    signature: String,
}

impl Decoded {
    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// The Base64URL signature segment, undecoded
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Expiration instant from the `exp` claim, if present and numeric
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.payload.expiration().map(to_datetime)
    }

    pub fn into_parts(self) -> (Header, Payload) {
        (self.header, self.payload)
    }
}

/// Decode a token's header and payload without checking the signature
///
/// Fails with [`Error::MalformedToken`] when the token does not split into
/// three segments or a segment is not a Base64URL JSON object. Never fails
/// because of the signature or time claims.
pub fn decode(token: &str) -> Result<Decoded> {
    let parts = Parts::parse(token)?;
    Ok(Decoded {
        header: parts.header,
        payload: parts.payload,
        signature: parts.signature_b64.to_string(),
    })
}

/// Segments of a token plus the decoded header and payload
pub(crate) struct Parts<'a> {
    pub(crate) header_b64: &'a str,
    pub(crate) payload_b64: &'a str,
    pub(crate) signature_b64: &'a str,
    pub(crate) header: Header,
    pub(crate) payload: Payload,
}

impl<'a> Parts<'a> {
    pub(crate) fn parse(token: &'a str) -> Result<Self> {
        let (header_b64, payload_b64, signature_b64) = codec::split_token(token)?;

        let header = codec::decode_segment_bounded(header_b64, MAX_DECODED_HEADER_SIZE)
            .map_err(|e| malformed("header", e))?;
        let payload = codec::decode_segment_bounded(payload_b64, MAX_DECODED_PAYLOAD_SIZE)
            .map_err(|e| malformed("payload", e))?;

        Ok(Self {
            header_b64,
            payload_b64,
            signature_b64,
            header: Header::from(header),
            payload: Payload::from(payload),
        })
    }

    pub(crate) fn signing_input(&self) -> String {
        format!("{}.{}", self.header_b64, self.payload_b64)
    }
}

fn malformed(segment: &str, error: Error) -> Error {
    match error {
        Error::MalformedSegment(msg) => Error::MalformedToken(format!("{segment}: {msg}")),
        other => other,
    }
}

/// Unix seconds as an instant, clamped to the range chrono can represent
pub(crate) fn to_datetime(timestamp: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(timestamp, 0).unwrap_or(if timestamp < 0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}
