use crate::claims::Payload;
use crate::codec;
use crate::error::{Error, Result};
use crate::header::Header;
use crate::limits::{MAX_DECODED_HEADER_SIZE, MAX_DECODED_PAYLOAD_SIZE, MAX_TOKEN_LENGTH};
use crate::token::Token;
use crate::utils::base64url;

/// Sign a header and payload into a compact token
///
/// A header without `alg` is signed with HS256 and one without `typ` gets
/// `"JWT"`; both defaults end up in the encoded header. No claim is added to
/// the payload, so a payload without `exp` yields a token that never
/// expires.
///
/// # Errors
///
/// - [`Error::UnsupportedAlgorithm`] when `alg` is not HS256, HS384 or HS512
/// - [`Error::InvalidClaim`] when `exp` or `nbf` is not a number
/// - [`Error::Serialization`] when the header, the payload or the whole token
///   exceeds the size accepted by [`decode`](crate::decode) and
///   [`verify`](crate::verify)
pub fn sign(header: &Header, payload: &Payload, secret: &[u8]) -> Result<Token> {
    let mut header = header.clone();
    let algorithm = header.resolve_for_signing()?;
    payload.check_time_claims()?;

    let header_json = codec::canonical_json(&header)?;
    check_size("Header", header_json.len(), MAX_DECODED_HEADER_SIZE)?;
    let payload_json = codec::canonical_json(payload)?;
    check_size("Payload", payload_json.len(), MAX_DECODED_PAYLOAD_SIZE)?;

    let signing_input = format!(
        "{}.{}",
        base64url::encode_bytes(&header_json),
        base64url::encode_bytes(&payload_json)
    );

    let signature = algorithm.sign(&signing_input, secret)?;
    let token = Token::from_parts(signing_input, &base64url::encode_bytes(&signature));

    if token.as_str().len() > MAX_TOKEN_LENGTH {
        return Err(Error::Serialization(format!(
            "Token too large: {} bytes (maximum: {} bytes)",
            token.as_str().len(),
            MAX_TOKEN_LENGTH
        )));
    }

    Ok(token)
}

fn check_size(what: &str, size: usize, max: usize) -> Result<()> {
    if size > max {
        return Err(Error::Serialization(format!(
            "{what} too large: {size} bytes (maximum: {max} bytes)"
        )));
    }
    Ok(())
}
