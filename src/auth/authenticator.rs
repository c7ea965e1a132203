//! Request gate: recover the session token from `Authorization` and validate it.
//!
//! Clients send `Authorization: Basic <base64(token)>`. The header reuses the
//! basic-auth shape to carry a bearer token, so the decoded payload is the token
//! itself, cut at a literal `:NOT` marker when one is present.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use base64ct::{Base64, Encoding};
use tracing::debug;

use super::{
    error::ValidationError,
    validator::{Identity, TokenValidator},
};

/// Length of the `"Basic "` scheme prefix; skipped without inspection.
const SCHEME_PREFIX_LEN: usize = 6;

/// Legacy clients append `:NOT` (an empty basic-auth password) after the token.
const TOKEN_END_MARKER: &str = ":NOT";

/// Decode an `Authorization` header value into the raw token string.
///
/// # Errors
/// Returns [`ValidationError::BadEncoding`] if the value is too short, is not
/// valid base64, or does not decode to UTF-8.
pub fn token_from_header(value: &str) -> Result<String, ValidationError> {
    let encoded = value
        .get(SCHEME_PREFIX_LEN..)
        .ok_or(ValidationError::BadEncoding)?;
    let decoded = Base64::decode_vec(encoded).map_err(|_| ValidationError::BadEncoding)?;
    let decoded = String::from_utf8(decoded).map_err(|_| ValidationError::BadEncoding)?;

    match decoded.find(TOKEN_END_MARKER) {
        Some(end) => {
            debug!("truncating decoded authorization payload at {TOKEN_END_MARKER:?}");
            Ok(decoded[..end].to_string())
        }
        None => Ok(decoded),
    }
}

/// Authenticate a request by its headers.
///
/// # Errors
/// Returns [`ValidationError::MissingHeader`] or [`ValidationError::BadEncoding`]
/// for header problems, otherwise whatever the validator returns.
pub fn authenticate(
    headers: &HeaderMap,
    validator: &TokenValidator,
) -> Result<Identity, ValidationError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(ValidationError::MissingHeader)?
        .to_str()
        .map_err(|_| ValidationError::BadEncoding)?;

    let token = token_from_header(value)?;

    validator.validate(&token)
}

/// Encode a token the way clients are expected to send it.
#[must_use]
pub fn authorization_value(token: &str) -> String {
    format!("Basic {}", Base64::encode_string(token.as_bytes()))
}
