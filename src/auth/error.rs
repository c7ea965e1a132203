//! Typed failures for the auth components.

use thiserror::Error;

/// Signup attempted with an email that is already registered.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Email already exists: {email}")]
pub struct DuplicateEmail {
    pub email: String,
}

#[derive(Debug, Error)]
pub enum SigningError {
    #[error("invalid token ttl setting: {0:?}")]
    InvalidTtl(String),
    #[error("error signing json web token: {0}")]
    Sign(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Authorization not found in the header parameters")]
    MissingHeader,
    #[error("authorization header is not valid base64")]
    BadEncoding,
    #[error("token not found in sessions")]
    NotRegistered,
    #[error("token signature or structure is invalid")]
    BadSignature,
    #[error("token expired")]
    Expired,
    #[error("token claims do not carry an email")]
    MalformedClaims,
}
