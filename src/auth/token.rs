//! Json web token signing and issuance.

use jsonwebtoken::{
    decode, encode, errors::Error as JwtError, get_current_timestamp, Algorithm, DecodingKey,
    EncodingKey, Header, TokenData, Validation,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error};

use super::{error::SigningError, registry::SessionRegistry};

/// Built-in HS256 secret used when no override is configured.
pub const DEFAULT_SIGNING_SECRET: &str = "SuperSecret";

/// Claims carried by every session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub email: String,
    /// Absolute expiry, UTC epoch seconds.
    pub exp: u64,
}

/// Shared symmetric key for signing and verifying session tokens.
#[derive(Clone, Debug)]
pub struct SigningKey {
    secret: SecretString,
}

impl SigningKey {
    #[must_use]
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Sign claims as a compact HS256 JWT.
    ///
    /// # Errors
    /// Returns the underlying `jsonwebtoken` error if encoding fails.
    pub fn sign(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(self.secret.expose_secret().as_bytes()),
        )
    }

    /// Verify signature and expiry, returning the raw claim set.
    ///
    /// Claims are left untyped so a token with a well-formed signature but an
    /// unexpected payload can be told apart from a forged one.
    ///
    /// # Errors
    /// Returns the underlying `jsonwebtoken` error on a bad signature, a
    /// malformed token or an expired `exp`.
    pub fn verify(&self, token: &str) -> Result<TokenData<Value>, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        decode::<Value>(
            token,
            &DecodingKey::from_secret(self.secret.expose_secret().as_bytes()),
            &validation,
        )
    }
}

impl Default for SigningKey {
    fn default() -> Self {
        Self::new(SecretString::from(DEFAULT_SIGNING_SECRET.to_string()))
    }
}

/// Mints session tokens and registers them as live.
#[derive(Debug)]
pub struct TokenIssuer {
    key: SigningKey,
    ttl_seconds: String,
    registry: Arc<SessionRegistry>,
}

impl TokenIssuer {
    /// `ttl_seconds` is the raw configuration value; it is parsed on every
    /// issuance so a bad setting surfaces as a failed login, not a crash.
    #[must_use]
    pub fn new(key: SigningKey, ttl_seconds: impl Into<String>, registry: Arc<SessionRegistry>) -> Self {
        Self {
            key,
            ttl_seconds: ttl_seconds.into(),
            registry,
        }
    }

    fn ttl(&self) -> Result<u64, SigningError> {
        self.ttl_seconds
            .trim()
            .parse::<u64>()
            .map_err(|_| SigningError::InvalidTtl(self.ttl_seconds.clone()))
    }

    /// Issue a token for `email` that expires after the configured TTL.
    ///
    /// # Errors
    /// Returns [`SigningError`] if the TTL setting is not a non-negative integer
    /// or signing fails. Nothing is registered in either case.
    pub fn issue(&self, email: &str) -> Result<String, SigningError> {
        let ttl = self.ttl().inspect_err(|err| error!("{err}"))?;

        let claims = Claims {
            email: email.to_string(),
            exp: get_current_timestamp().saturating_add(ttl),
        };

        let token = self.key.sign(&claims).map_err(|err| {
            error!("error signing json web token: {err}");
            SigningError::from(err)
        })?;

        self.registry.insert(&token);

        debug!(
            exp = claims.exp,
            live_sessions = self.registry.len(),
            "json web token issued"
        );

        Ok(token)
    }
}
