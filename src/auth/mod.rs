//! Authentication and session subsystem.
//!
//! Components, leaf first:
//!
//! - [`CredentialStore`]: user records and password checks.
//! - [`TokenIssuer`]: signs time-bound JWTs and registers them as live.
//! - [`SessionRegistry`]: the set of live tokens.
//! - [`TokenValidator`]: registry membership, then signature and expiry.
//! - [`authenticate`]: decodes the `Authorization` header and validates.
//!
//! [`AuthState`] wires them together around one shared registry and one
//! signing key; the server holds it behind an `Arc`.

pub mod authenticator;
pub mod credentials;
pub mod error;
pub mod registry;
pub mod token;
pub mod validator;

pub use authenticator::{authenticate, authorization_value, token_from_header};
pub use credentials::{hash_password, CredentialStore, User, UserSummary};
pub use error::{DuplicateEmail, SigningError, ValidationError};
pub use registry::SessionRegistry;
pub use token::{Claims, SigningKey, TokenIssuer, DEFAULT_SIGNING_SECRET};
pub use validator::{Identity, TokenValidator};

use axum::http::HeaderMap;
use secrecy::SecretString;
use std::sync::Arc;

/// Settings key holding the token time-to-live in seconds.
pub const TOKEN_TTL_SETTING: &str = "json_web_token_expiration_as_seconds";

const DEFAULT_TOKEN_TTL_SECONDS: &str = "600";

#[derive(Clone, Debug)]
pub struct AuthConfig {
    token_ttl_seconds: String,
    signing_secret: SecretString,
}

impl AuthConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            token_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS.to_string(),
            signing_secret: SecretString::from(DEFAULT_SIGNING_SECRET.to_string()),
        }
    }

    /// Raw TTL setting; validated when a token is issued.
    #[must_use]
    pub fn with_token_ttl_seconds(mut self, seconds: impl Into<String>) -> Self {
        self.token_ttl_seconds = seconds.into();
        self
    }

    #[must_use]
    pub fn with_signing_secret(mut self, secret: SecretString) -> Self {
        self.signing_secret = secret;
        self
    }

    #[must_use]
    pub fn token_ttl_seconds(&self) -> &str {
        &self.token_ttl_seconds
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new()
    }
}

pub struct AuthState {
    credentials: CredentialStore,
    registry: Arc<SessionRegistry>,
    issuer: TokenIssuer,
    validator: TokenValidator,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig, credentials: CredentialStore) -> Self {
        let registry = Arc::new(SessionRegistry::new());
        let key = SigningKey::new(config.signing_secret);
        Self {
            credentials,
            issuer: TokenIssuer::new(key.clone(), config.token_ttl_seconds, Arc::clone(&registry)),
            validator: TokenValidator::new(key, Arc::clone(&registry)),
            registry,
        }
    }

    #[must_use]
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    #[must_use]
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    #[must_use]
    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    #[must_use]
    pub fn validator(&self) -> &TokenValidator {
        &self.validator
    }

    /// Gate for protected handlers.
    ///
    /// # Errors
    /// See [`authenticate`].
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Identity, ValidationError> {
        authenticate(headers, &self.validator)
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new(AuthConfig::new(), CredentialStore::with_seed_users())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_config_defaults_and_overrides() {
        let config = AuthConfig::new();
        assert_eq!(config.token_ttl_seconds(), DEFAULT_TOKEN_TTL_SECONDS);

        let config = config.with_token_ttl_seconds("42");
        assert_eq!(config.token_ttl_seconds(), "42");
    }

    #[test]
    fn issuer_and_validator_share_registry() -> anyhow::Result<()> {
        let state = AuthState::default();
        let token = state.issuer().issue("kari.karttinen@foo.com")?;
        assert!(state.registry().contains(&token));
        assert_eq!(
            state.validator().validate(&token)?.email,
            "kari.karttinen@foo.com"
        );
        Ok(())
    }

    #[test]
    fn custom_secret_is_used_for_both_halves() -> anyhow::Result<()> {
        let state = AuthState::new(
            AuthConfig::new().with_signing_secret(SecretString::from("rotated".to_string())),
            CredentialStore::new(),
        );
        let token = state.issuer().issue("a@x.com")?;
        assert!(SigningKey::default().verify(&token).is_err());
        assert!(state.validator().validate(&token).is_ok());
        Ok(())
    }

    #[test]
    fn bad_ttl_setting_fails_issue() {
        let state = AuthState::new(
            AuthConfig::new().with_token_ttl_seconds("soon"),
            CredentialStore::new(),
        );
        assert!(matches!(
            state.issuer().issue("a@x.com"),
            Err(SigningError::InvalidTtl(_))
        ));
        assert!(state.registry().is_empty());
    }
}
