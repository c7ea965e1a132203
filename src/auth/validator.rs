//! Two-phase session token validation.
//!
//! 1. The token must be registered in the [`SessionRegistry`], i.e. minted by
//!    this process and not yet dropped.
//! 2. The token must verify under the signing key and must not be expired.
//!
//! Every failure drops the token from the registry.

use jsonwebtoken::errors::ErrorKind;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error};

use super::{error::ValidationError, registry::SessionRegistry, token::SigningKey};

/// Identity recovered from a validated token.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
}

#[derive(Debug)]
pub struct TokenValidator {
    key: SigningKey,
    registry: Arc<SessionRegistry>,
}

impl TokenValidator {
    #[must_use]
    pub fn new(key: SigningKey, registry: Arc<SessionRegistry>) -> Self {
        Self { key, registry }
    }

    /// Validate a session token.
    ///
    /// A successful validation does not consume the token.
    ///
    /// # Errors
    /// Returns [`ValidationError::NotRegistered`], [`ValidationError::BadSignature`],
    /// [`ValidationError::Expired`] or [`ValidationError::MalformedClaims`].
    pub fn validate(&self, token: &str) -> Result<Identity, ValidationError> {
        if !self.registry.contains(token) {
            return Err(self.reject(token, ValidationError::NotRegistered));
        }

        let data = self.key.verify(token).map_err(|err| {
            error!("Couldn't parse token: {err}");
            let kind = match err.kind() {
                ErrorKind::ExpiredSignature => ValidationError::Expired,
                _ => ValidationError::BadSignature,
            };
            self.reject(token, kind)
        })?;

        match data.claims.get("email").and_then(Value::as_str) {
            Some(email) => {
                debug!("token validated");
                Ok(Identity {
                    email: email.to_string(),
                })
            }
            None => Err(self.reject(token, ValidationError::MalformedClaims)),
        }
    }

    fn reject(&self, token: &str, err: ValidationError) -> ValidationError {
        error!("Token validation failed: {err}");
        self.registry.remove(token);
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::{Claims, TokenIssuer};
    use jsonwebtoken::{encode, get_current_timestamp, EncodingKey, Header};
    use secrecy::SecretString;
    use serde_json::json;

    struct Fixture {
        registry: Arc<SessionRegistry>,
        issuer: TokenIssuer,
        validator: TokenValidator,
    }

    fn fixture() -> Fixture {
        let registry = Arc::new(SessionRegistry::new());
        Fixture {
            issuer: TokenIssuer::new(SigningKey::default(), "60", Arc::clone(&registry)),
            validator: TokenValidator::new(SigningKey::default(), Arc::clone(&registry)),
            registry,
        }
    }

    #[test]
    fn issued_token_validates_repeatedly() -> anyhow::Result<()> {
        let f = fixture();
        let token = f.issuer.issue("kari.karttinen@foo.com")?;

        for _ in 0..3 {
            let identity = f.validator.validate(&token)?;
            assert_eq!(identity.email, "kari.karttinen@foo.com");
        }
        assert!(f.registry.contains(&token));
        Ok(())
    }

    #[test]
    fn unregistered_token_is_rejected_even_if_signature_is_valid() -> anyhow::Result<()> {
        let f = fixture();
        let token = f.issuer.issue("kari.karttinen@foo.com")?;
        f.registry.remove(&token);

        assert_eq!(
            f.validator.validate(&token),
            Err(ValidationError::NotRegistered)
        );
        // The cryptographic half alone would still accept it.
        assert!(SigningKey::default().verify(&token).is_ok());
        Ok(())
    }

    #[test]
    fn token_minted_elsewhere_is_not_registered() -> anyhow::Result<()> {
        let f = fixture();
        let forged = SigningKey::default().sign(&Claims {
            email: "mallory@foo.com".to_string(),
            exp: get_current_timestamp() + 60,
        })?;
        assert_eq!(
            f.validator.validate(&forged),
            Err(ValidationError::NotRegistered)
        );
        Ok(())
    }

    #[test]
    fn expired_token_is_rejected_and_forgotten() -> anyhow::Result<()> {
        let f = fixture();
        let token = SigningKey::default().sign(&Claims {
            email: "kari.karttinen@foo.com".to_string(),
            exp: get_current_timestamp() - 10,
        })?;
        f.registry.insert(&token);

        assert_eq!(f.validator.validate(&token), Err(ValidationError::Expired));
        assert!(!f.registry.contains(&token));
        Ok(())
    }

    #[test]
    fn bad_signature_is_rejected_and_forgotten() -> anyhow::Result<()> {
        let f = fixture();
        let other = SigningKey::new(SecretString::from("not-the-secret".to_string()));
        let token = other.sign(&Claims {
            email: "kari.karttinen@foo.com".to_string(),
            exp: get_current_timestamp() + 60,
        })?;
        f.registry.insert(&token);

        assert_eq!(
            f.validator.validate(&token),
            Err(ValidationError::BadSignature)
        );
        assert!(!f.registry.contains(&token));
        Ok(())
    }

    #[test]
    fn garbage_token_is_bad_signature() {
        let f = fixture();
        f.registry.insert("not.a.jwt");
        assert_eq!(
            f.validator.validate("not.a.jwt"),
            Err(ValidationError::BadSignature)
        );
        assert!(f.registry.is_empty());
    }

    #[test]
    fn missing_or_non_string_email_is_malformed() -> anyhow::Result<()> {
        let f = fixture();
        let exp = get_current_timestamp() + 60;
        for claims in [json!({ "exp": exp }), json!({ "email": 42, "exp": exp })] {
            let token = encode(
                &Header::default(),
                &claims,
                &EncodingKey::from_secret(crate::auth::token::DEFAULT_SIGNING_SECRET.as_bytes()),
            )?;
            f.registry.insert(&token);
            assert_eq!(
                f.validator.validate(&token),
                Err(ValidationError::MalformedClaims)
            );
            assert!(!f.registry.contains(&token));
        }
        Ok(())
    }

    #[test]
    fn failed_token_stays_rejected() -> anyhow::Result<()> {
        let f = fixture();
        let token = SigningKey::default().sign(&Claims {
            email: "kari.karttinen@foo.com".to_string(),
            exp: get_current_timestamp() - 1,
        })?;
        f.registry.insert(&token);
        assert_eq!(f.validator.validate(&token), Err(ValidationError::Expired));
        assert_eq!(
            f.validator.validate(&token),
            Err(ValidationError::NotRegistered)
        );
        Ok(())
    }
}
