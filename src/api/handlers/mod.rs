//! API handlers and the shared JSON response envelope.
//!
//! Every failure leaves this layer as `400 Bad Request` with a body of
//! `{"ret": "failed", "msg": ...}`, optionally extended with `email` for
//! signup errors.

pub mod catalog;
pub mod health;
pub mod info;
pub mod login;
pub mod signin;

use crate::auth::{AuthState, Identity, ValidationError};
use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

pub const RET_OK: &str = "ok";
pub const RET_FAILED: &str = "failed";

pub const MSG_VALIDATION_FAILED: &str = "Validation failed - some fields were empty";
pub const MSG_INVALID_TOKEN: &str = "Given token is not valid";

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub ret: String,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            ret: RET_FAILED.to_string(),
            msg: msg.into(),
            email: None,
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

impl From<ValidationError> for ErrorResponse {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::MissingHeader => Self::new(err.to_string()),
            _ => Self::new(MSG_INVALID_TOKEN),
        }
    }
}

/// Resolve the caller of a protected endpoint.
pub(crate) fn require_auth(headers: &HeaderMap, auth: &AuthState) -> Result<Identity, ErrorResponse> {
    auth.authenticate(headers).map_err(|err| {
        debug!("request rejected: {err}");
        ErrorResponse::from(err)
    })
}

/// Keep a field only if it was sent and is not empty.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_response_omits_missing_email() -> anyhow::Result<()> {
        let value = serde_json::to_value(ErrorResponse::new("boom"))?;
        assert_eq!(value, json!({ "ret": "failed", "msg": "boom" }));

        let value = serde_json::to_value(ErrorResponse::new("dup").with_email("a@x.com"))?;
        assert_eq!(
            value,
            json!({ "ret": "failed", "msg": "dup", "email": "a@x.com" })
        );
        Ok(())
    }

    #[test]
    fn error_response_is_bad_request() {
        let response = ErrorResponse::new("nope").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn token_errors_map_to_messages() {
        assert_eq!(
            ErrorResponse::from(ValidationError::MissingHeader).msg,
            "Authorization not found in the header parameters"
        );
        for err in [
            ValidationError::BadEncoding,
            ValidationError::NotRegistered,
            ValidationError::BadSignature,
            ValidationError::Expired,
            ValidationError::MalformedClaims,
        ] {
            assert_eq!(ErrorResponse::from(err).msg, MSG_INVALID_TOKEN);
        }
    }

    #[test]
    fn non_empty_filters_blank_fields() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(Some("x".to_string())), Some("x".to_string()));
    }

    #[test]
    fn json_keeps_html_characters() -> anyhow::Result<()> {
        let body = serde_json::to_string(&ErrorResponse::new("<b>&</b>"))?;
        assert!(body.contains("<b>&</b>"));
        Ok(())
    }
}
