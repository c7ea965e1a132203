use axum::{extract::Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};
use utoipa::ToSchema;

use super::{non_empty, ErrorResponse, MSG_VALIDATION_FAILED, RET_OK};
use crate::auth::AuthState;

pub const MSG_CREDENTIALS_OK: &str = "Credentials ok";
pub const MSG_BAD_CREDENTIALS: &str =
    "Credentials are not good - either email or password is not correct";
pub const MSG_TOKEN_FAILED: &str = "Could not create json web token";

#[derive(ToSchema, Serialize, Deserialize, Default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct LoginResponse {
    pub ret: String,
    pub msg: String,
    #[serde(rename = "json-web-token")]
    pub json_web_token: String,
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse, content_type = "application/json"),
        (status = 400, description = "Missing fields, bad credentials or token failure", body = ErrorResponse),
    ),
    tag = "auth"
)]
// axum handler for login
#[instrument(skip_all)]
pub async fn login(
    auth: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> Result<Json<LoginResponse>, ErrorResponse> {
    let Some(Json(request)) = payload else {
        warn!("Missing or unreadable payload");
        return Err(ErrorResponse::new(MSG_VALIDATION_FAILED));
    };

    debug!("request: {:?}", request);

    let (Some(email), Some(password)) = (non_empty(request.email), non_empty(request.password))
    else {
        warn!("{MSG_VALIDATION_FAILED}");
        return Err(ErrorResponse::new(MSG_VALIDATION_FAILED));
    };

    if !auth.credentials().check_credentials(&email, &password) {
        warn!("{MSG_BAD_CREDENTIALS}");
        return Err(ErrorResponse::new(MSG_BAD_CREDENTIALS));
    }

    match auth.issuer().issue(&email) {
        Ok(token) => Ok(Json(LoginResponse {
            ret: RET_OK.to_string(),
            msg: MSG_CREDENTIALS_OK.to_string(),
            json_web_token: token,
        })),
        Err(err) => {
            error!("Error creating json web token: {err}");
            Err(ErrorResponse::new(MSG_TOKEN_FAILED))
        }
    }
}
