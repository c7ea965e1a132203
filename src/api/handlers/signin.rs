use axum::{extract::Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use utoipa::ToSchema;

use super::{non_empty, ErrorResponse, MSG_VALIDATION_FAILED, RET_OK};
use crate::auth::AuthState;

#[derive(ToSchema, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct SigninRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl std::fmt::Debug for SigninRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigninRequest")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct SigninResponse {
    pub ret: String,
    pub email: String,
}

#[utoipa::path(
    post,
    path = "/signin",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "User created", body = SigninResponse, content_type = "application/json"),
        (status = 400, description = "Missing fields or email already registered", body = ErrorResponse),
    ),
    tag = "auth"
)]
// axum handler for signup
#[instrument(skip_all)]
pub async fn signin(
    auth: Extension<Arc<AuthState>>,
    payload: Option<Json<SigninRequest>>,
) -> Result<Json<SigninResponse>, ErrorResponse> {
    let Some(Json(request)) = payload else {
        warn!("Missing or unreadable payload");
        return Err(ErrorResponse::new(MSG_VALIDATION_FAILED));
    };

    debug!("request: {:?}", request);

    let (Some(first_name), Some(last_name), Some(email), Some(password)) = (
        non_empty(request.first_name),
        non_empty(request.last_name),
        non_empty(request.email),
        non_empty(request.password),
    ) else {
        warn!("{MSG_VALIDATION_FAILED}");
        return Err(ErrorResponse::new(MSG_VALIDATION_FAILED));
    };

    match auth
        .credentials()
        .add_user(&email, &first_name, &last_name, &password)
    {
        Ok(summary) => Ok(Json(SigninResponse {
            ret: RET_OK.to_string(),
            email: summary.email,
        })),
        Err(err) => Err(ErrorResponse::new(err.to_string()).with_email(err.email)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(first_name: Option<&str>) -> SigninRequest {
        SigninRequest {
            first_name: first_name.map(str::to_string),
            last_name: Some("Jamppanen".to_string()),
            email: Some("jamppa.jamppanen@foo.com".to_string()),
            password: Some("JampanSalasana".to_string()),
        }
    }

    #[tokio::test]
    async fn signin_creates_user_once() {
        let auth = Arc::new(AuthState::default());

        let first = signin(Extension(auth.clone()), Some(Json(request(Some("Jamppa"))))).await;
        assert_eq!(
            first.map(|Json(body)| body),
            Ok(SigninResponse {
                ret: "ok".to_string(),
                email: "jamppa.jamppanen@foo.com".to_string(),
            })
        );

        let second = signin(Extension(auth.clone()), Some(Json(request(Some("Jamppa"))))).await;
        assert_eq!(
            second.err(),
            Some(
                ErrorResponse::new("Email already exists: jamppa.jamppanen@foo.com")
                    .with_email("jamppa.jamppanen@foo.com")
            )
        );
    }

    #[tokio::test]
    async fn signin_rejects_missing_or_empty_fields() {
        let auth = Arc::new(AuthState::default());
        for first_name in [None, Some("")] {
            let result = signin(Extension(auth.clone()), Some(Json(request(first_name)))).await;
            assert_eq!(
                result.err(),
                Some(ErrorResponse::new(MSG_VALIDATION_FAILED))
            );
        }
        let result = signin(Extension(auth.clone()), None).await;
        assert_eq!(result.err(), Some(ErrorResponse::new(MSG_VALIDATION_FAILED)));
        assert!(!auth.credentials().email_exists("jamppa.jamppanen@foo.com"));
    }

    #[test]
    fn signin_request_uses_kebab_case_and_hides_password() -> anyhow::Result<()> {
        let request: SigninRequest = serde_json::from_str(
            r#"{"first-name":"A","last-name":"B","email":"a@x.com","password":"secret"}"#,
        )?;
        assert_eq!(request.first_name.as_deref(), Some("A"));
        assert_eq!(request.last_name.as_deref(), Some("B"));
        assert!(!format!("{request:?}").contains("secret"));
        Ok(())
    }
}
