use super::handlers::{catalog, health, info, login, signin, ErrorResponse};
use axum::Json;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        info::info,
        signin::signin,
        login::login,
        catalog::product_groups,
        catalog::products,
        catalog::product,
    ),
    components(schemas(ErrorResponse)),
    modifiers(&BasicToken),
    tags(
        (name = "simpleserver", description = "Service metadata"),
        (name = "auth", description = "Signup and login"),
        (name = "catalog", description = "Product catalog, requires a session token"),
    )
)]
pub struct ApiDoc;

/// Session tokens travel as `Authorization: Basic <base64(token)>`.
struct BasicToken;

impl Modify for BasicToken {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "basic_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Basic)
                        .description(Some("base64 encoded json web token from /login"))
                        .build(),
                ),
            );
        }
    }
}

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

// axum handler for the OpenAPI document
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi())
}
