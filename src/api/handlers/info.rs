use axum::response::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const INFO_MESSAGE: &str = "index.html => Info in HTML format";

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct InfoMessage {
    pub info: String,
}

#[utoipa::path(
    get,
    path = "/info",
    responses(
        (status = 200, description = "Static service info", body = InfoMessage, content_type = "application/json"),
    ),
    tag = "simpleserver"
)]
pub async fn info() -> Json<InfoMessage> {
    Json(InfoMessage {
        info: INFO_MESSAGE.to_string(),
    })
}
