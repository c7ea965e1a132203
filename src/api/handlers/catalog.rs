//! Protected catalog endpoints.
//!
//! Each handler authenticates the caller before touching the catalog.

use axum::{
    extract::{Extension, Path},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::Arc};
use tracing::{debug, instrument};
use utoipa::ToSchema;

use super::{require_auth, ErrorResponse, RET_OK};
use crate::{
    auth::AuthState,
    catalog::{DomainDb, ProductSummary, RawProduct},
};

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ProductGroupsResponse {
    #[serde(rename = "product-groups")]
    pub product_groups: BTreeMap<String, String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ProductsResponse {
    pub ret: String,
    #[schema(value_type = Vec<Vec<String>>)]
    pub products: Vec<ProductSummary>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ProductResponse {
    pub ret: String,
    #[schema(value_type = Vec<String>)]
    pub product: RawProduct,
}

#[utoipa::path(
    get,
    path = "/product-groups",
    responses(
        (status = 200, description = "Product group ids and names", body = ProductGroupsResponse),
        (status = 400, description = "Missing or invalid token", body = ErrorResponse),
    ),
    security(("basic_token" = [])),
    tag = "catalog"
)]
#[instrument(skip_all)]
pub async fn product_groups(
    headers: HeaderMap,
    auth: Extension<Arc<AuthState>>,
    catalog: Extension<Arc<DomainDb>>,
) -> Result<Json<ProductGroupsResponse>, ErrorResponse> {
    let identity = require_auth(&headers, &auth)?;
    debug!(email = %identity.email, "product groups requested");

    Ok(Json(ProductGroupsResponse {
        product_groups: catalog.product_groups().clone(),
    }))
}

#[utoipa::path(
    get,
    path = "/products/{pg_id}",
    params(("pg_id" = u32, Path, description = "Product group id")),
    responses(
        (status = 200, description = "Products of the group: id, group id, title, price", body = ProductsResponse),
        (status = 400, description = "Missing or invalid token, or unknown group", body = ErrorResponse),
    ),
    security(("basic_token" = [])),
    tag = "catalog"
)]
#[instrument(skip_all)]
pub async fn products(
    headers: HeaderMap,
    auth: Extension<Arc<AuthState>>,
    catalog: Extension<Arc<DomainDb>>,
    Path(pg_id): Path<String>,
) -> Result<Json<ProductsResponse>, ErrorResponse> {
    let identity = require_auth(&headers, &auth)?;
    debug!(email = %identity.email, "products requested");

    let not_found = || ErrorResponse::new(format!("Product group not found: {pg_id}"));
    let products = pg_id
        .parse::<u32>()
        .ok()
        .and_then(|id| catalog.products(id))
        .ok_or_else(not_found)?;

    Ok(Json(ProductsResponse {
        ret: RET_OK.to_string(),
        products,
    }))
}

#[utoipa::path(
    get,
    path = "/product/{pg_id}/{p_id}",
    params(
        ("pg_id" = u32, Path, description = "Product group id"),
        ("p_id" = u32, Path, description = "Product id"),
    ),
    responses(
        (status = 200, description = "All product fields", body = ProductResponse),
        (status = 400, description = "Missing or invalid token, or unknown product", body = ErrorResponse),
    ),
    security(("basic_token" = [])),
    tag = "catalog"
)]
#[instrument(skip_all)]
pub async fn product(
    headers: HeaderMap,
    auth: Extension<Arc<AuthState>>,
    catalog: Extension<Arc<DomainDb>>,
    Path((pg_id, p_id)): Path<(String, String)>,
) -> Result<Json<ProductResponse>, ErrorResponse> {
    let identity = require_auth(&headers, &auth)?;
    debug!(email = %identity.email, "product requested");

    let product = match (pg_id.parse::<u32>(), p_id.parse::<u32>()) {
        (Ok(pg), Ok(p)) => catalog.product(pg, p).cloned(),
        _ => None,
    }
    .ok_or_else(|| ErrorResponse::new(format!("Product not found: {pg_id}/{p_id}")))?;

    Ok(Json(ProductResponse {
        ret: RET_OK.to_string(),
        product,
    }))
}
