use crate::{auth::AuthState, catalog::DomainDb};
use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::{Extension, MatchedPath},
    http::{HeaderName, HeaderValue, Request},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;

pub mod handlers;
mod openapi;

pub use openapi::{openapi, ApiDoc};

use handlers::{catalog, health, info, login, signin};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the application router around shared auth and catalog state.
pub fn router(auth: Arc<AuthState>, catalog: Arc<DomainDb>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/info", get(info::info))
        .route("/openapi.json", get(openapi::openapi_json))
        .route("/signin", post(signin::signin))
        .route("/login", post(login::login))
        .route("/product-groups", get(catalog::product_groups))
        .route("/products/:pg_id", get(catalog::products))
        .route("/product/:pg_id/:p_id", get(catalog::product))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static(REQUEST_ID_HEADER),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    REQUEST_ID_HEADER,
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(auth))
                .layer(Extension(catalog)),
        )
}

/// Start the server
/// # Errors
/// Return error if failed to bind or serve
pub async fn new(port: u16, auth: Arc<AuthState>, catalog: Arc<DomainDb>) -> Result<()> {
    let app = router(auth, catalog);

    let listener = TcpListener::bind(format!("::0:{port}"))
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {err}");
            }
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
