//! Router assembly.

use std::sync::Arc;

use axum::http::{header, HeaderName, Method};
use axum::{routing::get, Router};
use tower::Layer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

use crate::handlers::data::{data_handler, DATA_ENDPOINT};
use crate::logging::create_http_trace_layer;
use crate::state::AppState;

/// CORS policy: any origin may GET
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers([
            header::ORIGIN,
            header::ACCEPT,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-requested-with"),
            HeaderName::from_static("x-csrf-token"),
        ])
}

/// Build the application, tolerating a trailing slash on every route
pub fn build_app(state: Arc<AppState>) -> NormalizePath<Router> {
    let router = Router::new()
        .route(DATA_ENDPOINT, get(data_handler))
        .layer(cors_layer())
        .layer(create_http_trace_layer())
        .with_state(state);

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
