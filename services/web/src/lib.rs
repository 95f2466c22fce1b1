//! BOM Selector web service
//!
//! HTML form UI and JSON API over the catalog workbooks, plus the panel
//! drawing browser, behind a session login.

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod templates;

pub use state::AppState;

use middleware::*;

pub fn create_app(state: AppState) -> Router {
    let max_request_size = state.config.server.max_request_size;

    let protected = Router::new()
        .merge(routes::create_page_routes())
        .nest("/api/v1", routes::create_api_routes())
        .route_layer(axum::middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .merge(protected)
        .merge(routes::create_public_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([Method::GET, Method::POST])
                        .allow_headers([header::CONTENT_TYPE]),
                )
                .layer(DefaultBodyLimit::max(max_request_size))
                .layer(axum::middleware::from_fn(request_id_middleware))
                .layer(axum::middleware::from_fn(error_handling_middleware)),
        )
        .with_state(state)
}
