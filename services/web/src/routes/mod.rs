use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers::*, AppState};

/// JSON routes, nested under `/api/v1`.
pub fn create_api_routes() -> Router<AppState> {
    Router::new()
        .route("/health/detailed", get(detailed_health_check))
        .route("/catalogs", get(list_catalogs))
        .route("/catalogs/:tab/entries", get(list_entries))
        .route("/catalogs/:tab/components/:code", get(get_components))
        .route("/catalogs/:tab/bom", post(create_bom))
        .route("/catalogs/:tab/bom/export", post(export_bom))
        .route("/uploads", post(upload_catalog_api))
        .route("/drawings", get(list_drawing_folders))
        .route("/drawings/:folder", get(list_drawings))
}

/// HTML form pages.
pub fn create_page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/uploads", post(upload_catalog))
        .route("/catalogs/:tab", get(catalog_page))
        .route("/catalogs/:tab/bom", post(submit_bom))
        .route("/catalogs/:tab/bom/download", post(download_bom))
        .route("/drawings", get(drawings_page))
        .route("/drawings/:folder/:file", get(serve_drawing))
}

/// Routes reachable without a session.
pub fn create_public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/login", get(login_page).post(login))
        .route("/logout", post(logout))
}
