use axum::{http::Request, middleware::Next, response::Response};

use crate::metrics;

/// Log and count every error response leaving the service.
pub async fn error_handling_middleware(request: Request<axum::body::Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;
    let status = response.status();

    if status.is_server_error() {
        tracing::error!(%method, %path, status = status.as_u16(), "Request failed");
        metrics::record_failure(status.as_str());
    } else if status.is_client_error() {
        tracing::warn!(%method, %path, status = status.as_u16(), "Request rejected");
        metrics::record_failure(status.as_str());
    }

    response
}
