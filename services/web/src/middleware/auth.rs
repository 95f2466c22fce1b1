use axum::{
    extract::{OriginalUri, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use bom_selector_utils::{ErrorResponse, SelectorError};

use crate::AppState;

pub const SESSION_COOKIE: &str = "bom_session";

/// Guard for every catalog and drawing route.
///
/// Browsers without a live session are sent to the login page; API clients
/// get a 401 with the JSON error envelope.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    if !state.config.auth.enabled {
        return next.run(request).await;
    }

    let username = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| state.sessions.validate(cookie.value()));

    // nested routers see a stripped uri
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.0.path().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    match username {
        Some(username) => {
            tracing::debug!(%username, "Session accepted");
            next.run(request).await
        }
        None if path.starts_with("/api/") => {
            let error = SelectorError::authentication("Missing or expired session");
            (StatusCode::UNAUTHORIZED, Json(ErrorResponse::from(error))).into_response()
        }
        None => Redirect::to("/login").into_response(),
    }
}
