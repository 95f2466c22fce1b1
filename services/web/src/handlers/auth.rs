use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use validator::Validate;

use bom_selector_utils::{validate_model, SelectorError};

use super::{render_page, Alert, Chrome};
use crate::middleware::SESSION_COOKIE;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
struct LoginPage {
    #[serde(flatten)]
    chrome: Chrome,
    username: String,
}

/// GET /login
pub async fn login_page(State(state): State<AppState>, jar: CookieJar) -> Response {
    if !state.config.auth.enabled || has_session(&state, &jar) {
        return Redirect::to("/").into_response();
    }
    render_login(&state, StatusCode::OK, String::new(), None)
}

/// POST /login
pub async fn login(State(state): State<AppState>, jar: CookieJar, Form(form): Form<LoginForm>) -> Response {
    if let Err(e) = validate_model(&form) {
        return render_login(&state, StatusCode::BAD_REQUEST, form.username, Some(Alert::from_error(&e)));
    }

    // argon2 verification is CPU-bound
    let credentials = Arc::clone(&state.credentials);
    let username = form.username.clone();
    let verified = tokio::task::spawn_blocking(move || credentials.verify(&username, &form.password))
        .await
        .unwrap_or(false);

    if !verified {
        let error = SelectorError::authentication("Invalid username or password");
        return render_login(&state, StatusCode::UNAUTHORIZED, form.username, Some(Alert::from_error(&error)));
    }

    let session_id = state.sessions.create(&form.username);
    tracing::info!(username = %form.username, "Login accepted");

    let cookie = Cookie::build((SESSION_COOKIE, session_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    (jar.add(cookie), Redirect::to("/")).into_response()
}

/// POST /logout
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.remove(cookie.value());
    }
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Redirect::to("/login")).into_response()
}

fn has_session(state: &AppState, jar: &CookieJar) -> bool {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| state.sessions.validate(cookie.value()))
        .is_some()
}

fn render_login(state: &AppState, status: StatusCode, username: String, alert: Option<Alert>) -> Response {
    let mut chrome = Chrome::new(state, "Log in", None);
    chrome.nav.clear();
    chrome.show_logout = false;
    chrome.alerts.extend(alert);

    render_page(state, status, "login", &LoginPage { chrome, username })
}
