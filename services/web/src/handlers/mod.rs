pub mod api;
pub mod auth;
pub mod drawings;
pub mod forms;
pub mod health;
pub mod pages;

pub use api::*;
pub use auth::*;
pub use drawings::*;
pub use health::*;
pub use pages::*;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
};
use bom_selector_utils::{ErrorResponse, SelectorError, SelectorResult};
use serde::Serialize;

use crate::AppState;

/// `SelectorError` as a JSON response with the matching status code.
#[derive(Debug)]
pub struct ApiError(pub SelectorError);

impl From<SelectorError> for ApiError {
    fn from(error: SelectorError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorResponse::from(self.0))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Run workbook parsing off the async executor.
pub async fn run_blocking<T, F>(task: F) -> SelectorResult<T>
where
    F: FnOnce() -> SelectorResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| SelectorError::internal(format!("Worker task failed: {}", e)))?
}

#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub kind: &'static str,
    pub message: String,
}

impl Alert {
    pub fn info(message: impl Into<String>) -> Self {
        Self { kind: "info", message: message.into() }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: "success", message: message.into() }
    }

    /// Validation problems show as warnings, everything else as errors.
    pub fn from_error(error: &SelectorError) -> Self {
        tracing::warn!(code = error.error_code(), error = %error, "Recovered error shown to user");
        Self {
            kind: if error.is_warning() { "warning" } else { "error" },
            message: error.user_message(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NavLink {
    pub label: String,
    pub href: String,
    pub active: bool,
}

/// Fields every page passes to the header partial.
#[derive(Debug, Serialize)]
pub struct Chrome {
    pub title: String,
    pub nav: Vec<NavLink>,
    pub show_logout: bool,
    pub alerts: Vec<Alert>,
}

impl Chrome {
    pub fn new(state: &AppState, title: impl Into<String>, active_tab: Option<&str>) -> Self {
        let nav = state
            .catalog_summaries()
            .into_iter()
            .map(|summary| NavLink {
                href: catalog_href(&summary.tab),
                active: active_tab == Some(summary.tab.as_str()),
                label: summary.tab,
            })
            .collect();

        Self {
            title: title.into(),
            nav,
            show_logout: state.config.auth.enabled,
            alerts: Vec::new(),
        }
    }

    pub fn with_alert(mut self, alert: Alert) -> Self {
        self.alerts.push(alert);
        self
    }
}

pub fn catalog_href(tab: &str) -> String {
    format!("/catalogs/{}", urlencoding::encode(tab))
}

/// Render a page. A template failure becomes a bare 500.
pub fn render_page<T: Serialize>(state: &AppState, status: StatusCode, page: &str, context: &T) -> Response {
    match state.templates.render(page, context) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, page, "Template rendering failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}
