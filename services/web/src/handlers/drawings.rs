//! Panel drawing pages: folder dropdown, PDF list and inline preview.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use bom_selector_utils::{DrawingFile, SelectorError};

use super::pages::status_of;
use super::{render_page, run_blocking, Alert, Chrome};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DrawingsQuery {
    pub folder: Option<String>,
    pub file: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DownloadQuery {
    #[serde(default)]
    pub download: bool,
}

#[derive(Serialize)]
struct FolderOption {
    name: String,
    selected: bool,
}

#[derive(Serialize)]
struct FileLink {
    href: String,
    name: String,
    size_kb: String,
}

#[derive(Serialize)]
struct Preview {
    name: String,
    href: String,
}

#[derive(Serialize)]
struct DrawingsPage {
    #[serde(flatten)]
    chrome: Chrome,
    folders: Vec<FolderOption>,
    files: Vec<FileLink>,
    preview: Option<Preview>,
}

/// GET /drawings
pub async fn drawings_page(State(state): State<AppState>, Query(query): Query<DrawingsQuery>) -> Response {
    let mut page = DrawingsPage {
        chrome: Chrome::new(&state, "Panel Drawings", None),
        folders: Vec::new(),
        files: Vec::new(),
        preview: None,
    };

    let drawings = state.drawings.clone();
    let folders = match run_blocking(move || drawings.list_folders()).await {
        Ok(folders) => folders,
        Err(e) => {
            page.chrome.alerts.push(Alert::from_error(&e));
            return render_page(&state, status_of(&e), "drawings", &page);
        }
    };

    let Some(folder) = query.folder.or_else(|| folders.first().cloned()) else {
        page.chrome.alerts.push(Alert::info("No drawing folders found."));
        return render_page(&state, StatusCode::OK, "drawings", &page);
    };

    page.folders = folders
        .iter()
        .map(|name| FolderOption {
            selected: *name == folder,
            name: name.clone(),
        })
        .collect();

    let drawings = state.drawings.clone();
    let listed = folder.clone();
    let files = match run_blocking(move || drawings.list_pdfs(&listed)).await {
        Ok(files) => files,
        Err(e) => {
            page.chrome.alerts.push(Alert::from_error(&e));
            return render_page(&state, status_of(&e), "drawings", &page);
        }
    };

    if files.is_empty() {
        page.chrome
            .alerts
            .push(Alert::info(format!("No PDF files found in {}.", folder)));
    }

    if let Some(file) = query.file.filter(|file| !file.is_empty()) {
        match files.iter().find(|candidate| candidate.name == file) {
            Some(found) => {
                page.preview = Some(Preview {
                    name: found.name.clone(),
                    href: file_href(found),
                })
            }
            None => page
                .chrome
                .alerts
                .push(Alert::from_error(&SelectorError::not_found(format!("{}/{}", folder, file)))),
        }
    }

    page.files = files
        .iter()
        .map(|file| FileLink {
            href: format!(
                "/drawings?folder={}&file={}",
                urlencoding::encode(&file.folder),
                urlencoding::encode(&file.name)
            ),
            name: file.name.clone(),
            size_kb: format!("{:.1}", file.size_bytes as f64 / 1024.0),
        })
        .collect();

    render_page(&state, StatusCode::OK, "drawings", &page)
}

/// GET /drawings/{folder}/{file}
pub async fn serve_drawing(
    State(state): State<AppState>,
    Path((folder, file)): Path<(String, String)>,
    Query(query): Query<DownloadQuery>,
) -> Response {
    let drawings = state.drawings.clone();
    let name = file.clone();

    match run_blocking(move || drawings.read_pdf(&folder, &file)).await {
        Ok(bytes) => {
            let disposition = if query.download { "attachment" } else { "inline" };
            (
                [
                    (header::CONTENT_TYPE, "application/pdf".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("{}; filename=\"{}\"", disposition, header_safe(&name)),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Drawing not served");
            (status_of(&e), e.user_message()).into_response()
        }
    }
}

fn file_href(file: &DrawingFile) -> String {
    format!(
        "/drawings/{}/{}",
        urlencoding::encode(&file.folder),
        urlencoding::encode(&file.name)
    )
}

/// Header values must be visible ASCII; quotes would end the filename early.
fn header_safe(name: &str) -> String {
    name.chars()
        .map(|c| if (c.is_ascii_graphic() && c != '"') || c == ' ' { c } else { '_' })
        .collect()
}
