//! JSON API
//!
//! The catalog, BOM and drawing operations for programmatic clients. Every
//! request loads its workbook afresh; nothing about a selection is kept.

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

use bom_selector_models::{CatalogEntry, CatalogSummary, ComponentView, FinalBom, SelectionRequest};
use bom_selector_utils::{
    bom::{load_catalog, load_components, run_pipeline, write_xlsx, WorkbookSource, XLSX_CONTENT_TYPE},
    validate_file_size, validate_file_type, DrawingFile, SelectorError, SelectorResult,
};

use super::{run_blocking, ApiResult};
use crate::{metrics, AppState};

const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub tab: String,
    pub file_name: String,
    pub entries: usize,
}

/// GET /api/v1/catalogs
pub async fn list_catalogs(State(state): State<AppState>) -> Json<Vec<CatalogSummary>> {
    Json(state.catalog_summaries())
}

/// GET /api/v1/catalogs/{tab}/entries
pub async fn list_entries(
    State(state): State<AppState>,
    Path(tab): Path<String>,
) -> ApiResult<Json<Vec<CatalogEntry>>> {
    let source = state.catalog_source(&tab)?;
    let catalog = run_blocking(move || load_catalog(&source)).await?;
    Ok(Json(catalog.entries().to_vec()))
}

/// GET /api/v1/catalogs/{tab}/components/{code}
pub async fn get_components(
    State(state): State<AppState>,
    Path((tab, code)): Path<(String, String)>,
) -> ApiResult<Json<ComponentView>> {
    let source = state.catalog_source(&tab)?;
    let components = run_blocking(move || load_components(&source, &code)).await?;
    Ok(Json(components.view()))
}

/// POST /api/v1/catalogs/{tab}/bom
pub async fn create_bom(
    State(state): State<AppState>,
    Path(tab): Path<String>,
    Json(request): Json<SelectionRequest>,
) -> ApiResult<Json<FinalBom>> {
    Ok(Json(build_bom(&state, tab, request).await?))
}

/// POST /api/v1/catalogs/{tab}/bom/export
pub async fn export_bom(
    State(state): State<AppState>,
    Path(tab): Path<String>,
    Json(request): Json<SelectionRequest>,
) -> ApiResult<Response> {
    let (file_name, bytes) = export_workbook(&state, tab, request).await?;
    Ok(xlsx_attachment(&file_name, bytes))
}

/// POST /api/v1/uploads
pub async fn upload_catalog_api(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
    let upload = receive_upload(&state, multipart).await?;
    Ok((StatusCode::CREATED, Json(upload)))
}

/// GET /api/v1/drawings
pub async fn list_drawing_folders(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    let drawings = state.drawings.clone();
    Ok(Json(run_blocking(move || drawings.list_folders()).await?))
}

/// GET /api/v1/drawings/{folder}
pub async fn list_drawings(
    State(state): State<AppState>,
    Path(folder): Path<String>,
) -> ApiResult<Json<Vec<DrawingFile>>> {
    let drawings = state.drawings.clone();
    Ok(Json(run_blocking(move || drawings.list_pdfs(&folder)).await?))
}

pub(crate) async fn build_bom(state: &AppState, tab: String, request: SelectionRequest) -> SelectorResult<FinalBom> {
    let source = state.catalog_source(&tab)?;
    run_blocking(move || run_pipeline(&tab, &source, &request)).await
}

/// Run the pipeline and serialize the result. Returns the download name and bytes.
pub(crate) async fn export_workbook(
    state: &AppState,
    tab: String,
    request: SelectionRequest,
) -> SelectorResult<(String, Vec<u8>)> {
    let source = state.catalog_source(&tab)?;
    let source_kind = source_kind(&source);

    let exported = run_blocking(move || {
        let bom = run_pipeline(&tab, &source, &request)?;
        let bytes = write_xlsx(&bom)?;
        Ok((bom.file_name(), bytes))
    })
    .await?;

    metrics::record_export(source_kind);
    Ok(exported)
}

pub(crate) fn xlsx_attachment(file_name: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", file_name)),
        ],
        bytes,
    )
        .into_response()
}

/// Read the `file` field, check it opens as a catalog, then store it.
pub(crate) async fn receive_upload(state: &AppState, mut multipart: Multipart) -> SelectorResult<UploadResponse> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| SelectorError::validation(UPLOAD_FIELD, format!("Failed to read upload: {}", e)))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| SelectorError::validation(UPLOAD_FIELD, format!("Failed to read file data: {}", e)))?;
        upload = Some((file_name, data.to_vec()));
        break;
    }

    let (file_name, data) = upload.ok_or_else(|| SelectorError::validation(UPLOAD_FIELD, "No file provided"))?;
    validate_file_type(&file_name, &["xlsx"])?;
    validate_file_size(data.len() as u64, state.config.server.max_request_size as u64)?;

    let check = WorkbookSource::upload(file_name.clone(), data.clone());
    let catalog = run_blocking(move || load_catalog(&check)).await?;

    let tab = state.uploads.insert(file_name.clone(), data);
    tracing::info!(%tab, file_name = %file_name, entries = catalog.len(), "Catalog uploaded");

    Ok(UploadResponse {
        tab,
        file_name,
        entries: catalog.len(),
    })
}

fn source_kind(source: &WorkbookSource) -> &'static str {
    match source {
        WorkbookSource::File(_) => "file",
        WorkbookSource::Upload { .. } => "upload",
    }
}
