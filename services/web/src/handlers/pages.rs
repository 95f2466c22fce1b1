//! HTML catalog pages
//!
//! Each catalog tab is a GET page (entry dropdown plus component table) and
//! two POST targets sharing one form body: the Final BOM preview and the
//! workbook download. Errors come back as alerts on the page that caused them.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::{Deserialize, Serialize};

use bom_selector_models::{format_number, FinalBom, SelectionRequest};
use bom_selector_utils::{
    bom::{catalog_components, Catalog, ComponentTable, WorkbookSource},
    SelectorError, SelectorResult,
};

use super::api::{build_bom, export_workbook, receive_upload, xlsx_attachment};
use super::forms::selection_from_form;
use super::{catalog_href, render_page, run_blocking, Alert, Chrome};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub code: Option<String>,
    /// Display label, resolved to its code when `code` is absent.
    pub label: Option<String>,
    #[serde(default)]
    pub select_all: bool,
}

#[derive(Serialize)]
struct CatalogLink {
    tab: String,
    href: String,
    source: String,
}

#[derive(Serialize)]
struct IndexPage {
    #[serde(flatten)]
    chrome: Chrome,
    catalogs: Vec<CatalogLink>,
}

#[derive(Serialize)]
struct EntryOption {
    code: String,
    label: String,
    selected: bool,
}

#[derive(Serialize)]
struct ComponentRow {
    index: usize,
    checked: bool,
    cells: Vec<String>,
}

#[derive(Serialize)]
struct ComponentsForm {
    code: String,
    headers: Vec<String>,
    rows: Vec<ComponentRow>,
}

#[derive(Serialize)]
struct CatalogPage {
    #[serde(flatten)]
    chrome: Chrome,
    tab: String,
    catalog_href: String,
    entries: Vec<EntryOption>,
    select_all: bool,
    components: Option<ComponentsForm>,
}

#[derive(Serialize)]
struct BomRow {
    index: usize,
    cells: Vec<String>,
}

#[derive(Serialize)]
struct TotalView {
    column: String,
    value: String,
}

#[derive(Serialize)]
struct PriceInput {
    row: usize,
    value: String,
}

#[derive(Serialize)]
struct BomPage {
    #[serde(flatten)]
    chrome: Chrome,
    tab: String,
    catalog_href: String,
    code: String,
    headers: Vec<String>,
    rows: Vec<BomRow>,
    total: Option<TotalView>,
    prices: Vec<PriceInput>,
    back_href: String,
}

/// What the catalog page should show selected.
#[derive(Debug, Default)]
struct PageSelection {
    code: Option<String>,
    label: Option<String>,
    select_all: bool,
    rows: Option<Vec<usize>>,
}

impl From<&SelectionRequest> for PageSelection {
    fn from(request: &SelectionRequest) -> Self {
        Self {
            code: Some(request.code.clone()).filter(|code| !code.is_empty()),
            label: None,
            select_all: request.select_all,
            rows: request.rows.clone(),
        }
    }
}

struct CatalogView {
    catalog: Catalog,
    code: Option<String>,
    components: Option<SelectorResult<ComponentTable>>,
}

pub async fn index(State(state): State<AppState>) -> Response {
    render_index(&state, StatusCode::OK, None)
}

/// GET /catalogs/{tab}
pub async fn catalog_page(
    State(state): State<AppState>,
    Path(tab): Path<String>,
    Query(query): Query<CatalogQuery>,
) -> Response {
    let selection = PageSelection {
        code: query.code.filter(|code| !code.trim().is_empty()),
        label: query.label.filter(|label| !label.is_empty()),
        select_all: query.select_all,
        rows: None,
    };
    render_catalog(&state, &tab, selection, StatusCode::OK, Vec::new()).await
}

/// POST /catalogs/{tab}/bom
pub async fn submit_bom(
    State(state): State<AppState>,
    Path(tab): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let request = match selection_from_form(&pairs) {
        Ok(request) => request,
        Err(e) => return render_form_error(&state, &tab, &pairs, e).await,
    };

    match build_bom(&state, tab.clone(), request.clone()).await {
        Ok(bom) => render_bom(&state, &bom),
        Err(e) => {
            let status = status_of(&e);
            render_catalog(&state, &tab, PageSelection::from(&request), status, vec![Alert::from_error(&e)]).await
        }
    }
}

/// POST /catalogs/{tab}/bom/download
pub async fn download_bom(
    State(state): State<AppState>,
    Path(tab): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let request = match selection_from_form(&pairs) {
        Ok(request) => request,
        Err(e) => return render_form_error(&state, &tab, &pairs, e).await,
    };

    match export_workbook(&state, tab.clone(), request.clone()).await {
        Ok((file_name, bytes)) => xlsx_attachment(&file_name, bytes),
        Err(e) => {
            let status = status_of(&e);
            render_catalog(&state, &tab, PageSelection::from(&request), status, vec![Alert::from_error(&e)]).await
        }
    }
}

/// POST /uploads
pub async fn upload_catalog(State(state): State<AppState>, multipart: Multipart) -> Response {
    match receive_upload(&state, multipart).await {
        Ok(upload) => Redirect::to(&catalog_href(&upload.tab)).into_response(),
        Err(e) => render_index(&state, status_of(&e), Some(Alert::from_error(&e))),
    }
}

pub(crate) fn status_of(error: &SelectorError) -> StatusCode {
    StatusCode::from_u16(error.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn render_index(state: &AppState, status: StatusCode, alert: Option<Alert>) -> Response {
    let mut chrome = Chrome::new(state, "Catalogs", None);
    chrome.alerts.extend(alert);

    let catalogs = state
        .catalog_summaries()
        .into_iter()
        .map(|summary| CatalogLink {
            href: catalog_href(&summary.tab),
            tab: summary.tab,
            source: summary.source,
        })
        .collect();

    render_page(state, status, "index", &IndexPage { chrome, catalogs })
}

async fn render_form_error(
    state: &AppState,
    tab: &str,
    pairs: &[(String, String)],
    error: SelectorError,
) -> Response {
    let selection = PageSelection {
        code: pairs
            .iter()
            .find(|(key, _)| key == "code")
            .map(|(_, value)| value.trim().to_string())
            .filter(|code| !code.is_empty()),
        ..Default::default()
    };
    render_catalog(state, tab, selection, status_of(&error), vec![Alert::from_error(&error)]).await
}

async fn render_catalog(
    state: &AppState,
    tab: &str,
    selection: PageSelection,
    status: StatusCode,
    alerts: Vec<Alert>,
) -> Response {
    let mut chrome = Chrome::new(state, format!("{} BOM Selection", tab), Some(tab));
    chrome.alerts.extend(alerts);

    let mut page = CatalogPage {
        chrome,
        tab: tab.to_string(),
        catalog_href: catalog_href(tab),
        entries: Vec::new(),
        select_all: selection.select_all,
        components: None,
    };

    let source = match state.catalog_source(tab) {
        Ok(source) => source,
        Err(e) => {
            page.chrome.alerts.push(Alert::from_error(&e));
            return render_page(state, status_of(&e), "catalog", &page);
        }
    };

    let view = match run_blocking(move || load_catalog_view(&source, selection)).await {
        Ok(view) => view,
        Err(e) => {
            page.chrome.alerts.push(Alert::from_error(&e));
            return render_page(state, status_of(&e), "catalog", &page);
        }
    };

    if view.catalog.is_empty() {
        page.chrome
            .alerts
            .push(Alert::info(format!("No BOM entries found in {}.", tab)));
    }

    page.entries = view
        .catalog
        .entries()
        .iter()
        .map(|entry| EntryOption {
            selected: view.code.as_deref() == Some(entry.code.as_str()),
            code: entry.code.clone(),
            label: entry.label.clone(),
        })
        .collect();

    match view.components {
        Some(Ok(components)) => page.components = Some(components_form(&components)),
        Some(Err(e)) => page.chrome.alerts.push(Alert::from_error(&e)),
        None => {}
    }

    render_page(state, status, "catalog", &page)
}

/// Entries plus, for the chosen code, the component sheet with the
/// requested rows ticked. Without a code the first entry is shown.
fn load_catalog_view(source: &WorkbookSource, selection: PageSelection) -> SelectorResult<CatalogView> {
    let mut workbook = source.open()?;
    let catalog = Catalog::load(&mut workbook)?;

    let chosen = match (selection.code, selection.label) {
        (Some(code), _) => Some(Ok(code)),
        (None, Some(label)) => Some(catalog.resolve(&label).map(str::to_string)),
        (None, None) => catalog.entries().first().map(|entry| Ok(entry.code.clone())),
    };

    let (code, components) = match chosen {
        Some(Ok(code)) => {
            let components = catalog_components(&mut workbook, &catalog, &code).map(|mut components| {
                components.toggle_all(selection.select_all);
                if let Some(rows) = &selection.rows {
                    components.restore_selection(rows);
                }
                components
            });
            (Some(code), Some(components))
        }
        Some(Err(e)) => (None, Some(Err(e))),
        None => (None, None),
    };

    Ok(CatalogView {
        catalog,
        code,
        components,
    })
}

fn components_form(components: &ComponentTable) -> ComponentsForm {
    let table = components.table();
    ComponentsForm {
        code: components.code().to_string(),
        headers: table.headers.clone(),
        rows: table
            .rows
            .iter()
            .enumerate()
            .map(|(index, cells)| ComponentRow {
                index,
                checked: components.is_included(index),
                cells: cells.iter().map(ToString::to_string).collect(),
            })
            .collect(),
    }
}

fn render_bom(state: &AppState, bom: &FinalBom) -> Response {
    let chrome = Chrome::new(state, format!("{} Final BOM", bom.tab), Some(&bom.tab)).with_alert(Alert::success(
        format!("Final Bill of Material: {} rows selected.", bom.row_count()),
    ));

    let page = BomPage {
        chrome,
        tab: bom.tab.clone(),
        catalog_href: catalog_href(&bom.tab),
        code: bom.code.clone(),
        headers: bom.table.headers.clone(),
        rows: bom
            .source_rows
            .iter()
            .zip(&bom.table.rows)
            .map(|(&index, cells)| BomRow {
                index,
                cells: cells.iter().map(ToString::to_string).collect(),
            })
            .collect(),
        total: bom.total.as_ref().map(|total| TotalView {
            column: total.column.clone(),
            value: format_number(total.value),
        }),
        prices: bom
            .price_cells()
            .into_iter()
            .map(|cell| PriceInput {
                row: cell.row,
                value: cell.value.to_string(),
            })
            .collect(),
        back_href: format!("{}?code={}", catalog_href(&bom.tab), urlencoding::encode(&bom.code)),
    };

    render_page(state, StatusCode::OK, "bom", &page)
}
