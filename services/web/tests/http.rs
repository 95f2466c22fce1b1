use std::io::Cursor;
use std::path::Path;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use calamine::{open_workbook_from_rs, DataType, Reader, Xlsx};
use rust_xlsxwriter::Workbook;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use bom_selector_utils::{AppConfig, CatalogConfig};
use bom_selector_web::{create_app, AppState};

const BOUNDARY: &str = "bom-selector-test-boundary";

struct TestApp {
    app: Router,
    _dir: TempDir,
}

impl TestApp {
    fn new(auth_enabled: bool) -> Self {
        Self::with_config(auth_enabled, |_, _| {})
    }

    /// Same fixtures, with a chance to adjust the configuration first.
    fn with_config(auth_enabled: bool, adjust: impl FnOnce(&mut AppConfig, &Path)) -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("closet.xlsx"), catalog_bytes()).unwrap();

        let drawings = dir.path().join("drawings");
        std::fs::create_dir_all(drawings.join("Smart Closet")).unwrap();
        std::fs::write(drawings.join("Smart Closet/panel-a.pdf"), b"%PDF-1.4 panel a").unwrap();
        std::fs::write(drawings.join("Smart Closet/notes.txt"), b"not a drawing").unwrap();
        std::fs::write(drawings.join("secret.pdf"), b"%PDF-1.4 secret").unwrap();

        let mut config = config(dir.path(), auth_enabled);
        adjust(&mut config, dir.path());
        let app = create_app(AppState::new(config).unwrap());
        Self { app, _dir: dir }
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.app.clone().oneshot(request).await.unwrap()
    }

    async fn get(&self, uri: &str) -> Response {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    async fn post_json(&self, uri: &str, body: Value) -> Response {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    async fn post_form(&self, uri: &str, body: &str) -> Response {
        self.send(form_request(uri, body)).await
    }

    async fn upload(&self, uri: &str, file_name: &str, data: &[u8]) -> Response {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }
}

fn config(dir: &Path, auth_enabled: bool) -> AppConfig {
    let mut config = AppConfig::default();
    config.catalogs = vec![CatalogConfig {
        label: "SmartCloset".into(),
        path: dir.join("closet.xlsx").display().to_string(),
    }];
    config.drawings.root = dir.join("drawings").display().to_string();
    config.drawings.folders = vec!["Smart Closet".into(), "Smart Row".into()];
    config.auth.enabled = auth_enabled;
    config.auth.username = "admin".into();
    config.auth.password = "secret".into();
    config
}

fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// `BOM` index with three coded rows and one blank-code row. `SC-404` has no sheet.
fn catalog_bytes() -> Vec<u8> {
    let mut workbook = Workbook::new();

    let index = workbook.add_worksheet();
    index.set_name("BOM").unwrap();
    index.write_string(0, 0, "Parent Code").unwrap();
    index.write_string(0, 1, "Description").unwrap();
    let entries = [("SC-200", "Closet 900"), ("SC-100", "Closet 600"), ("", "Orphan"), ("SC-404", "Missing sheet")];
    for (row, (code, description)) in entries.iter().enumerate() {
        let row = row as u32 + 1;
        if !code.is_empty() {
            index.write_string(row, 0, *code).unwrap();
        }
        index.write_string(row, 1, *description).unwrap();
    }

    let components = workbook.add_worksheet();
    components.set_name("SC-100").unwrap();
    for (column, header) in ["Part No", "Description", "Qty", "LP"].iter().enumerate() {
        components.write_string(0, column as u16, *header).unwrap();
    }
    let parts = [("P-1", "Hinge", 4.0, 12.0), ("P-2", "Rail", 2.0, 30.0), ("P-3", "Screw", 40.0, 0.5)];
    for (row, (part, description, qty, lp)) in parts.iter().enumerate() {
        let row = row as u32 + 1;
        components.write_string(row, 0, *part).unwrap();
        components.write_string(row, 1, *description).unwrap();
        components.write_number(row, 2, *qty).unwrap();
        components.write_number(row, 3, *lp).unwrap();
    }

    let other = workbook.add_worksheet();
    other.set_name("SC-200").unwrap();
    other.write_string(0, 0, "Part No").unwrap();
    other.write_string(0, 1, "Qty").unwrap();
    other.write_string(0, 2, "Remark").unwrap();
    other.write_string(1, 0, "P-9").unwrap();
    other.write_number(1, 1, 6.0).unwrap();
    other.write_string(1, 2, "spare").unwrap();

    workbook.save_to_buffer().unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn header_value(response: &Response, name: header::HeaderName) -> String {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new(true);
    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_pages_redirect_to_login_without_session() {
    let app = TestApp::new(true);
    let response = app.get("/catalogs/SmartCloset").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(header_value(&response, header::LOCATION), "/login");
}

#[tokio::test]
async fn test_api_rejects_missing_session() {
    let app = TestApp::new(true);
    let response = app.get("/api/v1/catalogs").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "AUTHENTICATION_ERROR");
}

#[tokio::test]
async fn test_login_opens_guarded_pages_and_logout_closes_them() {
    let app = TestApp::new(true);

    let response = app.post_form("/login", "username=admin&password=secret").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let set_cookie = header_value(&response, header::SET_COOKIE);
    assert!(set_cookie.starts_with("bom_session="));
    assert!(set_cookie.contains("HttpOnly"));
    let cookie = set_cookie.split(';').next().unwrap().to_string();

    let page = app
        .send(
            Request::builder()
                .uri("/catalogs/SmartCloset")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(page.status(), StatusCode::OK);
    assert!(body_text(page).await.contains("SC-100 | Closet 600"));

    let mut logout = form_request("/logout", "");
    logout.headers_mut().insert(header::COOKIE, cookie.parse().unwrap());
    assert_eq!(app.send(logout).await.status(), StatusCode::SEE_OTHER);

    let after = app
        .send(
            Request::builder()
                .uri("/api/v1/catalogs")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(after.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let app = TestApp::new(true);
    let response = app.post_form("/login", "username=admin&password=nope").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    assert!(body_text(response).await.contains("Invalid username or password"));
}

#[tokio::test]
async fn test_entries_are_sorted_and_skip_blank_codes() {
    let app = TestApp::new(false);
    let response = app.get("/api/v1/catalogs/SmartCloset/entries").await;
    assert_eq!(response.status(), StatusCode::OK);

    let entries = body_json(response).await;
    let labels: Vec<&str> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["label"].as_str().unwrap())
        .collect();
    assert_eq!(
        labels,
        vec!["SC-100 | Closet 600", "SC-200 | Closet 900", "SC-404 | Missing sheet"]
    );
    assert_eq!(entries[0]["code"], "SC-100");
}

#[tokio::test]
async fn test_unknown_tab_is_not_found() {
    let app = TestApp::new(false);
    let response = app.get("/api/v1/catalogs/Nowhere/entries").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_components_report_summable_and_price_columns() {
    let app = TestApp::new(false);

    let closet = body_json(app.get("/api/v1/catalogs/SmartCloset/components/SC-100").await).await;
    assert_eq!(closet["summable_column"], "LP");
    assert_eq!(closet["has_price_column"], true);
    assert_eq!(closet["rows"].as_array().unwrap().len(), 3);

    let other = body_json(app.get("/api/v1/catalogs/SmartCloset/components/SC-200").await).await;
    assert_eq!(other["summable_column"], "Qty");
    assert_eq!(other["has_price_column"], false);
}

#[tokio::test]
async fn test_missing_component_sheet_is_schema_error() {
    let app = TestApp::new(false);
    let response = app.get("/api/v1/catalogs/SmartCloset/components/SC-404").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "SCHEMA_ERROR");

    let response = app.get("/api/v1/catalogs/SmartCloset/components/SC-999").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_bom_with_select_all() {
    let app = TestApp::new(false);
    let response = app
        .post_json("/api/v1/catalogs/SmartCloset/bom", json!({ "code": "SC-100", "select_all": true }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let bom = body_json(response).await;
    assert_eq!(bom["source_rows"], json!([0, 1, 2]));
    assert_eq!(bom["total"]["column"], "LP");
    assert_eq!(bom["total"]["value"], 42.5);
}

#[tokio::test]
async fn test_export_contains_only_selected_rows_with_edited_prices() {
    let app = TestApp::new(false);
    let response = app
        .post_json(
            "/api/v1/catalogs/SmartCloset/bom/export",
            json!({ "code": "SC-100", "rows": [2, 0], "price_edits": { "2": 1.5, "1": 99.0 } }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header_value(&response, header::CONTENT_TYPE),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert!(header_value(&response, header::CONTENT_DISPOSITION).contains("SmartCloset_Final_BOM.xlsx"));

    let bytes = body_bytes(response).await;
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
    assert_eq!(workbook.sheet_names().to_vec(), vec!["Final BOM".to_string()]);

    let range = workbook.worksheet_range("Final BOM").unwrap().unwrap();
    assert_eq!(range.height(), 3);
    assert_eq!(range.get((0, 3)), Some(&DataType::String("LP".into())));
    assert_eq!(range.get((1, 0)), Some(&DataType::String("P-1".into())));
    assert_eq!(range.get((2, 0)), Some(&DataType::String("P-3".into())));
    assert_eq!(range.get((2, 3)), Some(&DataType::Float(1.5)));
}

#[tokio::test]
async fn test_empty_selection_warns_on_page_and_exports_nothing() {
    let app = TestApp::new(false);

    let response = app.post_form("/catalogs/SmartCloset/bom", "code=SC-100").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let html = body_text(response).await;
    assert!(html.contains("alert-warning"));
    assert!(html.contains("Please select at least one item to generate BOM."));

    let download = app.post_form("/catalogs/SmartCloset/bom/download", "code=SC-100").await;
    assert_eq!(download.status(), StatusCode::BAD_REQUEST);
    assert!(download.headers().get(header::CONTENT_DISPOSITION).is_none());
}

#[tokio::test]
async fn test_form_submit_renders_final_bom_and_total() {
    let app = TestApp::new(false);
    let response = app
        .post_form("/catalogs/SmartCloset/bom", "code=SC-100&rows=0&rows=1")
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Total LP: <code>42</code>"));
    assert!(html.contains("name=\"lp_1\""));
    assert!(!html.contains("Screw"));
}

#[tokio::test]
async fn test_form_download_uses_ticked_rows_over_select_all() {
    let app = TestApp::new(false);
    let response = app
        .post_form("/catalogs/SmartCloset/bom/download", "code=SC-100&select_all=true&rows=1&lp_1=31")
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(header_value(&response, header::CONTENT_DISPOSITION).starts_with("attachment"));

    let bytes = body_bytes(response).await;
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
    let range = workbook.worksheet_range("Final BOM").unwrap().unwrap();
    assert_eq!(range.height(), 2);
    assert_eq!(range.get((1, 0)), Some(&DataType::String("P-2".into())));
    assert_eq!(range.get((1, 3)), Some(&DataType::Float(31.0)));
}

#[tokio::test]
async fn test_catalog_page_shows_error_for_missing_sheet() {
    let app = TestApp::new(false);
    let response = app.get("/catalogs/SmartCloset?code=SC-404").await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("alert alert-error"));
    assert!(html.contains("SC-200 | Closet 900"));
}

#[tokio::test]
async fn test_missing_catalog_file_only_affects_its_tab() {
    let app = TestApp::with_config(false, |config, dir| {
        config.catalogs.push(CatalogConfig {
            label: "SmartRow".into(),
            path: dir.join("row.xlsx").display().to_string(),
        });
    });

    let response = app.get("/catalogs/SmartRow").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let html = body_text(response).await;
    assert!(html.contains("alert alert-error"));
    assert!(html.contains("row.xlsx"));

    let response = app.get("/api/v1/catalogs/SmartRow/entries").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");

    let response = app.get("/catalogs/SmartCloset").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("SC-100 | Closet 600"));

    let response = app.get("/drawings").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("panel-a.pdf"));
}

#[tokio::test]
async fn test_catalog_page_select_all_ticks_every_row() {
    let app = TestApp::new(false);
    let html = body_text(app.get("/catalogs/SmartCloset?code=SC-100&select_all=true").await).await;
    assert_eq!(html.matches("name=\"rows\"").count(), 3);
    assert_eq!(html.matches(" checked>").count(), 3);
}

#[tokio::test]
async fn test_upload_becomes_a_catalog() {
    let app = TestApp::new(false);
    let response = app.upload("/api/v1/uploads", "extra.xlsx", &catalog_bytes()).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let upload = body_json(response).await;
    let tab = upload["tab"].as_str().unwrap().to_string();
    assert!(tab.starts_with("upload-"));
    assert_eq!(upload["entries"], 3);

    let entries = body_json(app.get(&format!("/api/v1/catalogs/{}/entries", tab)).await).await;
    assert_eq!(entries.as_array().unwrap().len(), 3);

    let catalogs = body_json(app.get("/api/v1/catalogs").await).await;
    assert_eq!(catalogs[1]["kind"], "upload");
    assert_eq!(catalogs[1]["source"], "extra.xlsx");
}

#[tokio::test]
async fn test_upload_rejects_other_file_types() {
    let app = TestApp::new(false);
    let response = app.upload("/api/v1/uploads", "notes.csv", b"a,b\n1,2\n").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_html_upload_redirects_to_new_tab() {
    let app = TestApp::new(false);
    let response = app.upload("/uploads", "extra.xlsx", &catalog_bytes()).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(header_value(&response, header::LOCATION).starts_with("/catalogs/upload-"));
}

#[tokio::test]
async fn test_drawing_listing_and_preview() {
    let app = TestApp::new(false);

    let folders = body_json(app.get("/api/v1/drawings").await).await;
    assert_eq!(folders, json!(["Smart Closet"]));

    let files = body_json(app.get("/api/v1/drawings/Smart%20Closet").await).await;
    assert_eq!(files.as_array().unwrap().len(), 1);
    assert_eq!(files[0]["name"], "panel-a.pdf");

    let html = body_text(app.get("/drawings?folder=Smart%20Closet&file=panel-a.pdf").await).await;
    assert!(html.contains("src=\"/drawings/Smart%20Closet/panel-a.pdf\""));
}

#[tokio::test]
async fn test_pdf_served_inline_or_as_attachment() {
    let app = TestApp::new(false);

    let inline = app.get("/drawings/Smart%20Closet/panel-a.pdf").await;
    assert_eq!(inline.status(), StatusCode::OK);
    assert_eq!(header_value(&inline, header::CONTENT_TYPE), "application/pdf");
    assert!(header_value(&inline, header::CONTENT_DISPOSITION).starts_with("inline"));
    assert_eq!(body_bytes(inline).await, b"%PDF-1.4 panel a".to_vec());

    let download = app.get("/drawings/Smart%20Closet/panel-a.pdf?download=true").await;
    assert!(header_value(&download, header::CONTENT_DISPOSITION).starts_with("attachment"));
}

#[tokio::test]
async fn test_drawing_traversal_is_rejected() {
    let app = TestApp::new(false);

    let response = app.get("/drawings/Smart%20Closet/..%2Fsecret.pdf").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.get("/api/v1/drawings/..").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
