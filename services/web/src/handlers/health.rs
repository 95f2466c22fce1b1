use axum::{extract::State, response::Json};
use serde_json::{json, Value};
use std::path::Path;

use crate::AppState;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "bom-selector",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Reports whether every configured workbook and the drawings root exist.
pub async fn detailed_health_check(State(state): State<AppState>) -> Json<Value> {
    let mut checks = serde_json::Map::new();

    for catalog in &state.config.catalogs {
        checks.insert(format!("catalog:{}", catalog.label), path_check(Path::new(&catalog.path)));
    }
    checks.insert("drawings".to_string(), path_check(state.drawings.root()));

    let all_healthy = checks.values().all(|check| check["status"] == "healthy");
    let status = if all_healthy { "healthy" } else { "degraded" };

    Json(json!({
        "status": status,
        "service": "bom-selector",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "uploads": state.uploads.list().len(),
        "checks": checks
    }))
}

fn path_check(path: &Path) -> Value {
    if path.exists() {
        json!({"status": "healthy", "message": "Present"})
    } else {
        json!({"status": "unhealthy", "message": format!("{} is missing", path.display())})
    }
}

pub async fn metrics_handler() -> String {
    use prometheus::TextEncoder;

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_else(|_| "Error encoding metrics".to_string())
}
