//! Prometheus counters for exports and failed requests.

use prometheus::{IntCounterVec, Opts};
use std::sync::OnceLock;

struct Metrics {
    exports: Option<IntCounterVec>,
    failures: Option<IntCounterVec>,
}

static METRICS: OnceLock<Metrics> = OnceLock::new();

fn metrics() -> &'static Metrics {
    METRICS.get_or_init(|| Metrics {
        exports: counter("bom_selector_exports_total", "Final BOM workbooks exported", &["source"]),
        failures: counter("bom_selector_failed_requests_total", "Responses with an error status", &["status"]),
    })
}

fn counter(name: &str, help: &str, labels: &[&str]) -> Option<IntCounterVec> {
    let counter = match IntCounterVec::new(Opts::new(name, help), labels) {
        Ok(counter) => counter,
        Err(e) => {
            tracing::warn!(error = %e, metric = name, "Failed to create metric");
            return None;
        }
    };
    if let Err(e) = prometheus::register(Box::new(counter.clone())) {
        tracing::warn!(error = %e, metric = name, "Failed to register metric");
    }
    Some(counter)
}

/// `source` is `file` or `upload`.
pub fn record_export(source: &str) {
    if let Some(exports) = &metrics().exports {
        exports.with_label_values(&[source]).inc();
    }
}

pub fn record_failure(status: &str) {
    if let Some(failures) = &metrics().failures {
        failures.with_label_values(&[status]).inc();
    }
}

/// Make sure the counters exist before the first scrape.
pub fn init() {
    let _ = metrics();
}
