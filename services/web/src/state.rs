use std::sync::Arc;
use std::time::Duration;

use bom_selector_models::{CatalogSourceKind, CatalogSummary};
use bom_selector_utils::{
    bom::WorkbookSource, AppConfig, CredentialVerifier, DrawingLibrary, SelectorError, SelectorResult,
    SessionStore, StaticCredential, UploadStore,
};

use crate::templates::Templates;

/// Shared, read-mostly service state. Nothing here holds a selection; every
/// request rebuilds its component table from the workbook.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub credentials: Arc<dyn CredentialVerifier>,
    pub sessions: Arc<SessionStore>,
    pub uploads: Arc<UploadStore>,
    pub drawings: Arc<DrawingLibrary>,
    pub templates: Arc<Templates>,
}

impl AppState {
    /// Build state from configuration, hashing the configured password once.
    pub fn new(config: AppConfig) -> SelectorResult<Self> {
        let credentials = StaticCredential::from_config(&config.auth)?;
        Self::with_verifier(config, Arc::new(credentials))
    }

    pub fn with_verifier(config: AppConfig, credentials: Arc<dyn CredentialVerifier>) -> SelectorResult<Self> {
        config.validate()?;

        Ok(Self {
            sessions: Arc::new(SessionStore::new(Duration::from_secs(config.auth.session_ttl_seconds))),
            uploads: Arc::new(UploadStore::new(config.uploads.max_entries)),
            drawings: Arc::new(DrawingLibrary::from_config(&config.drawings)),
            templates: Arc::new(Templates::new()?),
            credentials,
            config: Arc::new(config),
        })
    }

    /// Workbook behind a tab: a configured catalog or an upload.
    pub fn catalog_source(&self, tab: &str) -> SelectorResult<WorkbookSource> {
        if let Some(catalog) = self.config.catalog(tab) {
            return Ok(WorkbookSource::file(&catalog.path));
        }
        if UploadStore::is_upload_tab(tab) {
            if let Some(upload) = self.uploads.get(tab) {
                return Ok(upload.source());
            }
        }
        Err(SelectorError::not_found(format!("catalog '{}'", tab)))
    }

    pub fn catalog_summaries(&self) -> Vec<CatalogSummary> {
        let configured = self.config.catalogs.iter().map(|catalog| CatalogSummary {
            tab: catalog.label.clone(),
            kind: CatalogSourceKind::File,
            source: catalog.path.clone(),
        });
        let uploaded = self.uploads.list().into_iter().map(|upload| CatalogSummary {
            tab: upload.tab,
            kind: CatalogSourceKind::Upload,
            source: upload.file_name,
        });

        configured.chain(uploaded).collect()
    }
}
