//! Uploaded catalog workbooks, held in memory under a generated tab label.

use std::collections::VecDeque;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::bom::WorkbookSource;

pub const UPLOAD_TAB_PREFIX: &str = "upload-";

#[derive(Debug, Clone)]
pub struct StoredUpload {
    pub tab: String,
    pub file_name: String,
    pub data: Arc<[u8]>,
}

impl StoredUpload {
    pub fn source(&self) -> WorkbookSource {
        WorkbookSource::Upload {
            name: self.file_name.clone(),
            data: Arc::clone(&self.data),
        }
    }
}

/// Bounded store; the oldest upload is evicted first.
pub struct UploadStore {
    max_entries: usize,
    entries: RwLock<VecDeque<StoredUpload>>,
}

impl UploadStore {
    pub fn new(max_entries: usize) -> Self {
        Self {
            max_entries: max_entries.max(1),
            entries: RwLock::new(VecDeque::new()),
        }
    }

    /// Store an upload and return its tab label.
    pub fn insert(&self, file_name: impl Into<String>, data: Vec<u8>) -> String {
        let upload = StoredUpload {
            tab: format!("{}{}", UPLOAD_TAB_PREFIX, Uuid::new_v4()),
            file_name: file_name.into(),
            data: Arc::from(data),
        };
        let tab = upload.tab.clone();

        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        while entries.len() >= self.max_entries {
            if let Some(evicted) = entries.pop_front() {
                tracing::debug!(tab = %evicted.tab, "Upload evicted");
            }
        }
        entries.push_back(upload);
        tab
    }

    pub fn get(&self, tab: &str) -> Option<StoredUpload> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.iter().find(|upload| upload.tab == tab).cloned()
    }

    pub fn list(&self) -> Vec<StoredUpload> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.iter().cloned().collect()
    }

    pub fn is_upload_tab(tab: &str) -> bool {
        tab.starts_with(UPLOAD_TAB_PREFIX)
    }
}
