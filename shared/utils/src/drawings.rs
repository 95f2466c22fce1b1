//! Panel Drawing Browser
//!
//! Read-only listing of PDF files under a fixed set of subfolders.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::DrawingsConfig;
use crate::error::{SelectorError, SelectorResult};
use crate::validation::validate_path_component;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawingFile {
    pub folder: String,
    pub name: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone)]
pub struct DrawingLibrary {
    root: PathBuf,
    folders: Vec<String>,
}

impl DrawingLibrary {
    pub fn new(root: impl Into<PathBuf>, folders: Vec<String>) -> Self {
        Self {
            root: root.into(),
            folders,
        }
    }

    pub fn from_config(config: &DrawingsConfig) -> Self {
        Self::new(&config.root, config.folders.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Allow-listed folders that exist on disk, in configured order.
    pub fn list_folders(&self) -> SelectorResult<Vec<String>> {
        if !self.root.is_dir() {
            return Err(SelectorError::not_found(self.root.display().to_string()));
        }

        Ok(self
            .folders
            .iter()
            .filter(|folder| self.root.join(folder).is_dir())
            .cloned()
            .collect())
    }

    /// PDF files in one folder, sorted by name. An empty folder is not an error.
    pub fn list_pdfs(&self, folder: &str) -> SelectorResult<Vec<DrawingFile>> {
        let dir = self.folder_path(folder)?;

        let entries = std::fs::read_dir(&dir).map_err(|e| {
            SelectorError::internal(format!("Failed to list '{}': {}", dir.display(), e))
        })?;

        let mut files = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() || !is_pdf(&path) {
                continue;
            }
            let size_bytes = entry.metadata().map(|m| m.len()).unwrap_or(0);
            files.push(DrawingFile {
                folder: folder.to_string(),
                name: entry.file_name().to_string_lossy().into_owned(),
                size_bytes,
            });
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    pub fn read_pdf(&self, folder: &str, file: &str) -> SelectorResult<Vec<u8>> {
        validate_path_component("file", file)?;
        let dir = self.folder_path(folder)?;
        let path = dir.join(file);

        if !is_pdf(&path) {
            return Err(SelectorError::validation("file", format!("'{}' is not a PDF file", file)));
        }
        if !path.is_file() {
            return Err(SelectorError::not_found(format!("{}/{}", folder, file)));
        }

        std::fs::read(&path).map_err(|e| {
            SelectorError::internal(format!("Failed to read '{}': {}", path.display(), e))
        })
    }

    fn folder_path(&self, folder: &str) -> SelectorResult<PathBuf> {
        validate_path_component("folder", folder)?;
        if !self.folders.iter().any(|allowed| allowed == folder) {
            return Err(SelectorError::validation(
                "folder",
                format!("'{}' is not a drawing folder", folder),
            ));
        }
        if !self.root.is_dir() {
            return Err(SelectorError::not_found(self.root.display().to_string()));
        }

        let dir = self.root.join(folder);
        if !dir.is_dir() {
            return Err(SelectorError::not_found(folder.to_string()));
        }
        Ok(dir)
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}
