use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use validator::Validate;

use crate::error::{SelectorError, SelectorResult};
use crate::validation::validate_model;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub catalogs: Vec<CatalogConfig>,
    pub drawings: DrawingsConfig,
    pub auth: AuthConfig,
    pub uploads: UploadsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_request_size: usize,
}

/// One catalog tab backed by a workbook on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CatalogConfig {
    #[validate(length(min = 1, max = 64, message = "Catalog label must be between 1 and 64 characters"))]
    pub label: String,
    #[validate(length(min = 1, message = "Catalog path must not be empty"))]
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawingsConfig {
    pub root: String,
    /// Subfolders of `root` that may be browsed.
    pub folders: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub enabled: bool,
    pub username: String,
    pub password: String,
    pub session_ttl_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadsConfig {
    pub max_entries: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let config = Config::builder()
            // Start with default values
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(File::with_name("config/default").required(false))
            // Add environment-specific config
            .add_source(
                File::with_name(&format!(
                    "config/{}",
                    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // Add local config (gitignored)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with BOM_SELECTOR prefix
            .add_source(Environment::with_prefix("BOM_SELECTOR").separator("__"));

        config.build()?.try_deserialize()
    }

    /// Reject configurations the service cannot run with.
    pub fn validate(&self) -> SelectorResult<()> {
        let mut labels = HashSet::new();
        for catalog in &self.catalogs {
            validate_model(catalog)?;
            if !labels.insert(catalog.label.as_str()) {
                return Err(SelectorError::configuration(format!(
                    "Duplicate catalog label '{}'",
                    catalog.label
                )));
            }
        }

        if self.auth.enabled && (self.auth.username.is_empty() || self.auth.password.is_empty()) {
            return Err(SelectorError::configuration(
                "Authentication is enabled but no credential is configured",
            ));
        }

        if self.uploads.max_entries == 0 {
            return Err(SelectorError::configuration("uploads.max_entries must be at least 1"));
        }

        Ok(())
    }

    pub fn catalog(&self, label: &str) -> Option<&CatalogConfig> {
        self.catalogs.iter().find(|catalog| catalog.label == label)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                max_request_size: 16 * 1024 * 1024, // 16MB
            },
            catalogs: vec![
                CatalogConfig {
                    label: "SmartCloset".to_string(),
                    path: "Smart Closet Parent Partcode.xlsx".to_string(),
                },
                CatalogConfig {
                    label: "SmartCabinet".to_string(),
                    path: "Smart Cabinet Parent Partcode.xlsx".to_string(),
                },
                CatalogConfig {
                    label: "SmartCabinetP".to_string(),
                    path: "Smart CabinetP Parent Partcode.xlsx".to_string(),
                },
                CatalogConfig {
                    label: "SmartRow".to_string(),
                    path: "Smart Row Parent Partcode.xlsx".to_string(),
                },
            ],
            drawings: DrawingsConfig {
                root: "Panel Drawings".to_string(),
                folders: vec![
                    "Smart Closet".to_string(),
                    "Smart Cabinet".to_string(),
                    "Smart Row".to_string(),
                ],
            },
            auth: AuthConfig {
                enabled: true,
                username: "admin".to_string(),
                password: "admin".to_string(),
                session_ttl_seconds: 8 * 60 * 60, // one working day
            },
            uploads: UploadsConfig { max_entries: 16 },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
                file_path: None,
            },
        }
    }
}
