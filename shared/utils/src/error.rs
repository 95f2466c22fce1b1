use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectorError {
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Schema error: {message}")]
    Schema { message: String },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Spreadsheet error: {message}")]
    Spreadsheet { message: String },

    #[error("Authentication error: {message}")]
    Authentication { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl SelectorError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn spreadsheet(message: impl Into<String>) -> Self {
        Self::Spreadsheet {
            message: message.into(),
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Message suitable for showing to the person using the form.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message, .. } => message.clone(),
            Self::Schema { message } => message.clone(),
            Self::NotFound { resource } => format!("'{}' not found", resource),
            other => other.to_string(),
        }
    }

    /// Validation problems are warnings to the user rather than failures.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Schema { .. } => "SCHEMA_ERROR",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Spreadsheet { .. } => "SPREADSHEET_ERROR",
            Self::Authentication { .. } => "AUTHENTICATION_ERROR",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::Internal { .. } => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Schema { .. } => 422,
            Self::Validation { .. } => 400,
            Self::Spreadsheet { .. } => 422,
            Self::Authentication { .. } => 401,
            Self::Configuration { .. } => 500,
            Self::Internal { .. } => 500,
        }
    }
}

pub type SelectorResult<T> = Result<T, SelectorError>;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl From<SelectorError> for ErrorResponse {
    fn from(error: SelectorError) -> Self {
        Self {
            error: error.to_string(),
            code: error.error_code().to_string(),
            message: error.user_message(),
            details: None,
        }
    }
}

// Conversion from common error types
impl From<calamine::XlsxError> for SelectorError {
    fn from(error: calamine::XlsxError) -> Self {
        Self::spreadsheet(error.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for SelectorError {
    fn from(error: rust_xlsxwriter::XlsxError) -> Self {
        Self::internal(format!("Failed to write workbook: {}", error))
    }
}

impl From<serde_json::Error> for SelectorError {
    fn from(error: serde_json::Error) -> Self {
        Self::validation("JSON", error.to_string())
    }
}

impl From<config::ConfigError> for SelectorError {
    fn from(error: config::ConfigError) -> Self {
        Self::configuration(error.to_string())
    }
}
