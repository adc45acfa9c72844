//! Error types for kennel.
//!
//! This module defines all error types used throughout the kennel crate,
//! and how each of them is reported to HTTP clients.

use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

/// The main error type for kennel operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Record Errors ===
    /// A record name failed validation.
    #[error("invalid record name: {name:?}")]
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// No record has been saved under this name yet.
    #[error("record not found: {name}")]
    RecordNotFound {
        /// Name of the missing record.
        name: String,
    },

    /// Reading or writing a record file failed.
    #[error("record I/O failed at {path}: {source}")]
    RecordIo {
        /// Path of the record file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Render Errors ===
    /// Rendering a record into a page failed.
    #[error("failed to render template '{template}': {message}")]
    Render {
        /// Template key that was requested.
        template: String,
        /// Description of what went wrong.
        message: String,
    },

    /// A template could not be compiled.
    #[error("invalid template '{template}': {message}")]
    Template {
        /// Template key or file name.
        template: String,
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Server Errors ===
    /// The listener could not bind its address.
    #[error("failed to bind {address}: {source}")]
    Bind {
        /// Address the server tried to listen on.
        address: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for kennel operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a render error for the given template key.
    #[must_use]
    pub fn render(template: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Render {
            template: template.into(),
            message: message.into(),
        }
    }

    /// Create a template compilation error.
    #[must_use]
    pub fn template(template: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Template {
            template: template.into(),
            message: message.into(),
        }
    }

    /// Check if this error means the record simply doesn't exist yet.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RecordNotFound { .. })
    }

    /// HTTP status reported to a client for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidName { .. } | Self::RecordNotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("request failed: {self}");
        }
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::RecordNotFound {
            name: "rex".to_string(),
        };
        assert_eq!(err.to_string(), "record not found: rex");

        let err = Error::internal("test error");
        assert_eq!(err.to_string(), "internal error: test error");
    }

    #[test]
    fn test_error_is_not_found() {
        let err = Error::RecordNotFound {
            name: "ghost".to_string(),
        };
        assert!(err.is_not_found());
        assert!(!Error::internal("boom").is_not_found());
    }

    #[test]
    fn test_invalid_name_display_quotes_input() {
        let err = Error::InvalidName {
            name: "../etc".to_string(),
        };
        assert_eq!(err.to_string(), "invalid record name: \"../etc\"");
    }

    #[test]
    fn test_record_io_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::RecordIo {
            path: PathBuf::from("/data/rex.dog"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("/data/rex.dog"));
        assert!(msg.contains("access denied"));
    }

    #[test]
    fn test_render_error_display() {
        let err = Error::render("view", "unknown template");
        let msg = err.to_string();
        assert!(msg.contains("view"));
        assert!(msg.contains("unknown template"));
    }

    #[test]
    fn test_template_error_display() {
        let err = Error::template("edit.html", "unterminated placeholder");
        assert!(err.to_string().contains("edit.html"));
    }

    #[test]
    fn test_bind_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use");
        let err = Error::Bind {
            address: "127.0.0.1:8080".to_string(),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("127.0.0.1:8080"));
        assert!(msg.contains("address in use"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            Error::InvalidName {
                name: String::new()
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::RecordNotFound {
                name: "rex".to_string()
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::render("view", "boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let io_err = std::io::Error::other("disk full");
        assert_eq!(
            Error::RecordIo {
                path: PathBuf::from("rex.dog"),
                source: io_err,
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_into_response_carries_detail() {
        let response = Error::render("view", "unknown template").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "invalid extension".to_string(),
        };
        assert!(err.to_string().contains("invalid extension"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
