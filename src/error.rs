//! Error types for docfill library.

use std::io;
use thiserror::Error;

/// Result type alias for docfill operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during template processing.
///
/// `TemplateMissing`, `NoRecords` and `InvalidDocument` are fatal to a
/// generation call. `Field` is raised by data objects and is contained per
/// placeholder by the resolver.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The report template has no document attached.
    #[error("Template file is missing")]
    TemplateMissing,

    /// The record set passed to generation is empty.
    #[error("No records found to generate report")]
    NoRecords,

    /// The input is not recognized as a template document.
    #[error("Unknown file format: not a template document")]
    UnknownFormat,

    /// The template could not be parsed as a document.
    #[error("Invalid template document: {0}")]
    InvalidDocument(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A data object could not serve a field request.
    #[error("Field access error: {0}")]
    Field(String),

    /// Error during rendering (JSON, text).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error aborts a whole generation call.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::Field(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::TemplateMissing;
        assert_eq!(err.to_string(), "Template file is missing");

        let err = Error::InvalidDocument("expected value at line 1".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid template document: expected value at line 1"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_is_fatal() {
        assert!(Error::NoRecords.is_fatal());
        assert!(!Error::Field("unsupported".to_string()).is_fatal());
    }
}
