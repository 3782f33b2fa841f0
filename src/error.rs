//! Error types for enexport library.

use std::io;
use thiserror::Error;

/// Result type alias for enexport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input or output archive could not be read or written.
    #[error("Archive error: {0}")]
    Archive(String),

    /// The document parser could not decompose a document.
    #[error("Document parsing error: {0}")]
    DocumentParse(String),

    /// Element data could not be formatted into note markup.
    #[error("Formatting error: {0}")]
    Format(String),

    /// A batch is already running; only one job may be in flight.
    #[error("A batch conversion is already running")]
    Busy,

    /// A document conversion panicked and was isolated.
    #[error("Conversion panicked: {0}")]
    Panicked(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            _ => Error::Archive(err.to_string()),
        }
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error::Format(format!("invalid base64 payload: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Busy;
        assert_eq!(err.to_string(), "A batch conversion is already running");

        let err = Error::DocumentParse("bad header".into());
        assert_eq!(err.to_string(), "Document parsing error: bad header");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_zip_io_error_unwrapped() {
        let zip_err = zip::result::ZipError::Io(io::Error::new(io::ErrorKind::Other, "disk"));
        let err: Error = zip_err.into();
        assert!(matches!(err, Error::Io(_)));

        let err: Error = zip::result::ZipError::FileNotFound.into();
        assert!(matches!(err, Error::Archive(_)));
    }
}
