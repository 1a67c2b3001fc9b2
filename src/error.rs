//! Error types for topicqr operations

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using topicqr's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for topicqr operations
#[derive(Error, Debug)]
pub enum Error {
    /// Logo file is missing or could not be decoded as an image
    #[error("Could not load logo at {}: {reason}", path.display())]
    MissingLogo {
        /// Configured logo path
        path: PathBuf,
        /// Why the logo could not be used
        reason: String,
    },

    /// Output directory could not be created
    #[error("Failed to create output directory {}: {source}", path.display())]
    DirectoryCreation {
        /// Directory that was being created
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// QR code encoding failed (e.g. payload exceeds every version's capacity)
    #[error("Failed to encode QR code: {0}")]
    QrEncode(String),

    /// Composited image could not be written
    #[error("Failed to write {}: {reason}", path.display())]
    FileWrite {
        /// Destination file
        path: PathBuf,
        /// Underlying encoder or I/O failure
        reason: String,
    },

    /// Composited image no longer decodes to its payload
    #[error("QR code for '{label}' is not scannable after logo overlay: expected '{expected}', got {found}")]
    Unscannable {
        /// Topic label of the failing entry
        label: String,
        /// Payload that was encoded
        expected: String,
        /// What the decoder produced instead
        found: String,
    },

    /// Topic entry is not usable as a file name or URL query value
    #[error("Invalid topic: {0}")]
    InvalidTopic(String),

    /// QR code decoding failed
    #[error("Failed to decode QR code: {0}")]
    QrDecode(String),

    /// No QR code found in image
    #[error("No QR code found in image")]
    NoQrCodeFound,

    /// Image processing error
    #[error("Image processing error: {0}")]
    Image(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e.to_string())
    }
}

impl From<qrcode::types::QrError> for Error {
    fn from(e: qrcode::types::QrError) -> Self {
        Error::QrEncode(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Other(format!("JSON error: {}", e))
    }
}
