//! Error types for png-text-io

use std::io;

/// Result type for png-text-io operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading PNG text metadata
///
/// Malformed chunk structure is never an error: the scanner stops and
/// returns what it collected. These variants cover the layers around it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid file format (only raised when signature checking is enabled)
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Input is not a PNG
    #[error("Unsupported format")]
    UnsupportedFormat,

    /// Data size exceeds maximum allowed
    #[error("Data too large: {size} bytes (max: {max})")]
    DataTooLarge { size: u64, max: u64 },
}
