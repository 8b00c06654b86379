//! Errors raised while reading or writing interface and annotation files.

use std::io;
use std::path::PathBuf;

/// Result type for cmi/cmt operations.
pub type CmtResult<T> = Result<T, CmtError>;

/// Errors that can occur while persisting or loading a unit.
#[derive(Debug, thiserror::Error)]
pub enum CmtError {
    /// The file does not start with a compiled-interface marker.
    #[error("{} is not a compiled interface", .0.display())]
    NotAnInterface(PathBuf),

    /// The file carries no annotation payload.
    #[error("{} is not a typed tree file", .0.display())]
    NotATypedTree(PathBuf),

    /// Underlying read or write failure, including truncated input.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// A record could not be encoded or decoded.
    #[error("malformed record: {0}")]
    Malformed(String),
}

impl CmtError {
    /// Whether the error came from the input ending early.
    pub fn is_truncated(&self) -> bool {
        matches!(self, CmtError::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof)
    }
}
