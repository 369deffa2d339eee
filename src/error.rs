use std::num::{ParseFloatError, ParseIntError};
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by header parsing, row traversal, column binding and the
/// stream backends.
#[derive(Error, Debug)]
pub enum PlyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to open '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid PLY header: {0}")]
    InvalidHeader(String),

    #[error("Unsupported PLY format: {0}")]
    UnsupportedFormat(String),

    #[error("Error parsing integer: {0}")]
    ParseInt(#[from] ParseIntError),

    #[error("Error parsing float: {0}")]
    ParseFloat(#[from] ParseFloatError),

    #[error("Header has already been written")]
    HeaderAlreadyWritten,

    #[error("Duplicate element name '{0}'")]
    DuplicateElement(String),

    #[error("Missing property '{property}' in element '{element}'")]
    MissingProperty { element: String, property: String },

    #[error("Property '{property}' of element '{element}' does not match the column shape")]
    ShapeMismatch { element: String, property: String },

    #[error("Element count mismatch for '{element}': {expected} vs {found}")]
    CountMismatch {
        element: String,
        expected: usize,
        found: usize,
    },

    #[error("Column for '{element}' holds {found} rows but the element declares {expected}")]
    FixedSizeMismatch {
        element: String,
        expected: usize,
        found: usize,
    },

    #[error("Conflicting column specs: property '{property}' of element '{element}' is bound more than once")]
    ConflictingSpecs { element: String, property: String },

    #[error("Column for '{element}' is read-only and cannot receive rows")]
    ReadOnlyColumn { element: String },

    #[error("Invalid metadata comment: {0}")]
    InvalidComment(String),
}
