//! Error types for resupply-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in resupply-core
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to open or read a pak archive
    #[error("failed to read archive '{path}': {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// A named entry was not present in an archive
    #[error("entry '{entry}' not found in archive '{archive}'")]
    EntryNotFound { archive: PathBuf, entry: PathBuf },

    /// A directive keyword was matched but no numeric literal followed it
    #[error("numeric literal not found after '{{{directive}' in line '{line}'")]
    MissingNumericLiteral { directive: String, line: String },

    /// No Steam installation was found in any known location
    #[error("could not find a Steam installation")]
    SteamNotFound,

    /// Steam is installed but the game is not
    #[error("could not find the game in any Steam library")]
    GameNotFound,

    /// Unknown mod name
    #[error("no mod named '{0}' in the catalog")]
    ModNotFound(String),

    /// A splice batch contained overlapping edits
    #[error("overlapping edits at offset {0}")]
    OverlappingEdits(usize),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
