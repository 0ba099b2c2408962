//! Error types for obsidian-pandoc-prep
//!
//! Per-embed failures (resolution, preview generation) are reported as
//! warnings by the exporter; driver failures (usage, missing input) abort
//! the process.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::util::display_path;

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ResolutionFailure,
    ConversionFailure,
    NoEmbeddedPreview,
    UnsupportedFormat,
    InvalidJson,
    InvalidPayload,
    FileNotFound,
    UsageError,
    Io,
}

#[derive(Error, Debug)]
pub enum Error {
    /// Reference not found in any search directory
    #[error("Unable to find '{}' in any of: {}", .reference, join_dirs(.tried))]
    Resolution { reference: String, tried: Vec<PathBuf> },

    /// External converter failed; recoverable
    #[error("{0}")]
    Conversion(String),

    #[error(
        "No embedded PNG data found in {}. {}",
        .path.display(),
        crate::constants::NO_PREVIEW_HINT
    )]
    NoEmbeddedPreview { path: PathBuf },

    #[error("Unsupported data URL format in {}: {}", .path.display(), .header)]
    UnsupportedFormat { path: PathBuf, header: String },

    #[error("{} is not valid JSON: {}", .path.display(), .source)]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Embedded PNG payload in {} is not valid base64: {}", .path.display(), .source)]
    InvalidPayload {
        path: PathBuf,
        #[source]
        source: base64::DecodeError,
    },

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Resolution { .. } => ErrorKind::ResolutionFailure,
            Error::Conversion(_) => ErrorKind::ConversionFailure,
            Error::NoEmbeddedPreview { .. } => ErrorKind::NoEmbeddedPreview,
            Error::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            Error::InvalidJson { .. } => ErrorKind::InvalidJson,
            Error::InvalidPayload { .. } => ErrorKind::InvalidPayload,
            Error::FileNotFound(_) => ErrorKind::FileNotFound,
            Error::Usage(_) => ErrorKind::UsageError,
            Error::Io(_) => ErrorKind::Io,
        }
    }

    /// Create a conversion error
    pub fn conversion(msg: impl Into<String>) -> Self {
        Self::Conversion(msg.into())
    }
}

fn join_dirs(dirs: &[PathBuf]) -> String {
    dirs.iter()
        .map(|d| display_path(d))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
