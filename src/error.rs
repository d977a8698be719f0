//! Error types for theme resolution and rendering

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for vitae operations
pub type Result<T> = std::result::Result<T, Error>;

/// A single schema violation found while validating a resume.
///
/// `path` is the JSON Pointer to the violating field (empty for the root).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub message: String,
    pub path: String,
}

/// Errors that can occur while resolving themes or rendering a resume
#[derive(Error, Debug)]
pub enum Error {
    /// No `node_modules` directory exists in the search root or any ancestor
    #[error("no node_modules directory found above {0}")]
    SearchRootNotFound(PathBuf),

    /// The walk found a search root that is not actually a directory
    #[error("{0} does not exist or is not a directory")]
    InvalidSearchRoot(PathBuf),

    /// Neither an explicit theme nor a `meta.theme` hint was supplied
    #[error("no theme specified; pass --theme or set meta.theme in the resume")]
    NoThemeSpecified,

    /// Resolution produced zero candidates
    #[error("could not find a resume theme to render")]
    NoThemeFound,

    /// A discovered theme package failed to load
    #[error("could not load theme {name}: {message}")]
    ThemeLoad { name: String, message: String },

    /// The theme's render capability threw
    #[error("theme render failed: {0}")]
    ThemeRender(String),

    /// The PDF browser backend is missing or failed to start
    #[error("PDF capture unavailable: {0}")]
    PdfUnavailable(String),

    /// The resume file could not be read or parsed
    #[error("could not read resume {path}: {message}")]
    ResumeLoad { path: PathBuf, message: String },

    /// The resume violates the schema; carries every violation found
    #[error("resume failed validation with {} issue(s)", .0.len())]
    Validation(Vec<ValidationIssue>),
}

#[cfg(feature = "pdf")]
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::PdfUnavailable(err.to_string())
    }
}
