//! Error types for exports.

use thiserror::Error;

/// Failures raised while producing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A template could not render its data.
    #[error("template rendering failed: {0}")]
    Template(String),

    /// No entry matched a UUID or title lookup.
    #[error("no entry matches '{0}'")]
    EntryNotFound(String),

    /// A title lookup matched several entries.
    #[error("{count} entries are titled '{title}', pass a UUID instead")]
    AmbiguousEntry { title: String, count: usize },
}

impl From<std::fmt::Error> for ExportError {
    fn from(err: std::fmt::Error) -> Self {
        ExportError::Template(err.to_string())
    }
}
