//! Error types for bundle operations.

use thiserror::Error;

/// Errors that can occur during bundle operations.
#[derive(Debug, Error)]
pub enum BundleError {
    /// The raw source could not be read as a bundle at all.
    #[error("Bundle unavailable{}", .0.as_ref().map(|r| format!(": {r}")).unwrap_or_default())]
    Unavailable(Option<String>),

    /// Named entry is not present in the source.
    #[error("No such entry: {0}")]
    NoSuchEntry(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error.
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Binary entry body is not valid base64.
    #[error("Invalid base64 in entry {entry}: {source}")]
    Base64 {
        entry: String,
        #[source]
        source: base64::DecodeError,
    },

    /// Entry content was expected to be UTF-8 text.
    #[error("Entry {0} is not valid UTF-8 text")]
    NotText(String),

    /// Identifier rejected by the identifier policy.
    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// Extras keys must carry a namespace separator.
    #[error("Extras key {0:?} has no namespace separator")]
    InvalidExtraKey(String),

    /// Resolution needs every qualifier axis set.
    #[error("Runtime qualifier is not fully specified: {0}")]
    NotFullySpecified(String),

    /// JSON configuration error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl BundleError {
    /// Shorthand for an unavailable source with a known reason.
    pub(crate) fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(Some(reason.into()))
    }
}
