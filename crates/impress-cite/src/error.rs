//! Error types for impress-cite

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for citation index operations
pub type Result<T> = std::result::Result<T, CiteError>;

/// Main error type for citation index operations
#[derive(Error, Debug)]
pub enum CiteError {
    /// A bibliography source could not be read
    #[error("Unreadable source {}: {source}", path.display())]
    UnreadableSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file could not be read
    #[error("Unreadable configuration file {}: {source}", path.display())]
    UnreadableConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration (de)serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Why a single entry was skipped during parsing.
///
/// These never abort a parse; they are collected next to the entries that
/// did parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The entry has no citation key
    #[error("Entry has an empty key")]
    EmptyKey,

    /// A field segment has no `=`
    #[error("Field segment without '=': {0}")]
    MissingEquals(String),

    /// A field segment has nothing before `=`
    #[error("Field segment with empty name: {0}")]
    EmptyFieldName(String),

    /// Brace depth does not return to zero by the end of the entry
    #[error("Unbalanced braces (depth {0} at end of entry)")]
    UnbalancedBraces(i32),
}

impl From<serde_json::Error> for CiteError {
    fn from(err: serde_json::Error) -> Self {
        CiteError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for CiteError {
    fn from(err: toml::de::Error) -> Self {
        CiteError::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for CiteError {
    fn from(err: toml::ser::Error) -> Self {
        CiteError::Serialization(err.to_string())
    }
}
