//! Loader error types.
//!
//! Analysis itself never fails; these errors only arise while loading the
//! static data the engine is built from (vocabulary and rubric files).

use thiserror::Error;

/// Errors that can occur when loading a vocabulary file.
#[derive(Debug, Error)]
pub enum VocabularyError {
    /// The vocabulary file could not be read.
    #[error("failed to read vocabulary file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The vocabulary file is not valid TOML for the expected schema.
    #[error("failed to parse vocabulary: {0}")]
    Parse(#[from] toml::de::Error),

    /// A set the engine depends on is absent or has no usable phrase.
    #[error("vocabulary set '{0}' is missing or empty")]
    MissingSet(String),
}

/// Errors that can occur when loading a rubric template.
#[derive(Debug, Error)]
pub enum RubricError {
    /// The rubric file could not be read.
    #[error("failed to read rubric file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The rubric file is not valid TOML for the expected schema.
    #[error("failed to parse rubric: {0}")]
    Parse(#[from] toml::de::Error),

    /// The template declares no criteria.
    #[error("rubric '{0}' has no criteria")]
    Empty(String),

    /// A criterion carries a weight or point value that cannot be displayed.
    #[error("criterion '{name}' is invalid: {reason}")]
    InvalidCriterion { name: String, reason: String },
}
