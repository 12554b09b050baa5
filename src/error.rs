//! Crate Error Type

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::syntax::SyntaxError;

/// Result type for hortela operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read '{}': {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file did not parse. `text` is the file content, kept for rendering.
    #[error("found {} syntax error(s) in '{}'", .errors.len(), .path.display())]
    Syntax {
        path: PathBuf,
        text: String,
        errors: Vec<SyntaxError>,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("validation failed: {}", .failed.join(", "))]
    Validation { failed: Vec<String> },

    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write output: {0}")]
    Write(#[from] io::Error),
}
