//! Error types for Skyline operations.
//!
//! This module provides the main error type [`SkylineError`] which wraps
//! the error conditions that can occur while reading a layout request and
//! computing a city layout.

use std::io;

use thiserror::Error;

use skyline_core::identifier::Id;

/// The main error type for Skyline operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the source document next to the JSON error so
/// callers can point at the offending line and column.
#[derive(Debug, Error)]
pub enum SkylineError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid layout request: {err}")]
    Parse {
        err: serde_json::Error,
        src: String,
    },

    #[error("Layout error: no layout entry for `{0}`")]
    MissingLayout(Id),

    #[error("Layout error: entity id `{0}` appears more than once")]
    DuplicateId(Id),

    #[error("Worker error: {0}")]
    Worker(String),
}

impl SkylineError {
    /// Create a new `Parse` error with the associated source document.
    pub fn new_parse_error(err: serde_json::Error, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
