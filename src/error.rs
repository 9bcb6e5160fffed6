//! Error types for resume_render.

use std::io;

use thiserror::Error;

/// Errors raised while turning external input into a [`crate::model::ResumeRecord`].
#[derive(Error, Debug)]
pub enum RecordError {
    /// The input was not valid JSON or did not deserialize into the expected shape.
    #[error("invalid resume JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A structural field had the wrong type (e.g. `bullets` was not a list).
    #[error("field `{field}` must be {expected}")]
    Shape {
        /// Dotted path of the offending field.
        field: String,
        /// Human-readable description of the expected shape.
        expected: &'static str,
    },

    /// The model reply contained no content once code fences were stripped.
    #[error("model response is empty")]
    EmptyResponse,
}

impl RecordError {
    pub(crate) fn shape(field: impl Into<String>, expected: &'static str) -> Self {
        Self::Shape {
            field: field.into(),
            expected,
        }
    }
}

/// Errors that can occur while rendering a resume document.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The resume record failed shape validation.
    #[error("malformed resume record: {0}")]
    MalformedInput(#[from] RecordError),

    /// The output destination could not be written.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A render configuration file could not be parsed.
    #[error("invalid render configuration: {0}")]
    Config(#[source] serde_json::Error),

    /// No usable font family could be loaded.
    #[error("failed to load fonts: {0}")]
    FontLoad(#[source] genpdf::error::Error),

    /// The PDF backend failed while laying out or serializing the document.
    #[error("PDF rendering failed: {0}")]
    Pdf(#[source] genpdf::error::Error),
}

/// Result alias for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;
