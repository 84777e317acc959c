//! Error types for the editor core.
//!
//! Every fallible step returns one of these so the caller decides whether to
//! degrade (log and fall back) or surface the problem.

use miette::Diagnostic;
use smol_str::SmolStr;

/// The editor engine handed us a snapshot we can't make sense of.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum DocumentError {
    /// JSON didn't deserialize into the node shape at all.
    #[error("invalid document json: {0}")]
    #[diagnostic(code(jot::document::json))]
    Json(#[from] serde_json::Error),

    /// Root node was something other than `doc`.
    #[error("expected a `doc` root node, found `{0}`")]
    #[diagnostic(code(jot::document::root))]
    NotADocument(SmolStr),

    /// A text node came without its `text` field.
    #[error("text node is missing its text")]
    #[diagnostic(code(jot::document::text))]
    MissingText,

    /// An attribute was present but had the wrong shape.
    #[error("node `{node}` has an invalid `{attr}` attribute")]
    #[diagnostic(code(jot::document::attr))]
    InvalidAttr { node: SmolStr, attr: &'static str },
}

/// Building the marker overlay failed.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum DecorationError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Document(#[from] DocumentError),

    /// A widget landed outside the document's position range.
    #[error("marker position {pos} is outside the document (size {size})")]
    #[diagnostic(code(jot::decoration::position))]
    PositionOutOfRange { pos: usize, size: usize },
}

/// Software resampling refused its input.
#[derive(thiserror::Error, Debug, Diagnostic, PartialEq, Eq)]
pub enum ResampleError {
    #[error("source raster is empty ({width}x{height})")]
    #[diagnostic(code(jot::resample::empty_source))]
    EmptySource { width: u32, height: u32 },

    #[error("target size must be non-zero")]
    #[diagnostic(code(jot::resample::empty_target))]
    EmptyTarget,

    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    #[diagnostic(code(jot::resample::buffer))]
    BufferLength { expected: usize, actual: usize },
}

/// Configuration could not be loaded or is unusable.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    #[diagnostic(code(jot::config::json))]
    Json(#[from] serde_json::Error),

    #[error("emoji image sizes must not be empty")]
    #[diagnostic(code(jot::config::sizes), help("use e.g. [256, 128]"))]
    NoSizes,

    #[error("emoji image size must be non-zero")]
    #[diagnostic(code(jot::config::sizes))]
    ZeroSize,

    #[error("emoji cdn base `{0}` is not an http(s) url")]
    #[diagnostic(code(jot::config::cdn_base))]
    CdnBase(String),
}
