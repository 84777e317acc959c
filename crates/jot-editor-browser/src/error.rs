//! Browser-side error types.
//!
//! DOM calls fail with opaque `JsValue`s; we keep their debug rendering so
//! the log line says something useful.

use jot_editor_core::ResampleError;
use miette::Diagnostic;
use wasm_bindgen::JsValue;

/// A rewrite pass could not run.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum RewriteError {
    #[error("dom call failed: {0}")]
    #[diagnostic(code(jot::rewrite::dom))]
    Dom(String),

    /// The node has no owner document (already detached or not in a page).
    #[error("node is not attached to a document")]
    #[diagnostic(code(jot::rewrite::detached))]
    Detached,

    #[error("no global window")]
    #[diagnostic(code(jot::rewrite::window))]
    NoWindow,
}

impl From<JsValue> for RewriteError {
    fn from(value: JsValue) -> Self {
        RewriteError::Dom(format!("{value:?}"))
    }
}

/// Resampling an emoji image failed; the original image stays in place.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum ResizeError {
    #[error("dom call failed: {0}")]
    #[diagnostic(code(jot::resize::dom))]
    Dom(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Resample(#[from] ResampleError),

    #[error("no global window")]
    #[diagnostic(code(jot::resize::window))]
    NoWindow,

    #[error("2d canvas context unavailable")]
    #[diagnostic(code(jot::resize::context))]
    NoContext,
}

impl From<JsValue> for ResizeError {
    fn from(value: JsValue) -> Self {
        ResizeError::Dom(format!("{value:?}"))
    }
}
