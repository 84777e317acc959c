//! Browser DOM layer for the jot note editor.
//!
//! This crate applies the pure logic in `jot-editor-core` to a live page.
//! It assumes a `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `emoji_dom`: replaces emoji in page text with remote images
//! - `observer`: feeds inserted nodes to the emoji rewriter
//! - `resize`: redraws loaded emoji images at the text's size
//! - `markers`: marker elements and the visibility toggle
//! - `platform`: browser capability probing
//!
//! # Re-exports
//!
//! This crate re-exports `jot-editor-core` for convenience, so consumers
//! only need to depend on `jot-editor-browser`.

// Re-export core crate
pub use jot_editor_core;
pub use jot_editor_core::*;

pub mod emoji_dom;
pub mod error;
pub mod markers;
pub mod observer;
pub mod platform;
pub mod resize;

pub use emoji_dom::{EmojiRewriter, install};
pub use error::{ResizeError, RewriteError};
pub use markers::{create_marker_element, editor_root, markers_visible, visible_decorations};
pub use observer::EmojiWatch;
pub use platform::capabilities;
pub use resize::{resample, target_size_for};
