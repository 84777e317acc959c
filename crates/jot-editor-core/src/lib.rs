//! jot-editor-core: Pure Rust logic for the jot note editor, free of DOM types.
//!
//! This crate provides:
//! - `DocumentSnapshot` - typed view of the rich-text engine's document JSON
//! - `MarkSpanTracker` / `build_decorations` - the Markdown marker overlay
//! - `Segmenter` / `EmojiClassifier` / `RewritePlanner` - emoji rewrite rules
//! - `lanczos_resize` - software fallback for emoji image resampling
//! - `EditorSession` - editor status transitions as explicit effects

pub mod config;
pub mod decoration;
pub mod document;
pub mod emoji;
pub mod error;
pub mod marks;
pub mod platform;
pub mod resample;
pub mod rewrite;
pub mod schedule;
pub mod segment;
pub mod session;
pub mod source;

pub use config::{EmojiConfig, JotConfig, MarkerConfig};
pub use decoration::{DecorationBuilder, DecorationSet, Side, Widget, build_decorations};
pub use document::{DocNode, DocumentSnapshot, Mark, MarkIdentity, MarkKind, NodeKind};
pub use emoji::{EmojiClassifier, EmojiTest, emoji_key};
pub use error::{ConfigError, DecorationError, DocumentError, ResampleError};
pub use marks::{ClosedSpan, MarkSpanTracker};
pub use platform::Capabilities;
pub use resample::{
    Raster, TargetSize, lanczos, lanczos_resize, lanczos_resize_to, parse_css_px,
};
pub use rewrite::{Fragment, ParentInfo, RewritePlanner};
pub use schedule::{MutationEvent, MutationQueue, RebuildCoalescer};
pub use segment::{SegmentMode, Segmenter};
pub use session::{EditorSession, EditorStatus, HeaderContext, SessionEffect};
pub use smol_str::SmolStr;
pub use source::{CandidateCursor, EmojiSource, ImageCandidate};
