//! Platform capability flags.
//!
//! The browser layer reports what the running build and host offer and hands
//! the result here. Core components use it to pick between the preferred
//! algorithm and its documented fallback. Cluster segmentation and the emoji
//! property ship with this crate, so only an explicit configuration turns
//! them off.

/// What the running platform supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Locale-aware grapheme cluster segmentation is available.
    pub grapheme_clusters: bool,
    /// The Unicode `Emoji` property can be queried.
    pub emoji_property: bool,
    /// A hardware bitmap resize with high-quality filtering is available.
    pub accelerated_resize: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::full()
    }
}

impl Capabilities {
    /// Everything available.
    pub const fn full() -> Self {
        Self {
            grapheme_clusters: true,
            emoji_property: true,
            accelerated_resize: true,
        }
    }

    /// Nothing available; every component runs its fallback.
    pub const fn minimal() -> Self {
        Self {
            grapheme_clusters: false,
            emoji_property: false,
            accelerated_resize: false,
        }
    }
}
