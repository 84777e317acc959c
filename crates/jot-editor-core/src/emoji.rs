//! Emoji detection and image keys.

use std::fmt::Write;
use std::ops::RangeInclusive;

use smol_str::SmolStr;
use unicode_properties::UnicodeEmoji;

use crate::platform::Capabilities;

/// Code points the fallback heuristic treats as emoji.
///
/// Covers Miscellaneous Symbols and Pictographs through Symbols and
/// Pictographs Extended-A. It is an approximation: older emoji in the
/// BMP (☀, ✂, ❤) are missed.
pub const HEURISTIC_RANGE: RangeInclusive<u32> = 0x1F300..=0x1FAFF;

/// Which test decides whether a cluster is emoji.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmojiTest {
    /// Unicode `Emoji` property.
    #[default]
    Property,
    /// Fixed code point range, see [`HEURISTIC_RANGE`].
    RangeHeuristic,
}

/// Classifies grapheme clusters as emoji.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmojiClassifier {
    test: EmojiTest,
}

impl EmojiClassifier {
    pub fn new(test: EmojiTest) -> Self {
        Self { test }
    }

    pub fn from_capabilities(caps: &Capabilities) -> Self {
        let test = if caps.emoji_property {
            EmojiTest::Property
        } else {
            tracing::debug!("emoji property test unavailable, using code point ranges");
            EmojiTest::RangeHeuristic
        };
        Self { test }
    }

    pub fn test(&self) -> EmojiTest {
        self.test
    }

    /// Whether a single grapheme cluster is an emoji.
    ///
    /// Lone ASCII characters never count: digits, `#` and `*` carry the
    /// `Emoji` property but render as text unless followed by a keycap
    /// sequence.
    pub fn is_emoji(&self, cluster: &str) -> bool {
        match self.test {
            EmojiTest::Property => {
                let mut chars = cluster.chars();
                match (chars.next(), chars.next()) {
                    (None, _) => false,
                    (Some(c), None) if c.is_ascii() => false,
                    _ => cluster.chars().any(|c| c.is_emoji_char()),
                }
            }
            EmojiTest::RangeHeuristic => cluster
                .chars()
                .any(|c| HEURISTIC_RANGE.contains(&(c as u32))),
        }
    }

    /// Cheap pre-check over a whole string, before segmenting it.
    ///
    /// May report true for text that ends up containing no emoji cluster;
    /// never reports false for text that does.
    pub fn contains_emoji(&self, text: &str) -> bool {
        match self.test {
            EmojiTest::Property => text
                .chars()
                .any(|c| !c.is_ascii() && c.is_emoji_char_or_emoji_component()),
            EmojiTest::RangeHeuristic => text
                .chars()
                .any(|c| HEURISTIC_RANGE.contains(&(c as u32))),
        }
    }
}

/// File name key for an emoji cluster: lowercase hex code points joined by
/// hyphens, in order. `"👍🏽"` becomes `"1f44d-1f3fd"`.
pub fn emoji_key(cluster: &str) -> SmolStr {
    let mut key = String::with_capacity(cluster.len() * 3);
    for (i, c) in cluster.chars().enumerate() {
        if i > 0 {
            key.push('-');
        }
        // Writing into a String can't fail.
        let _ = write!(key, "{:x}", c as u32);
    }
    SmolStr::from(key)
}
