//! Grapheme segmentation.
//!
//! Splits text into user-perceived characters so an emoji with modifiers,
//! a flag or a ZWJ family stays in one piece. When the platform can't do
//! cluster segmentation we split by code point instead, which breaks those
//! sequences apart. That is a known limitation of the fallback, not an error.

use std::str::CharIndices;

use unicode_segmentation::{Graphemes, UnicodeSegmentation};

use crate::platform::Capabilities;

/// How text is split into segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentMode {
    /// Extended grapheme clusters.
    #[default]
    Clusters,
    /// One segment per Unicode scalar value.
    CodePoints,
}

/// Splits text into segments according to its mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct Segmenter {
    mode: SegmentMode,
}

impl Segmenter {
    pub fn new(mode: SegmentMode) -> Self {
        Self { mode }
    }

    /// Pick the best mode the platform supports.
    pub fn from_capabilities(caps: &Capabilities) -> Self {
        let mode = if caps.grapheme_clusters {
            SegmentMode::Clusters
        } else {
            tracing::debug!("grapheme segmentation unavailable, splitting by code point");
            SegmentMode::CodePoints
        };
        Self { mode }
    }

    pub fn mode(&self) -> SegmentMode {
        self.mode
    }

    /// Segment `text`.
    ///
    /// The returned iterator is `Clone`, so it can be restarted without
    /// re-segmenting. Its items concatenate back to `text` exactly.
    pub fn segment<'a>(&self, text: &'a str) -> Segments<'a> {
        match self.mode {
            SegmentMode::Clusters => Segments::Clusters(text.graphemes(true)),
            SegmentMode::CodePoints => Segments::CodePoints(CodePoints {
                text,
                chars: text.char_indices(),
            }),
        }
    }
}

/// Iterator over the segments of a string.
#[derive(Clone)]
pub enum Segments<'a> {
    Clusters(Graphemes<'a>),
    CodePoints(CodePoints<'a>),
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Segments::Clusters(inner) => inner.next(),
            Segments::CodePoints(inner) => inner.next(),
        }
    }
}

/// Code point iterator yielding string slices rather than `char`s.
#[derive(Clone)]
pub struct CodePoints<'a> {
    text: &'a str,
    chars: CharIndices<'a>,
}

impl<'a> Iterator for CodePoints<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let (start, c) = self.chars.next()?;
        Some(&self.text[start..start + c.len_utf8()])
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_clusters_keep_zwj_family_together() {
        let seg = Segmenter::new(SegmentMode::Clusters);
        let parts: Vec<_> = seg.segment("a👨‍👩‍👧b").collect();
        assert_eq!(parts, vec!["a", "👨‍👩‍👧", "b"]);
    }

    #[test]
    fn test_clusters_keep_flag_together() {
        let seg = Segmenter::new(SegmentMode::Clusters);
        assert_eq!(seg.segment("🇳🇿").count(), 1);
    }

    #[test]
    fn test_code_points_split_flag() {
        // Regional indicator pair falls apart in the fallback.
        let seg = Segmenter::new(SegmentMode::CodePoints);
        let parts: Vec<_> = seg.segment("🇳🇿").collect();
        assert_eq!(parts, vec!["🇳", "🇿"]);
    }

    #[test]
    fn test_segments_restartable() {
        let seg = Segmenter::default();
        let first = seg.segment("hi 😀");
        let again = first.clone();
        assert_eq!(first.collect::<Vec<_>>(), again.collect::<Vec<_>>());
    }

    #[test]
    fn test_from_capabilities() {
        assert_eq!(
            Segmenter::from_capabilities(&Capabilities::full()).mode(),
            SegmentMode::Clusters
        );
        assert_eq!(
            Segmenter::from_capabilities(&Capabilities::minimal()).mode(),
            SegmentMode::CodePoints
        );
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(Segmenter::default().segment("").count(), 0);
    }

    proptest! {
        #[test]
        fn prop_clusters_round_trip(s in any::<String>()) {
            let seg = Segmenter::new(SegmentMode::Clusters);
            prop_assert_eq!(seg.segment(&s).collect::<String>(), s);
        }

        #[test]
        fn prop_code_points_round_trip(s in any::<String>()) {
            let seg = Segmenter::new(SegmentMode::CodePoints);
            prop_assert_eq!(seg.segment(&s).collect::<String>(), s.clone());
            prop_assert_eq!(seg.segment(&s).count(), s.chars().count());
        }
    }
}
