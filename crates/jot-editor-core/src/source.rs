//! Remote emoji image locations.
//!
//! Images live at `{cdn_base}/{size}/{key}.png`. Sizes are tried in
//! preference order; a failed load moves on to the next one and after the
//! last we give up without surfacing anything.

use smol_str::{SmolStr, format_smolstr};

use crate::config::EmojiConfig;

/// One URL to try for an emoji image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    pub size: u32,
    pub url: SmolStr,
}

/// Where emoji images are fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmojiSource {
    cdn_base: SmolStr,
    sizes: Vec<u32>,
}

impl EmojiSource {
    pub fn new(cdn_base: impl Into<SmolStr>, sizes: Vec<u32>) -> Self {
        let cdn_base: SmolStr = cdn_base.into();
        Self {
            cdn_base: SmolStr::new(cdn_base.trim_end_matches('/')),
            sizes,
        }
    }

    pub fn from_config(config: &EmojiConfig) -> Self {
        Self::new(config.cdn_base.as_str(), config.sizes.clone())
    }

    pub fn url(&self, key: &str, size: u32) -> SmolStr {
        format_smolstr!("{}/{}/{}.png", self.cdn_base, size, key)
    }

    /// Candidate URLs for `key`, most preferred first.
    pub fn candidates(&self, key: &str) -> Vec<ImageCandidate> {
        self.sizes
            .iter()
            .map(|&size| ImageCandidate {
                size,
                url: self.url(key, size),
            })
            .collect()
    }
}

/// Walks the candidate list as loads fail.
#[derive(Debug, Clone)]
pub struct CandidateCursor {
    candidates: Vec<ImageCandidate>,
    index: usize,
}

impl CandidateCursor {
    pub fn new(candidates: Vec<ImageCandidate>) -> Self {
        Self {
            candidates,
            index: 0,
        }
    }

    /// The candidate currently being tried.
    pub fn current(&self) -> Option<&ImageCandidate> {
        self.candidates.get(self.index)
    }

    /// Move past a failed candidate. Returns the next one, or `None` once
    /// the list is exhausted.
    pub fn advance(&mut self) -> Option<&ImageCandidate> {
        if self.index < self.candidates.len() {
            self.index += 1;
        }
        self.candidates.get(self.index)
    }

    pub fn is_exhausted(&self) -> bool {
        self.index >= self.candidates.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_order() {
        let source = EmojiSource::new("https://cdn.example/img/apple/", vec![256, 128]);
        let urls: Vec<_> = source
            .candidates("1f600")
            .into_iter()
            .map(|c| c.url)
            .collect();
        assert_eq!(
            urls,
            vec![
                "https://cdn.example/img/apple/256/1f600.png",
                "https://cdn.example/img/apple/128/1f600.png",
            ]
        );
    }

    #[test]
    fn test_cursor_falls_back_then_gives_up() {
        let source = EmojiSource::new("https://cdn.example", vec![256, 128]);
        let mut cursor = CandidateCursor::new(source.candidates("1f44d"));
        assert_eq!(cursor.current().map(|c| c.size), Some(256));
        assert_eq!(cursor.advance().map(|c| c.size), Some(128));
        assert_eq!(cursor.advance(), None);
        assert!(cursor.is_exhausted());
        assert_eq!(cursor.advance(), None);
        assert_eq!(cursor.current(), None);
    }

    #[test]
    fn test_default_config_source() {
        let source = EmojiSource::from_config(&EmojiConfig::default());
        assert_eq!(
            source.url("1f600", 128),
            "https://cdn.jsdelivr.net/npm/emoji-datasource-apple@latest/img/apple/128/1f600.png"
        );
    }
}
