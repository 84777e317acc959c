//! Runtime configuration.
//!
//! The static site passes a plain object (or JSON) at startup. Every field has
//! a default, so an empty object is a valid configuration.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::ConfigError;
use crate::rewrite::DEFAULT_SKIP_TAGS;

pub const DEFAULT_CDN_BASE: &str =
    "https://cdn.jsdelivr.net/npm/emoji-datasource-apple@latest/img/apple";
pub const DEFAULT_EMOJI_SIZES: &[u32] = &[256, 128];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct JotConfig {
    pub emoji: EmojiConfig,
    pub markers: MarkerConfig,
}

impl JotConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.emoji.validate()
    }
}

/// Emoji image replacement settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmojiConfig {
    /// Base URL of the image set, without the size segment.
    pub cdn_base: String,
    /// Image sizes to try, most preferred first.
    pub sizes: Vec<u32>,
    /// Class put on emoji `<img>` and `<canvas>` elements.
    pub class_name: SmolStr,
    /// Parent tags whose text is left alone.
    pub skip_tags: Vec<SmolStr>,
}

impl Default for EmojiConfig {
    fn default() -> Self {
        Self {
            cdn_base: DEFAULT_CDN_BASE.to_string(),
            sizes: DEFAULT_EMOJI_SIZES.to_vec(),
            class_name: SmolStr::new_static("apple-emoji"),
            skip_tags: DEFAULT_SKIP_TAGS.iter().map(|t| SmolStr::new(t)).collect(),
        }
    }
}

impl EmojiConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sizes.is_empty() {
            return Err(ConfigError::NoSizes);
        }
        if self.sizes.contains(&0) {
            return Err(ConfigError::ZeroSize);
        }
        if !(self.cdn_base.starts_with("https://") || self.cdn_base.starts_with("http://")) {
            return Err(ConfigError::CdnBase(self.cdn_base.clone()));
        }
        Ok(())
    }
}

/// Markdown marker overlay settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarkerConfig {
    /// Id of the editor root element.
    pub editor_id: SmolStr,
    /// Selector tried when no element has `editor_id`.
    pub fallback_selector: SmolStr,
    /// Class on the editor root that turns markers on.
    pub toggle_class: SmolStr,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            editor_id: SmolStr::new_static("editor"),
            fallback_selector: SmolStr::new_static(".editor"),
            toggle_class: SmolStr::new_static("show-markdown-formatting"),
        }
    }
}
