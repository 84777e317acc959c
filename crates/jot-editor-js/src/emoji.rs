//! Emoji replacement entry point.

use wasm_bindgen::prelude::*;

use crate::read_config;

/// Replace emoji on the page with images and keep doing so for new content.
///
/// Runs once the document has been parsed. `config` is an optional
/// `JotConfig` object.
#[wasm_bindgen(js_name = startEmoji)]
pub fn start_emoji(config: JsValue) -> Result<(), JsError> {
    let config = read_config(config)?;
    jot_editor_browser::install(&config.emoji)?;
    tracing::debug!(cdn = %config.emoji.cdn_base, "emoji replacement installed");
    Ok(())
}
