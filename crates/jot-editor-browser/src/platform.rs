//! Browser capability detection.
//!
//! Grapheme clusters and the `Emoji` property come from the compiled-in
//! Unicode tables and are always on. Only the accelerated bitmap resize
//! depends on the browser, so that is the one thing checked.

use std::sync::OnceLock;

use jot_editor_core::Capabilities;
use wasm_bindgen::JsValue;

/// Capabilities of the current browser, detected on first use.
pub fn capabilities() -> Capabilities {
    static CAPS: OnceLock<Capabilities> = OnceLock::new();
    *CAPS.get_or_init(detect)
}

fn detect() -> Capabilities {
    let caps = Capabilities {
        accelerated_resize: has_function(&js_sys::global(), "createImageBitmap"),
        ..Capabilities::full()
    };
    tracing::debug!(?caps, "detected browser capabilities");
    caps
}

fn has_function(target: &JsValue, name: &str) -> bool {
    js_sys::Reflect::get(target, &JsValue::from_str(name))
        .map(|v| v.is_function())
        .unwrap_or(false)
}
