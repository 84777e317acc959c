//! WASM bindings for the jot note editor.
//!
//! Exposes the marker overlay, the editor session hooks and the emoji
//! replacement to the host page.

mod emoji;
mod markers;
mod session;
mod types;

pub use emoji::*;
pub use markers::*;
pub use session::*;
pub use types::*;

use jot_editor_core::JotConfig;
use wasm_bindgen::prelude::*;

/// Install the panic hook and console tracing.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use tracing::Level;
    use tracing::subscriber::set_global_default;
    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::SubscriberExt;

    let console_level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(console_level)
            .build(),
    );

    let reg = Registry::default().with(wasm_layer);

    let _ = set_global_default(reg);
}

/// Read an optional config object; `undefined` and `null` mean defaults.
pub(crate) fn read_config(value: JsValue) -> Result<JotConfig, JsError> {
    if value.is_undefined() || value.is_null() {
        return Ok(JotConfig::default());
    }
    let config: JotConfig = serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?;
    config.validate()?;
    Ok(config)
}

pub(crate) fn dom_error(value: JsValue) -> JsError {
    JsError::new(&format!("DOM error: {:?}", value))
}
