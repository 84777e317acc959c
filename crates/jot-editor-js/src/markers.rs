//! Markdown marker overlay bindings.
//!
//! The host editor calls `update` from its change hook. Updates arriving
//! before the queued rebuild runs only replace the snapshot it will use.

use std::cell::RefCell;
use std::rc::Rc;

use jot_editor_browser::{
    DecorationBuilder, DecorationSet, MarkerConfig, RebuildCoalescer, create_marker_element,
    visible_decorations,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::types::JsWidget;
use crate::{dom_error, read_config};

/// Builds marker widgets for the host's decoration hook.
#[wasm_bindgen]
pub struct JsMarkers {
    builder: DecorationBuilder,
    config: Rc<MarkerConfig>,
    rebuild: Rc<RefCell<RebuildCoalescer<String>>>,
}

#[wasm_bindgen]
impl JsMarkers {
    /// Create the overlay. `config` is an optional `JotConfig` object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsMarkers, JsError> {
        let config = read_config(config)?;
        Ok(Self {
            builder: DecorationBuilder::new(),
            config: Rc::new(config.markers),
            rebuild: Rc::new(RefCell::new(RebuildCoalescer::new())),
        })
    }

    /// Widgets for a document snapshot, given as the engine's JSON object or
    /// its string form. Empty while the toggle class is off.
    pub fn build(&self, doc: JsValue) -> Result<JsValue, JsError> {
        let json = snapshot_json(&doc)?;
        let set = visible_decorations(&self.builder, &json, &self.config);
        to_js(&set)
    }

    /// Queue a rebuild for `doc` and pass the widgets to `on_apply` once it
    /// runs. Several updates before that collapse into one build of the
    /// latest snapshot.
    pub fn update(&self, doc: JsValue, on_apply: js_sys::Function) -> Result<(), JsError> {
        let json = snapshot_json(&doc)?;
        if !self.rebuild.borrow_mut().submit(json) {
            tracing::trace!("marker rebuild already queued");
            return Ok(());
        }

        let builder = self.builder;
        let config = self.config.clone();
        let rebuild = self.rebuild.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let Some(json) = rebuild.borrow_mut().flush() else {
                return;
            };
            let set = visible_decorations(&builder, &json, &config);
            let result = to_js(&set)
                .map_err(JsValue::from)
                .and_then(|widgets| on_apply.call1(&JsValue::NULL, &widgets));
            if let Err(e) = result {
                tracing::warn!("marker decoration apply failed: {:?}", e);
            }
        });
        Ok(())
    }

    /// Whether the toggle class is currently on the editor root.
    #[wasm_bindgen(js_name = isVisible)]
    pub fn is_visible(&self) -> bool {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| jot_editor_browser::editor_root(&d, &self.config))
            .is_some_and(|root| jot_editor_browser::markers_visible(&root, &self.config))
    }

    /// The `<span>` to render for one widget.
    #[wasm_bindgen(js_name = markerElement)]
    pub fn marker_element(&self, widget: JsWidget) -> Result<Element, JsError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsError::new("No document"))?;
        create_marker_element(&document, &widget.to_widget()).map_err(dom_error)
    }
}

fn snapshot_json(doc: &JsValue) -> Result<String, JsError> {
    if let Some(json) = doc.as_string() {
        return Ok(json);
    }
    js_sys::JSON::stringify(doc)
        .map_err(dom_error)?
        .as_string()
        .ok_or_else(|| JsError::new("Document snapshot is not serializable"))
}

fn to_js(set: &DecorationSet) -> Result<JsValue, JsError> {
    let widgets: Vec<JsWidget> = set.iter().map(JsWidget::from).collect();
    widgets
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}
