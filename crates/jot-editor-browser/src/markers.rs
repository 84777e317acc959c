//! Markdown marker elements and the visibility toggle.

use jot_editor_core::{DecorationBuilder, DecorationSet, MarkerConfig, Widget};
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

/// The element carrying the marker toggle class: `#editor`, else the first
/// `.editor`, else `<html>`.
pub fn editor_root(document: &Document, config: &MarkerConfig) -> Option<Element> {
    document
        .get_element_by_id(&config.editor_id)
        .or_else(|| document.query_selector(&config.fallback_selector).ok().flatten())
        .or_else(|| document.document_element())
}

pub fn markers_visible(root: &Element, config: &MarkerConfig) -> bool {
    root.class_list().contains(&config.toggle_class)
}

/// `<span class="md-marker {class}">{text}</span>` for one widget.
pub fn create_marker_element(document: &Document, widget: &Widget) -> Result<Element, JsValue> {
    let span = document.create_element("span")?;
    span.set_class_name(&widget.dom_class());
    span.set_text_content(Some(&widget.text));
    Ok(span)
}

/// Decorations for the engine's JSON snapshot, reading the toggle from the
/// current page. No page means no markers.
pub fn visible_decorations(
    builder: &DecorationBuilder,
    doc_json: &str,
    config: &MarkerConfig,
) -> DecorationSet {
    let visible = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| editor_root(&d, config))
        .is_some_and(|root| markers_visible(&root, config));
    builder.decorations_from_json(doc_json, visible)
}
