//! Editor session bindings.
//!
//! Each hook returns its effects as `{kind, value?}` objects and, when a
//! host object was given, calls `host[kind](value)` for every effect the
//! host has a method for.

use jot_editor_browser::{EditorSession, SessionEffect};
use js_sys::{Function, Reflect};
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::dom_error;

#[wasm_bindgen]
pub struct JsEditorSession {
    inner: EditorSession,
    host: JsValue,
}

#[wasm_bindgen]
impl JsEditorSession {
    #[wasm_bindgen(constructor)]
    pub fn new(has_notes: bool, host: JsValue) -> JsEditorSession {
        Self {
            inner: EditorSession::new(has_notes),
            host,
        }
    }

    #[wasm_bindgen(js_name = setHasNotes)]
    pub fn set_has_notes(&mut self, has_notes: bool) {
        self.inner.set_has_notes(has_notes);
    }

    #[wasm_bindgen(js_name = setLocked)]
    pub fn set_locked(&mut self, locked: bool) {
        self.inner.set_locked(locked);
    }

    /// `"empty"` or `"writing"`.
    #[wasm_bindgen(getter)]
    pub fn status(&self) -> Result<JsValue, JsError> {
        to_js(&self.inner.status())
    }

    #[wasm_bindgen(getter, js_name = isUpdated)]
    pub fn is_updated(&self) -> bool {
        self.inner.is_updated()
    }

    /// Editor mount hook.
    pub fn mounted(&mut self) -> Result<JsValue, JsError> {
        let effects = self.inner.mounted();
        self.dispatch(&effects)
    }

    /// Document update hook. `content_size` is the document's content size
    /// in engine positions.
    pub fn updated(&mut self, content_size: usize) -> Result<JsValue, JsError> {
        let effects = self.inner.updated(content_size);
        self.dispatch(&effects)
    }
}

impl JsEditorSession {
    fn dispatch(&self, effects: &[SessionEffect]) -> Result<JsValue, JsError> {
        let out = js_sys::Array::new();
        for effect in effects {
            let value = to_js(effect)?;
            if self.host.is_object() {
                self.apply(&value)?;
            }
            out.push(&value);
        }
        Ok(out.into())
    }

    fn apply(&self, effect: &JsValue) -> Result<(), JsError> {
        let kind = Reflect::get(effect, &JsValue::from_str("kind")).map_err(dom_error)?;
        let handler = Reflect::get(&self.host, &kind).map_err(dom_error)?;
        let Some(handler) = handler.dyn_ref::<Function>() else {
            tracing::trace!(kind = ?kind.as_string(), "host has no handler for session effect");
            return Ok(());
        };
        let arg = Reflect::get(effect, &JsValue::from_str("value")).map_err(dom_error)?;
        handler.call1(&self.host, &arg).map_err(dom_error)?;
        Ok(())
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}
