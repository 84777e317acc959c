//! Emoji replacement in page text.
//!
//! Text nodes holding emoji are swapped for a fragment of plain text and
//! `<img>` elements pointing at the remote image set. Each image walks its
//! candidate sizes on load errors and is redrawn at the text's size once it
//! loads (see [`crate::resize`]).

use std::cell::RefCell;
use std::rc::Rc;

use jot_editor_core::{
    CandidateCursor, EmojiConfig, EmojiSource, Fragment, ParentInfo, RewritePlanner, SmolStr,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, HtmlImageElement, Node, Text};

use crate::error::RewriteError;
use crate::observer::EmojiWatch;
use crate::platform::capabilities;

/// `NodeFilter.SHOW_TEXT`
const SHOW_TEXT: u32 = 0x4;

/// Rewrites emoji-bearing text nodes into text + image fragments.
pub struct EmojiRewriter {
    planner: RewritePlanner,
    source: EmojiSource,
    class_name: SmolStr,
}

impl EmojiRewriter {
    pub fn new(planner: RewritePlanner, source: EmojiSource, class_name: impl Into<SmolStr>) -> Self {
        Self {
            planner,
            source,
            class_name: class_name.into(),
        }
    }

    /// Rewriter for the current browser: grapheme clusters and the `Emoji`
    /// property, with the configured source and skip tags.
    pub fn from_config(config: &EmojiConfig) -> Self {
        let planner = RewritePlanner::from_capabilities(&capabilities())
            .with_skip_tags(config.skip_tags.iter().cloned());
        Self::new(
            planner,
            EmojiSource::from_config(config),
            config.class_name.clone(),
        )
    }

    pub fn planner(&self) -> &RewritePlanner {
        &self.planner
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Rewrite every eligible text node under `root`, in document order.
    ///
    /// Candidates are collected before any replacement so the walk never
    /// sees the nodes it inserts. Returns the number of text nodes replaced.
    pub fn rewrite(&self, root: &Node) -> Result<usize, RewriteError> {
        let document = owner_document(root)?;

        let mut pending = Vec::new();
        if let Some(text) = root.dyn_ref::<Text>() {
            if self.accepts(text) {
                pending.push(text.clone());
            }
        } else {
            let walker = document.create_tree_walker_with_what_to_show(root, SHOW_TEXT)?;
            while let Some(node) = walker.next_node()? {
                if let Ok(text) = node.dyn_into::<Text>() {
                    if self.accepts(&text) {
                        pending.push(text);
                    }
                }
            }
        }

        let mut replaced = 0;
        for text in &pending {
            if self.replace_text(&document, text)? {
                replaced += 1;
            }
        }

        tracing::debug!(candidates = pending.len(), replaced, "emoji rewrite pass");
        Ok(replaced)
    }

    /// Rewrite a single text node if it is eligible. Returns whether it was
    /// replaced.
    pub fn rewrite_text(&self, text: &Text) -> Result<bool, RewriteError> {
        if !self.accepts(text) {
            return Ok(false);
        }
        let document = owner_document(text)?;
        self.replace_text(&document, text)
    }

    fn accepts(&self, text: &Text) -> bool {
        let data = text.data();
        let parent = text.parent_element();
        let tag = parent.as_ref().map(|p| p.tag_name().to_ascii_lowercase());
        let info = match (&parent, &tag) {
            (Some(parent), Some(tag)) => Some(ParentInfo {
                tag: tag.as_str(),
                editable: parent
                    .dyn_ref::<HtmlElement>()
                    .is_some_and(|el| el.is_content_editable()),
            }),
            _ => None,
        };
        self.planner.is_eligible(&data, info)
    }

    fn replace_text(&self, document: &Document, text: &Text) -> Result<bool, RewriteError> {
        let Some(fragments) = self.planner.plan(&text.data()) else {
            return Ok(false);
        };
        let Some(parent) = text.parent_node() else {
            return Ok(false);
        };

        let out = document.create_document_fragment();
        for fragment in fragments {
            match fragment {
                Fragment::Text(plain) => {
                    out.append_child(&document.create_text_node(&plain))?;
                }
                Fragment::Emoji { cluster, key } => {
                    let img = self.emoji_image(document, &cluster, &key)?;
                    out.append_child(&img)?;
                }
            }
        }

        parent.replace_child(&out, text)?;
        Ok(true)
    }

    fn emoji_image(
        &self,
        document: &Document,
        cluster: &str,
        key: &str,
    ) -> Result<HtmlImageElement, RewriteError> {
        let img = document
            .create_element("img")?
            .dyn_into::<HtmlImageElement>()
            .map_err(|_| RewriteError::Dom("created img is not an HTMLImageElement".into()))?;
        img.set_class_name(&self.class_name);
        img.set_attribute("decoding", "async")?;
        img.set_cross_origin(Some("anonymous"));
        img.set_alt(cluster);
        img.set_draggable(false);

        let mut cursor = CandidateCursor::new(self.source.candidates(key));
        let Some(first) = cursor.current().cloned() else {
            return Ok(img);
        };

        // Both handlers are dropped by `settle` once the image has loaded or
        // run out of sizes.
        let handlers: Rc<RefCell<ImageHandlers>> = Rc::default();

        let onerror = {
            let img = img.clone();
            let handlers = handlers.clone();
            Closure::wrap(Box::new(move || match cursor.advance() {
                Some(next) => {
                    tracing::trace!(url = %next.url, "emoji image failed, trying next size");
                    if let Err(e) = img.set_attribute("data-emoji-size", &next.size.to_string()) {
                        tracing::trace!(error = ?e, "could not record emoji image size");
                    }
                    img.set_src(&next.url);
                }
                None => {
                    tracing::trace!(alt = %img.alt(), "no emoji image size loaded");
                    settle(&img, &handlers);
                }
            }) as Box<dyn FnMut()>)
        };

        let onload = {
            let img = img.clone();
            let handlers = handlers.clone();
            let class_name = self.class_name.clone();
            Closure::wrap(Box::new(move || {
                let target = img.clone();
                let class_name = class_name.clone();
                settle(&img, &handlers);
                let img = target;
                wasm_bindgen_futures::spawn_local(async move {
                    if let Err(e) = crate::resize::upgrade_image(&img, &class_name).await {
                        tracing::warn!(error = %e, "emoji downscale failed, leaving original image");
                    }
                });
            }) as Box<dyn FnMut()>)
        };

        img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        img.set_onload(Some(onload.as_ref().unchecked_ref()));
        *handlers.borrow_mut() = ImageHandlers {
            onerror: Some(onerror),
            onload: Some(onload),
        };

        img.set_attribute("data-emoji-size", &first.size.to_string())?;
        img.set_src(&first.url);
        Ok(img)
    }
}

/// Event handlers of one emoji image.
#[derive(Default)]
struct ImageHandlers {
    onerror: Option<Closure<dyn FnMut()>>,
    onload: Option<Closure<dyn FnMut()>>,
}

/// Detach and free an image's handlers. Called from inside one of them;
/// wasm-bindgen defers freeing a closure that is still running.
fn settle(img: &HtmlImageElement, handlers: &RefCell<ImageHandlers>) {
    img.set_onerror(None);
    img.set_onload(None);
    let handlers = std::mem::take(&mut *handlers.borrow_mut());
    drop(handlers);
}

fn owner_document(node: &Node) -> Result<Document, RewriteError> {
    match node.dyn_ref::<Document>() {
        Some(document) => Ok(document.clone()),
        None => node.owner_document().ok_or(RewriteError::Detached),
    }
}

/// Rewrite the page body and keep watching it, once the document is parsed.
pub fn install(config: &EmojiConfig) -> Result<Rc<EmojiRewriter>, RewriteError> {
    let window = web_sys::window().ok_or(RewriteError::NoWindow)?;
    let document = window.document().ok_or(RewriteError::Detached)?;
    let rewriter = Rc::new(EmojiRewriter::from_config(config));

    if document.ready_state() == "loading" {
        let on_ready = {
            let rewriter = rewriter.clone();
            let document = document.clone();
            Closure::once_into_js(move || {
                if let Err(e) = start(&rewriter, &document) {
                    tracing::warn!(error = %e, "emoji replacement skipped");
                }
            })
        };
        document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())?;
    } else {
        start(&rewriter, &document)?;
    }

    Ok(rewriter)
}

fn start(rewriter: &Rc<EmojiRewriter>, document: &Document) -> Result<(), RewriteError> {
    let body = document.body().ok_or(RewriteError::Detached)?;
    rewriter.rewrite(&body)?;
    EmojiWatch::start(rewriter.clone(), &body)?;
    Ok(())
}
