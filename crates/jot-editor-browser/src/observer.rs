//! Mutation watch feeding the emoji rewriter.

use std::rc::Rc;

use jot_editor_core::{MutationEvent, MutationQueue};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{MutationObserver, MutationObserverInit, MutationRecord, Node, Text};

use crate::emoji_dom::EmojiRewriter;
use crate::error::RewriteError;

/// Keeps rewriting emoji in nodes inserted under a root.
///
/// The observer runs for the lifetime of the page; its callback is leaked.
pub struct EmojiWatch {
    observer: MutationObserver,
}

impl EmojiWatch {
    pub fn start(rewriter: Rc<EmojiRewriter>, root: &Node) -> Result<Self, RewriteError> {
        let mut queue: MutationQueue<Node> = MutationQueue::new();

        let callback = Closure::wrap(Box::new(move |records: js_sys::Array, _: MutationObserver| {
            for record in records.iter() {
                let Ok(record) = record.dyn_into::<MutationRecord>() else {
                    continue;
                };
                let added = record.added_nodes();
                for i in 0..added.length() {
                    let Some(node) = added.item(i) else { continue };
                    match node.node_type() {
                        Node::ELEMENT_NODE => queue.push(MutationEvent::SubtreeInserted(node)),
                        Node::TEXT_NODE => queue.push(MutationEvent::TextInserted(node)),
                        _ => {}
                    }
                }
            }

            tracing::trace!(events = queue.len(), "emoji mutation batch");
            for event in queue.drain() {
                handle(&rewriter, event);
            }
        }) as Box<dyn FnMut(js_sys::Array, MutationObserver)>);

        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
        let options = MutationObserverInit::new();
        options.set_child_list(true);
        options.set_subtree(true);
        observer.observe_with_options(root, &options)?;
        callback.forget();

        Ok(Self { observer })
    }

    pub fn observer(&self) -> &MutationObserver {
        &self.observer
    }
}

fn handle(rewriter: &EmojiRewriter, event: MutationEvent<Node>) {
    let result = match event {
        MutationEvent::SubtreeInserted(node) => rewriter.rewrite(&node).map(|_| ()),
        MutationEvent::TextInserted(node) => match node.dyn_into::<Text>() {
            Ok(text) => rewriter.rewrite_text(&text).map(|_| ()),
            Err(_) => Ok(()),
        },
    };
    if let Err(e) = result {
        tracing::warn!(error = %e, "emoji rewrite of inserted node failed");
    }
}
