//! Markdown marker decorations.
//!
//! Computes the overlay of non-editable marker glyphs (`#`, `>`, ```` ``` ````,
//! `*`, `**`, `` ` ``) shown where Markdown syntax would appear in the rich
//! text. The document is never touched; every pass yields a fresh
//! [`DecorationSet`] that replaces the previous one wholesale.
//!
//! # CSS Integration
//!
//! Each widget renders as `<span class="md-marker {class}">{text}</span>`,
//! with `class` one of `md-heading`, `md-quote`, `md-codeblock`,
//! `md-codeblock-end`, `md-open {mark}` or `md-close {mark}`.

use smol_str::{SmolStr, format_smolstr};

use crate::document::{DocumentSnapshot, NodeKind};
use crate::error::DecorationError;
use crate::marks::{ClosedSpan, MarkSpanTracker};

/// Which side of the content at a position a widget sticks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Side {
    /// Drawn before content inserted at the same position.
    Before,
    /// Drawn after content inserted at the same position.
    After,
}

impl Side {
    /// The engine's numeric bias: negative sticks before, positive after.
    pub fn bias(self) -> i8 {
        match self {
            Side::Before => -1,
            Side::After => 1,
        }
    }
}

/// A marker glyph anchored at a document position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Widget {
    pub pos: usize,
    pub text: SmolStr,
    pub class: SmolStr,
    pub side: Side,
}

impl Widget {
    pub fn new(pos: usize, text: impl Into<SmolStr>, class: impl Into<SmolStr>, side: Side) -> Self {
        Self {
            pos,
            text: text.into(),
            class: class.into(),
            side,
        }
    }

    /// Full class attribute for the rendered marker element.
    pub fn dom_class(&self) -> SmolStr {
        format_smolstr!("md-marker {}", self.class)
    }
}

/// An immutable set of widgets, ordered by position then side.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecorationSet {
    widgets: Vec<Widget>,
}

impl DecorationSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sort widgets into display order. Ties keep their insertion order.
    pub fn from_widgets(mut widgets: Vec<Widget>) -> Self {
        widgets.sort_by_key(|w| (w.pos, w.side));
        Self { widgets }
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Widget> {
        self.widgets.iter()
    }

    /// Widgets anchored at `pos`.
    pub fn at(&self, pos: usize) -> impl Iterator<Item = &Widget> {
        self.widgets.iter().filter(move |w| w.pos == pos)
    }

    pub fn into_widgets(self) -> Vec<Widget> {
        self.widgets
    }
}

impl<'a> IntoIterator for &'a DecorationSet {
    type Item = &'a Widget;
    type IntoIter = std::slice::Iter<'a, Widget>;

    fn into_iter(self) -> Self::IntoIter {
        self.widgets.iter()
    }
}

/// Build the marker overlay for a snapshot in a single traversal.
pub fn build_decorations(doc: &DocumentSnapshot) -> Result<DecorationSet, DecorationError> {
    let mut widgets = Vec::new();
    let mut tracker = MarkSpanTracker::new();

    for (node, pos) in doc.descendants() {
        match node.kind() {
            NodeKind::Heading { level } => {
                let text = format_smolstr!("{} ", "#".repeat(*level as usize));
                widgets.push(Widget::new(pos + 1, text, "md-heading", Side::Before));
            }
            NodeKind::Blockquote => {
                widgets.push(Widget::new(pos + 1, "> ", "md-quote", Side::Before));
            }
            NodeKind::CodeBlock => {
                widgets.push(Widget::new(pos + 1, "```", "md-codeblock", Side::Before));
                widgets.push(Widget::new(
                    pos + node.size() - 1,
                    "```",
                    "md-codeblock-end",
                    Side::After,
                ));
            }
            NodeKind::Text { marks, .. } => {
                for span in tracker.observe(pos, marks) {
                    push_span(&mut widgets, &span);
                }
            }
            NodeKind::Paragraph | NodeKind::Leaf(_) | NodeKind::Other(_) => {}
        }
    }

    let end = doc.content_size();
    for span in tracker.finish(end) {
        push_span(&mut widgets, &span);
    }

    if let Some(w) = widgets.iter().find(|w| w.pos > end) {
        return Err(DecorationError::PositionOutOfRange { pos: w.pos, size: end });
    }

    tracing::trace!(widgets = widgets.len(), size = end, "built marker decorations");
    Ok(DecorationSet::from_widgets(widgets))
}

fn push_span(widgets: &mut Vec<Widget>, span: &ClosedSpan) {
    let Some(marker) = span.marker() else {
        return;
    };
    widgets.push(Widget::new(
        span.start,
        marker,
        format_smolstr!("md-open {}", span.mark.name),
        Side::Before,
    ));
    widgets.push(Widget::new(
        span.end,
        marker,
        format_smolstr!("md-close {}", span.mark.name),
        Side::After,
    ));
}

/// Produces the decoration set to apply for the current toggle state.
///
/// This is the component boundary: build failures are logged and degrade to
/// an empty set so stale or partial markers never stay on screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecorationBuilder;

impl DecorationBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Decorations for `doc`, or an empty set when markers are hidden.
    pub fn decorations(&self, doc: &DocumentSnapshot, visible: bool) -> DecorationSet {
        if !visible {
            return DecorationSet::empty();
        }
        match build_decorations(doc) {
            Ok(set) => set,
            Err(err) => {
                tracing::warn!(error = %err, "markdown marker decoration update failed");
                DecorationSet::empty()
            }
        }
    }

    /// Same as [`Self::decorations`], parsing the engine's JSON first.
    pub fn decorations_from_json(&self, json: &str, visible: bool) -> DecorationSet {
        if !visible {
            return DecorationSet::empty();
        }
        match DocumentSnapshot::from_json(json) {
            Ok(doc) => self.decorations(&doc, visible),
            Err(err) => {
                tracing::warn!(error = %err, "could not read document snapshot for markers");
                DecorationSet::empty()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocNode, Mark};

    fn listing(set: &DecorationSet) -> String {
        set.iter()
            .map(|w| {
                let side = match w.side {
                    Side::Before => "before",
                    Side::After => "after",
                };
                format!("{} {} {:?} {}", w.pos, side, w.text.as_str(), w.class)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn doc(content: Vec<DocNode>) -> DocumentSnapshot {
        DocumentSnapshot::new(content)
    }

    #[test]
    fn test_plain_document_has_no_markers() {
        let d = doc(vec![
            DocNode::paragraph(vec![DocNode::text("just text")]),
            DocNode::paragraph(vec![]),
        ]);
        assert!(build_decorations(&d).unwrap().is_empty());
    }

    #[test]
    fn test_heading_marker() {
        let d = doc(vec![DocNode::heading(3, vec![DocNode::text("Hi")])]);
        let set = build_decorations(&d).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(
            set.iter().next(),
            Some(&Widget::new(1, "### ", "md-heading", Side::Before))
        );
    }

    #[test]
    fn test_emphasis_run() {
        // Paragraph at 0, "abcd" at 1..5, emphasised "efgh" at 5..9, "ij" at 9..11.
        let d = doc(vec![DocNode::paragraph(vec![
            DocNode::text("abcd"),
            DocNode::marked("efgh", vec![Mark::emphasis()]),
            DocNode::text("ij"),
        ])]);
        let set = build_decorations(&d).unwrap();
        insta::assert_snapshot!(listing(&set), @r#"
        5 before "*" md-open emphasis
        9 after "*" md-close emphasis
        "#);
    }

    #[test]
    fn test_astral_text_before_emphasis() {
        // "😀" is two UTF-16 units: 1..3, emphasised "x" at 3..4.
        let json = r#"{"type":"doc","content":[{"type":"paragraph","content":[
            {"type":"text","text":"😀"},
            {"type":"text","text":"x","marks":[{"type":"emphasis"}]}
        ]}]}"#;
        let d = DocumentSnapshot::from_json(json).unwrap();
        assert_eq!(d.content_size(), 5);
        let set = build_decorations(&d).unwrap();
        insta::assert_snapshot!(listing(&set), @r#"
        3 before "*" md-open emphasis
        5 after "*" md-close emphasis
        "#);
    }

    #[test]
    fn test_footnote_reference_is_one_position() {
        let json = r#"{"type":"doc","content":[{"type":"paragraph","content":[
            {"type":"footnote_reference","attrs":{"label":"1"}},
            {"type":"text","text":"x","marks":[{"type":"strong"}]}
        ]}]}"#;
        let d = DocumentSnapshot::from_json(json).unwrap();
        assert_eq!(d.content_size(), 4);
        let set = build_decorations(&d).unwrap();
        insta::assert_snapshot!(listing(&set), @r#"
        2 before "**" md-open strong
        4 after "**" md-close strong
        "#);
    }

    #[test]
    fn test_overlapping_marks_pair_up() {
        let d = doc(vec![DocNode::paragraph(vec![
            DocNode::marked("ab", vec![Mark::emphasis()]),
            DocNode::marked("cd", vec![Mark::emphasis(), Mark::strong()]),
            DocNode::text("e"),
        ])]);
        let set = build_decorations(&d).unwrap();
        insta::assert_snapshot!(listing(&set), @r#"
        1 before "*" md-open emphasis
        3 before "**" md-open strong
        5 after "*" md-close emphasis
        5 after "**" md-close strong
        "#);
    }

    #[test]
    fn test_spans_open_at_document_end_are_closed() {
        let d = doc(vec![DocNode::paragraph(vec![
            DocNode::text("a"),
            DocNode::marked("b", vec![Mark::code()]),
        ])]);
        let set = build_decorations(&d).unwrap();
        // Closed at the end of the document content, past the paragraph's close token.
        insta::assert_snapshot!(listing(&set), @r#"
        2 before "`" md-open inlineCode
        4 after "`" md-close inlineCode
        "#);
    }

    #[test]
    fn test_blocks() {
        let d = doc(vec![
            DocNode::blockquote(vec![DocNode::paragraph(vec![DocNode::text("q")])]),
            DocNode::code_block("let x;"),
        ]);
        let set = build_decorations(&d).unwrap();
        insta::assert_snapshot!(listing(&set), @r#"
        1 before "> " md-quote
        6 before "```" md-codeblock
        12 after "```" md-codeblock-end
        "#);
    }

    #[test]
    fn test_unknown_marks_are_silent() {
        let link = Mark::new("link").with_attr("href", serde_json::json!("https://x"));
        let d = doc(vec![DocNode::paragraph(vec![
            DocNode::marked("x", vec![link]),
            DocNode::text("y"),
        ])]);
        assert!(build_decorations(&d).unwrap().is_empty());
    }

    #[test]
    fn test_build_is_idempotent() {
        let d = doc(vec![
            DocNode::heading(1, vec![DocNode::marked("T", vec![Mark::strong()])]),
            DocNode::paragraph(vec![DocNode::marked("e", vec![Mark::emphasis()])]),
        ]);
        assert_eq!(build_decorations(&d).unwrap(), build_decorations(&d).unwrap());
    }

    #[test]
    fn test_hidden_markers_clear_everything() {
        let d = doc(vec![DocNode::heading(2, vec![DocNode::text("x")])]);
        let builder = DecorationBuilder::new();
        assert_eq!(builder.decorations(&d, true).len(), 1);
        assert!(builder.decorations(&d, false).is_empty());
    }

    #[test]
    fn test_malformed_json_degrades_to_empty() {
        let builder = DecorationBuilder::new();
        assert!(
            builder
                .decorations_from_json(r#"{"type":"doc","content":[{"type":"text"}]}"#, true)
                .is_empty()
        );
        let set = builder.decorations_from_json(
            r#"{"type":"doc","content":[{"type":"heading","attrs":{"level":2},"content":[{"type":"text","text":"Hi"}]}]}"#,
            true,
        );
        assert_eq!(set.iter().next().map(|w| w.text.as_str()), Some("## "));
    }

    #[test]
    fn test_dom_class_and_bias() {
        let w = Widget::new(3, "**", "md-open strong", Side::Before);
        assert_eq!(w.dom_class(), "md-marker md-open strong");
        assert_eq!(Side::Before.bias(), -1);
        assert_eq!(Side::After.bias(), 1);
    }
}
