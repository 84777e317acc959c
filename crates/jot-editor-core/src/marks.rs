//! Mark-span tracking.
//!
//! Marks don't carry positions; their extent is inferred from the run of
//! consecutive text nodes that carry them. The tracker is fed text runs in
//! document order and reports each span once it has closed.
//!
//! Two adjacent runs with separate but identical marks (same type and
//! attributes) can't be told apart from one continuous mark, so they come out
//! as a single span. Only text runs are observed, which means a span can also
//! stretch over a block boundary when the next block's first run carries the
//! same mark.

use indexmap::IndexMap;

use crate::document::{Mark, MarkIdentity};

/// A span that is still open.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSpan {
    pub mark: Mark,
    pub start: usize,
}

/// A span whose extent is known.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedSpan {
    pub identity: MarkIdentity,
    pub mark: Mark,
    pub start: usize,
    pub end: usize,
}

impl ClosedSpan {
    /// Markdown glyph for this span, `None` for marks we don't draw.
    pub fn marker(&self) -> Option<&'static str> {
        self.mark.kind.marker()
    }
}

/// Open spans for one traversal pass, keyed by mark identity.
///
/// At most one span is open per identity; spans close in the order they were
/// opened.
#[derive(Debug, Default)]
pub struct MarkSpanTracker {
    active: IndexMap<MarkIdentity, ActiveSpan>,
}

impl MarkSpanTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a text run starting at `pos` carrying `marks`.
    ///
    /// Opens spans for marks not yet tracked, then closes at `pos` every
    /// tracked span whose mark this run no longer carries.
    pub fn observe(&mut self, pos: usize, marks: &[Mark]) -> Vec<ClosedSpan> {
        let current: Vec<MarkIdentity> = marks.iter().map(Mark::identity).collect();

        for (mark, identity) in marks.iter().zip(&current) {
            self.active
                .entry(identity.clone())
                .or_insert_with(|| ActiveSpan {
                    mark: mark.clone(),
                    start: pos,
                });
        }

        let mut closed = Vec::new();
        self.active.retain(|identity, span| {
            if current.contains(identity) {
                return true;
            }
            closed.push(ClosedSpan {
                identity: identity.clone(),
                mark: span.mark.clone(),
                start: span.start,
                end: pos,
            });
            false
        });

        if !closed.is_empty() {
            tracing::trace!(pos, closed = closed.len(), "mark spans closed");
        }
        closed
    }

    /// Close everything still open at `end`.
    pub fn finish(&mut self, end: usize) -> Vec<ClosedSpan> {
        self.active
            .drain(..)
            .map(|(identity, span)| ClosedSpan {
                identity,
                mark: span.mark,
                start: span.start,
                end,
            })
            .collect()
    }

    pub fn is_open(&self, identity: &MarkIdentity) -> bool {
        self.active.contains_key(identity)
    }

    pub fn open_count(&self) -> usize {
        self.active.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(spans: &[ClosedSpan]) -> Vec<(&str, usize, usize)> {
        spans
            .iter()
            .map(|s| (s.mark.name.as_str(), s.start, s.end))
            .collect()
    }

    #[test]
    fn test_single_span() {
        let mut t = MarkSpanTracker::new();
        assert!(t.observe(1, &[]).is_empty());
        assert!(t.observe(5, &[Mark::emphasis()]).is_empty());
        assert_eq!(t.open_count(), 1);
        let closed = t.observe(9, &[]);
        assert_eq!(ranges(&closed), vec![("emphasis", 5, 9)]);
        assert_eq!(closed[0].marker(), Some("*"));
        assert!(t.finish(11).is_empty());
    }

    #[test]
    fn test_overlapping_spans_close_independently() {
        let mut t = MarkSpanTracker::new();
        t.observe(1, &[Mark::emphasis()]);
        t.observe(3, &[Mark::emphasis(), Mark::strong()]);
        let closed = t.observe(6, &[Mark::emphasis()]);
        assert_eq!(ranges(&closed), vec![("strong", 3, 6)]);
        assert!(t.is_open(&Mark::emphasis().identity()));
        let closed = t.finish(8);
        assert_eq!(ranges(&closed), vec![("emphasis", 1, 8)]);
        assert_eq!(t.open_count(), 0);
    }

    #[test]
    fn test_close_order_follows_open_order() {
        let mut t = MarkSpanTracker::new();
        t.observe(1, &[Mark::strong(), Mark::emphasis(), Mark::code()]);
        let closed = t.observe(4, &[]);
        assert_eq!(
            ranges(&closed),
            vec![("strong", 1, 4), ("emphasis", 1, 4), ("inlineCode", 1, 4)]
        );
    }

    #[test]
    fn test_one_span_per_identity() {
        let mut t = MarkSpanTracker::new();
        t.observe(1, &[Mark::strong()]);
        t.observe(2, &[Mark::strong()]);
        t.observe(3, &[Mark::strong()]);
        assert_eq!(t.open_count(), 1);
        assert_eq!(ranges(&t.finish(4)), vec![("strong", 1, 4)]);
    }

    #[test]
    fn test_attrs_distinguish_spans() {
        let a = Mark::new("link").with_attr("href", serde_json::json!("a"));
        let b = Mark::new("link").with_attr("href", serde_json::json!("b"));
        let mut t = MarkSpanTracker::new();
        t.observe(1, &[a]);
        let closed = t.observe(3, &[b]);
        assert_eq!(ranges(&closed), vec![("link", 1, 3)]);
        assert_eq!(closed[0].marker(), None);
        assert_eq!(t.open_count(), 1);
    }
}
