//! Rebuild coalescing and mutation queueing.
//!
//! Everything runs on one thread, but callbacks can still pile up: the editor
//! reports a change on every keystroke and the page's mutation observer
//! delivers batches of inserted nodes. These two small types keep that work
//! bounded and ordered.

use std::collections::VecDeque;

/// Collapses rebuild requests that arrive while one is already pending.
///
/// Each submission replaces the stored snapshot, so when the pending rebuild
/// finally runs it sees the latest one.
#[derive(Debug)]
pub struct RebuildCoalescer<S> {
    latest: Option<S>,
    pending: bool,
}

impl<S> Default for RebuildCoalescer<S> {
    fn default() -> Self {
        Self {
            latest: None,
            pending: false,
        }
    }
}

impl<S> RebuildCoalescer<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `snapshot` for the next rebuild.
    ///
    /// Returns true when the caller needs to schedule a flush; false when a
    /// flush is already scheduled and will pick this snapshot up.
    pub fn submit(&mut self, snapshot: S) -> bool {
        self.latest = Some(snapshot);
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    /// Take the latest snapshot and clear the pending flag.
    pub fn flush(&mut self) -> Option<S> {
        self.pending = false;
        self.latest.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// A DOM change the emoji rewriter has to look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationEvent<N> {
    /// An element was inserted; its whole subtree needs a rewrite pass.
    SubtreeInserted(N),
    /// A bare text node was inserted.
    TextInserted(N),
}

/// FIFO of mutation events, drained once per observer batch.
#[derive(Debug)]
pub struct MutationQueue<N> {
    events: VecDeque<MutationEvent<N>>,
}

impl<N> Default for MutationQueue<N> {
    fn default() -> Self {
        Self {
            events: VecDeque::new(),
        }
    }
}

impl<N> MutationQueue<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: MutationEvent<N>) {
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove and yield events in the order they were recorded.
    pub fn drain(&mut self) -> std::collections::vec_deque::Drain<'_, MutationEvent<N>> {
        self.events.drain(..)
    }
}
