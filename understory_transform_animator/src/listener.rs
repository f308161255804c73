// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::sync::atomic::{AtomicU64, Ordering};

/// Identifies one animator for the lifetime of the process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimatorId(u64);

impl AnimatorId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw id value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Lifecycle notifications for an animator run.
///
/// All methods default to doing nothing.
pub trait AnimatorListener {
    /// The first frame of a run was written.
    fn on_animation_start(&mut self, _animator: AnimatorId) {}
    /// The last pass completed and the end state was written.
    fn on_animation_end(&mut self, _animator: AnimatorId) {}
    /// The run was cancelled before completing.
    fn on_animation_cancel(&mut self, _animator: AnimatorId) {}
    /// A pass completed and another one follows.
    fn on_animation_repeat(&mut self, _animator: AnimatorId) {}
}

/// What happened to an animator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimatorEventKind {
    /// See [`AnimatorListener::on_animation_start`].
    Start,
    /// See [`AnimatorListener::on_animation_end`].
    End,
    /// See [`AnimatorListener::on_animation_cancel`].
    Cancel,
    /// See [`AnimatorListener::on_animation_repeat`].
    Repeat,
}

/// A recorded lifecycle notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AnimatorEvent {
    /// The animator that emitted the event.
    pub animator: AnimatorId,
    /// The kind of event.
    pub kind: AnimatorEventKind,
}

/// A listener that queues events for the owner to drain after each frame.
///
/// Clones share the queue. Hand one clone to the animator and keep another:
/// the owner can then react to start/end without being borrowed by the
/// animator while it runs.
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    events: Rc<RefCell<VecDeque<AnimatorEvent>>>,
}

impl EventQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns every queued event, oldest first.
    pub fn drain(&self) -> Vec<AnimatorEvent> {
        self.events.borrow_mut().drain(..).collect()
    }

    /// Whether no events are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    fn push(&self, animator: AnimatorId, kind: AnimatorEventKind) {
        self.events
            .borrow_mut()
            .push_back(AnimatorEvent { animator, kind });
    }
}

impl AnimatorListener for EventQueue {
    fn on_animation_start(&mut self, animator: AnimatorId) {
        self.push(animator, AnimatorEventKind::Start);
    }

    fn on_animation_end(&mut self, animator: AnimatorId) {
        self.push(animator, AnimatorEventKind::End);
    }

    fn on_animation_cancel(&mut self, animator: AnimatorId) {
        self.push(animator, AnimatorEventKind::Cancel);
    }

    fn on_animation_repeat(&mut self, animator: AnimatorId) {
        self.push(animator, AnimatorEventKind::Repeat);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = AnimatorId::next();
        let b = AnimatorId::next();
        assert_ne!(a, b);
        assert!(b.get() > a.get());
    }

    #[test]
    fn queue_clones_share_events() {
        let queue = EventQueue::new();
        let mut handed_out = queue.clone();
        let id = AnimatorId::next();
        handed_out.on_animation_start(id);
        handed_out.on_animation_end(id);
        let events = queue.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, AnimatorEventKind::Start);
        assert_eq!(events[1].kind, AnimatorEventKind::End);
        assert!(queue.is_empty());
    }
}
