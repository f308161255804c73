// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Feeding `ui-events` pointer streams into a [`GestureRecognizer`].

use smallvec::SmallVec;
use ui_events::pointer::{PointerEvent, PointerId as UiPointerId};

use crate::recognizer::{GestureListener, GestureRecognizer};
use crate::sample::{PointerId, PointerPhase, PointerSample};

/// Hands out the smallest free [`PointerId`] per active external key.
#[derive(Clone, Debug)]
struct DenseIds<K> {
    active: SmallVec<[(K, PointerId); 4]>,
}

impl<K> Default for DenseIds<K> {
    fn default() -> Self {
        Self {
            active: SmallVec::new(),
        }
    }
}

impl<K: Copy + PartialEq> DenseIds<K> {
    fn get(&self, key: K) -> Option<PointerId> {
        self.active.iter().find(|(k, _)| *k == key).map(|(_, id)| *id)
    }

    fn acquire(&mut self, key: K) -> PointerId {
        if let Some(id) = self.get(key) {
            return id;
        }
        let mut next = 0;
        while self.active.iter().any(|(_, id)| id.0 == next) {
            next += 1;
        }
        let id = PointerId(next);
        self.active.push((key, id));
        id
    }

    fn release(&mut self, key: K) -> Option<PointerId> {
        let index = self.active.iter().position(|(k, _)| *k == key)?;
        Some(self.active.remove(index).1)
    }

    fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    fn clear(&mut self) {
        self.active.clear();
    }
}

/// Converts [`PointerEvent`]s into [`PointerSample`]s.
///
/// Positions are logical (the event's scale factor applied); timestamps are
/// converted from nanoseconds to milliseconds. Moves of pointers that are not
/// down (hovering mice) and enter/leave/scroll/gesture events produce no
/// sample.
#[derive(Clone, Debug, Default)]
pub struct UiEventsAdapter {
    ids: DenseIds<Option<UiPointerId>>,
    last_time_ms: u64,
}

impl UiEventsAdapter {
    /// Creates an adapter with no pointers down.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Converts one event, or returns `None` if it carries no touch sample.
    pub fn translate(&mut self, event: &PointerEvent) -> Option<PointerSample> {
        let sample = match event {
            PointerEvent::Down(e) => {
                let phase = if self.ids.is_empty() {
                    PointerPhase::Down
                } else {
                    PointerPhase::PointerDown
                };
                let id = self.ids.acquire(e.pointer.pointer_id);
                PointerSample::new(id, e.state.logical_point(), nanos_to_ms(e.state.time), phase)
            }
            PointerEvent::Move(update) => {
                let id = self.ids.get(update.pointer.pointer_id)?;
                let state = &update.current;
                PointerSample::new(
                    id,
                    state.logical_point(),
                    nanos_to_ms(state.time),
                    PointerPhase::Move,
                )
            }
            PointerEvent::Up(e) => {
                let id = self.ids.release(e.pointer.pointer_id)?;
                let phase = if self.ids.is_empty() {
                    PointerPhase::Up
                } else {
                    PointerPhase::PointerUp
                };
                PointerSample::new(id, e.state.logical_point(), nanos_to_ms(e.state.time), phase)
            }
            PointerEvent::Cancel(info) => {
                let id = self.ids.get(info.pointer_id).unwrap_or(PointerId(0));
                self.ids.clear();
                PointerSample::cancel(id.0, self.last_time_ms)
            }
            _ => return None,
        };
        self.last_time_ms = sample.time_ms;
        Some(sample)
    }

    /// Converts `event` and hands the sample to `recognizer`.
    pub fn feed<L: GestureListener + ?Sized>(
        &mut self,
        event: &PointerEvent,
        recognizer: &mut GestureRecognizer,
        listener: &mut L,
    ) -> bool {
        self.translate(event)
            .is_some_and(|sample| recognizer.on_sample(&sample, listener))
    }
}

fn nanos_to_ms(nanos: u64) -> u64 {
    nanos / 1_000_000
}
