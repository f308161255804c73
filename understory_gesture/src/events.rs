// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use kurbo::{Point, Vec2};

use crate::recognizer::GestureListener;
use crate::sample::PointerSample;

/// A recorded [`GestureListener`] callback.
///
/// `Vec<GestureEvent>` is itself a listener that appends every callback and
/// consumes all of them, which makes it handy for tests and for hosts that
/// prefer to process gestures after the recognizer returns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEvent {
    /// See [`GestureListener::on_action_down`].
    ActionDown(PointerSample),
    /// See [`GestureListener::on_action_up`].
    ActionUp(PointerSample),
    /// See [`GestureListener::on_double_tap_event`].
    DoubleTapEvent(PointerSample),
    /// See [`GestureListener::on_single_finger_scroll`].
    SingleFingerScroll {
        /// The gesture's first down.
        down: PointerSample,
        /// The move that produced the scroll.
        current: PointerSample,
        /// Previous focus minus current focus.
        distance: Vec2,
    },
    /// See [`GestureListener::on_multi_finger_scroll`].
    MultiFingerScroll {
        /// The gesture's first down.
        down: PointerSample,
        /// The move that produced the scroll.
        current: PointerSample,
        /// Previous focus minus current focus.
        distance: Vec2,
    },
    /// See [`GestureListener::on_scale`].
    Scale {
        /// Span ratio since the previous move.
        factor: f64,
        /// Focus of the pointers.
        focus: Point,
    },
    /// See [`GestureListener::on_rotation`].
    Rotation {
        /// Signed change in degrees.
        delta_degrees: f64,
        /// Focus of the pointers.
        focus: Point,
    },
    /// See [`GestureListener::on_fling`].
    Fling {
        /// The gesture's first down.
        down: PointerSample,
        /// The releasing up.
        up: PointerSample,
        /// Release velocity in px/s.
        velocity: Vec2,
    },
}

impl GestureListener for Vec<GestureEvent> {
    fn on_action_down(&mut self, sample: &PointerSample) {
        self.push(GestureEvent::ActionDown(*sample));
    }

    fn on_action_up(&mut self, sample: &PointerSample) -> bool {
        self.push(GestureEvent::ActionUp(*sample));
        true
    }

    fn on_double_tap_event(&mut self, sample: &PointerSample) -> bool {
        self.push(GestureEvent::DoubleTapEvent(*sample));
        true
    }

    fn on_single_finger_scroll(
        &mut self,
        down: &PointerSample,
        current: &PointerSample,
        distance: Vec2,
    ) -> bool {
        self.push(GestureEvent::SingleFingerScroll {
            down: *down,
            current: *current,
            distance,
        });
        true
    }

    fn on_multi_finger_scroll(
        &mut self,
        down: &PointerSample,
        current: &PointerSample,
        distance: Vec2,
    ) -> bool {
        self.push(GestureEvent::MultiFingerScroll {
            down: *down,
            current: *current,
            distance,
        });
        true
    }

    fn on_scale(&mut self, factor: f64, focus: Point) -> bool {
        self.push(GestureEvent::Scale { factor, focus });
        true
    }

    fn on_rotation(&mut self, delta_degrees: f64, focus: Point) -> bool {
        self.push(GestureEvent::Rotation {
            delta_degrees,
            focus,
        });
        true
    }

    fn on_fling(&mut self, down: &PointerSample, up: &PointerSample, velocity: Vec2) -> bool {
        self.push(GestureEvent::Fling {
            down: *down,
            up: *up,
            velocity,
        });
        true
    }
}
