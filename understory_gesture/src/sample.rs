// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Point;

/// Identifies one contact for as long as it touches the screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub u32);

/// Where a sample sits in a pointer's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    /// First contact of a gesture.
    Down,
    /// Another contact while at least one is already down.
    PointerDown,
    /// Position update of an active contact.
    Move,
    /// A contact lifted while others stay down.
    PointerUp,
    /// The last contact lifted.
    Up,
    /// The system took the gesture away.
    Cancel,
}

/// One pointer event in view coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    /// The contact this sample belongs to.
    pub id: PointerId,
    /// Position in view coordinates.
    pub position: Point,
    /// Event time in milliseconds on a monotonic clock.
    pub time_ms: u64,
    /// Lifetime phase.
    pub phase: PointerPhase,
}

impl PointerSample {
    /// Creates a sample.
    #[must_use]
    pub fn new(id: PointerId, position: Point, time_ms: u64, phase: PointerPhase) -> Self {
        Self {
            id,
            position,
            time_ms,
            phase,
        }
    }

    /// A [`PointerPhase::Down`] sample.
    #[must_use]
    pub fn down(id: u32, position: impl Into<Point>, time_ms: u64) -> Self {
        Self::new(PointerId(id), position.into(), time_ms, PointerPhase::Down)
    }

    /// A [`PointerPhase::Move`] sample.
    #[must_use]
    pub fn moved(id: u32, position: impl Into<Point>, time_ms: u64) -> Self {
        Self::new(PointerId(id), position.into(), time_ms, PointerPhase::Move)
    }

    /// A [`PointerPhase::Up`] sample.
    #[must_use]
    pub fn up(id: u32, position: impl Into<Point>, time_ms: u64) -> Self {
        Self::new(PointerId(id), position.into(), time_ms, PointerPhase::Up)
    }

    /// A [`PointerPhase::Cancel`] sample.
    #[must_use]
    pub fn cancel(id: u32, time_ms: u64) -> Self {
        Self::new(PointerId(id), Point::ORIGIN, time_ms, PointerPhase::Cancel)
    }

    /// Whether this is a down of any kind.
    #[must_use]
    pub fn is_down(&self) -> bool {
        matches!(self.phase, PointerPhase::Down | PointerPhase::PointerDown)
    }

    /// Whether this is an up of any kind.
    #[must_use]
    pub fn is_up(&self) -> bool {
        matches!(self.phase, PointerPhase::Up | PointerPhase::PointerUp)
    }

    /// Copy with a different phase.
    #[must_use]
    pub fn with_phase(mut self, phase: PointerPhase) -> Self {
        self.phase = phase;
        self
    }
}
