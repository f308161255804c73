// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spline-decay fling with per-axis bounds and overscroll.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};
use log::{debug, trace};

const INFLECTION: f64 = 0.35;
const START_TENSION: f64 = 0.5;
const END_TENSION: f64 = 1.0;
const P1: f64 = START_TENSION * INFLECTION;
const P2: f64 = 1.0 - END_TENSION * (1.0 - INFLECTION);

const GRAVITY_EARTH: f64 = 9.806_65;
const INCHES_PER_METER: f64 = 39.37;
// (ln(0.78) / ln(0.9)).abs()
const DECELERATION_RATE: f64 = 2.358_201_6;

/// Fraction of the total fling distance covered at time fraction `t`.
///
/// Solves the tension curve for the parameter whose time coordinate is `t`
/// by bisection, then reads the distance coordinate.
#[must_use]
pub fn spline_distance(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t >= 1.0 {
        return 1.0;
    }
    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    let mut x = 0.5;
    for _ in 0..40 {
        x = lo + (hi - lo) / 2.0;
        let c = 3.0 * x * (1.0 - x);
        let tx = c * ((1.0 - x) * P1 + x * P2) + x * x * x;
        if (tx - t).abs() < 1e-9 {
            break;
        }
        if tx > t {
            hi = x;
        } else {
            lo = x;
        }
    }
    let c = 3.0 * x * (1.0 - x);
    c * ((1.0 - x) * START_TENSION + x) + x * x * x
}

/// Distance and duration of a fling with a given initial velocity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlingInfo {
    /// Initial velocity in px/s. Its sign is the direction of travel.
    pub initial_velocity: f64,
    /// Total unsigned distance in px.
    pub distance: f64,
    /// Total duration in milliseconds.
    pub duration_ms: u64,
}

impl FlingInfo {
    /// Signed offset from the start after `time_ms`.
    #[must_use]
    pub fn offset(&self, time_ms: u64) -> f64 {
        let t = if self.duration_ms > 0 {
            time_ms as f64 / self.duration_ms as f64
        } else {
            1.0
        };
        self.distance * self.initial_velocity.signum() * spline_distance(t)
    }
}

/// Physical model that turns a velocity into a fling distance and duration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlingCalculator {
    friction: f64,
    physical_coefficient: f64,
}

impl FlingCalculator {
    /// Scroll friction used by default.
    pub const DEFAULT_FRICTION: f64 = 0.015;

    /// Creates a calculator for `friction` on a screen of `density` (px per dp).
    #[must_use]
    pub fn new(friction: f64, density: f64) -> Self {
        Self {
            friction,
            physical_coefficient: GRAVITY_EARTH * INCHES_PER_METER * density * 160.0 * 0.84,
        }
    }

    /// Default friction on a screen of `density`.
    #[must_use]
    pub fn with_density(density: f64) -> Self {
        Self::new(Self::DEFAULT_FRICTION, density)
    }

    /// Full fling description for `velocity` (px/s).
    #[must_use]
    pub fn fling_info(&self, velocity: f64) -> FlingInfo {
        // Both quantities are powers of the same ratio; a zero velocity
        // yields a zero-length, zero-time fling.
        let decel = self.friction * self.physical_coefficient;
        let ratio = INFLECTION * velocity.abs() / decel;
        let duration = 1000.0 * ratio.powf(1.0 / (DECELERATION_RATE - 1.0));
        let distance = decel * ratio.powf(DECELERATION_RATE / (DECELERATION_RATE - 1.0));
        #[expect(clippy::cast_possible_truncation, reason = "finite positive milliseconds")]
        let duration_ms = if duration.is_finite() && duration > 0.0 {
            duration as u64
        } else {
            0
        };
        FlingInfo {
            initial_velocity: velocity,
            distance: if distance.is_finite() { distance } else { 0.0 },
            duration_ms,
        }
    }
}

impl Default for FlingCalculator {
    fn default() -> Self {
        Self::with_density(1.0)
    }
}

/// Allowed range of a fling, per axis.
///
/// An axis whose `min` equals its `max` does not move.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FlingBounds {
    /// Smallest resting x.
    pub min_x: f64,
    /// Largest resting x.
    pub max_x: f64,
    /// Smallest resting y.
    pub min_y: f64,
    /// Largest resting y.
    pub max_y: f64,
}

#[derive(Clone, Copy, Debug, Default)]
struct Axis {
    start: f64,
    current: f64,
    lower: f64,
    upper: f64,
    fling: Option<FlingInfo>,
    finished: bool,
}

impl Axis {
    fn new(start: f64, velocity: f64, min: f64, max: f64, over: f64, calc: &FlingCalculator) -> Self {
        let still = min == max || velocity == 0.0;
        Self {
            start,
            current: start,
            lower: min - over,
            upper: max + over,
            fling: (!still).then(|| calc.fling_info(velocity)),
            finished: still,
        }
    }

    fn update(&mut self, elapsed_ms: u64) {
        if self.finished {
            return;
        }
        let Some(info) = self.fling else {
            self.finished = true;
            return;
        };
        let raw = self.start + info.offset(elapsed_ms);
        // A start already beyond the overscroll edge is never dragged back by the fling.
        let lower = self.lower.min(self.start);
        let upper = self.upper.max(self.start);
        self.current = raw.max(lower).min(upper);
        if elapsed_ms >= info.duration_ms || self.current != raw {
            self.finished = true;
        }
    }
}

/// A two-axis fling driven by frame times.
///
/// ```rust
/// use kurbo::{Point, Vec2};
/// use understory_transform_animator::{FlingBounds, Scroller};
///
/// let mut s = Scroller::new(1.0);
/// let bounds = FlingBounds { min_x: -1000.0, max_x: 0.0, min_y: 0.0, max_y: 0.0 };
/// s.fling(Point::new(-200.0, 0.0), Vec2::new(-3000.0, 500.0), bounds, Vec2::new(80.0, 80.0));
/// let mut t = 0;
/// while s.compute_offset(t) {
///     t += 16;
/// }
/// assert!(s.current().x <= -200.0 && s.current().x >= -1080.0);
/// assert_eq!(s.current().y, 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct Scroller {
    calculator: FlingCalculator,
    x: Axis,
    y: Axis,
    started_at: Option<u64>,
    finished: bool,
}

impl Scroller {
    /// Creates an idle scroller for a screen of `density` (px per dp).
    #[must_use]
    pub fn new(density: f64) -> Self {
        Self::with_calculator(FlingCalculator::with_density(density))
    }

    /// Creates an idle scroller with custom physics.
    #[must_use]
    pub fn with_calculator(calculator: FlingCalculator) -> Self {
        Self {
            calculator,
            x: Axis::default(),
            y: Axis::default(),
            started_at: None,
            finished: true,
        }
    }

    /// Starts a fling from `start` with `velocity` (px/s).
    ///
    /// The position is clamped to each axis's bounds widened by `overscroll`.
    /// The clock starts at the next [`compute_offset`](Self::compute_offset).
    pub fn fling(&mut self, start: Point, velocity: Vec2, bounds: FlingBounds, overscroll: Vec2) {
        let calc = &self.calculator;
        self.x = Axis::new(start.x, velocity.x, bounds.min_x, bounds.max_x, overscroll.x, calc);
        self.y = Axis::new(start.y, velocity.y, bounds.min_y, bounds.max_y, overscroll.y, calc);
        self.started_at = None;
        self.finished = false;
        debug!(
            "fling from ({:.1}, {:.1}) v=({:.0}, {:.0}) bounds {bounds:?}",
            start.x, start.y, velocity.x, velocity.y
        );
    }

    /// Advances to `now_ms`.
    ///
    /// Returns `true` while a position was produced, including the final
    /// one; returns `false` once the fling was already over.
    pub fn compute_offset(&mut self, now_ms: u64) -> bool {
        if self.finished {
            return false;
        }
        let started = *self.started_at.get_or_insert(now_ms);
        let elapsed = now_ms.saturating_sub(started);
        self.x.update(elapsed);
        self.y.update(elapsed);
        trace!("fling step {elapsed} ms -> ({:.1}, {:.1})", self.x.current, self.y.current);
        if self.x.finished && self.y.finished {
            self.finished = true;
        }
        true
    }

    /// The latest position.
    #[must_use]
    pub fn current(&self) -> Point {
        Point::new(self.x.current, self.y.current)
    }

    /// Whether no fling is in progress.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Stops the fling at its current position.
    pub fn abort(&mut self) {
        self.finished = true;
        self.x.finished = true;
        self.y.finished = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spline_is_monotonic_from_zero_to_one() {
        assert!(spline_distance(0.0).abs() < 1e-6);
        assert_eq!(spline_distance(1.0), 1.0);
        let mut last = 0.0;
        for i in 1..=50 {
            let d = spline_distance(f64::from(i) / 50.0);
            assert!(d >= last - 1e-9, "step {i}");
            last = d;
        }
    }

    #[test]
    fn faster_flings_go_further_and_longer() {
        let calc = FlingCalculator::default();
        let slow = calc.fling_info(1000.0);
        let fast = calc.fling_info(4000.0);
        assert!(fast.distance > slow.distance);
        assert!(fast.duration_ms > slow.duration_ms);
        assert_eq!(calc.fling_info(0.0).distance, 0.0);
        assert_eq!(calc.fling_info(0.0).duration_ms, 0);
    }

    #[test]
    fn offset_follows_velocity_sign() {
        let info = FlingCalculator::default().fling_info(-2000.0);
        assert!(info.offset(info.duration_ms / 2) < 0.0);
        assert!((info.offset(info.duration_ms) + info.distance).abs() < 1e-9);
    }

    #[test]
    fn fixed_axis_stays_put() {
        let mut s = Scroller::new(1.0);
        let bounds = FlingBounds {
            min_x: 50.0,
            max_x: 50.0,
            min_y: -500.0,
            max_y: 0.0,
        };
        s.fling(Point::new(50.0, -100.0), Vec2::new(9000.0, -800.0), bounds, Vec2::new(80.0, 80.0));
        let mut t = 0;
        while s.compute_offset(t) {
            assert_eq!(s.current().x, 50.0);
            t += 16;
        }
        assert!(s.current().y < -100.0);
    }

    #[test]
    fn clamps_to_overscroll_edge() {
        let mut s = Scroller::new(1.0);
        let bounds = FlingBounds {
            min_x: -100.0,
            max_x: 0.0,
            min_y: 0.0,
            max_y: 0.0,
        };
        s.fling(Point::new(-50.0, 0.0), Vec2::new(8000.0, 0.0), bounds, Vec2::new(80.0, 0.0));
        let mut t = 0;
        while s.compute_offset(t) {
            t += 16;
        }
        assert_eq!(s.current().x, 80.0);
        assert!(s.is_finished());
    }

    #[test]
    fn abort_freezes_position() {
        let mut s = Scroller::new(2.0);
        let bounds = FlingBounds {
            min_x: -5000.0,
            max_x: 0.0,
            min_y: 0.0,
            max_y: 0.0,
        };
        s.fling(Point::ORIGIN, Vec2::new(-3000.0, 0.0), bounds, Vec2::ZERO);
        s.compute_offset(0);
        s.compute_offset(48);
        let at = s.current();
        s.abort();
        assert!(!s.compute_offset(64));
        assert_eq!(s.current(), at);
    }
}
