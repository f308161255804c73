// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Release velocity estimation.
//!
//! The impulse strategy treats each pair of consecutive samples as a push
//! that changes the kinetic energy of a unit mass, and reports the velocity
//! matching the final energy. It is stable against the jittery timestamps
//! touch screens produce.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};

const HISTORY_SIZE: usize = 20;
const HORIZON_MS: u64 = 100;
/// A gap this long between samples means the pointer had stopped.
pub const ASSUME_STOPPED_MS: u64 = 40;

#[derive(Clone, Copy, Debug, Default)]
struct Sample {
    time_ms: u64,
    value: f64,
}

/// Velocity along one axis, from absolute positions.
#[derive(Clone, Debug, Default)]
pub struct VelocityTracker1D {
    samples: [Option<Sample>; HISTORY_SIZE],
    index: usize,
}

impl VelocityTracker1D {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `value` at `time_ms`.
    pub fn add(&mut self, time_ms: u64, value: f64) {
        self.index = (self.index + 1) % HISTORY_SIZE;
        self.samples[self.index] = Some(Sample { time_ms, value });
    }

    /// Velocity in units per second, or `0.0` with fewer than two usable samples.
    #[must_use]
    pub fn velocity(&self) -> f64 {
        let Some(newest) = self.samples[self.index] else {
            return 0.0;
        };
        // Newest first; times are negative ages.
        let mut values = [0.0; HISTORY_SIZE];
        let mut times = [0.0; HISTORY_SIZE];
        let mut count = 0;
        let mut index = self.index;
        let mut newer = newest;
        while let Some(sample) = self.samples[index] {
            let age = newest.time_ms.saturating_sub(sample.time_ms);
            let gap = newer.time_ms.saturating_sub(sample.time_ms);
            if age > HORIZON_MS || gap > ASSUME_STOPPED_MS {
                break;
            }
            values[count] = sample.value;
            times[count] = -(age as f64);
            newer = sample;
            count += 1;
            if count == HISTORY_SIZE {
                break;
            }
            index = if index == 0 { HISTORY_SIZE - 1 } else { index - 1 };
        }
        if count < 2 {
            return 0.0;
        }
        impulse_velocity(&values[..count], &times[..count]) * 1000.0
    }

    /// Velocity clamped to `±max`. A non-positive `max` yields `0.0`.
    #[must_use]
    pub fn velocity_with_max(&self, max: f64) -> f64 {
        if !(max.is_finite() && max > 0.0) {
            return 0.0;
        }
        let v = self.velocity();
        if v.is_nan() { 0.0 } else { v.clamp(-max, max) }
    }

    /// Forgets every sample.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn impulse_velocity(values: &[f64], times: &[f64]) -> f64 {
    let oldest = values.len() - 1;
    let mut work = 0.0;
    for i in (1..=oldest).rev() {
        let (t_old, t_new) = (times[i], times[i - 1]);
        if t_old == t_new {
            continue;
        }
        let v_curr = (values[i - 1] - values[i]) / (t_new - t_old);
        let v_prev = energy_to_velocity(work);
        work += (v_curr - v_prev) * v_curr.abs();
        if i == oldest {
            work *= 0.5;
        }
    }
    energy_to_velocity(work)
}

fn energy_to_velocity(work: f64) -> f64 {
    work.signum() * (2.0 * work.abs()).sqrt()
}

/// Velocity of a 2D pointer.
#[derive(Clone, Debug, Default)]
pub struct VelocityTracker {
    x: VelocityTracker1D,
    y: VelocityTracker1D,
}

impl VelocityTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a position.
    pub fn add(&mut self, time_ms: u64, position: Point) {
        self.x.add(time_ms, position.x);
        self.y.add(time_ms, position.y);
    }

    /// Velocity in px/s, each axis clamped to `±max`.
    #[must_use]
    pub fn velocity(&self, max: f64) -> Vec2 {
        Vec2::new(self.x.velocity_with_max(max), self.y.velocity_with_max(max))
    }

    /// Forgets every sample.
    pub fn reset(&mut self) {
        self.x.reset();
        self.y.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_single_are_zero() {
        let mut t = VelocityTracker1D::new();
        assert_eq!(t.velocity(), 0.0);
        t.add(0, 10.0);
        assert_eq!(t.velocity(), 0.0);
    }

    #[test]
    fn steady_motion_is_recovered() {
        let mut t = VelocityTracker1D::new();
        for i in 0..6_u32 {
            t.add(u64::from(i) * 10, f64::from(i) * 100.0);
        }
        let v = t.velocity();
        assert!((v - 10_000.0).abs() < 1_000.0, "got {v}");
    }

    #[test]
    fn negative_direction() {
        let mut t = VelocityTracker1D::new();
        for i in 0..5_u32 {
            t.add(u64::from(i) * 8, -f64::from(i) * 20.0);
        }
        assert!(t.velocity() < 0.0);
    }

    #[test]
    fn a_pause_before_release_stops_the_pointer() {
        let mut t = VelocityTracker1D::new();
        t.add(0, 0.0);
        t.add(10, 100.0);
        t.add(20, 200.0);
        t.add(80, 200.0);
        assert_eq!(t.velocity(), 0.0);
    }

    #[test]
    fn old_samples_fall_outside_the_horizon() {
        let mut t = VelocityTracker1D::new();
        t.add(0, 0.0);
        t.add(30, 300.0);
        t.add(60, 600.0);
        t.add(90, 600.0);
        t.add(120, 600.0);
        t.add(150, 600.0);
        assert!(t.velocity().abs() < 1e-9);
    }

    #[test]
    fn clamps_to_max() {
        let mut t = VelocityTracker::new();
        for i in 0..5_u32 {
            t.add(u64::from(i) * 5, Point::new(f64::from(i) * 200.0, 0.0));
        }
        let v = t.velocity(8000.0);
        assert_eq!(v.x, 8000.0);
        assert_eq!(v.y, 0.0);
        assert_eq!(t.velocity(0.0), Vec2::ZERO);
    }

    #[test]
    fn reset_forgets() {
        let mut t = VelocityTracker::new();
        t.add(0, Point::ORIGIN);
        t.add(10, Point::new(50.0, 50.0));
        t.reset();
        assert_eq!(t.velocity(1e6), Vec2::ZERO);
    }
}
