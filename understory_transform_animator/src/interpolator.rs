// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// Maps a linear time fraction in `[0, 1]` to an eased progress value.
///
/// Interpolators are applied per channel; an animator may use a different
/// one for rotation, scale and each translation axis.
#[derive(Clone, Copy, Debug, Default)]
pub enum Interpolator {
    /// Progress equals the time fraction.
    Linear,
    /// Slow start and end, fastest in the middle: `cos((f + 1)π) / 2 + 0.5`.
    #[default]
    AccelerateDecelerate,
    /// Cubic Bézier `(0.42, 0, 0.58, 1)`.
    EaseInOut,
    /// Cubic Bézier `(0.4, 0, 0.2, 1)`.
    FastOutSlowIn,
    /// Any other curve. It should map `0` to `0` and `1` to `1`.
    Custom(fn(f64) -> f64),
}

impl Interpolator {
    /// Returns the eased progress for `fraction`, which is clamped to `[0, 1]`.
    #[must_use]
    pub fn interpolate(&self, fraction: f64) -> f64 {
        let f = fraction.clamp(0.0, 1.0);
        match self {
            Self::Linear => f,
            Self::AccelerateDecelerate => {
                ((f + 1.0) * core::f64::consts::PI).cos() / 2.0 + 0.5
            }
            Self::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, f),
            Self::FastOutSlowIn => cubic_bezier(0.4, 0.0, 0.2, 1.0, f),
            Self::Custom(curve) => curve(f),
        }
    }
}

/// Interpolates one channel from `start` to `end`.
///
/// Returns `end` exactly when the two are equal or the fraction has reached
/// `1`, so a constant channel never drifts by rounding.
#[must_use]
pub fn interpolate_channel(interpolator: &Interpolator, start: f64, end: f64, fraction: f64) -> f64 {
    if start == end || fraction >= 1.0 {
        return end;
    }
    start + (end - start) * interpolator.interpolate(fraction)
}

fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, fraction: f64) -> f64 {
    if fraction <= 0.0 {
        return 0.0;
    }
    if fraction >= 1.0 {
        return 1.0;
    }

    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;

    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    let sample = |a: f64, b: f64, c: f64, t: f64| ((a * t + b) * t + c) * t;
    let slope = |t: f64| (3.0 * ax * t + 2.0 * bx) * t + cx;

    // Newton first, bisection if it stalls on a flat stretch.
    let mut t = fraction;
    let mut solved = false;
    for _ in 0..8 {
        let x = sample(ax, bx, cx, t) - fraction;
        if x.abs() < 1e-9 {
            solved = true;
            break;
        }
        let dx = slope(t);
        if dx.abs() < 1e-9 {
            break;
        }
        t = (t - x / dx).clamp(0.0, 1.0);
    }

    if !solved {
        let (mut lo, mut hi) = (0.0, 1.0);
        t = fraction;
        for _ in 0..32 {
            let delta = sample(ax, bx, cx, t) - fraction;
            if delta.abs() < 1e-9 {
                break;
            }
            if delta > 0.0 {
                hi = t;
            } else {
                lo = t;
            }
            t = 0.5 * (lo + hi);
        }
    }

    sample(ay, by, cy, t)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Interpolator; 4] = [
        Interpolator::Linear,
        Interpolator::AccelerateDecelerate,
        Interpolator::EaseInOut,
        Interpolator::FastOutSlowIn,
    ];

    #[test]
    fn endpoints_are_fixed() {
        for i in ALL {
            assert!(i.interpolate(0.0).abs() < 1e-9, "{i:?}");
            assert!((i.interpolate(1.0) - 1.0).abs() < 1e-9, "{i:?}");
        }
    }

    #[test]
    fn curves_are_monotonic() {
        for i in ALL {
            let mut last = 0.0;
            for step in 1..=100 {
                let v = i.interpolate(f64::from(step) / 100.0);
                assert!(v + 1e-9 >= last, "{i:?} at {step}");
                last = v;
            }
        }
    }

    #[test]
    fn accelerate_decelerate_is_symmetric() {
        let i = Interpolator::AccelerateDecelerate;
        assert!((i.interpolate(0.5) - 0.5).abs() < 1e-12);
        assert!((i.interpolate(0.25) + i.interpolate(0.75) - 1.0).abs() < 1e-12);
        assert!(i.interpolate(0.1) < 0.1);
    }

    #[test]
    fn fast_out_slow_in_front_loads() {
        assert!(Interpolator::FastOutSlowIn.interpolate(0.3) > 0.3);
    }

    #[test]
    fn out_of_range_fractions_clamp() {
        assert_eq!(Interpolator::Linear.interpolate(-3.0), 0.0);
        assert_eq!(Interpolator::Linear.interpolate(7.0), 1.0);
    }

    #[test]
    fn channel_returns_exact_end() {
        let i = Interpolator::EaseInOut;
        assert_eq!(interpolate_channel(&i, 0.1, 0.1, 0.37), 0.1);
        assert_eq!(interpolate_channel(&i, 0.1, 0.7, 1.0), 0.7);
        assert_eq!(interpolate_channel(&i, 0.1, 0.7, 0.0), 0.1);
    }

    #[test]
    fn custom_curves_are_used() {
        let square = Interpolator::Custom(|f| f * f);
        assert_eq!(interpolate_channel(&square, 0.0, 10.0, 0.5), 2.5);
    }
}
