// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Thresholds and timings for gesture classification.
///
/// [`Default`] gives density-independent fallbacks;
/// [`TouchConfig::for_density`] scales the distance and velocity limits for
/// a screen with `density` pixels per dp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchConfig {
    /// Longest gap between the first tap's up and the second tap's down.
    pub double_tap_timeout_ms: u64,
    /// Shortest such gap; faster pairs are treated as bounces.
    pub double_tap_min_time_ms: u64,
    /// Largest distance between the two downs of a double tap, exclusive.
    pub double_tap_slop: f64,
    /// Span change needed before a pinch reports scale.
    pub scale_span_slop: f64,
    /// Smallest release velocity (px/s, either axis) that counts as a fling.
    pub min_fling_velocity: f64,
    /// Release velocities are clamped to this magnitude (px/s).
    pub max_fling_velocity: f64,
    /// How long a single-finger scroll may still turn into a multi-finger one.
    pub scroll_state_change_window_ms: u64,
}

impl TouchConfig {
    /// Values for a screen with `density` pixels per dp.
    #[must_use]
    pub fn for_density(density: f64) -> Self {
        const TOUCH_SLOP_DP: f64 = 8.0;
        const DOUBLE_TAP_SLOP_DP: f64 = 100.0;
        const MIN_FLING_DP: f64 = 50.0;
        const MAX_FLING_DP: f64 = 8000.0;
        Self {
            double_tap_slop: DOUBLE_TAP_SLOP_DP * density,
            scale_span_slop: TOUCH_SLOP_DP * 2.0 * density,
            min_fling_velocity: MIN_FLING_DP * density,
            max_fling_velocity: MAX_FLING_DP * density,
            ..Self::default()
        }
    }
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            double_tap_timeout_ms: 300,
            double_tap_min_time_ms: 40,
            double_tap_slop: 100.0,
            scale_span_slop: 16.0,
            min_fling_velocity: 50.0,
            max_fling_velocity: 8000.0,
            scroll_state_change_window_ms: 40,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_density_matches_fallbacks() {
        assert_eq!(TouchConfig::for_density(1.0), TouchConfig::default());
    }

    #[test]
    fn density_scales_distances_not_times() {
        let c = TouchConfig::for_density(2.5);
        assert_eq!(c.double_tap_slop, 250.0);
        assert_eq!(c.scale_span_slop, 40.0);
        assert_eq!(c.max_fling_velocity, 20_000.0);
        assert_eq!(c.double_tap_timeout_ms, 300);
    }
}
