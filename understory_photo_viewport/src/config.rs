// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Tuning for [`ViewportController`](crate::ViewportController).
///
/// Distances are view pixels, durations milliseconds. The defaults
/// reproduce the classic "drag down to dismiss" photo preview.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportConfig {
    /// Width of the band, inside the shrink threshold, in which a release
    /// does not dismiss.
    pub close_window: f64,
    /// Drag distance over which a single-finger scroll shrinks the image.
    pub shrink_threshold: f64,
    /// Double-tap zoom steps as multiples of the fit-width scale.
    pub zoom_steps: &'static [f64],
    /// Rotation (degrees) beyond which a release snaps back to the fit.
    pub rotation_snap_degrees: f64,
    /// Rotation (degrees) beyond which the image counts as rotated.
    pub rotation_epsilon_degrees: f64,
    /// Overscroll allowed on an oversized axis during a fling.
    pub fling_overscroll: f64,
    /// Drag-to-shrink engages up to this multiple of the fit scale.
    pub fit_tolerance: f64,
    /// Off-center distance at which the background alpha reaches its floor.
    pub alpha_distance_window: f64,
    /// Off-center distance under which the distance term stays opaque, and
    /// the floor of the distance term's numerator.
    pub alpha_distance_floor: f64,
    /// Entry animation length.
    pub entry_duration_ms: i64,
    /// Dismiss animation length.
    pub dismiss_duration_ms: i64,
    /// Snap-back-to-fit animation length.
    pub fit_view_duration_ms: i64,
    /// Per-axis recentering animation length.
    pub fit_xy_duration_ms: i64,
    /// Double-tap zoom animation length.
    pub zoom_duration_ms: i64,
    /// Screen density (px per dp) for fling physics.
    pub density: f64,
}

impl ViewportConfig {
    /// Width below which a release dismisses (or snaps back to fit).
    #[must_use]
    pub fn close_width(&self, view_width: f64) -> f64 {
        view_width - (self.shrink_threshold - self.close_window)
    }

    /// Zoom step `index`, wrapping; `1.0` when no steps are configured.
    #[must_use]
    pub fn zoom_step(&self, index: usize) -> f64 {
        if self.zoom_steps.is_empty() {
            return 1.0;
        }
        self.zoom_steps[index % self.zoom_steps.len()]
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            close_window: 40.0,
            shrink_threshold: 200.0,
            zoom_steps: &[1.0, 2.0],
            rotation_snap_degrees: 10.0,
            rotation_epsilon_degrees: 1.0,
            fling_overscroll: 80.0,
            fit_tolerance: 1.05,
            alpha_distance_window: 300.0,
            alpha_distance_floor: 30.0,
            entry_duration_ms: 300,
            dismiss_duration_ms: 300,
            fit_view_duration_ms: 250,
            fit_xy_duration_ms: 200,
            zoom_duration_ms: 220,
            density: 1.0,
        }
    }
}
