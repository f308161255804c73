// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use understory_affine::AffineTransform;

/// Receives the displayed transform whenever it changes.
///
/// Called at most once per pointer sample or frame. Implementations should
/// only record the value; they run on the interaction thread.
pub trait RenderSink {
    /// The displayed transform changed.
    fn render_transform(&mut self, transform: AffineTransform);
}

/// Receives opacity changes.
pub trait AlphaSink {
    /// Backdrop opacity in `[0, 1]`, sent only when it changes.
    fn set_background_alpha(&mut self, alpha: f64);

    /// Opacity of the image itself in `[0, 1]`; driven by the entry animation.
    fn set_content_alpha(&mut self, _alpha: f64) {}
}

impl RenderSink for () {
    fn render_transform(&mut self, _transform: AffineTransform) {}
}

impl AlphaSink for () {
    fn set_background_alpha(&mut self, _alpha: f64) {}
}
