// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect, Size, Vec2};
use understory_affine::{
    AffineTransform, SharedMatrix, post_rotate, post_scale, post_translate, scale_x,
};
use understory_transform_animator::{ContentMode, TransformSurface};

/// The displayed image: intrinsic size plus the image-to-view matrix.
///
/// The matrix lives in a [`SharedMatrix`], so a render thread can hold a
/// [`matrix_reader`](Self::matrix_reader) while the interaction thread
/// mutates it. Every write bumps [`revision`](Self::revision).
#[derive(Clone, Debug)]
pub struct ImageSurface {
    matrix: SharedMatrix,
    intrinsic: Size,
    mode: ContentMode,
    revision: u64,
}

impl ImageSurface {
    /// Creates a surface for an image of `intrinsic` size at the identity matrix.
    #[must_use]
    pub fn new(intrinsic: Size) -> Self {
        Self {
            matrix: SharedMatrix::new(Affine::IDENTITY),
            intrinsic,
            mode: ContentMode::Matrix,
            revision: 0,
        }
    }

    /// A handle to the matrix for other threads.
    #[must_use]
    pub fn matrix_reader(&self) -> SharedMatrix {
        self.matrix.clone()
    }

    /// Number of matrix writes so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Changes the content mode. Only [`ContentMode::Matrix`] can be animated.
    pub fn set_content_mode(&mut self, mode: ContentMode) {
        self.mode = mode;
    }

    /// The image rectangle in image coordinates.
    #[must_use]
    pub fn image_bounds(&self) -> Rect {
        self.intrinsic.to_rect()
    }

    /// Where the image center currently is in view coordinates.
    #[must_use]
    pub fn mapped_center(&self) -> Point {
        self.matrix.snapshot() * self.image_bounds().center()
    }

    /// The current matrix, decomposed.
    #[must_use]
    pub fn transform(&self) -> AffineTransform {
        self.matrix.transform()
    }

    /// Size of the image after the current horizontal and vertical scale.
    #[must_use]
    pub fn scaled_size(&self) -> Size {
        let t = self.matrix.transform();
        Size::new(t.sx * self.intrinsic.width, t.sy * self.intrinsic.height)
    }

    /// Translates in view space. A zero delta is not a write.
    pub fn post_translate(&mut self, delta: Vec2) {
        if delta != Vec2::ZERO {
            self.write(|m| post_translate(m, delta));
        }
    }

    /// Scales uniformly about a view point. A zero factor is ignored.
    pub fn post_scale(&mut self, factor: f64, pivot: Point) {
        if factor != 0.0 && factor.is_finite() {
            self.write(|m| post_scale(m, factor, factor, pivot));
        }
    }

    /// Rotates about a view point. A zero angle is not a write.
    pub fn post_rotate(&mut self, degrees: f64, pivot: Point) {
        if degrees != 0.0 {
            self.write(|m| post_rotate(m, degrees, pivot));
        }
    }

    /// Moves the matrix translation to `position`.
    pub fn translate_to(&mut self, position: Point) {
        let delta = position - self.matrix.snapshot().translation().to_point();
        self.post_translate(delta);
    }

    /// Scales so the horizontal scale becomes `scale`, about a view point.
    pub fn scale_to(&mut self, scale: f64, pivot: Point) {
        let current = scale_x(self.matrix.snapshot());
        self.post_scale(scale / current, pivot);
    }

    fn write(&mut self, f: impl FnOnce(Affine) -> Affine) {
        self.matrix.update(f);
        self.revision += 1;
    }
}

impl TransformSurface for ImageSurface {
    fn content_mode(&self) -> ContentMode {
        self.mode
    }

    fn image_matrix(&self) -> Affine {
        self.matrix.snapshot()
    }

    fn set_image_matrix(&mut self, matrix: Affine) {
        self.write(|_| matrix);
    }

    fn intrinsic_size(&self) -> Size {
        self.intrinsic
    }
}
