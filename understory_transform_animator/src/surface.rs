// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use kurbo::{Affine, Size};

/// How a surface maps its image into the view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ContentMode {
    /// The image is drawn through an explicit matrix. The only animatable mode.
    #[default]
    Matrix,
    /// Scaled to fit inside the view, centered.
    FitCenter,
    /// Scaled to cover the view, centered.
    CenterCrop,
}

/// The image target an animator writes to.
///
/// Animators hold a weak handle to the surface; the host owns it.
pub trait TransformSurface {
    /// The current content mode.
    fn content_mode(&self) -> ContentMode;

    /// The current image matrix (image space to view space).
    fn image_matrix(&self) -> Affine;

    /// Replaces the image matrix.
    fn set_image_matrix(&mut self, matrix: Affine);

    /// The image's intrinsic size in image units.
    fn intrinsic_size(&self) -> Size;
}

/// Errors reported when building an animator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimatorError {
    /// The surface is not in [`ContentMode::Matrix`].
    UnsupportedContentMode(ContentMode),
}

impl fmt::Display for AnimatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedContentMode(mode) => {
                write!(f, "surface content mode {mode:?} cannot be animated, use Matrix")
            }
        }
    }
}

impl core::error::Error for AnimatorError {}
