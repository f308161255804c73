// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_photo_viewport --heading-base-level=0

//! Understory Photo Viewport: a touch photo preview with drag-to-dismiss.
//!
//! [`ViewportController`] ties the pieces together:
//! [`understory_gesture`] classifies pointer samples,
//! [`understory_transform_animator`] runs the entry, dismiss, settle and
//! zoom animations plus fling physics, and [`understory_affine`] holds the
//! image matrix in an [`ImageSurface`].
//!
//! Behavior:
//!
//! - On the first layout the image fits the view width, centered vertically
//!   unless it is a long image (then top-aligned). With an origin rectangle
//!   from [`ViewportController::set_init_args`] it animates out of that
//!   rectangle while fading in.
//! - A single-finger drag near the fit scale shrinks the image with the drag
//!   distance; releasing it small enough dismisses back into the origin
//!   rectangle, otherwise the image settles back.
//! - Pinch scales and two-finger rotation compose onto the matrix around the
//!   gesture focus. Rotation is only allowed when the first pinch of the
//!   touch sequence zoomed out, and never for long images.
//! - Flings move oversized images within their pan range.
//! - Double taps cycle [`ViewportConfig::zoom_steps`] around the tap point.
//! - The background alpha follows the shrink and drift of the image.
//!
//! Output goes to a [`RenderSink`] and an [`AlphaSink`]. Render threads can
//! read the matrix through [`ViewportController::matrix_reader`].
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Size;
//! use understory_gesture::{PointerSample, TouchConfig};
//! use understory_photo_viewport::{ViewportConfig, ViewportController};
//!
//! let mut viewport = ViewportController::new(
//!     Size::new(2000.0, 1000.0),
//!     ViewportConfig::default(),
//!     TouchConfig::default(),
//!     (),
//!     (),
//! );
//! viewport.on_layout(Size::new(1000.0, 1000.0));
//! assert_eq!(viewport.transform().ty, 250.0);
//!
//! // Double tap in the middle zooms to the next step.
//! viewport.on_pointer_sample(&PointerSample::down(0, (500.0, 500.0), 0));
//! viewport.on_pointer_sample(&PointerSample::up(0, (500.0, 500.0), 50));
//! viewport.on_pointer_sample(&PointerSample::down(0, (500.0, 500.0), 150));
//! viewport.on_pointer_sample(&PointerSample::up(0, (500.0, 500.0), 200));
//! assert_eq!(viewport.scale_step_index(), 1);
//!
//! let mut now = 200;
//! while viewport.on_frame(now) {
//!     now += 16;
//! }
//! assert!((viewport.transform().sx - 1.0).abs() < 1e-9);
//! ```

mod config;
mod controller;
mod error;
mod flags;
mod sink;
mod surface;

pub use config::ViewportConfig;
pub use controller::{ViewportController, fling_bounds};
pub use error::ViewportError;
pub use flags::ViewportFlags;
pub use sink::{AlphaSink, RenderSink};
pub use surface::ImageSurface;
