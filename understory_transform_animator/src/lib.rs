// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_transform_animator --heading-base-level=0

//! Understory Transform Animator: pivot-stable animations of an image matrix.
//!
//! A [`TransformAnimator`] interpolates five channels (pivot x/y, scale x/y,
//! rotation) between a start and an end state and writes the composed
//! matrix to a [`TransformSurface`] once per frame. The pivot is a point in
//! image coordinates; its view position is the animated translation, so a
//! pure zoom keeps the pivot fixed on screen.
//!
//! - [`Builder`] snapshots the surface, defaults every channel to its current
//!   value and rejects surfaces that are not in [`ContentMode::Matrix`].
//! - [`Interpolator`] eases each channel separately.
//! - [`AnimatorListener`] receives start/end/cancel/repeat notifications;
//!   [`EventQueue`] records them for owners that cannot be borrowed mid-frame.
//! - [`Scroller`] is the companion fling integrator (spline decay, per-axis
//!   bounds, overscroll).
//!
//! Animators are driven by the host: call [`TransformAnimator::tick`] with the
//! frame time while it [needs a frame](Tick::needs_frame). The animator holds
//! only a weak handle to the surface, so a surface dropped mid-run ends the
//! animation quietly.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//! use kurbo::{Affine, Size};
//! use understory_transform_animator::{
//!     AnimatorEventKind, Builder, ContentMode, EventQueue, TransformSurface,
//! };
//!
//! struct Surface(Affine);
//! impl TransformSurface for Surface {
//!     fn content_mode(&self) -> ContentMode { ContentMode::Matrix }
//!     fn image_matrix(&self) -> Affine { self.0 }
//!     fn set_image_matrix(&mut self, m: Affine) { self.0 = m; }
//!     fn intrinsic_size(&self) -> Size { Size::new(100.0, 100.0) }
//! }
//!
//! let surface = Rc::new(RefCell::new(Surface(Affine::IDENTITY)));
//! let events = EventQueue::new();
//! let mut anim = Builder::new(&surface)
//!     .unwrap()
//!     .to_rotate(45.0)
//!     .duration(160)
//!     .build();
//! anim.add_listener(Box::new(events.clone()));
//! anim.start();
//!
//! let mut now = 0;
//! while anim.tick(now).needs_frame() {
//!     now += 16;
//! }
//! let kinds: Vec<_> = events.drain().into_iter().map(|e| e.kind).collect();
//! assert_eq!(kinds, [AnimatorEventKind::Start, AnimatorEventKind::End]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod animator;
mod interpolator;
mod listener;
mod scroller;
mod surface;

pub use animator::{
    AnimationChannels, Builder, DEFAULT_DURATION_MS, ListenerKey, Tick, TransformAnimator,
};
pub use interpolator::{Interpolator, interpolate_channel};
pub use listener::{AnimatorEvent, AnimatorEventKind, AnimatorId, AnimatorListener, EventQueue};
pub use scroller::{FlingBounds, FlingCalculator, FlingInfo, Scroller, spline_distance};
pub use surface::{AnimatorError, ContentMode, TransformSurface};
