// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_affine --heading-base-level=0

//! Understory Affine: decomposed 2D transforms for interactive image views.
//!
//! Image viewers drive a single [`kurbo::Affine`] from gestures and
//! animations, but reason about it in terms of *channels*: translation,
//! per-axis scale and rotation. This crate provides:
//!
//! - Pure channel accessors ([`translate_x`], [`scale_x`], [`angle_degrees`], ...)
//!   computed independently from the raw coefficients of a matrix.
//! - [`AffineTransform`], the decomposed value type, and its recomposition.
//! - View-space "post" helpers ([`post_scale`], [`post_rotate`],
//!   [`post_translate`]) that apply an operation about a pivot after the
//!   current matrix.
//! - [`SharedMatrix`] (with `std`), a lock-guarded matrix for the one
//!   legitimate cross-thread reader: a render thread polling the transform
//!   while the interaction thread mutates it.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Affine, Point};
//! use understory_affine::{post_rotate, post_scale, AffineTransform};
//!
//! let pivot = Point::new(100.0, 100.0);
//! let m = post_scale(Affine::IDENTITY, 2.0, 2.0, pivot);
//! let m = post_rotate(m, 90.0, pivot);
//!
//! let t = AffineTransform::from_affine(m);
//! assert!((t.sx - 2.0).abs() < 1e-9);
//! assert!((t.angle_degrees - 90.0).abs() < 1e-9);
//! // The pivot stayed where it was.
//! assert!((m * Point::new(100.0, 100.0) - pivot).hypot() < 1e-9);
//! ```
//!
//! ## Conventions
//!
//! - Coordinates are y-down; positive angles rotate clockwise on screen.
//! - Angles are degrees at the API surface and normalized into `(-180, 180]`.
//! - A collapsed basis vector decomposes to scale `1.0` rather than `0.0`,
//!   so downstream divisions by scale stay finite.
//!
//! This crate is `no_std` (without `SharedMatrix`) when the `std` feature is
//! disabled.

#![no_std]

#[cfg(feature = "std")]
mod shared;
mod transform;

#[cfg(feature = "std")]
pub use shared::SharedMatrix;
pub use transform::{
    AffineTransform, Channel, angle_degrees, channel, normalize_degrees, post_rotate, post_scale,
    post_translate, scale_x, scale_y, translate_x, translate_y, with_channel,
};
