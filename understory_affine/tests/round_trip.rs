// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decompose/recompose round trips for `understory_affine`.
//!
//! Matrices are built from translate, rotate and scale steps applied in
//! varying orders. Uniform scales commute with rotation, so any order is
//! representable; non-uniform scales are applied in local space (before any
//! rotation), which is the only way a viewport produces them.

use kurbo::{Affine, Point};
use understory_affine::{AffineTransform, normalize_degrees};

fn assert_close(a: Affine, b: Affine) {
    for (x, y) in a.as_coeffs().iter().zip(b.as_coeffs().iter()) {
        assert!((x - y).abs() < 1e-6, "{a:?} vs {b:?}");
    }
}

fn round_trip(m: Affine) -> Affine {
    AffineTransform::from_affine(m).to_affine()
}

#[test]
fn translate_rotate_scale_in_every_order() {
    let t = Affine::translate((120.0, -35.5));
    let r = Affine::rotate(0.7);
    let s = Affine::scale(2.5);
    let orders = [
        t * r * s,
        t * s * r,
        r * t * s,
        r * s * t,
        s * t * r,
        s * r * t,
    ];
    for m in orders {
        assert_close(round_trip(m), m);
    }
}

#[test]
fn local_non_uniform_scale_survives() {
    let m = Affine::translate((8.0, 9.0))
        * Affine::rotate(-2.9)
        * Affine::scale_non_uniform(0.1, 0.35);
    assert_close(round_trip(m), m);
}

#[test]
fn pivot_composed_transforms_round_trip() {
    let pivot = Point::new(400.0, 250.0);
    let m = Affine::rotate_about(1.1, pivot)
        * Affine::translate((-40.0, 12.0))
        * Affine::scale(0.6);
    assert_close(round_trip(m), m);
}

#[test]
fn channels_are_self_consistent() {
    let m = Affine::translate((10.0, 20.0)) * Affine::rotate(3.0) * Affine::scale(4.0);
    let t = AffineTransform::from_affine(m);
    assert!(t.sx > 0.0 && t.sy > 0.0);
    assert!(t.angle_degrees > -180.0 && t.angle_degrees <= 180.0);
    assert!((t.angle_degrees - normalize_degrees(3_f64.to_degrees())).abs() < 1e-9);
    assert_eq!(t.translation(), m.translation());
}

#[test]
fn recomposed_value_decomposes_to_itself() {
    let t = AffineTransform {
        tx: -3.0,
        ty: 4.0,
        sx: 0.5,
        sy: 1.5,
        angle_degrees: -120.0,
    };
    let back = AffineTransform::from_affine(t.to_affine());
    assert!(back.approx_eq(&t, 1e-9), "{back:?} vs {t:?}");
}
