// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Point, Vec2};

/// One named channel of a decomposed transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Horizontal translation in view units.
    TranslateX,
    /// Vertical translation in view units.
    TranslateY,
    /// Length of the transformed X basis vector.
    ScaleX,
    /// Length of the transformed Y basis vector.
    ScaleY,
    /// Rotation in degrees, clockwise on a y-down screen.
    Rotation,
}

/// A 2D affine transform decomposed into translation, scale and rotation.
///
/// The decomposition assumes the matrix is `T · R · S`: a local
/// (possibly non-uniform) scale, followed by a rotation, followed by a
/// translation. This covers every transform a photo viewport produces
/// (pan, pinch, two-finger rotation, animated fits). A shear component,
/// which can only appear when a non-uniform scale is applied after a
/// rotation, is not representable and is dropped on recomposition.
///
/// ```rust
/// use kurbo::Affine;
/// use understory_affine::AffineTransform;
///
/// let m = Affine::translate((40.0, 10.0))
///     * Affine::rotate(30_f64.to_radians())
///     * Affine::scale(2.0);
/// let t = AffineTransform::from_affine(m);
/// assert!((t.sx - 2.0).abs() < 1e-9);
/// assert!((t.angle_degrees - 30.0).abs() < 1e-9);
/// assert_eq!((t.tx, t.ty), (40.0, 10.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineTransform {
    /// Horizontal translation.
    pub tx: f64,
    /// Vertical translation.
    pub ty: f64,
    /// Horizontal scale, always positive.
    pub sx: f64,
    /// Vertical scale, always positive.
    pub sy: f64,
    /// Rotation in degrees, normalized into `(-180, 180]`.
    pub angle_degrees: f64,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineTransform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        tx: 0.0,
        ty: 0.0,
        sx: 1.0,
        sy: 1.0,
        angle_degrees: 0.0,
    };

    /// Decomposes a matrix into its channels.
    #[must_use]
    pub fn from_affine(m: Affine) -> Self {
        Self {
            tx: translate_x(m),
            ty: translate_y(m),
            sx: scale_x(m),
            sy: scale_y(m),
            angle_degrees: angle_degrees(m),
        }
    }

    /// Recomposes the channels into a matrix (`T · R · S`).
    #[must_use]
    pub fn to_affine(&self) -> Affine {
        Affine::translate((self.tx, self.ty))
            * Affine::rotate(self.angle_degrees.to_radians())
            * Affine::scale_non_uniform(self.sx, self.sy)
    }

    /// Returns the value of one channel.
    #[must_use]
    pub fn channel(&self, channel: Channel) -> f64 {
        match channel {
            Channel::TranslateX => self.tx,
            Channel::TranslateY => self.ty,
            Channel::ScaleX => self.sx,
            Channel::ScaleY => self.sy,
            Channel::Rotation => self.angle_degrees,
        }
    }

    /// Returns the translation as a vector.
    #[must_use]
    pub fn translation(&self) -> Vec2 {
        Vec2::new(self.tx, self.ty)
    }

    /// Returns `true` if every channel is within `tolerance` of `other`.
    ///
    /// Angles are compared on the circle, so `179.9` and `-179.9` are close.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        (self.tx - other.tx).abs() <= tolerance
            && (self.ty - other.ty).abs() <= tolerance
            && (self.sx - other.sx).abs() <= tolerance
            && (self.sy - other.sy).abs() <= tolerance
            && normalize_degrees(self.angle_degrees - other.angle_degrees).abs() <= tolerance
    }
}

impl From<Affine> for AffineTransform {
    fn from(m: Affine) -> Self {
        Self::from_affine(m)
    }
}

impl From<AffineTransform> for Affine {
    fn from(t: AffineTransform) -> Self {
        t.to_affine()
    }
}

/// Horizontal translation of `m`.
#[must_use]
pub fn translate_x(m: Affine) -> f64 {
    m.as_coeffs()[4]
}

/// Vertical translation of `m`.
#[must_use]
pub fn translate_y(m: Affine) -> f64 {
    m.as_coeffs()[5]
}

/// Length of the transformed X basis vector, or `1.0` if it collapsed.
#[must_use]
pub fn scale_x(m: Affine) -> f64 {
    let [a, b, ..] = m.as_coeffs();
    basis_length(a, b)
}

/// Length of the transformed Y basis vector, or `1.0` if it collapsed.
#[must_use]
pub fn scale_y(m: Affine) -> f64 {
    let [_, _, c, d, ..] = m.as_coeffs();
    basis_length(c, d)
}

/// Rotation of the X basis vector in degrees, normalized into `(-180, 180]`.
///
/// Positive angles rotate clockwise on a y-down screen, matching
/// [`Affine::rotate`].
#[must_use]
pub fn angle_degrees(m: Affine) -> f64 {
    let [a, b, ..] = m.as_coeffs();
    if a == 0.0 && b == 0.0 {
        return 0.0;
    }
    normalize_degrees(b.atan2(a).to_degrees())
}

/// Returns the value of `channel` in `m`.
#[must_use]
pub fn channel(m: Affine, channel: Channel) -> f64 {
    match channel {
        Channel::TranslateX => translate_x(m),
        Channel::TranslateY => translate_y(m),
        Channel::ScaleX => scale_x(m),
        Channel::ScaleY => scale_y(m),
        Channel::Rotation => angle_degrees(m),
    }
}

/// Returns `m` with a single channel replaced and every other channel kept.
///
/// Translation channels are written straight into the matrix. Scale and
/// rotation channels go through the decomposition, so any shear in `m` is
/// dropped.
#[must_use]
pub fn with_channel(m: Affine, channel: Channel, value: f64) -> Affine {
    match channel {
        Channel::TranslateX => {
            let [a, b, c, d, _, f] = m.as_coeffs();
            Affine::new([a, b, c, d, value, f])
        }
        Channel::TranslateY => {
            let [a, b, c, d, e, _] = m.as_coeffs();
            Affine::new([a, b, c, d, e, value])
        }
        Channel::ScaleX | Channel::ScaleY | Channel::Rotation => {
            let mut t = AffineTransform::from_affine(m);
            match channel {
                Channel::ScaleX => t.sx = sanitize_scale(value),
                Channel::ScaleY => t.sy = sanitize_scale(value),
                _ => t.angle_degrees = normalize_degrees(value),
            }
            t.to_affine()
        }
    }
}

/// Normalizes an angle in degrees into `(-180, 180]`.
#[must_use]
pub fn normalize_degrees(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let mut d = degrees % 360.0;
    if d <= -180.0 {
        d += 360.0;
    } else if d > 180.0 {
        d -= 360.0;
    }
    d
}

/// Applies a translation after `m`, in view space.
#[must_use]
pub fn post_translate(m: Affine, delta: Vec2) -> Affine {
    Affine::translate(delta) * m
}

/// Applies a scale about a view-space pivot after `m`.
#[must_use]
pub fn post_scale(m: Affine, sx: f64, sy: f64, pivot: Point) -> Affine {
    let p = pivot.to_vec2();
    Affine::translate(p) * Affine::scale_non_uniform(sx, sy) * Affine::translate(-p) * m
}

/// Applies a rotation (degrees) about a view-space pivot after `m`.
#[must_use]
pub fn post_rotate(m: Affine, degrees: f64, pivot: Point) -> Affine {
    Affine::rotate_about(degrees.to_radians(), pivot) * m
}

fn basis_length(x: f64, y: f64) -> f64 {
    let len = x.hypot(y);
    if len > f64::EPSILON && len.is_finite() {
        len
    } else {
        1.0
    }
}

fn sanitize_scale(value: f64) -> f64 {
    if value > 0.0 && value.is_finite() {
        value
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_affine_close(a: Affine, b: Affine) {
        for (x, y) in a.as_coeffs().iter().zip(b.as_coeffs().iter()) {
            assert!((x - y).abs() < 1e-6, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn identity_decomposes_to_identity() {
        assert_eq!(
            AffineTransform::from_affine(Affine::IDENTITY),
            AffineTransform::IDENTITY
        );
    }

    #[test]
    fn rotation_sign_is_clockwise_on_screen() {
        let m = Affine::rotate(90_f64.to_radians());
        assert!((angle_degrees(m) - 90.0).abs() < EPS);
        // +x maps to +y: clockwise when y points down.
        let p = m * Point::new(1.0, 0.0);
        assert!((p.y - 1.0).abs() < EPS);
    }

    #[test]
    fn scale_is_recovered_under_rotation() {
        let m = Affine::rotate(1.2) * Affine::scale_non_uniform(3.0, 0.5);
        assert!((scale_x(m) - 3.0).abs() < EPS);
        assert!((scale_y(m) - 0.5).abs() < EPS);
    }

    #[test]
    fn collapsed_basis_reports_unit_scale() {
        let m = Affine::new([0.0, 0.0, 0.0, 2.0, 5.0, 6.0]);
        assert_eq!(scale_x(m), 1.0);
        assert_eq!(scale_y(m), 2.0);
        assert_eq!(angle_degrees(m), 0.0);
    }

    #[test]
    fn near_identity_is_stable() {
        let m = Affine::new([1.0 + 1e-12, 1e-13, -1e-13, 1.0 - 1e-12, 0.0, 0.0]);
        let t = AffineTransform::from_affine(m);
        assert!((t.sx - 1.0).abs() < 1e-9);
        assert!(t.angle_degrees.abs() < 1e-9);
    }

    #[test]
    fn normalize_maps_into_half_open_range() {
        assert_eq!(normalize_degrees(180.0), 180.0);
        assert_eq!(normalize_degrees(-180.0), 180.0);
        assert_eq!(normalize_degrees(540.0), 180.0);
        assert!((normalize_degrees(-190.0) - 170.0).abs() < EPS);
        assert!((normalize_degrees(370.0) - 10.0).abs() < EPS);
        assert_eq!(normalize_degrees(f64::NAN), 0.0);
    }

    #[test]
    fn with_channel_only_touches_that_channel() {
        let m = Affine::translate((10.0, 20.0)) * Affine::rotate(0.3) * Affine::scale(2.0);
        let moved = with_channel(m, Channel::TranslateX, -4.0);
        assert_eq!(translate_x(moved), -4.0);
        assert_eq!(translate_y(moved), 20.0);
        assert!((scale_x(moved) - 2.0).abs() < EPS);

        let rescaled = with_channel(m, Channel::ScaleY, 3.0);
        assert!((scale_y(rescaled) - 3.0).abs() < EPS);
        assert!((scale_x(rescaled) - 2.0).abs() < EPS);
        assert!((angle_degrees(rescaled) - 0.3_f64.to_degrees()).abs() < 1e-6);

        let rotated = with_channel(m, Channel::Rotation, -45.0);
        assert!((angle_degrees(rotated) + 45.0).abs() < 1e-6);
        assert_eq!(rotated.translation(), m.translation());
    }

    #[test]
    fn post_helpers_keep_pivot_fixed() {
        let m = Affine::translate((3.0, 4.0)) * Affine::scale(1.5);
        let pivot = Point::new(50.0, 80.0);
        let before = m.inverse() * pivot;

        let scaled = post_scale(m, 2.0, 2.0, pivot);
        assert!((scaled * before - pivot).hypot() < 1e-9);

        let rotated = post_rotate(m, 33.0, pivot);
        assert!((rotated * before - pivot).hypot() < 1e-9);

        let moved = post_translate(m, Vec2::new(5.0, -5.0));
        assert!((moved * before - (pivot + Vec2::new(5.0, -5.0))).hypot() < 1e-9);
    }

    #[test]
    fn recompose_matches_translate_rotate_scale() {
        let m = Affine::translate((-7.0, 12.5))
            * Affine::rotate(-2.0)
            * Affine::scale_non_uniform(0.25, 4.0);
        assert_affine_close(AffineTransform::from_affine(m).to_affine(), m);
    }
}
