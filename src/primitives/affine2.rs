//! 2D affine transformation type.

use super::{Point2, Vec2};
use crate::error::CollisionError;
use num_traits::Float;
use std::ops::Mul;

/// A 2D affine transformation matrix.
///
/// Represented as a 2x3 matrix in row-major order:
/// ```text
/// | a  b  tx |
/// | c  d  ty |
/// ```
///
/// Transforms are applied as:
/// - Point: `(a*x + b*y + tx, c*x + d*y + ty)`
/// - Vector: `(a*x + b*y, c*x + d*y)` (no translation)
///
/// Two styles are supported. Constructors and [`Affine2::then`] build
/// transforms by value. The in-place mutators ([`Affine2::translate`],
/// [`Affine2::rotate`], [`Affine2::flip_x`], ...) concatenate on the right,
/// so the most recently appended operation is the first one applied to a
/// point. This is the order used to build tile transforms: start from the
/// tile position, append the per-tile flips, then pre-concatenate the map
/// transform.
///
/// # Example
///
/// ```
/// use tilecollide::primitives::{Affine2, Point2};
///
/// let mut tile: Affine2<f64> = Affine2::identity();
/// tile.set_to_translation(32.0, 16.0);
/// tile.flip_x(8.0);
///
/// // (0, 0) is flipped to (16, 0) inside the tile, then moved to the cell.
/// let p = tile.apply_point(Point2::new(0.0, 0.0));
/// assert_eq!(p, Point2::new(48.0, 16.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Affine2<F> {
    /// Matrix element [0,0] - x scale / rotation component
    pub a: F,
    /// Matrix element [0,1] - x shear / rotation component
    pub b: F,
    /// Matrix element [1,0] - y shear / rotation component
    pub c: F,
    /// Matrix element [1,1] - y scale / rotation component
    pub d: F,
    /// Translation x component
    pub tx: F,
    /// Translation y component
    pub ty: F,
}

impl<F: Float> Affine2<F> {
    /// Creates a new affine transform from matrix components.
    #[inline]
    pub fn new(a: F, b: F, c: F, d: F, tx: F, ty: F) -> Self {
        Self { a, b, c, d, tx, ty }
    }

    /// Creates the identity transform (no change).
    #[inline]
    pub fn identity() -> Self {
        Self {
            a: F::one(),
            b: F::zero(),
            c: F::zero(),
            d: F::one(),
            tx: F::zero(),
            ty: F::zero(),
        }
    }

    /// Creates a translation transform.
    #[inline]
    pub fn translation(offset: Vec2<F>) -> Self {
        Self {
            tx: offset.x,
            ty: offset.y,
            ..Self::identity()
        }
    }

    /// Creates a rotation transform around the origin.
    ///
    /// Angle is in radians, positive is counter-clockwise in a y-up basis
    /// (clockwise on screen when y points down).
    #[inline]
    pub fn rotation(angle: F) -> Self {
        let cos_a = angle.cos();
        let sin_a = angle.sin();
        Self {
            a: cos_a,
            b: -sin_a,
            c: sin_a,
            d: cos_a,
            tx: F::zero(),
            ty: F::zero(),
        }
    }

    /// Creates a rotation transform around a specific point.
    pub fn rotation_around(angle: F, center: Point2<F>) -> Self {
        Self::translation(Vec2::new(-center.x, -center.y))
            .then(Self::rotation(angle))
            .then(Self::translation(center.to_vec()))
    }

    /// Creates a non-uniform scaling transform around the origin.
    #[inline]
    pub fn scale_xy(sx: F, sy: F) -> Self {
        Self {
            a: sx,
            d: sy,
            ..Self::identity()
        }
    }

    /// Creates the transform swapping the x and y axes.
    #[inline]
    pub fn swap_axes() -> Self {
        Self {
            a: F::zero(),
            b: F::one(),
            c: F::one(),
            d: F::zero(),
            tx: F::zero(),
            ty: F::zero(),
        }
    }

    /// Applies this transform to a point.
    #[inline]
    pub fn apply_point(&self, p: Point2<F>) -> Point2<F> {
        Point2::new(
            self.a * p.x + self.b * p.y + self.tx,
            self.c * p.x + self.d * p.y + self.ty,
        )
    }

    /// Applies this transform to a point, overwriting it.
    #[inline]
    pub fn transform_in_place(&self, p: &mut Point2<F>) {
        *p = self.apply_point(*p);
    }

    /// Applies this transform to a vector (no translation).
    #[inline]
    pub fn apply_vec(&self, v: Vec2<F>) -> Vec2<F> {
        Vec2::new(self.a * v.x + self.b * v.y, self.c * v.x + self.d * v.y)
    }

    /// Composes this transform with another (self * other).
    ///
    /// The resulting transform applies `other` first, then `self`.
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            tx: self.a * other.tx + self.b * other.ty + self.tx,
            ty: self.c * other.tx + self.d * other.ty + self.ty,
        }
    }

    /// Returns a transform that applies `self` first, then `other`.
    ///
    /// Equivalent to `other.compose(self)`.
    #[inline]
    pub fn then(&self, other: Self) -> Self {
        other.compose(self)
    }

    /// Replaces `self` with `self * other`: `other` is applied first.
    #[inline]
    pub fn concatenate(&mut self, other: &Self) {
        *self = self.compose(other);
    }

    /// Replaces `self` with `other * self`: `other` is applied last.
    #[inline]
    pub fn pre_concatenate(&mut self, other: &Self) {
        *self = other.compose(self);
    }

    /// Resets to the identity transform.
    #[inline]
    pub fn set_to_identity(&mut self) {
        *self = Self::identity();
    }

    /// Resets to a pure translation.
    #[inline]
    pub fn set_to_translation(&mut self, tx: F, ty: F) {
        *self = Self::translation(Vec2::new(tx, ty));
    }

    /// Appends a translation.
    #[inline]
    pub fn translate(&mut self, tx: F, ty: F) {
        self.concatenate(&Self::translation(Vec2::new(tx, ty)));
    }

    /// Appends a rotation around the origin.
    #[inline]
    pub fn rotate(&mut self, angle: F) {
        self.concatenate(&Self::rotation(angle));
    }

    /// Appends a rotation around `(cx, cy)`.
    pub fn rotate_around(&mut self, angle: F, cx: F, cy: F) {
        self.translate(cx, cy);
        self.rotate(angle);
        self.translate(-cx, -cy);
    }

    /// Appends a non-uniform scale around the origin.
    #[inline]
    pub fn scale(&mut self, sx: F, sy: F) {
        self.concatenate(&Self::scale_xy(sx, sy));
    }

    /// Appends a mirror of the x axis around the vertical line `x = anchor_x`.
    pub fn flip_x(&mut self, anchor_x: F) {
        self.translate(anchor_x, F::zero());
        self.scale(-F::one(), F::one());
        self.translate(-anchor_x, F::zero());
    }

    /// Appends a mirror of the y axis around the horizontal line `y = anchor_y`.
    pub fn flip_y(&mut self, anchor_y: F) {
        self.translate(F::zero(), anchor_y);
        self.scale(F::one(), -F::one());
        self.translate(F::zero(), -anchor_y);
    }

    /// Appends a swap of the x and y axes around `(cx, cy)`.
    ///
    /// This is the diagonal flip of tile sets: a mirror across the line of
    /// slope 1 through the pivot.
    pub fn flip_diagonally(&mut self, cx: F, cy: F) {
        self.translate(cx, cy);
        self.concatenate(&Self::swap_axes());
        self.translate(-cx, -cy);
    }

    /// Returns the determinant of the linear part.
    ///
    /// - Positive: preserves orientation
    /// - Negative: flips orientation (reflection)
    /// - Zero: singular (collapses to line or point)
    #[inline]
    pub fn determinant(&self) -> F {
        self.a * self.d - self.b * self.c
    }

    /// Returns true if this transform is invertible.
    #[inline]
    pub fn is_invertible(&self) -> bool {
        self.determinant().abs() > F::epsilon()
    }

    /// Returns the inverse transform, if it exists.
    ///
    /// Returns `None` if the transform is singular (determinant is zero).
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() < F::epsilon() {
            return None;
        }

        let inv_det = F::one() / det;
        Some(Self {
            a: self.d * inv_det,
            b: -self.b * inv_det,
            c: -self.c * inv_det,
            d: self.a * inv_det,
            tx: (self.b * self.ty - self.d * self.tx) * inv_det,
            ty: (self.c * self.tx - self.a * self.ty) * inv_det,
        })
    }

    /// Inverts this transform in place.
    ///
    /// A singular transform is left untouched and an error is returned.
    pub fn invert(&mut self) -> Result<(), CollisionError> {
        let inverse = self
            .inverse()
            .ok_or(CollisionError::SingularTransformation)?;
        *self = inverse;
        Ok(())
    }

    /// Returns true if this is approximately the identity transform.
    pub fn is_identity(&self, epsilon: F) -> bool {
        (self.a - F::one()).abs() < epsilon
            && self.b.abs() < epsilon
            && self.c.abs() < epsilon
            && (self.d - F::one()).abs() < epsilon
            && self.tx.abs() < epsilon
            && self.ty.abs() < epsilon
    }
}

impl<F: Float> Default for Affine2<F> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<F: Float> Mul for Affine2<F> {
    type Output = Self;

    /// Multiplies two transforms (self * rhs).
    ///
    /// The result applies `rhs` first, then `self`.
    fn mul(self, rhs: Self) -> Self {
        self.compose(&rhs)
    }
}

impl<F: Float> Mul<Point2<F>> for Affine2<F> {
    type Output = Point2<F>;

    fn mul(self, rhs: Point2<F>) -> Point2<F> {
        self.apply_point(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    fn assert_point_eq(actual: Point2<f64>, x: f64, y: f64) {
        assert_relative_eq!(actual.x, x, epsilon = 1e-10);
        assert_relative_eq!(actual.y, y, epsilon = 1e-10);
    }

    #[test]
    fn test_identity() {
        let t: Affine2<f64> = Affine2::identity();
        assert_eq!(t.apply_point(Point2::new(3.0, 4.0)), Point2::new(3.0, 4.0));
        assert!(t.is_identity(1e-10));
    }

    #[test]
    fn test_translation_ignores_vectors() {
        let t: Affine2<f64> = Affine2::translation(Vec2::new(10.0, 20.0));
        assert_eq!(t.apply_point(Point2::new(3.0, 4.0)), Point2::new(13.0, 24.0));
        assert_eq!(t.apply_vec(Vec2::new(3.0, 4.0)), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_rotation() {
        let t: Affine2<f64> = Affine2::rotation(FRAC_PI_2);
        assert_point_eq(t.apply_point(Point2::new(1.0, 0.0)), 0.0, 1.0);

        let t: Affine2<f64> = Affine2::rotation(PI);
        assert_point_eq(t.apply_point(Point2::new(1.0, 0.0)), -1.0, 0.0);
    }

    #[test]
    fn test_rotation_around() {
        let t: Affine2<f64> = Affine2::rotation_around(FRAC_PI_2, Point2::new(1.0, 1.0));
        assert_point_eq(t.apply_point(Point2::new(2.0, 1.0)), 1.0, 2.0);
    }

    #[test]
    fn test_compose_and_then_agree() {
        let scale: Affine2<f64> = Affine2::scale_xy(2.0, 2.0);
        let translate = Affine2::translation(Vec2::new(10.0, 0.0));

        let composed = translate.compose(&scale);
        let chained = scale.then(translate);
        assert_eq!(composed, chained);
        assert_eq!(composed.apply_point(Point2::new(1.0, 0.0)), Point2::new(12.0, 0.0));
        assert_eq!((translate * scale) * Point2::new(1.0, 0.0), Point2::new(12.0, 0.0));
    }

    #[test]
    fn test_concatenate_applies_argument_first() {
        let mut t: Affine2<f64> = Affine2::translation(Vec2::new(10.0, 0.0));
        t.concatenate(&Affine2::scale_xy(2.0, 2.0));
        // scale first: (1, 0) -> (2, 0) -> (12, 0)
        assert_point_eq(t.apply_point(Point2::new(1.0, 0.0)), 12.0, 0.0);
    }

    #[test]
    fn test_pre_concatenate_applies_argument_last() {
        let mut t: Affine2<f64> = Affine2::translation(Vec2::new(10.0, 0.0));
        t.pre_concatenate(&Affine2::scale_xy(2.0, 2.0));
        // translate first: (1, 0) -> (11, 0) -> (22, 0)
        assert_point_eq(t.apply_point(Point2::new(1.0, 0.0)), 22.0, 0.0);
    }

    #[test]
    fn test_mutators_append_in_local_frame() {
        let mut t: Affine2<f64> = Affine2::identity();
        t.translate(100.0, 50.0);
        t.rotate(FRAC_PI_2);
        t.scale(2.0, 3.0);

        // (1, 1) -> scale (2, 3) -> rotate (-3, 2) -> translate (97, 52)
        assert_point_eq(t.apply_point(Point2::new(1.0, 1.0)), 97.0, 52.0);
    }

    #[test]
    fn test_rotate_around_keeps_pivot() {
        let mut t: Affine2<f64> = Affine2::identity();
        t.rotate_around(FRAC_PI_4, 5.0, 7.0);
        assert_point_eq(t.apply_point(Point2::new(5.0, 7.0)), 5.0, 7.0);
    }

    #[test]
    fn test_flip_x_and_y() {
        let mut t: Affine2<f64> = Affine2::identity();
        t.flip_x(8.0);
        assert_point_eq(t.apply_point(Point2::new(0.0, 3.0)), 16.0, 3.0);
        assert_point_eq(t.apply_point(Point2::new(8.0, 3.0)), 8.0, 3.0);

        let mut t: Affine2<f64> = Affine2::identity();
        t.flip_y(8.0);
        assert_point_eq(t.apply_point(Point2::new(3.0, 0.0)), 3.0, 16.0);
    }

    #[test]
    fn test_flip_diagonally_swaps_axes_around_pivot() {
        let mut t: Affine2<f64> = Affine2::identity();
        t.flip_diagonally(8.0, 8.0);
        assert_point_eq(t.apply_point(Point2::new(16.0, 0.0)), 0.0, 16.0);
        assert_point_eq(t.apply_point(Point2::new(3.0, 5.0)), 5.0, 3.0);
    }

    #[test]
    fn test_flip_diagonally_matches_flip_then_quarter_turn() {
        // Tile sets describe the diagonal flip as a horizontal flip
        // followed by a quarter turn around the tile center.
        let mut expected: Affine2<f64> = Affine2::identity();
        expected.flip_x(8.0);
        expected.rotate_around(FRAC_PI_2, 8.0, 8.0);

        let mut actual: Affine2<f64> = Affine2::identity();
        actual.flip_diagonally(8.0, 8.0);

        for p in [Point2::new(0.0, 0.0), Point2::new(16.0, 4.0), Point2::new(3.0, 11.0)] {
            let e = expected.apply_point(p);
            assert_point_eq(actual.apply_point(p), e.x, e.y);
        }
    }

    #[test]
    fn test_set_to_translation_discards_previous_state() {
        let mut t: Affine2<f64> = Affine2::rotation(1.0);
        t.set_to_translation(4.0, 5.0);
        assert_eq!(t, Affine2::translation(Vec2::new(4.0, 5.0)));
        t.set_to_identity();
        assert!(t.is_identity(1e-12));
    }

    #[test]
    fn test_transform_in_place() {
        let t: Affine2<f64> = Affine2::translation(Vec2::new(1.0, 2.0));
        let mut p = Point2::new(3.0, 4.0);
        t.transform_in_place(&mut p);
        assert_eq!(p, Point2::new(4.0, 6.0));
    }

    #[test]
    fn test_inverse_round_trip() {
        let t: Affine2<f64> = Affine2::rotation(FRAC_PI_4)
            .then(Affine2::translation(Vec2::new(10.0, 20.0)))
            .then(Affine2::scale_xy(2.0, 0.5));

        let inv = t.inverse().unwrap();
        let p = Point2::new(3.0, 4.0);
        let back = inv.apply_point(t.apply_point(p));
        assert_point_eq(back, p.x, p.y);
        assert!(inv.compose(&t).is_identity(1e-10));
    }

    #[test]
    fn test_invert_in_place() {
        let mut t: Affine2<f64> = Affine2::translation(Vec2::new(5.0, -3.0));
        t.invert().unwrap();
        assert_point_eq(t.apply_point(Point2::new(5.0, -3.0)), 0.0, 0.0);
    }

    #[test]
    fn test_invert_singular_is_error_and_untouched() {
        let mut t: Affine2<f64> = Affine2::scale_xy(1.0, 0.0);
        let before = t;
        assert_eq!(t.invert(), Err(CollisionError::SingularTransformation));
        assert_eq!(t, before);
        assert!(!t.is_invertible());
    }

    #[test]
    fn test_determinant_sign() {
        let mut t: Affine2<f64> = Affine2::identity();
        assert_relative_eq!(t.determinant(), 1.0, epsilon = 1e-10);
        t.flip_x(0.0);
        assert_relative_eq!(t.determinant(), -1.0, epsilon = 1e-10);
        t.flip_diagonally(0.0, 0.0);
        assert_relative_eq!(t.determinant(), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_f32_support() {
        let t: Affine2<f32> = Affine2::rotation(0.5);
        let result = t.apply_point(Point2::new(1.0, 0.0));
        assert!((result.x - 0.5_f32.cos()).abs() < 1e-6);
    }
}
