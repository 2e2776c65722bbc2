//! Separating axis collision test between convex polygons.

use super::core::Polygon;
use crate::primitives::Vec2;
use num_traits::Float;

/// Result of [`collision_test`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult<F> {
    /// `true` if the polygons overlap.
    pub collision: bool,
    /// Minimum translation vector pushing the first polygon out of the second.
    ///
    /// Its length is the penetration depth. Zero when there is no collision.
    pub move_axis: Vec2<F>,
}

impl<F: Float> CollisionResult<F> {
    fn separated() -> Self {
        Self {
            collision: false,
            move_axis: Vec2::zero(),
        }
    }
}

/// Tests two convex polygons for collision with the separating axis theorem.
///
/// Both polygons are projected on the normal of every edge of `p1` and `p2`.
/// A positive gap on any axis separates them. When `ignore_touching_edges`
/// is set, a zero gap also counts as a separation, so polygons that only
/// share an edge do not collide.
///
/// On collision, `move_axis` is the axis of smallest penetration scaled by
/// the penetration depth and oriented so that moving `p1` by it resolves
/// the overlap.
///
/// The polygons must be convex and their cached edges and center up to date.
/// Gap comparisons are exact. Degenerate (zero-length) edges are skipped.
///
/// # Example
///
/// ```
/// use tilecollide::polygon::{collision_test, Polygon};
///
/// let a: Polygon<f64> = Polygon::rectangle(0.0, 0.0, 10.0, 10.0);
/// let b = Polygon::rectangle(8.0, 2.0, 10.0, 10.0);
///
/// let result = collision_test(&a, &b, false);
/// assert!(result.collision);
/// assert_eq!(result.move_axis.x, -2.0);
/// ```
pub fn collision_test<F: Float>(
    p1: &Polygon<F>,
    p2: &Polygon<F>,
    ignore_touching_edges: bool,
) -> CollisionResult<F> {
    if p1.is_empty() || p2.is_empty() {
        return CollisionResult::separated();
    }
    debug_assert_eq!(p1.edges().len(), p1.len(), "stale edges on first polygon");
    debug_assert_eq!(p2.edges().len(), p2.len(), "stale edges on second polygon");

    let mut min_dist = F::max_value();
    let mut mtv_axis = Vec2::zero();

    for edge in p1.edges().iter().chain(p2.edges()) {
        let axis = edge.perpendicular().normalized_or_self();
        if axis.is_zero() {
            continue;
        }

        let (min_a, max_a) = project(axis, p1);
        let (min_b, max_b) = project(axis, p2);

        let dist = interval_distance(min_a, max_a, min_b, max_b);
        if dist > F::zero() || (dist == F::zero() && ignore_touching_edges) {
            return CollisionResult::separated();
        }

        let abs_dist = dist.abs();
        if abs_dist < min_dist {
            min_dist = abs_dist;
            mtv_axis = axis;
        }
    }

    if min_dist == F::max_value() {
        // Every edge was degenerate: all vertices of both polygons coincide.
        return CollisionResult::separated();
    }

    let d = p1.center() - p2.center();
    if d.dot(mtv_axis) < F::zero() {
        mtv_axis = -mtv_axis;
    }

    CollisionResult {
        collision: true,
        move_axis: mtv_axis * min_dist,
    }
}

/// Projects every vertex on `axis`, returning the (min, max) interval.
fn project<F: Float>(axis: Vec2<F>, polygon: &Polygon<F>) -> (F, F) {
    let mut min = F::max_value();
    let mut max = F::min_value();
    for v in &polygon.vertices {
        let dp = axis.dot(v.to_vec());
        min = min.min(dp);
        max = max.max(dp);
    }
    (min, max)
}

/// Signed gap between two intervals: positive when they are disjoint.
#[inline]
fn interval_distance<F: Float>(min_a: F, max_a: F, min_b: F, max_b: F) -> F {
    if min_a < min_b {
        min_b - max_a
    } else {
        min_a - max_b
    }
}
