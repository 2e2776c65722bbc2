//! Segment casts against polygon edges.

use super::core::Polygon;
use crate::primitives::{Point2, Segment2};
use num_traits::Float;

/// Default tolerance of [`raycast_test`] for parallel and collinear edges.
///
/// Compared against raw cross products, so it assumes pixel-scale
/// coordinates. Use [`raycast_test_with_tolerance`] for other scales.
pub const RAYCAST_COLLINEAR_EPSILON: f64 = 1e-4;

/// Result of a ray cast against a polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastResult<F> {
    /// `true` if the segment touches at least one edge.
    pub collision: bool,
    /// Intersection closest to the ray start.
    pub close: Point2<F>,
    /// Squared distance from the ray start to `close`.
    pub close_sq_dist: F,
    /// Intersection farthest from the ray start.
    pub far: Point2<F>,
    /// Squared distance from the ray start to `far`.
    pub far_sq_dist: F,
}

impl<F: Float> RaycastResult<F> {
    /// A miss: no intersection, both points at the ray start.
    fn miss(start: Point2<F>) -> Self {
        Self {
            collision: false,
            close: start,
            close_sq_dist: F::zero(),
            far: start,
            far_sq_dist: F::zero(),
        }
    }

    /// Records an intersection, keeping the closest and farthest ones.
    fn record(&mut self, point: Point2<F>, sq_dist: F) {
        if !self.collision {
            self.collision = true;
            self.close = point;
            self.close_sq_dist = sq_dist;
            self.far = point;
            self.far_sq_dist = sq_dist;
            return;
        }
        if sq_dist < self.close_sq_dist {
            self.close = point;
            self.close_sq_dist = sq_dist;
        }
        if sq_dist > self.far_sq_dist {
            self.far = point;
            self.far_sq_dist = sq_dist;
        }
    }
}

/// Casts the segment from `start` to `end` against every edge of `polygon`.
///
/// Uses [`RAYCAST_COLLINEAR_EPSILON`] to detect edges collinear with the ray.
///
/// # Example
///
/// ```
/// use tilecollide::polygon::{raycast_test, Polygon};
/// use tilecollide::Point2;
///
/// let square: Polygon<f64> = Polygon::rectangle(10.0, -5.0, 10.0, 10.0);
/// let hit = raycast_test(&square, Point2::new(0.0, 0.0), Point2::new(30.0, 0.0));
///
/// assert!(hit.collision);
/// assert_eq!(hit.close, Point2::new(10.0, 0.0));
/// assert_eq!(hit.far, Point2::new(20.0, 0.0));
/// ```
pub fn raycast_test<F: Float>(
    polygon: &Polygon<F>,
    start: Point2<F>,
    end: Point2<F>,
) -> RaycastResult<F> {
    let eps = F::from(RAYCAST_COLLINEAR_EPSILON).unwrap_or_else(F::epsilon);
    raycast_test_with_tolerance(polygon, start, end, eps)
}

/// Casts the segment from `start` to `end` against every edge of `polygon`.
///
/// Each edge falls in one of three cases:
/// - collinear with the ray (both cross products within `eps`): the ray and
///   the edge are projected on the ray direction and the bounds of their
///   overlap are intersections. A zero-length ray hits when its start lies
///   on the edge.
/// - crossing the ray at a single point with both segment parameters in
///   `[0, 1]`: that point is an intersection.
/// - otherwise the edge is ignored.
///
/// `close` and `far` are the intersections of minimal and maximal squared
/// distance from `start` over all edges, whatever the edge order. With a
/// convex polygon there are at most two distinct crossings. Non-convex
/// polygons are accepted: the extremes are still global ones.
///
/// The polygon's cached edges must be up to date.
pub fn raycast_test_with_tolerance<F: Float>(
    polygon: &Polygon<F>,
    start: Point2<F>,
    end: Point2<F>,
    eps: F,
) -> RaycastResult<F> {
    let mut result = RaycastResult::miss(start);
    if polygon.len() < 2 {
        return result;
    }
    debug_assert_eq!(polygon.edges().len(), polygon.len(), "stale polygon edges");

    let ray = Segment2::new(start, end);
    let r = ray.direction();

    for (&q, &s) in polygon.vertices.iter().zip(polygon.edges()) {
        let qp = q - start;
        let cross_rs = r.cross(s);
        let cross_qp_r = qp.cross(r);

        if cross_rs.abs() <= eps && cross_qp_r.abs() <= eps {
            if ray.is_point() {
                let edge = Segment2::new(q, q + s);
                if edge.distance_squared_to_point(start) <= eps * eps {
                    result.record(start, F::zero());
                }
                continue;
            }

            // Work in distances along the ray direction.
            let axis = r.normalized_or_self();
            let ray_len = axis.dot(r);
            let edge_a = axis.dot(qp);
            let edge_b = axis.dot(qp + s);
            let lo = edge_a.min(edge_b).max(F::zero());
            let hi = edge_a.max(edge_b).min(ray_len);
            if lo <= hi {
                result.record(start + axis * lo, lo * lo);
                result.record(start + axis * hi, hi * hi);
            }
            continue;
        }

        if cross_rs == F::zero() {
            // Parallel, not collinear.
            continue;
        }

        let t = qp.cross(s) / cross_rs;
        let u = cross_qp_r / cross_rs;
        if t >= F::zero() && t <= F::one() && u >= F::zero() && u <= F::one() {
            let point = ray.point_at(t);
            result.record(point, start.distance_squared(point));
        }
    }

    result
}
