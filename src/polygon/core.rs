//! Core polygon type with cached edges and center.

use crate::bounds::Aabb2;
use crate::primitives::{Point2, Vec2};
use num_traits::Float;

/// A polygon represented as a sequence of vertices.
///
/// The polygon is implicitly closed (the last vertex connects to the first).
/// Edges and center are caches derived from the vertices. Vertex arrays are
/// meant to be reused: callers that write to `vertices` in place must call
/// [`Polygon::compute_edges`] and [`Polygon::compute_center`] before handing
/// the polygon to [`collision_test`](super::collision_test) or
/// [`raycast_test`](super::raycast_test).
///
/// Collision tests require convex polygons. Convexity is not checked at
/// runtime, see [`Polygon::is_convex`].
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon<F> {
    /// The vertices of the polygon.
    pub vertices: Vec<Point2<F>>,
    edges: Vec<Vec2<F>>,
    center: Point2<F>,
}

impl<F: Float> Polygon<F> {
    /// Creates a new polygon from vertices, computing its edges and center.
    pub fn new(vertices: Vec<Point2<F>>) -> Self {
        let mut polygon = Self {
            vertices,
            edges: Vec::new(),
            center: Point2::origin(),
        };
        polygon.compute_edges();
        polygon.compute_center();
        polygon
    }

    /// Creates a polygon of `len` vertices at the origin.
    ///
    /// Used to reserve storage that is overwritten later without allocating.
    pub fn zeroed(len: usize) -> Self {
        Self {
            vertices: vec![Point2::origin(); len],
            edges: vec![Vec2::zero(); len],
            center: Point2::origin(),
        }
    }

    /// Creates an axis-aligned rectangle from its top-left corner and size.
    pub fn rectangle(x: F, y: F, width: F, height: F) -> Self {
        Self::new(vec![
            Point2::new(x, y),
            Point2::new(x + width, y),
            Point2::new(x + width, y + height),
            Point2::new(x, y + height),
        ])
    }

    /// Returns true if the polygon has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Recomputes `edges[i] = vertices[i + 1] - vertices[i]` (cyclic).
    ///
    /// The edge buffer is resized in place, so recomputing a polygon whose
    /// vertex count did not change never allocates.
    pub fn compute_edges(&mut self) {
        let n = self.vertices.len();
        self.edges.resize(n, Vec2::zero());
        for i in 0..n {
            let next = if i + 1 < n { i + 1 } else { 0 };
            self.edges[i] = self.vertices[next] - self.vertices[i];
        }
    }

    /// Recomputes the center as the arithmetic mean of the vertices.
    pub fn compute_center(&mut self) -> Point2<F> {
        let mut sum = Vec2::zero();
        for v in &self.vertices {
            sum += v.to_vec();
        }
        let count = F::from(self.vertices.len()).unwrap_or_else(F::one);
        self.center = if self.vertices.is_empty() {
            Point2::origin()
        } else {
            Point2::origin() + sum / count
        };
        self.center
    }

    /// Returns the cached edges.
    #[inline]
    pub fn edges(&self) -> &[Vec2<F>] {
        &self.edges
    }

    /// Returns the cached center.
    #[inline]
    pub fn center(&self) -> Point2<F> {
        self.center
    }

    /// Translates every vertex, keeping the caches valid.
    pub fn move_by(&mut self, offset: Vec2<F>) {
        for v in &mut self.vertices {
            *v = *v + offset;
        }
        self.center = self.center + offset;
    }

    /// Tests if a point is inside the polygon.
    ///
    /// See [`polygon_contains`].
    #[inline]
    pub fn is_point_inside(&self, point: Point2<F>) -> bool {
        polygon_contains(&self.vertices, point)
    }

    /// Tests if the polygon is convex.
    pub fn is_convex(&self) -> bool {
        polygon_is_convex(&self.vertices)
    }

    /// Returns the bounding box, or `None` for an empty polygon.
    pub fn bounding_box(&self) -> Option<Aabb2<F>> {
        Aabb2::from_points(self.vertices.iter().copied())
    }
}

/// Tests if a point is inside a polygon using the crossing number
/// (even-odd) rule.
///
/// Works for non-convex polygons. Edges are half-open: a point lying on the
/// right or bottom border of an axis-aligned square is outside, a point on
/// the left or top border is inside.
pub fn polygon_contains<F: Float>(vertices: &[Point2<F>], point: Point2<F>) -> bool {
    if vertices.len() < 3 {
        return false;
    }

    let mut inside = false;
    let n = vertices.len();

    let mut j = n - 1;
    for i in 0..n {
        let vi = vertices[i];
        let vj = vertices[j];

        if ((vi.y > point.y) != (vj.y > point.y))
            && (point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x)
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Tests if a polygon is convex.
///
/// Returns true if all cross products of consecutive edges have the same sign.
pub fn polygon_is_convex<F: Float>(vertices: &[Point2<F>]) -> bool {
    if vertices.len() < 3 {
        return true; // Degenerate cases are considered convex
    }

    let n = vertices.len();
    let mut sign: Option<bool> = None;

    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        let c = vertices[(i + 2) % n];

        let cross = (b - a).cross(c - b);

        if cross.abs() > F::epsilon() {
            let is_positive = cross > F::zero();
            match sign {
                None => sign = Some(is_positive),
                Some(s) if s != is_positive => return false,
                _ => {}
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon<f64> {
        Polygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ])
    }

    #[test]
    fn test_new_computes_caches() {
        let poly = square();
        assert_eq!(poly.len(), 4);
        assert_eq!(
            poly.edges(),
            &[
                Vec2::new(10.0, 0.0),
                Vec2::new(0.0, 10.0),
                Vec2::new(-10.0, 0.0),
                Vec2::new(0.0, -10.0),
            ]
        );
        assert_eq!(poly.center(), Point2::new(5.0, 5.0));
    }

    #[test]
    fn test_rectangle_matches_explicit_square() {
        assert_eq!(Polygon::rectangle(0.0, 0.0, 10.0, 10.0), square());
    }

    #[test]
    fn test_compute_edges_reuses_buffer() {
        let mut poly = square();
        let capacity = poly.edges.capacity();
        let ptr = poly.edges.as_ptr();

        for v in &mut poly.vertices {
            v.x = v.x * 2.0;
        }
        poly.compute_edges();
        poly.compute_center();

        assert_eq!(poly.edges.as_ptr(), ptr);
        assert_eq!(poly.edges.capacity(), capacity);
        assert_eq!(poly.edges()[0], Vec2::new(20.0, 0.0));
        assert_eq!(poly.center(), Point2::new(10.0, 5.0));
    }

    #[test]
    fn test_zeroed_has_storage() {
        let poly: Polygon<f32> = Polygon::zeroed(3);
        assert_eq!(poly.len(), 3);
        assert_eq!(poly.edges().len(), 3);
        assert!(poly.vertices.iter().all(|v| *v == Point2::origin()));
    }

    #[test]
    fn test_empty_polygon() {
        let mut poly: Polygon<f64> = Polygon::new(Vec::new());
        assert!(poly.is_empty());
        assert_eq!(poly.compute_center(), Point2::origin());
        assert!(poly.bounding_box().is_none());
        assert!(!poly.is_point_inside(Point2::origin()));
    }

    #[test]
    fn test_move_by_keeps_caches_valid() {
        let mut poly = square();
        poly.move_by(Vec2::new(100.0, -5.0));

        let mut expected = Polygon::new(poly.vertices.clone());
        expected.compute_center();
        assert_eq!(poly.center(), expected.center());
        assert_eq!(poly.edges(), expected.edges());
        assert_eq!(poly.vertices[0], Point2::new(100.0, -5.0));
    }

    #[test]
    fn test_point_inside_square() {
        let poly = square();
        assert!(poly.is_point_inside(Point2::new(5.0, 5.0)));
        assert!(!poly.is_point_inside(Point2::new(15.0, 15.0)));
    }

    #[test]
    fn test_point_inside_half_open_edges() {
        let poly = square();
        // Right and bottom borders are outside, left and top ones inside.
        assert!(!poly.is_point_inside(Point2::new(10.0, 5.0)));
        assert!(!poly.is_point_inside(Point2::new(5.0, 10.0)));
        assert!(poly.is_point_inside(Point2::new(0.0, 5.0)));
        assert!(poly.is_point_inside(Point2::new(5.0, 0.0)));
    }

    #[test]
    fn test_point_inside_concave() {
        // L-shaped polygon
        let poly = Polygon::new(vec![
            Point2::new(0.0_f64, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 2.0),
            Point2::new(0.0, 2.0),
        ]);
        assert!(poly.is_point_inside(Point2::new(0.5, 1.5)));
        assert!(poly.is_point_inside(Point2::new(1.5, 0.5)));
        assert!(!poly.is_point_inside(Point2::new(1.5, 1.5)));
    }

    #[test]
    fn test_is_convex() {
        assert!(square().is_convex());

        let concave = Polygon::new(vec![
            Point2::new(0.0_f64, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 2.0),
            Point2::new(0.0, 2.0),
        ]);
        assert!(!concave.is_convex());
    }

    #[test]
    fn test_bounding_box() {
        let poly = Polygon::new(vec![
            Point2::new(1.0_f64, 2.0),
            Point2::new(3.0, 1.0),
            Point2::new(4.0, 3.0),
            Point2::new(2.0, 4.0),
        ]);
        let bounds = poly.bounding_box().unwrap();
        assert_eq!(bounds.min, Point2::new(1.0, 1.0));
        assert_eq!(bounds.max, Point2::new(4.0, 4.0));
    }
}
