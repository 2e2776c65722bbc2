//! Polygon collision primitives.
//!
//! This module provides:
//! - A polygon type with cached edges and center, reusable in place
//! - Point containment testing (even-odd rule)
//! - Convex polygon collision with the separating axis theorem,
//!   including the minimum translation vector
//! - Segment casts against polygon edges
//!
//! # Example
//!
//! ```
//! use tilecollide::polygon::{collision_test, Polygon};
//!
//! let player: Polygon<f64> = Polygon::rectangle(0.0, 0.0, 10.0, 10.0);
//! let mut wall = Polygon::rectangle(9.0, 0.0, 10.0, 10.0);
//!
//! let result = collision_test(&player, &wall, false);
//! assert!(result.collision);
//!
//! wall.move_by(result.move_axis * -1.0);
//! assert!(!collision_test(&player, &wall, true).collision);
//! ```

mod core;
mod raycast;
mod sat;

pub use core::{polygon_contains, polygon_is_convex, Polygon};
pub use raycast::{
    raycast_test, raycast_test_with_tolerance, RaycastResult, RAYCAST_COLLINEAR_EPSILON,
};
pub use sat::{collision_test, CollisionResult};
