//! tilecollide - 2D collision for polygons and transformed tile maps
//!
//! Convex polygons are tested against each other with the separating axis
//! theorem and against segments with ray casts. Tile maps expose their
//! collision polygons in world space through an affine transformation,
//! computing each tile lazily and caching it until the transformation
//! changes.
//!
//! # Example
//!
//! ```
//! use tilecollide::tilemap::{EditableTileMap, TileDefinition, TransformedCollisionTileMap};
//! use tilecollide::{collision_test, Point2, Polygon};
//!
//! let mut map = EditableTileMap::new(16.0_f64, 16.0, 4, 4);
//! map.add_tile_definition(
//!     1,
//!     TileDefinition::with_hit_box(
//!         "solid",
//!         vec![
//!             Point2::new(0.0, 0.0),
//!             Point2::new(16.0, 0.0),
//!             Point2::new(16.0, 16.0),
//!             Point2::new(0.0, 16.0),
//!         ],
//!     ),
//! );
//! map.add_tile_layer(0).set_tile(2, 1, 1);
//!
//! let collision_map = TransformedCollisionTileMap::new(&map)?;
//! let player = Polygon::rectangle(28.0, 20.0, 8.0, 8.0);
//!
//! let pushes: Vec<_> = collision_map
//!     .hitboxes_around("solid", 28.0, 20.0, 36.0, 28.0)
//!     .map(|wall| collision_test(&player, &wall, true))
//!     .filter(|result| result.collision)
//!     .map(|result| result.move_axis)
//!     .collect();
//!
//! assert_eq!(pushes.len(), 1);
//! assert_eq!(pushes[0].x, -4.0);
//! # Ok::<(), tilecollide::CollisionError>(())
//! ```

pub mod bounds;
pub mod error;
pub mod polygon;
pub mod primitives;
pub mod tilemap;

pub use error::CollisionError;
pub use polygon::{collision_test, raycast_test, CollisionResult, Polygon, RaycastResult};
pub use primitives::{Affine2, Point2, Segment2, Vec2};
pub use tilemap::{TileDefinition, TransformedCollisionTileMap};
