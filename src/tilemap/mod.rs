//! Tile map collision masks.
//!
//! This module provides:
//! - Source traits describing a tile map and its layers
//! - Tile definitions holding tagged collision polygons
//! - An in-memory tile map implementing the source traits
//! - A transformed view of a source map whose tile polygons are computed
//!   lazily and cached until the transformation changes
//!
//! Polygons of a tile definition are in tile-local coordinates. Each cell
//! places them with its column and row, then its horizontal, vertical and
//! diagonal flips (in that order), then the map transformation.

mod definition;
mod iter;
mod model;
mod source;
mod transformed;

pub use definition::{TaggedHitBoxes, TileDefinition};
pub use iter::{HitBox, TileRange};
pub use model::{EditableTileMap, EditableTileMapLayer, TileCell};
pub use source::{TileLayerSource, TileMapSource};
pub use transformed::{
    TransformedCollisionTile, TransformedCollisionTileMap, TransformedCollisionTileMapLayer,
};
