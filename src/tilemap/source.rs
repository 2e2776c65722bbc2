//! Read-only tile map data consumed by the collision wrapper.

use super::definition::TileDefinition;
use num_traits::Float;

/// One grid of tile ids with per-cell orientation flags.
pub trait TileLayerSource {
    /// Identifier of the layer, unique within its map.
    fn id(&self) -> u32;

    /// Number of columns.
    fn dimension_x(&self) -> usize;

    /// Number of rows.
    fn dimension_y(&self) -> usize;

    /// Tile id at a cell, or `None` for an empty or out-of-range cell.
    fn tile_id(&self, x: usize, y: usize) -> Option<u32>;

    /// Returns `true` if the tile at a cell is mirrored horizontally.
    fn is_flipped_horizontally(&self, x: usize, y: usize) -> bool;

    /// Returns `true` if the tile at a cell is mirrored vertically.
    fn is_flipped_vertically(&self, x: usize, y: usize) -> bool;

    /// Returns `true` if the tile at a cell has its axes swapped.
    fn is_flipped_diagonally(&self, x: usize, y: usize) -> bool;
}

/// A tile map: a tile set shared by several layers of the same grid size.
///
/// Coordinates are in tile-local map space, before any transformation:
/// cell `(x, y)` covers `[x * tile_width, (x + 1) * tile_width)` horizontally.
pub trait TileMapSource<F: Float> {
    /// The layer type of this map.
    type Layer: TileLayerSource;

    /// Width of a tile in pixels.
    fn tile_width(&self) -> F;

    /// Height of a tile in pixels.
    fn tile_height(&self) -> F;

    /// Number of columns.
    fn dimension_x(&self) -> usize;

    /// Number of rows.
    fn dimension_y(&self) -> usize;

    /// Looks up the collision template of a tile id.
    fn tile_definition(&self, id: u32) -> Option<&TileDefinition<F>>;

    /// The layers, in drawing order.
    fn layers(&self) -> &[Self::Layer];

    /// Map width in pixels.
    fn width(&self) -> F {
        count_to_float::<F>(self.dimension_x()) * self.tile_width()
    }

    /// Map height in pixels.
    fn height(&self) -> F {
        count_to_float::<F>(self.dimension_y()) * self.tile_height()
    }

    /// Returns `true` if the point lies in a cell holding a tile with `tag`
    /// on any layer.
    ///
    /// Only the tile square is tested, not its hitbox polygons.
    fn point_is_inside_tile(&self, x: F, y: F, tag: &str) -> bool {
        let (Some(column), Some(row)) = (
            cell_index(x, self.tile_width()),
            cell_index(y, self.tile_height()),
        ) else {
            return false;
        };
        self.layers().iter().any(|layer| {
            layer
                .tile_id(column, row)
                .and_then(|id| self.tile_definition(id))
                .is_some_and(|definition| definition.has_tagged_hit_box(tag))
        })
    }
}

/// Converts a cell count to a float, saturating to the float's maximum.
pub(crate) fn count_to_float<F: Float>(count: usize) -> F {
    F::from(count).unwrap_or_else(F::max_value)
}

/// Index of the cell containing `coordinate`, or `None` when it falls before
/// the first cell or is not a number.
pub(crate) fn cell_index<F: Float>(coordinate: F, cell_size: F) -> Option<usize> {
    let index = (coordinate / cell_size).floor();
    if index < F::zero() {
        return None;
    }
    index.to_usize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_index() {
        assert_eq!(cell_index(0.0_f64, 16.0), Some(0));
        assert_eq!(cell_index(15.9_f64, 16.0), Some(0));
        assert_eq!(cell_index(16.0_f64, 16.0), Some(1));
        assert_eq!(cell_index(47.5_f32, 16.0), Some(2));
    }

    #[test]
    fn test_cell_index_rejects_negative_and_nan() {
        assert_eq!(cell_index(-0.5_f64, 16.0), None);
        assert_eq!(cell_index(f64::NAN, 16.0), None);
        assert_eq!(cell_index(f64::NEG_INFINITY, 16.0), None);
    }

    #[test]
    fn test_count_to_float() {
        assert_eq!(count_to_float::<f64>(12), 12.0);
        assert_eq!(count_to_float::<f32>(0), 0.0);
    }
}
