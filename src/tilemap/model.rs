//! An in-memory tile map that can be filled by hand or by a loader.

use super::definition::TileDefinition;
use super::source::{TileLayerSource, TileMapSource};
use num_traits::Float;
use std::collections::HashMap;

/// Content of a non-empty cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileCell {
    /// Tile id in the tile set.
    pub id: u32,
    /// Mirrored around the vertical axis of the tile.
    pub flipped_horizontally: bool,
    /// Mirrored around the horizontal axis of the tile.
    pub flipped_vertically: bool,
    /// Axes swapped.
    pub flipped_diagonally: bool,
}

impl TileCell {
    /// A cell holding `id` without any flip.
    pub fn new(id: u32) -> Self {
        Self {
            id,
            flipped_horizontally: false,
            flipped_vertically: false,
            flipped_diagonally: false,
        }
    }
}

/// A grid of tiles stored row-major.
///
/// Writes outside the grid are ignored and reads outside it return nothing.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EditableTileMapLayer {
    id: u32,
    dimension_x: usize,
    dimension_y: usize,
    cells: Vec<Option<TileCell>>,
}

impl EditableTileMapLayer {
    /// Creates an empty layer.
    pub fn new(id: u32, dimension_x: usize, dimension_y: usize) -> Self {
        Self {
            id,
            dimension_x,
            dimension_y,
            cells: vec![None; dimension_x * dimension_y],
        }
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.dimension_x && y < self.dimension_y).then(|| y * self.dimension_x + x)
    }

    /// Puts a tile without flip at a cell.
    pub fn set_tile(&mut self, x: usize, y: usize, id: u32) {
        self.set_cell(x, y, TileCell::new(id));
    }

    /// Puts a tile at a cell, flags included.
    pub fn set_cell(&mut self, x: usize, y: usize, cell: TileCell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = Some(cell);
        }
    }

    /// Empties a cell.
    pub fn remove_tile(&mut self, x: usize, y: usize) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = None;
        }
    }

    /// Returns the content of a cell.
    pub fn cell(&self, x: usize, y: usize) -> Option<&TileCell> {
        self.index(x, y).and_then(|i| self.cells[i].as_ref())
    }

    fn cell_mut(&mut self, x: usize, y: usize) -> Option<&mut TileCell> {
        let i = self.index(x, y)?;
        self.cells[i].as_mut()
    }

    /// Sets the horizontal flip of a non-empty cell.
    pub fn set_flipped_horizontally(&mut self, x: usize, y: usize, flipped: bool) {
        if let Some(cell) = self.cell_mut(x, y) {
            cell.flipped_horizontally = flipped;
        }
    }

    /// Sets the vertical flip of a non-empty cell.
    pub fn set_flipped_vertically(&mut self, x: usize, y: usize, flipped: bool) {
        if let Some(cell) = self.cell_mut(x, y) {
            cell.flipped_vertically = flipped;
        }
    }

    /// Sets the diagonal flip of a non-empty cell.
    pub fn set_flipped_diagonally(&mut self, x: usize, y: usize, flipped: bool) {
        if let Some(cell) = self.cell_mut(x, y) {
            cell.flipped_diagonally = flipped;
        }
    }
}

impl TileLayerSource for EditableTileMapLayer {
    fn id(&self) -> u32 {
        self.id
    }

    fn dimension_x(&self) -> usize {
        self.dimension_x
    }

    fn dimension_y(&self) -> usize {
        self.dimension_y
    }

    fn tile_id(&self, x: usize, y: usize) -> Option<u32> {
        self.cell(x, y).map(|c| c.id)
    }

    fn is_flipped_horizontally(&self, x: usize, y: usize) -> bool {
        self.cell(x, y).is_some_and(|c| c.flipped_horizontally)
    }

    fn is_flipped_vertically(&self, x: usize, y: usize) -> bool {
        self.cell(x, y).is_some_and(|c| c.flipped_vertically)
    }

    fn is_flipped_diagonally(&self, x: usize, y: usize) -> bool {
        self.cell(x, y).is_some_and(|c| c.flipped_diagonally)
    }
}

/// A tile set plus layers of the same size.
///
/// # Example
///
/// ```
/// use tilecollide::tilemap::{EditableTileMap, TileDefinition, TileMapSource};
/// use tilecollide::Point2;
///
/// let mut map = EditableTileMap::new(16.0_f64, 16.0, 3, 3);
/// map.add_tile_definition(
///     1,
///     TileDefinition::with_hit_box(
///         "solid",
///         vec![
///             Point2::new(0.0, 0.0),
///             Point2::new(16.0, 0.0),
///             Point2::new(16.0, 16.0),
///             Point2::new(0.0, 16.0),
///         ],
///     ),
/// );
/// map.add_tile_layer(0).set_tile(1, 1, 1);
///
/// assert!(map.point_is_inside_tile(20.0, 20.0, "solid"));
/// assert!(!map.point_is_inside_tile(4.0, 4.0, "solid"));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EditableTileMap<F> {
    tile_width: F,
    tile_height: F,
    dimension_x: usize,
    dimension_y: usize,
    tile_set: HashMap<u32, TileDefinition<F>>,
    layers: Vec<EditableTileMapLayer>,
}

impl<F: Float> EditableTileMap<F> {
    /// Creates a map without tile definitions nor layers.
    pub fn new(tile_width: F, tile_height: F, dimension_x: usize, dimension_y: usize) -> Self {
        Self {
            tile_width,
            tile_height,
            dimension_x,
            dimension_y,
            tile_set: HashMap::new(),
            layers: Vec::new(),
        }
    }

    /// Registers the collision template of a tile id, replacing any previous one.
    pub fn add_tile_definition(&mut self, id: u32, definition: TileDefinition<F>) {
        self.tile_set.insert(id, definition);
    }

    /// Appends an empty layer sized like the map and returns it.
    pub fn add_tile_layer(&mut self, id: u32) -> &mut EditableTileMapLayer {
        self.layers
            .push(EditableTileMapLayer::new(id, self.dimension_x, self.dimension_y));
        let last = self.layers.len() - 1;
        &mut self.layers[last]
    }

    /// Finds a layer by id.
    pub fn tile_layer(&self, id: u32) -> Option<&EditableTileMapLayer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Finds a layer by id, for editing.
    pub fn tile_layer_mut(&mut self, id: u32) -> Option<&mut EditableTileMapLayer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }
}

impl<F: Float> TileMapSource<F> for EditableTileMap<F> {
    type Layer = EditableTileMapLayer;

    fn tile_width(&self) -> F {
        self.tile_width
    }

    fn tile_height(&self) -> F {
        self.tile_height
    }

    fn dimension_x(&self) -> usize {
        self.dimension_x
    }

    fn dimension_y(&self) -> usize {
        self.dimension_y
    }

    fn tile_definition(&self, id: u32) -> Option<&TileDefinition<F>> {
        self.tile_set.get(&id)
    }

    fn layers(&self) -> &[EditableTileMapLayer] {
        &self.layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Point2;

    fn square(size: f64) -> Vec<Point2<f64>> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(size, 0.0),
            Point2::new(size, size),
            Point2::new(0.0, size),
        ]
    }

    #[test]
    fn test_layer_cells() {
        let mut layer = EditableTileMapLayer::new(7, 4, 2);
        layer.set_tile(3, 1, 5);
        layer.set_flipped_vertically(3, 1, true);

        assert_eq!(layer.id(), 7);
        assert_eq!(layer.tile_id(3, 1), Some(5));
        assert_eq!(layer.tile_id(0, 0), None);
        assert!(layer.is_flipped_vertically(3, 1));
        assert!(!layer.is_flipped_horizontally(3, 1));

        layer.remove_tile(3, 1);
        assert_eq!(layer.tile_id(3, 1), None);
        assert!(!layer.is_flipped_vertically(3, 1));
    }

    #[test]
    fn test_layer_ignores_out_of_range() {
        let mut layer = EditableTileMapLayer::new(0, 2, 2);
        layer.set_tile(2, 0, 1);
        layer.set_tile(0, 2, 1);
        layer.set_flipped_diagonally(5, 5, true);

        assert_eq!(layer.tile_id(2, 0), None);
        assert!(layer.cells.iter().all(Option::is_none));
    }

    #[test]
    fn test_flip_on_empty_cell_is_ignored() {
        let mut layer = EditableTileMapLayer::new(0, 2, 2);
        layer.set_flipped_horizontally(1, 1, true);
        layer.set_tile(1, 1, 3);
        assert!(!layer.is_flipped_horizontally(1, 1));
    }

    #[test]
    fn test_map_dimensions() {
        let map: EditableTileMap<f64> = EditableTileMap::new(16.0, 8.0, 10, 4);
        assert_eq!(map.width(), 160.0);
        assert_eq!(map.height(), 32.0);
        assert!(map.layers().is_empty());
    }

    #[test]
    fn test_layers_by_id() {
        let mut map: EditableTileMap<f64> = EditableTileMap::new(16.0, 16.0, 2, 2);
        map.add_tile_layer(3);
        map.add_tile_layer(9).set_tile(0, 0, 1);

        assert_eq!(map.layers().len(), 2);
        assert_eq!(map.tile_layer(9).and_then(|l| l.tile_id(0, 0)), Some(1));
        assert!(map.tile_layer(4).is_none());

        if let Some(layer) = map.tile_layer_mut(3) {
            layer.set_tile(1, 1, 2);
        }
        assert_eq!(map.tile_layer(3).and_then(|l| l.tile_id(1, 1)), Some(2));
    }

    #[test]
    fn test_point_is_inside_tile() {
        let mut map = EditableTileMap::new(8.0, 8.0, 4, 4);
        map.add_tile_definition(1, TileDefinition::with_hit_box("obstacle", square(8.0)));
        map.add_tile_definition(2, TileDefinition::with_hit_box("ladder", square(8.0)));
        let layer = map.add_tile_layer(0);
        layer.set_tile(0, 0, 1);
        layer.set_tile(1, 1, 2);
        map.add_tile_layer(1).set_tile(1, 1, 1);

        assert!(map.point_is_inside_tile(4.0, 4.0, "obstacle"));
        assert!(!map.point_is_inside_tile(4.0, 4.0, "ladder"));
        // Any layer may provide the tag.
        assert!(map.point_is_inside_tile(12.0, 12.0, "obstacle"));
        assert!(map.point_is_inside_tile(12.0, 12.0, "ladder"));

        assert!(!map.point_is_inside_tile(20.0, 4.0, "obstacle"));
        assert!(!map.point_is_inside_tile(-1.0, 4.0, "obstacle"));
        assert!(!map.point_is_inside_tile(100.0, 4.0, "obstacle"));
    }

    #[test]
    fn test_missing_definition_has_no_tag() {
        let mut map: EditableTileMap<f64> = EditableTileMap::new(8.0, 8.0, 1, 1);
        map.add_tile_layer(0).set_tile(0, 0, 42);
        assert!(!map.point_is_inside_tile(1.0, 1.0, "obstacle"));
    }
}
