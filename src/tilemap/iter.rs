//! Lazy hitbox iteration over tile ranges.
//!
//! Iterators are plain adaptor chains: the cells of a range are walked row
//! by row, each matching tile is brought up to date on demand and its
//! polygons are flattened into the output. Nothing is collected on the way
//! and every iterator owns its own position.

use super::definition::TileDefinition;
use super::source::{TileLayerSource, TileMapSource};
use super::transformed::TransformedCollisionTileMapLayer;
use crate::polygon::Polygon;
use crate::primitives::Affine2;
use num_traits::Float;
use std::cell::Ref;

/// A world-space collision polygon borrowed from a tile cache.
///
/// The borrow keeps the owning map immutable: drop every `HitBox` before
/// changing the map's transformation.
pub type HitBox<'a, F> = Ref<'a, Polygon<F>>;

/// An inclusive rectangle of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileRange {
    /// First column.
    pub x_min: usize,
    /// First row.
    pub y_min: usize,
    /// Last column, included.
    pub x_max: usize,
    /// Last row, included.
    pub y_max: usize,
}

impl TileRange {
    /// Creates a range from its first and last cells, both included.
    pub fn new(x_min: usize, y_min: usize, x_max: usize, y_max: usize) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Returns `true` if the range has no cell.
    pub fn is_empty(&self) -> bool {
        self.x_min > self.x_max || self.y_min > self.y_max
    }

    /// Number of cells in the range.
    pub fn len(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        (self.x_max - self.x_min + 1) * (self.y_max - self.y_min + 1)
    }

    /// Restricts the range to a `dimension_x * dimension_y` grid.
    ///
    /// Returns `None` when nothing is left.
    pub fn clamped(self, dimension_x: usize, dimension_y: usize) -> Option<Self> {
        if dimension_x == 0 || dimension_y == 0 {
            return None;
        }
        let range = Self {
            x_max: self.x_max.min(dimension_x - 1),
            y_max: self.y_max.min(dimension_y - 1),
            ..self
        };
        (!range.is_empty()).then_some(range)
    }

    /// Cells of the range, rows first then columns.
    pub fn cells(self) -> impl Iterator<Item = (usize, usize)> {
        (self.y_min..=self.y_max)
            .flat_map(move |y| (self.x_min..=self.x_max).map(move |x| (x, y)))
    }
}

/// Inclusive span of cells covering `[min, max]` along one axis, clamped to
/// `[0, dimension)`. `None` when the span misses the grid or a bound is NaN.
pub(crate) fn cell_span<F: Float>(
    min: F,
    max: F,
    cell_size: F,
    dimension: usize,
) -> Option<(usize, usize)> {
    if dimension == 0 {
        return None;
    }
    let first = (min / cell_size).floor();
    let last = (max / cell_size).floor();
    if first.is_nan() || last.is_nan() || first > last || last < F::zero() {
        return None;
    }

    let last_index = dimension - 1;
    let first = if first <= F::zero() {
        0
    } else {
        first.to_usize().unwrap_or(usize::MAX)
    };
    if first > last_index {
        return None;
    }
    let last = last.to_usize().map_or(last_index, |last| last.min(last_index));
    Some((first, last))
}

/// What a tile needs to bring its polygons up to date.
pub(crate) struct TileFrame<'a, F: Float, S: TileMapSource<F>> {
    pub source: &'a S,
    pub layer: &'a S::Layer,
    pub transformation: &'a Affine2<F>,
    pub version: u64,
}

impl<F: Float, S: TileMapSource<F>> Clone for TileFrame<'_, F, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F: Float, S: TileMapSource<F>> Copy for TileFrame<'_, F, S> {}

impl<'a, F: Float, S: TileMapSource<F>> TileFrame<'a, F, S> {
    /// Definition of the tile at a cell of the frame's layer.
    pub fn definition_at(&self, x: usize, y: usize) -> Option<&'a TileDefinition<F>> {
        let id = self.layer.tile_id(x, y)?;
        self.source.tile_definition(id)
    }
}

/// Polygons tagged `tag` of every tile of `layer` within `range`.
pub(crate) fn layer_hitboxes<'a, F, S>(
    layer: &'a TransformedCollisionTileMapLayer<F>,
    frame: TileFrame<'a, F, S>,
    tag: &'a str,
    range: TileRange,
) -> impl Iterator<Item = HitBox<'a, F>> + 'a
where
    F: Float + 'a,
    S: TileMapSource<F> + 'a,
{
    range
        .cells()
        .filter_map(move |(x, y)| {
            let tile = layer.get(x, y)?;
            let definition = frame.definition_at(x, y)?;
            let indices = definition.hit_box_range(tag)?;
            Some((tile, definition, indices))
        })
        .flat_map(move |(tile, definition, indices)| {
            let polygons = tile.hit_boxes(&frame, definition);
            indices.filter_map(move |i| {
                Ref::filter_map(Ref::clone(&polygons), |p| p.get(i)).ok()
            })
        })
}
