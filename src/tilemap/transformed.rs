//! World-space collision masks of a tile map under an affine transformation.

use super::definition::TileDefinition;
use super::iter::{cell_span, layer_hitboxes, HitBox, TileFrame, TileRange};
use super::source::{count_to_float, TileLayerSource, TileMapSource};
use crate::bounds::Aabb2;
use crate::error::CollisionError;
use crate::polygon::Polygon;
use crate::primitives::{Affine2, Point2};
use num_traits::Float;
use std::cell::{Cell, Ref, RefCell};
use tracing::{debug, trace};

/// Cached world-space polygons of one cell.
///
/// The polygon buffers are sized from the tile definition once, at
/// construction. Recomputing overwrites their vertices in place.
#[derive(Debug)]
pub struct TransformedCollisionTile<F> {
    x: usize,
    y: usize,
    up_to_date_count: Cell<u64>,
    hit_boxes: RefCell<Vec<Polygon<F>>>,
}

impl<F: Float> TransformedCollisionTile<F> {
    fn new(x: usize, y: usize, definition: Option<&TileDefinition<F>>) -> Self {
        let hit_boxes = definition
            .map(|d| d.all_polygons().map(|p| Polygon::zeroed(p.len())).collect())
            .unwrap_or_default();
        Self {
            x,
            y,
            up_to_date_count: Cell::new(0),
            hit_boxes: RefCell::new(hit_boxes),
        }
    }

    /// Column of the tile.
    pub fn x(&self) -> usize {
        self.x
    }

    /// Row of the tile.
    pub fn y(&self) -> usize {
        self.y
    }

    /// Version of the map transformation the cached polygons were computed
    /// with. `0` until the tile is first queried.
    pub fn up_to_date_count(&self) -> u64 {
        self.up_to_date_count.get()
    }

    /// Number of cached polygons, all tags included.
    pub fn polygon_count(&self) -> usize {
        self.hit_boxes.borrow().len()
    }

    /// Returns the polygons of every tag, recomputing them first when the
    /// map transformation changed since the last call.
    pub(crate) fn hit_boxes<'a, S: TileMapSource<F>>(
        &'a self,
        frame: &TileFrame<'_, F, S>,
        definition: &TileDefinition<F>,
    ) -> Ref<'a, Vec<Polygon<F>>> {
        if self.up_to_date_count.get() != frame.version {
            self.update(frame, definition);
        }
        self.hit_boxes.borrow()
    }

    fn update<S: TileMapSource<F>>(
        &self,
        frame: &TileFrame<'_, F, S>,
        definition: &TileDefinition<F>,
    ) {
        // Versions only change through `&mut` access to the map, so no
        // borrow handed out under an older version can still be alive.
        let mut hit_boxes = self.hit_boxes.borrow_mut();

        let width = frame.source.tile_width();
        let height = frame.source.tile_height();
        let half_width = width / (F::one() + F::one());
        let half_height = height / (F::one() + F::one());

        let mut transformation = Affine2::identity();
        transformation.set_to_translation(
            width * count_to_float(self.x),
            height * count_to_float(self.y),
        );
        if frame.layer.is_flipped_horizontally(self.x, self.y) {
            transformation.flip_x(half_width);
        }
        if frame.layer.is_flipped_vertically(self.x, self.y) {
            transformation.flip_y(half_height);
        }
        if frame.layer.is_flipped_diagonally(self.x, self.y) {
            transformation.flip_diagonally(half_width, half_height);
        }
        transformation.pre_concatenate(frame.transformation);

        for (polygon, template) in hit_boxes.iter_mut().zip(definition.all_polygons()) {
            for (vertex, &local) in polygon.vertices.iter_mut().zip(template) {
                *vertex = transformation.apply_point(local);
            }
            polygon.compute_edges();
            polygon.compute_center();
        }

        self.up_to_date_count.set(frame.version);
        trace!(x = self.x, y = self.y, version = frame.version, "recomputed tile hitboxes");
    }
}

/// The tiles of one source layer, row-major.
#[derive(Debug)]
pub struct TransformedCollisionTileMapLayer<F> {
    id: u32,
    dimension_x: usize,
    dimension_y: usize,
    tiles: Vec<TransformedCollisionTile<F>>,
}

impl<F: Float> TransformedCollisionTileMapLayer<F> {
    fn new<S: TileMapSource<F>>(source: &S, layer: &S::Layer) -> Self {
        let dimension_x = layer.dimension_x();
        let dimension_y = layer.dimension_y();
        let tiles = TileRange::new(0, 0, dimension_x, dimension_y)
            .clamped(dimension_x, dimension_y)
            .into_iter()
            .flat_map(TileRange::cells)
            .map(|(x, y)| {
                let definition = layer.tile_id(x, y).and_then(|id| source.tile_definition(id));
                TransformedCollisionTile::new(x, y, definition)
            })
            .collect();
        Self {
            id: layer.id(),
            dimension_x,
            dimension_y,
            tiles,
        }
    }

    /// Identifier of the source layer.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Number of columns.
    pub fn dimension_x(&self) -> usize {
        self.dimension_x
    }

    /// Number of rows.
    pub fn dimension_y(&self) -> usize {
        self.dimension_y
    }

    /// The tile at a cell, or `None` outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<&TransformedCollisionTile<F>> {
        if x >= self.dimension_x || y >= self.dimension_y {
            return None;
        }
        self.tiles.get(y * self.dimension_x + x)
    }
}

/// A tile map seen through an affine transformation, answering collision
/// queries in world space.
///
/// The wrapper borrows its source and lays out one
/// [`TransformedCollisionTileMapLayer`] per source layer. Tile polygons are
/// only computed when a query reaches them, and at most once per
/// transformation change: changing the transformation bumps a version
/// counter and each tile compares it with the version of its cache.
///
/// Queries take `&self` and return lazy iterators of [`HitBox`] borrows, so
/// several queries can be walked at once. Changing the transformation takes
/// `&mut self`, which the borrow checker refuses while any hitbox is alive.
///
/// # Example
///
/// ```
/// use tilecollide::tilemap::{EditableTileMap, TileDefinition, TransformedCollisionTileMap};
/// use tilecollide::{Affine2, Point2, Vec2};
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
/// let mut collision_map = TransformedCollisionTileMap::new(&map)?;
/// let corners: Vec<_> = collision_map
///     .hitboxes_around("solid", 0.0, 0.0, 48.0, 48.0)
///     .map(|polygon| polygon.vertices[0])
///     .collect();
/// assert_eq!(corners, vec![Point2::new(16.0, 16.0)]);
///
/// collision_map.set_transformation(Affine2::translation(Vec2::new(100.0, 0.0)))?;
/// let moved = collision_map.hitboxes_around("solid", 100.0, 0.0, 148.0, 48.0).count();
/// assert_eq!(moved, 1);
/// # Ok::<(), tilecollide::CollisionError>(())
/// ```
#[derive(Debug)]
pub struct TransformedCollisionTileMap<'s, F: Float, S> {
    source: &'s S,
    layers: Vec<TransformedCollisionTileMapLayer<F>>,
    transformation: Affine2<F>,
    inverse_transformation: Affine2<F>,
    up_to_date_count: u64,
}

impl<'s, F: Float, S: TileMapSource<F>> TransformedCollisionTileMap<'s, F, S> {
    /// Wraps a source map with the identity transformation.
    ///
    /// Fails with [`CollisionError::InvalidTileSize`] if the tile size is not
    /// finite and strictly positive.
    pub fn new(source: &'s S) -> Result<Self, CollisionError> {
        Self::with_transformation(source, Affine2::identity())
    }

    /// Wraps a source map with an initial transformation.
    pub fn with_transformation(
        source: &'s S,
        transformation: Affine2<F>,
    ) -> Result<Self, CollisionError> {
        let tile_width = source.tile_width();
        let tile_height = source.tile_height();
        let valid = |size: F| size.is_finite() && size > F::zero();
        if !valid(tile_width) || !valid(tile_height) {
            return Err(CollisionError::InvalidTileSize {
                width: tile_width.to_f64().unwrap_or(f64::NAN),
                height: tile_height.to_f64().unwrap_or(f64::NAN),
            });
        }
        let inverse_transformation = transformation
            .inverse()
            .ok_or(CollisionError::SingularTransformation)?;

        let layers: Vec<_> = source
            .layers()
            .iter()
            .map(|layer| TransformedCollisionTileMapLayer::new(source, layer))
            .collect();
        debug!(
            layers = layers.len(),
            dimension_x = source.dimension_x(),
            dimension_y = source.dimension_y(),
            "created transformed collision tile map"
        );

        Ok(Self {
            source,
            layers,
            transformation,
            inverse_transformation,
            up_to_date_count: 1,
        })
    }

    /// The source map.
    pub fn source(&self) -> &'s S {
        self.source
    }

    /// The transformation from tile map space to world space.
    pub fn transformation(&self) -> &Affine2<F> {
        &self.transformation
    }

    /// The transformation from world space to tile map space.
    pub fn inverse_transformation(&self) -> &Affine2<F> {
        &self.inverse_transformation
    }

    /// Replaces the transformation and invalidates every cached polygon.
    ///
    /// A singular transformation is rejected and the current one kept.
    pub fn set_transformation(&mut self, transformation: Affine2<F>) -> Result<(), CollisionError> {
        let inverse = transformation
            .inverse()
            .ok_or(CollisionError::SingularTransformation)?;
        self.transformation = transformation;
        self.inverse_transformation = inverse;
        self.invalidate();
        debug!(version = self.up_to_date_count, "changed tile map transformation");
        Ok(())
    }

    /// Marks every cached polygon as stale. Runs in constant time.
    pub fn invalidate(&mut self) {
        // Zero is the stamp of tiles that were never computed.
        self.up_to_date_count = self.up_to_date_count.wrapping_add(1).max(1);
        trace!(version = self.up_to_date_count, "invalidated tile hitboxes");
    }

    /// Current version of the transformation.
    pub fn up_to_date_count(&self) -> u64 {
        self.up_to_date_count
    }

    /// Map width in pixels, before transformation.
    pub fn width(&self) -> F {
        self.source.width()
    }

    /// Map height in pixels, before transformation.
    pub fn height(&self) -> F {
        self.source.height()
    }

    /// Tile width in pixels, before transformation.
    pub fn tile_width(&self) -> F {
        self.source.tile_width()
    }

    /// Tile height in pixels, before transformation.
    pub fn tile_height(&self) -> F {
        self.source.tile_height()
    }

    /// Number of columns.
    pub fn dimension_x(&self) -> usize {
        self.source.dimension_x()
    }

    /// Number of rows.
    pub fn dimension_y(&self) -> usize {
        self.source.dimension_y()
    }

    /// Looks up the collision template of a tile id.
    pub fn tile_definition(&self, id: u32) -> Option<&'s TileDefinition<F>> {
        self.source.tile_definition(id)
    }

    /// The layers, in source order.
    pub fn layers(&self) -> &[TransformedCollisionTileMapLayer<F>] {
        &self.layers
    }

    /// Finds a layer by id.
    pub fn layer(&self, id: u32) -> Option<&TransformedCollisionTileMapLayer<F>> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// The tile at a cell of a layer.
    pub fn tile(&self, layer_id: u32, x: usize, y: usize) -> Option<&TransformedCollisionTile<F>> {
        self.layer(layer_id)?.get(x, y)
    }

    /// Up-to-date world-space polygons of one cell, all tags included.
    ///
    /// `None` for an empty cell, an unknown layer or a cell outside the grid.
    pub fn tile_hit_boxes(
        &self,
        layer_id: u32,
        x: usize,
        y: usize,
    ) -> Option<Ref<'_, [Polygon<F>]>> {
        let index = self.layers.iter().position(|l| l.id == layer_id)?;
        let frame = self.frame(index)?;
        let tile = self.layers[index].get(x, y)?;
        let definition = frame.definition_at(x, y)?;
        Some(Ref::map(tile.hit_boxes(&frame, definition), Vec::as_slice))
    }

    /// Returns `true` if the world-space point lies on a tile carrying `tag`.
    ///
    /// The point is mapped back to tile map space and tested against tile
    /// squares, not hitbox polygons.
    pub fn point_is_inside_tile(&self, x: F, y: F, tag: &str) -> bool {
        let local = self.inverse_transformation.apply_point(Point2::new(x, y));
        self.source.point_is_inside_tile(local.x, local.y, tag)
    }

    /// Range of cells that may intersect a world-space rectangle.
    ///
    /// All four corners are mapped back to tile map space, since a rotation
    /// does not keep the rectangle axis-aligned. `None` when the rectangle
    /// misses the grid.
    pub fn tile_range_around(&self, left: F, top: F, right: F, bottom: F) -> Option<TileRange> {
        let bounds =
            Aabb2::from_ltrb(left, top, right, bottom).transformed(&self.inverse_transformation);
        let (x_min, x_max) =
            cell_span(bounds.min.x, bounds.max.x, self.tile_width(), self.dimension_x())?;
        let (y_min, y_max) =
            cell_span(bounds.min.y, bounds.max.y, self.tile_height(), self.dimension_y())?;
        Some(TileRange::new(x_min, y_min, x_max, y_max))
    }

    /// Polygons tagged `tag` that may intersect a world-space rectangle.
    ///
    /// The result contains at least every such polygon. Whole tiles are
    /// selected, so polygons outside the rectangle may be returned too.
    pub fn hitboxes_around<'a>(
        &'a self,
        tag: &'a str,
        left: F,
        top: F,
        right: F,
        bottom: F,
    ) -> impl Iterator<Item = HitBox<'a, F>> + 'a {
        self.hitboxes_in(tag, self.tile_range_around(left, top, right, bottom))
    }

    /// Polygons tagged `tag` of every tile in an inclusive cell range.
    ///
    /// The range is clamped to the grid.
    pub fn hitboxes<'a>(
        &'a self,
        tag: &'a str,
        x_min: usize,
        y_min: usize,
        x_max: usize,
        y_max: usize,
    ) -> impl Iterator<Item = HitBox<'a, F>> + 'a {
        let range = TileRange::new(x_min, y_min, x_max, y_max)
            .clamped(self.dimension_x(), self.dimension_y());
        self.hitboxes_in(tag, range)
    }

    /// Polygons tagged `tag` over the whole map.
    pub fn all_hitboxes<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = HitBox<'a, F>> + 'a {
        self.hitboxes(tag, 0, 0, usize::MAX, usize::MAX)
    }

    /// Polygons tagged `tag` of one layer in an inclusive cell range.
    pub fn layer_hitboxes<'a>(
        &'a self,
        layer_id: u32,
        tag: &'a str,
        range: TileRange,
    ) -> Result<impl Iterator<Item = HitBox<'a, F>> + 'a, CollisionError> {
        let index = self
            .layers
            .iter()
            .position(|l| l.id == layer_id)
            .ok_or(CollisionError::UnknownLayer(layer_id))?;
        let layer = &self.layers[index];
        let frame = self.frame(index);
        let range = range.clamped(layer.dimension_x, layer.dimension_y);
        Ok(frame
            .zip(range)
            .into_iter()
            .flat_map(move |(frame, range)| layer_hitboxes(layer, frame, tag, range)))
    }

    fn hitboxes_in<'a>(
        &'a self,
        tag: &'a str,
        range: Option<TileRange>,
    ) -> impl Iterator<Item = HitBox<'a, F>> + 'a {
        range.into_iter().flat_map(move |range| {
            self.layers
                .iter()
                .zip(self.source.layers())
                .flat_map(move |(layer, source_layer)| {
                    let frame = TileFrame {
                        source: self.source,
                        layer: source_layer,
                        transformation: &self.transformation,
                        version: self.up_to_date_count,
                    };
                    layer_hitboxes(layer, frame, tag, range)
                })
        })
    }

    fn frame(&self, index: usize) -> Option<TileFrame<'_, F, S>> {
        Some(TileFrame {
            source: self.source,
            layer: self.source.layers().get(index)?,
            transformation: &self.transformation,
            version: self.up_to_date_count,
        })
    }
}
