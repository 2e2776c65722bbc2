//! Tile definitions: the tagged collision polygons of a tile type.

use crate::primitives::Point2;
use num_traits::Float;
use std::ops::Range;

/// Collision polygons sharing one tag.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaggedHitBoxes<F> {
    /// The tag used to filter collision layers (e.g. `"solid"`).
    pub tag: String,
    /// Polygons in tile-local, unscaled coordinates.
    pub polygons: Vec<Vec<Point2<F>>>,
    /// `true` when the polygons cover the whole tile.
    pub has_full_hit_box: bool,
}

/// The collision template of a tile type from a tile set.
///
/// A tile usually has at most a few tags, so they are stored in a small
/// vector and looked up linearly.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileDefinition<F> {
    tagged_hit_boxes: Vec<TaggedHitBoxes<F>>,
}

impl<F: Float> TileDefinition<F> {
    /// Creates a definition without any hitbox.
    pub fn new() -> Self {
        Self {
            tagged_hit_boxes: Vec::new(),
        }
    }

    /// Creates a definition with one tagged polygon.
    pub fn with_hit_box(tag: &str, polygon: Vec<Point2<F>>) -> Self {
        let mut definition = Self::new();
        definition.add_hit_box(tag, polygon, false);
        definition
    }

    /// Adds a collision polygon under `tag`.
    ///
    /// `has_full_hit_box` marks the tag as covering the whole tile; once set
    /// it stays set.
    pub fn add_hit_box(&mut self, tag: &str, polygon: Vec<Point2<F>>, has_full_hit_box: bool) {
        let index = match self.tagged_hit_boxes.iter().position(|h| h.tag == tag) {
            Some(index) => index,
            None => {
                self.tagged_hit_boxes.push(TaggedHitBoxes {
                    tag: tag.to_owned(),
                    polygons: Vec::new(),
                    has_full_hit_box: false,
                });
                self.tagged_hit_boxes.len() - 1
            }
        };
        let tagged = &mut self.tagged_hit_boxes[index];
        tagged.has_full_hit_box |= has_full_hit_box;
        tagged.polygons.push(polygon);
    }

    /// Returns `true` if this tile has any polygon with the given tag.
    pub fn has_tagged_hit_box(&self, tag: &str) -> bool {
        self.tagged_hit_boxes.iter().any(|h| h.tag == tag)
    }

    /// Returns the polygons of the given tag, in tile-local coordinates.
    pub fn hit_boxes(&self, tag: &str) -> Option<&[Vec<Point2<F>>]> {
        self.tagged_hit_boxes
            .iter()
            .find(|h| h.tag == tag)
            .map(|h| h.polygons.as_slice())
    }

    /// Returns `true` if the hitboxes of the given tag cover the whole tile.
    pub fn has_full_hit_box(&self, tag: &str) -> bool {
        self.tagged_hit_boxes
            .iter()
            .any(|h| h.tag == tag && h.has_full_hit_box)
    }

    /// Iterates over the tags of this tile, in insertion order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tagged_hit_boxes.iter().map(|h| h.tag.as_str())
    }

    /// Iterates over the tagged groups, in insertion order.
    pub fn tagged_hit_boxes(&self) -> &[TaggedHitBoxes<F>] {
        &self.tagged_hit_boxes
    }

    /// Total number of polygons over all tags.
    pub fn polygon_count(&self) -> usize {
        self.tagged_hit_boxes.iter().map(|h| h.polygons.len()).sum()
    }

    /// Iterates over the polygons of every tag, group after group.
    pub(crate) fn all_polygons(&self) -> impl Iterator<Item = &[Point2<F>]> {
        self.tagged_hit_boxes
            .iter()
            .flat_map(|h| h.polygons.iter().map(Vec::as_slice))
    }

    /// Index range of the given tag's polygons in [`Self::all_polygons`].
    pub(crate) fn hit_box_range(&self, tag: &str) -> Option<Range<usize>> {
        let mut start = 0;
        for tagged in &self.tagged_hit_boxes {
            let end = start + tagged.polygons.len();
            if tagged.tag == tag {
                return Some(start..end);
            }
            start = end;
        }
        None
    }
}

impl<F: Float> Default for TileDefinition<F> {
    fn default() -> Self {
        Self::new()
    }
}
