//! Error types for collision operations.

use thiserror::Error;

/// Errors that can occur while building or updating collision data.
///
/// Queries never fail: out-of-range areas, missing tile definitions and
/// unknown tags all degrade to empty results.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CollisionError {
    /// The transformation collapses the plane and cannot be inverted.
    #[error("transformation is singular and cannot be inverted")]
    SingularTransformation,

    /// Tiles must have a finite, strictly positive size.
    #[error("invalid tile size {width}x{height}")]
    InvalidTileSize {
        /// Tile width in pixels.
        width: f64,
        /// Tile height in pixels.
        height: f64,
    },

    /// No tile layer has this identifier.
    #[error("unknown tile layer {0}")]
    UnknownLayer(u32),
}
