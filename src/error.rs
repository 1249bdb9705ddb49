use thiserror::Error;

use crate::intersect::ShapeId;

/// Errors raised while building or shading a scene.
#[derive(Debug, Error)]
pub enum Error {
    /// A matrix with a zero determinant was inverted. Raised when a singular
    /// transform is assigned to a shape, pattern or camera.
    #[error("matrix is not invertible")]
    NotInvertible,

    #[error("invalid material: {property} cannot be {value}")]
    InvalidMaterial { property: &'static str, value: f64 },

    /// Shading and shadow tests need a light.
    #[error("world has no light source")]
    MissingLightSource,

    #[error("intersection refers to unknown shape {0:?}")]
    UnknownShape(ShapeId),

    #[error("pixel ({x}, {y}) lies outside a buffer of {len} bytes")]
    PixelOutOfBounds { x: usize, y: usize, len: usize },

    #[error("invalid scene description: {0}")]
    Scene(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
