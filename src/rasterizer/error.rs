//! Error type for the rendering pipeline

use thiserror::Error;

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Debug, Error)]
pub enum RenderError {
    /// Geometry that violates a stage precondition (zero-area, w <= 0, a clip
    /// edge that does not straddle the near plane)
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("invalid camera configuration: {0}")]
    InvalidCameraConfig(String),

    /// Vertex count not a multiple of 3, or attribute arrays of the wrong length
    #[error("malformed primitive: {0}")]
    MalformedPrimitive(String),

    /// Texel buffer whose length does not match the dimensions
    #[error("invalid texture: {0}")]
    InvalidTexture(String),

    #[error("failed to load texture {path}: {source}")]
    TextureLoad {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("config I/O error: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),

    #[error("config serialize error: {0}")]
    ConfigSerialize(#[from] ron::Error),
}
