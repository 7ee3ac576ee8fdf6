//! Error types for grid generation, sampling, rendering and config I/O.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid grid size {size}: must be at least 1")]
    InvalidSize { size: usize },

    #[error("grid size {size} too small: initial radius {initial_radius} does not fit inside max radius {max_radius}")]
    BoundaryTooSmall {
        size: usize,
        initial_radius: f64,
        max_radius: f64,
    },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("alpha must be positive and finite, got {0}")]
    InvalidAlpha(f64),

    #[error("density evaluated to zero or NaN ratio at state {state}; try lowering alpha")]
    DensityEvaluation { state: f64 },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("gif error: {0}")]
    Gif(#[from] gif::EncodingError),
}
