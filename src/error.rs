//! Error types for atlas building.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using AtlasError.
pub type Result<T> = std::result::Result<T, AtlasError>;

/// Main error type for atlas building operations.
///
/// Every variant is fatal: the pipeline never retries and never leaves a
/// partial atlas behind.
#[derive(Error, Debug)]
pub enum AtlasError {
    /// An input image is not square.
    #[error("Not square: {} ({width}x{height})", .path.display())]
    NotSquare {
        path: PathBuf,
        width: u32,
        height: u32,
    },

    /// A tile's pixel format differs from the canvas pixel format.
    #[error("Color mode mismatch for {}: canvas is {canvas:?}, tile is {tile:?}", .path.display())]
    ModeMismatch {
        path: PathBuf,
        canvas: image::ColorType,
        tile: image::ColorType,
    },

    /// Failed to decode or encode an image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize the JSON manifest.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No input images were given.
    #[error("No input images")]
    EmptyInput,

    /// More or fewer tiles were added than the grid was planned for.
    #[error("Atlas planned for {planned} tiles, got {added}")]
    TileCount { planned: usize, added: usize },

    /// Target size or grid produces an unusable layout.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Destination extension does not name a known image format.
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// Malformed almanac text.
    #[error("Almanac parse error on line {line}: {message}")]
    AlmanacParse { line: usize, message: String },
}
