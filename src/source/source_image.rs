//! Decoded, validated input image.

use crate::error::{AtlasError, Result};
use image::{ColorType, DynamicImage};
use std::path::{Path, PathBuf};

/// A decoded input image.
///
/// Always square: construction fails with [`AtlasError::NotSquare`] otherwise.
#[derive(Debug, Clone)]
pub struct SourceImage {
    path: PathBuf,
    image: DynamicImage,
}

impl SourceImage {
    /// Wrap a decoded image, rejecting non-square input.
    pub fn new(path: impl Into<PathBuf>, image: DynamicImage) -> Result<Self> {
        let path = path.into();
        let (width, height) = (image.width(), image.height());
        if width != height {
            return Err(AtlasError::NotSquare { path, width, height });
        }
        Ok(Self { path, image })
    }

    /// Path the image was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Final path component, as written to the almanac.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }

    /// Native edge length in pixels.
    pub fn size(&self) -> u32 {
        self.image.width()
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Pixel format of the decoded data.
    pub fn color(&self) -> ColorType {
        self.image.color()
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }
}
