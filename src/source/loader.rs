//! Source image loading from files and bytes.

use super::SourceImage;
use crate::error::{AtlasError, Result};
use image::{ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;

/// Load every path in order.
///
/// Fails on the first unreadable or non-square image; the returned list
/// keeps the input order, which is the tile order of the atlas.
pub fn load_sources<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<SourceImage>> {
    if paths.is_empty() {
        return Err(AtlasError::EmptyInput);
    }
    paths.iter().map(load_source).collect()
}

/// Load a single image from a file path.
pub fn load_source<P: AsRef<Path>>(path: P) -> Result<SourceImage> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    load_source_from_bytes(path, &data)
}

/// Decode an image from bytes.
///
/// The format is sniffed from the data; formats without a signature (TGA)
/// fall back to the extension of `path`.
pub fn load_source_from_bytes<P: AsRef<Path>>(path: P, data: &[u8]) -> Result<SourceImage> {
    let path = path.as_ref();
    let mut reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
    if reader.format().is_none() {
        if let Ok(format) = ImageFormat::from_path(path) {
            reader.set_format(format);
        }
    }
    let image = reader.decode()?;
    SourceImage::new(path, image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage, Rgb};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([10, 20, 30])));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_load_from_bytes() {
        let source = load_source_from_bytes("a.png", &png_bytes(4, 4)).unwrap();
        assert_eq!(source.size(), 4);
        assert_eq!(source.image().to_rgb8().get_pixel(0, 0), &Rgb([10, 20, 30]));
    }

    #[test]
    fn test_load_rejects_non_square() {
        let err = load_source_from_bytes("b.png", &png_bytes(4, 2)).unwrap_err();
        assert!(matches!(err, AtlasError::NotSquare { .. }));
    }

    #[test]
    fn test_load_sources_preserves_order() {
        let dir = tempfile::TempDir::new().unwrap();
        let names = ["c.png", "a.png", "b.png"];
        let paths: Vec<_> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let path = dir.path().join(name);
                std::fs::write(&path, png_bytes(2 + i as u32, 2 + i as u32)).unwrap();
                path
            })
            .collect();

        let sources = load_sources(&paths).unwrap();
        let loaded: Vec<_> = sources.iter().map(|s| s.name()).collect();
        assert_eq!(loaded, names);
        assert_eq!(sources[2].size(), 4);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = load_source(dir.path().join("missing.png")).unwrap_err();
        assert!(matches!(err, AtlasError::Io(_)));
    }

    #[test]
    fn test_load_sources_empty() {
        let paths: Vec<&str> = Vec::new();
        assert!(matches!(load_sources(&paths), Err(AtlasError::EmptyInput)));
    }
}
