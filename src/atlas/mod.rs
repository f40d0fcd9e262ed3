//! Uniform grid texture atlas building.
//!
//! This module plans the grid, composites every source image into its cell
//! and records each tile's normalized offset in an almanac.

mod almanac;
mod builder;
mod plan;

pub use almanac::Almanac;
pub use builder::{AtlasBuilder, ComposedAtlas};
pub use plan::{AtlasPlan, TilePlacement};

use image::imageops::FilterType;
use image::ColorType;
use serde::{Deserialize, Serialize};

/// Resampling filter used when scaling a source image to tile size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeFilter {
    #[default]
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Pixel format of the atlas canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CanvasColor {
    L8,
    La8,
    Rgb8,
    Rgba8,
    L16,
    La16,
    Rgb16,
    Rgba16,
}

impl From<CanvasColor> for ColorType {
    fn from(color: CanvasColor) -> Self {
        match color {
            CanvasColor::L8 => ColorType::L8,
            CanvasColor::La8 => ColorType::La8,
            CanvasColor::Rgb8 => ColorType::Rgb8,
            CanvasColor::Rgba8 => ColorType::Rgba8,
            CanvasColor::L16 => ColorType::L16,
            CanvasColor::La16 => ColorType::La16,
            CanvasColor::Rgb16 => ColorType::Rgb16,
            CanvasColor::Rgba16 => ColorType::Rgba16,
        }
    }
}

/// Configuration for atlas building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Edge length of the square atlas in pixels.
    pub target_size: u32,
    /// Filter used to scale each source image to the tile size.
    pub filter: ResizeFilter,
    /// Canvas pixel format. `None` adopts the first input's format.
    pub color: Option<CanvasColor>,
    /// Also write the almanac as JSON next to the text almanac.
    pub json_manifest: bool,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            target_size: 1024,
            filter: ResizeFilter::default(),
            color: None,
            json_manifest: false,
        }
    }
}

impl AtlasConfig {
    /// Create a config for the given atlas edge length.
    pub fn new(target_size: u32) -> Self {
        Self {
            target_size,
            ..Self::default()
        }
    }

    pub fn with_filter(mut self, filter: ResizeFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Force the canvas pixel format instead of adopting the first input's.
    pub fn with_color(mut self, color: CanvasColor) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_json_manifest(mut self, enabled: bool) -> Self {
        self.json_manifest = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AtlasConfig::default();
        assert_eq!(config.target_size, 1024);
        assert_eq!(config.filter, ResizeFilter::Nearest);
        assert!(config.color.is_none());
        assert!(!config.json_manifest);
    }

    #[test]
    fn test_config_builders() {
        let config = AtlasConfig::new(256)
            .with_filter(ResizeFilter::Lanczos3)
            .with_color(CanvasColor::Rgb8)
            .with_json_manifest(true);
        assert_eq!(config.target_size, 256);
        assert_eq!(config.filter, ResizeFilter::Lanczos3);
        assert_eq!(config.color, Some(CanvasColor::Rgb8));
        assert!(config.json_manifest);
    }

    #[test]
    fn test_config_deserialize_partial() {
        let config: AtlasConfig =
            serde_json::from_str(r#"{"target_size": 512, "filter": "catmull-rom"}"#).unwrap();
        assert_eq!(config.target_size, 512);
        assert_eq!(config.filter, ResizeFilter::CatmullRom);
        assert!(config.color.is_none());
    }
}
