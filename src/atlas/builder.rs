//! Tile compositing into a single canvas.

use super::{Almanac, AtlasConfig, AtlasPlan, TilePlacement};
use crate::error::{AtlasError, Result};
use crate::source::SourceImage;
use image::imageops::{self, FilterType};
use image::{ColorType, DynamicImage};
use std::borrow::Cow;
use tracing::{debug, warn};

/// A fully composited atlas, not yet flipped or encoded.
#[derive(Debug, Clone)]
pub struct ComposedAtlas {
    pub plan: AtlasPlan,
    /// Canvas in top-left-origin image coordinates.
    pub canvas: DynamicImage,
    pub almanac: Almanac,
}

/// Builder that pastes tiles into the grid one at a time, in input order.
///
/// The canvas is owned by the builder until [`AtlasBuilder::build`] hands it
/// to the caller.
pub struct AtlasBuilder {
    plan: AtlasPlan,
    filter: FilterType,
    canvas: Option<DynamicImage>,
    almanac: Almanac,
}

impl AtlasBuilder {
    /// Create a builder for `plan`.
    ///
    /// With `config.color` unset the canvas format is taken from the first
    /// tile added.
    pub fn new(plan: AtlasPlan, config: &AtlasConfig) -> Self {
        if plan.residual() > 0 {
            warn!(
                "{}px atlas is not a multiple of {} tiles; {}px strip stays unpainted",
                plan.target_size,
                plan.grid_dim,
                plan.residual()
            );
        }

        let canvas = config
            .color
            .map(|color| DynamicImage::new(plan.target_size, plan.target_size, color.into()));

        Self {
            plan,
            filter: config.filter.into(),
            canvas,
            almanac: Almanac::new(plan.grid_dim),
        }
    }

    pub fn plan(&self) -> &AtlasPlan {
        &self.plan
    }

    /// Number of tiles pasted so far.
    pub fn tile_count(&self) -> usize {
        self.almanac.len()
    }

    /// Resize `source` to the tile size and paste it into the next cell.
    pub fn add_tile(&mut self, source: &SourceImage) -> Result<&TilePlacement> {
        let index = self.almanac.len();
        if index >= self.plan.image_count {
            return Err(AtlasError::TileCount {
                planned: self.plan.image_count,
                added: index + 1,
            });
        }

        let tile_size = self.plan.tile_size;
        if tile_size > source.size() {
            warn!(
                "{}: upsampling from {} to {}",
                source.path().display(),
                source.size(),
                tile_size
            );
        }

        let target_size = self.plan.target_size;
        let canvas = self
            .canvas
            .get_or_insert_with(|| DynamicImage::new(target_size, target_size, source.color()));
        if canvas.color() != source.color() {
            return Err(mode_mismatch(source, canvas.color()));
        }

        let tile = if source.size() == tile_size {
            Cow::Borrowed(source.image())
        } else {
            Cow::Owned(source.image().resize_exact(tile_size, tile_size, self.filter))
        };

        let (x, y) = self.plan.pixel_origin(index);
        if !paste(canvas, &tile, x, y) {
            return Err(mode_mismatch(source, canvas.color()));
        }

        let placement = self.plan.placement(index, source.name());
        debug!(
            "tile {} '{}' at cell ({}, {}) pixel ({}, {})",
            index, placement.name, placement.column, placement.row, x, y
        );
        self.almanac.push(placement);
        Ok(&self.almanac.tiles()[index])
    }

    /// Finish compositing. Every planned tile must have been added.
    pub fn build(self) -> Result<ComposedAtlas> {
        let added = self.almanac.len();
        match self.canvas {
            Some(canvas) if added == self.plan.image_count => Ok(ComposedAtlas {
                plan: self.plan,
                canvas,
                almanac: self.almanac,
            }),
            _ => Err(AtlasError::TileCount {
                planned: self.plan.image_count,
                added,
            }),
        }
    }
}

fn mode_mismatch(source: &SourceImage, canvas: ColorType) -> AtlasError {
    AtlasError::ModeMismatch {
        path: source.path().to_path_buf(),
        canvas,
        tile: source.color(),
    }
}

/// Copy `tile` into `canvas` at (x, y) without any pixel conversion.
///
/// Returns false when the two buffers do not share a pixel format.
fn paste(canvas: &mut DynamicImage, tile: &DynamicImage, x: u32, y: u32) -> bool {
    macro_rules! replace_same {
        ($($variant:ident),*) => {
            match (canvas, tile) {
                $(
                    (DynamicImage::$variant(dst), DynamicImage::$variant(src)) => {
                        imageops::replace(dst, src, x as i64, y as i64);
                        true
                    }
                )*
                _ => false,
            }
        };
    }

    replace_same!(
        ImageLuma8,
        ImageLumaA8,
        ImageRgb8,
        ImageRgba8,
        ImageLuma16,
        ImageLumaA16,
        ImageRgb16,
        ImageRgba16,
        ImageRgb32F,
        ImageRgba32F
    )
}
