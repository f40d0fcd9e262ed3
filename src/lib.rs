//! # Grid Atlas
//!
//! Packs same-size square images into one square texture atlas laid out as a
//! uniform grid, and writes an almanac listing each tile's offset.
//!
//! ## Overview
//!
//! For `N` input images the atlas is a `ceil(sqrt(N))` × `ceil(sqrt(N))` grid.
//! Every image is resized to `target_size / grid_dim` pixels and pasted into
//! its cell in input order. The finished canvas is flipped vertically so that
//! row 0 is the bottom of the texture, then written next to a text almanac:
//!
//! ```text
//! scale 2
//! 0 0 grass.png
//! 0.5 0 stone.png
//! 0 0.5 dirt.png
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use grid_atlas::{make_atlas, AtlasConfig};
//!
//! let config = AtlasConfig::new(256);
//! let files = make_atlas("atlas.png", &["grass.png", "stone.png", "dirt.png"], &config)?;
//! println!("almanac at {:?}", files.almanac);
//! ```
//!
//! ## Reading an almanac back
//!
//! ```ignore
//! use grid_atlas::Almanac;
//!
//! let almanac = Almanac::parse(&std::fs::read_to_string("atlas.png.almanac")?)?;
//! let uv = almanac.transform_uv("stone.png", 0.5, 0.5);
//! ```

pub mod atlas;
pub mod error;
pub mod export;
pub mod source;

// Re-export main types for convenience
pub use atlas::{
    Almanac, AtlasBuilder, AtlasConfig, AtlasPlan, CanvasColor, ComposedAtlas, ResizeFilter,
    TilePlacement,
};
pub use error::{AtlasError, Result};
pub use export::{write_atlas, AtlasFiles};
pub use source::{load_source, load_source_from_bytes, load_sources, SourceImage};

use std::path::Path;

/// Composite already-loaded images into an atlas.
pub fn build_atlas(sources: &[SourceImage], config: &AtlasConfig) -> Result<ComposedAtlas> {
    let plan = AtlasPlan::new(sources.len(), config.target_size)?;
    let mut builder = AtlasBuilder::new(plan, config);
    for source in sources {
        builder.add_tile(source)?;
    }
    builder.build()
}

/// Load every path, then composite.
///
/// All inputs are decoded and validated before any compositing starts.
pub fn build_atlas_from_paths<P: AsRef<Path>>(
    paths: &[P],
    config: &AtlasConfig,
) -> Result<ComposedAtlas> {
    let sources = load_sources(paths)?;
    build_atlas(&sources, config)
}

/// Run the whole pipeline: load, composite, flip and write.
///
/// On any error no output file is left at `dest` or its almanac path.
pub fn make_atlas<D, P>(dest: D, paths: &[P], config: &AtlasConfig) -> Result<AtlasFiles>
where
    D: AsRef<Path>,
    P: AsRef<Path>,
{
    let atlas = build_atlas_from_paths(paths, config)?;
    write_atlas(&atlas, dest.as_ref(), config)
}
