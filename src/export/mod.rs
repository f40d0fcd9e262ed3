//! Atlas output.
//!
//! Flips the composed canvas into bottom-left-origin texture space, encodes
//! it, and writes the image and almanac files all-or-nothing.

pub mod writer;

pub use writer::{
    almanac_path, encode_atlas, flip_to_texture_space, json_manifest_path, output_format,
    write_atlas, AtlasFiles,
};
