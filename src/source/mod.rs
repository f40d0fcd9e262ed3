//! Source image loading.
//!
//! Input images are decoded once, checked for squareness, and handed to the
//! compositor in the order they were given.

mod loader;
mod source_image;

pub use loader::{load_source, load_source_from_bytes, load_sources};
pub use source_image::SourceImage;
