//! Encoding and atomic file output.

use crate::atlas::{AtlasConfig, ComposedAtlas};
use crate::error::{AtlasError, Result};
use image::{DynamicImage, ImageFormat};
use std::ffi::OsString;
use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempPath};
use tracing::{debug, info, warn};

/// Paths written by [`write_atlas`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasFiles {
    pub image: PathBuf,
    pub almanac: PathBuf,
    pub json: Option<PathBuf>,
}

/// Mirror the canvas top to bottom so row 0 is the bottom of the texture.
pub fn flip_to_texture_space(canvas: &DynamicImage) -> DynamicImage {
    canvas.flipv()
}

/// Image format for a destination path.
///
/// A path without an extension is written as PNG.
pub fn output_format(dest: &Path) -> Result<ImageFormat> {
    match dest.extension() {
        None => Ok(ImageFormat::Png),
        Some(ext) => ImageFormat::from_extension(ext)
            .ok_or_else(|| AtlasError::UnsupportedFormat(ext.to_string_lossy().into_owned())),
    }
}

/// Encode an image in memory.
pub fn encode_atlas(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), format)?;
    Ok(bytes)
}

/// `<dest>.almanac`
pub fn almanac_path(dest: &Path) -> PathBuf {
    with_suffix(dest, ".almanac")
}

/// `<dest>.almanac.json`
pub fn json_manifest_path(dest: &Path) -> PathBuf {
    with_suffix(dest, ".almanac.json")
}

fn with_suffix(dest: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(dest.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Flip, encode and write the atlas image plus its almanac.
///
/// Everything is encoded in memory and staged in temporary files next to
/// the destination before any of them is renamed into place. Files already
/// at the target paths are moved aside first; if any rename fails, the new
/// outputs are removed and the previous files are put back.
pub fn write_atlas(atlas: &ComposedAtlas, dest: &Path, config: &AtlasConfig) -> Result<AtlasFiles> {
    let format = output_format(dest)?;
    let flipped = flip_to_texture_space(&atlas.canvas);
    let image_bytes = encode_atlas(&flipped, format)?;
    let almanac_text = atlas.almanac.to_text();
    let json_text = if config.json_manifest {
        Some(atlas.almanac.to_json()?)
    } else {
        None
    };

    let files = AtlasFiles {
        image: dest.to_path_buf(),
        almanac: almanac_path(dest),
        json: json_text.as_ref().map(|_| json_manifest_path(dest)),
    };

    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = vec![
        (stage(dir, &image_bytes)?, files.image.clone()),
        (stage(dir, almanac_text.as_bytes())?, files.almanac.clone()),
    ];
    if let (Some(text), Some(path)) = (&json_text, &files.json) {
        staged.push((stage(dir, text.as_bytes())?, path.clone()));
    }

    for (_, path) in &staged {
        ensure_replaceable(path)?;
    }

    let mut backups = Vec::with_capacity(staged.len());
    for (_, path) in &staged {
        match move_aside(dir, path) {
            Ok(Some(backup)) => backups.push(backup),
            Ok(None) => {}
            Err(e) => {
                rollback(&[], backups);
                return Err(e);
            }
        }
    }

    let mut persisted: Vec<PathBuf> = Vec::with_capacity(staged.len());
    for (tmp, path) in staged {
        debug!("moving {} into place", path.display());
        if let Err(e) = tmp.persist(&path) {
            rollback(&persisted, backups);
            return Err(AtlasError::Io(e.error));
        }
        persisted.push(path);
    }

    info!(
        "wrote {}x{} atlas with {} tiles to {}",
        atlas.plan.target_size,
        atlas.plan.target_size,
        atlas.almanac.len(),
        dest.display()
    );
    Ok(files)
}

/// A file moved out of the way of a new output.
///
/// Dropping it deletes the saved copy; [`Backup::restore`] puts it back.
struct Backup {
    target: PathBuf,
    saved: TempPath,
}

impl Backup {
    fn restore(self) -> io::Result<()> {
        std::fs::rename(&self.saved, &self.target)
    }
}

/// Fail before touching anything when a target cannot be replaced by a file.
fn ensure_replaceable(target: &Path) -> Result<()> {
    match std::fs::symlink_metadata(target) {
        Ok(meta) if meta.is_dir() => Err(AtlasError::Io(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} is a directory", target.display()),
        ))),
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Rename an existing `target` to a temporary sibling in `dir`.
fn move_aside(dir: &Path, target: &Path) -> Result<Option<Backup>> {
    match std::fs::symlink_metadata(target) {
        Ok(_) => {
            let saved = tempfile::Builder::new()
                .prefix(".grid-atlas-backup-")
                .tempfile_in(dir)?
                .into_temp_path();
            std::fs::rename(target, &saved)?;
            Ok(Some(Backup {
                target: target.to_path_buf(),
                saved,
            }))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Remove new outputs and put previous files back.
fn rollback(persisted: &[PathBuf], backups: Vec<Backup>) {
    for done in persisted {
        if let Err(e) = std::fs::remove_file(done) {
            warn!("Failed to remove {}: {}", done.display(), e);
        }
    }
    for backup in backups {
        let target = backup.target.clone();
        if let Err(e) = backup.restore() {
            warn!("Failed to restore {}: {}", target.display(), e);
        }
    }
}

fn stage(dir: &Path, bytes: &[u8]) -> Result<NamedTempFile> {
    let mut tmp = tempfile::Builder::new()
        .prefix(".grid-atlas-")
        .tempfile_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    Ok(tmp)
}
