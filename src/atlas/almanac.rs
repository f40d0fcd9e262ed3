//! The almanac: a text manifest of tile offsets.
//!
//! Format, one record per line:
//!
//! ```text
//! scale 2
//! 0 0 grass.png
//! 0.5 0 stone.png
//! 0 0.5 dirt.png
//! ```
//!
//! The first line gives the grid dimension; each following line is a tile's
//! normalized cell origin and its source file name, in input order.

use super::TilePlacement;
use crate::error::{AtlasError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Ordered tile placements plus the grid scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Almanac {
    /// Tiles per row and column.
    pub scale: u32,
    tiles: Vec<TilePlacement>,
}

impl Almanac {
    pub fn new(scale: u32) -> Self {
        Self {
            scale,
            tiles: Vec::new(),
        }
    }

    /// Append the next tile. Order of calls is the order written.
    pub fn push(&mut self, placement: TilePlacement) {
        self.tiles.push(placement);
    }

    pub fn tiles(&self) -> &[TilePlacement] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Find a tile by source file name. When a name repeats, the last
    /// entry wins, as it does for a renderer loading the almanac line by line.
    pub fn get(&self, name: &str) -> Option<&TilePlacement> {
        self.tiles.iter().rev().find(|tile| tile.name == name)
    }

    /// Normalized cell origin of the named tile.
    pub fn offset_of(&self, name: &str) -> Option<[f32; 2]> {
        self.get(name).map(|tile| [tile.offset_x, tile.offset_y])
    }

    /// Map a tile-local UV coordinate (0-1) to atlas UV space.
    pub fn transform_uv(&self, name: &str, u: f32, v: f32) -> Option<[f32; 2]> {
        let scale = self.scale as f32;
        self.offset_of(name)
            .map(|[x, y]| [x + u / scale, y + v / scale])
    }

    /// Render the almanac text.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(16 + self.tiles.len() * 32);
        writeln!(out, "scale {}", self.scale).unwrap();
        for tile in &self.tiles {
            writeln!(out, "{} {} {}", tile.offset_x, tile.offset_y, tile.name).unwrap();
        }
        out
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse almanac text.
    ///
    /// Blank lines are skipped. File names may contain spaces; everything
    /// after the second number is the name.
    pub fn parse(text: &str) -> Result<Self> {
        let mut scale = None;
        let mut entries = Vec::new();

        for (i, raw) in text.lines().enumerate() {
            let line_no = i + 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(value) = line.strip_prefix("scale") {
                let value = value.trim();
                let parsed = value.parse::<u32>().map_err(|e| AtlasError::AlmanacParse {
                    line: line_no,
                    message: format!("invalid scale '{}': {}", value, e),
                })?;
                if parsed == 0 {
                    return Err(AtlasError::AlmanacParse {
                        line: line_no,
                        message: "scale must be greater than zero".to_string(),
                    });
                }
                scale = Some(parsed);
                continue;
            }

            let (x, y, name) = split_entry(line).ok_or_else(|| AtlasError::AlmanacParse {
                line: line_no,
                message: format!("expected '<x> <y> <name>', got '{}'", line),
            })?;
            let parse_offset = |field: &str| {
                field.parse::<f32>().map_err(|e| AtlasError::AlmanacParse {
                    line: line_no,
                    message: format!("invalid offset '{}': {}", field, e),
                })
            };
            entries.push((parse_offset(x)?, parse_offset(y)?, name.to_string()));
        }

        let scale = scale.ok_or_else(|| AtlasError::AlmanacParse {
            line: 0,
            message: "missing 'scale' line".to_string(),
        })?;

        let dim = scale as f32;
        let tiles = entries
            .into_iter()
            .enumerate()
            .map(|(index, (offset_x, offset_y, name))| TilePlacement {
                index,
                column: (offset_x * dim).round() as u32,
                row: (offset_y * dim).round() as u32,
                offset_x,
                offset_y,
                name,
            })
            .collect();

        Ok(Self { scale, tiles })
    }
}

fn split_entry(line: &str) -> Option<(&str, &str, &str)> {
    let (x, rest) = line.split_once(char::is_whitespace)?;
    let (y, name) = rest.trim_start().split_once(char::is_whitespace)?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((x, y, name))
}
