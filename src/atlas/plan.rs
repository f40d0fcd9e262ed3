//! Grid planning: how many cells per side and how large each tile is.

use crate::error::{AtlasError, Result};
use serde::{Deserialize, Serialize};

/// Layout of a uniform square grid atlas.
///
/// `grid_dim = ceil(sqrt(image_count))` and `tile_size = target_size / grid_dim`
/// with integer division. When `target_size` is not a multiple of `grid_dim`
/// a strip of `residual()` pixels along the right and bottom edges is never
/// painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasPlan {
    pub image_count: usize,
    pub target_size: u32,
    pub grid_dim: u32,
    pub tile_size: u32,
}

impl AtlasPlan {
    /// Plan a grid for `image_count` tiles in a `target_size` square canvas.
    pub fn new(image_count: usize, target_size: u32) -> Result<Self> {
        if image_count == 0 {
            return Err(AtlasError::EmptyInput);
        }
        if target_size == 0 {
            return Err(AtlasError::InvalidConfig(
                "target size must be greater than zero".to_string(),
            ));
        }

        let grid_dim = grid_dim_for(image_count);
        let tile_size = target_size / grid_dim;
        if tile_size == 0 {
            return Err(AtlasError::InvalidConfig(format!(
                "{} images need a {}x{} grid, which does not fit in {} pixels",
                image_count, grid_dim, grid_dim, target_size
            )));
        }

        Ok(Self {
            image_count,
            target_size,
            grid_dim,
            tile_size,
        })
    }

    /// Pixels along each edge not covered by any tile.
    pub fn residual(&self) -> u32 {
        self.target_size - self.tile_size * self.grid_dim
    }

    /// Grid cell of the tile at `index`, as (column, row).
    pub fn cell(&self, index: usize) -> (u32, u32) {
        let dim = self.grid_dim as usize;
        ((index % dim) as u32, (index / dim) as u32)
    }

    /// Top-left pixel of the tile at `index`, in top-left-origin coordinates.
    pub fn pixel_origin(&self, index: usize) -> (u32, u32) {
        let (column, row) = self.cell(index);
        (column * self.tile_size, row * self.tile_size)
    }

    /// Placement record for the tile at `index`.
    pub fn placement(&self, index: usize, name: impl Into<String>) -> TilePlacement {
        let (column, row) = self.cell(index);
        let dim = self.grid_dim as f32;
        TilePlacement {
            index,
            column,
            row,
            offset_x: column as f32 / dim,
            offset_y: row as f32 / dim,
            name: name.into(),
        }
    }
}

/// Smallest `d` with `d * d >= count`.
fn grid_dim_for(count: usize) -> u32 {
    let count = count as u64;
    let mut dim = (count as f64).sqrt().ceil() as u64;
    // Correct float rounding at perfect squares.
    while dim * dim < count {
        dim += 1;
    }
    while dim > 1 && (dim - 1) * (dim - 1) >= count {
        dim -= 1;
    }
    dim as u32
}

/// Where one source image lands in the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilePlacement {
    /// Position in the input order.
    pub index: usize,
    pub column: u32,
    pub row: u32,
    /// Normalized left edge of the cell (0-1).
    pub offset_x: f32,
    /// Normalized top edge of the cell (0-1), top-left origin.
    pub offset_y: f32,
    /// Source file name without directories.
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_dim_is_ceil_sqrt() {
        let expected = [
            (1, 1),
            (2, 2),
            (3, 2),
            (4, 2),
            (5, 3),
            (9, 3),
            (10, 4),
            (16, 4),
            (17, 5),
            (1_000_000, 1000),
            (1_000_001, 1001),
        ];
        for (count, dim) in expected {
            assert_eq!(grid_dim_for(count), dim, "count {}", count);
        }
    }

    #[test]
    fn test_three_images_in_256() {
        let plan = AtlasPlan::new(3, 256).unwrap();
        assert_eq!(plan.grid_dim, 2);
        assert_eq!(plan.tile_size, 128);
        assert_eq!(plan.residual(), 0);
        assert_eq!(plan.pixel_origin(0), (0, 0));
        assert_eq!(plan.pixel_origin(1), (128, 0));
        assert_eq!(plan.pixel_origin(2), (0, 128));
    }

    #[test]
    fn test_single_image() {
        let plan = AtlasPlan::new(1, 100).unwrap();
        assert_eq!(plan.grid_dim, 1);
        assert_eq!(plan.tile_size, 100);

        let placement = plan.placement(0, "only.png");
        assert_eq!(placement.offset_x, 0.0);
        assert_eq!(placement.offset_y, 0.0);
    }

    #[test]
    fn test_truncating_tile_size() {
        let plan = AtlasPlan::new(9, 100).unwrap();
        assert_eq!(plan.grid_dim, 3);
        assert_eq!(plan.tile_size, 33);
        assert_eq!(plan.residual(), 1);
    }

    #[test]
    fn test_offsets_in_unit_range() {
        let plan = AtlasPlan::new(7, 300).unwrap();
        for i in 0..7 {
            let p = plan.placement(i, format!("{}.png", i));
            assert_eq!(p.column, i as u32 % 3);
            assert_eq!(p.row, i as u32 / 3);
            assert!((p.offset_x - p.column as f32 / 3.0).abs() < 1e-6);
            assert!((p.offset_y - p.row as f32 / 3.0).abs() < 1e-6);
            assert!((0.0..1.0).contains(&p.offset_x));
            assert!((0.0..1.0).contains(&p.offset_y));
        }
    }

    #[test]
    fn test_invalid_plans() {
        assert!(matches!(AtlasPlan::new(0, 256), Err(AtlasError::EmptyInput)));
        assert!(matches!(
            AtlasPlan::new(1, 0),
            Err(AtlasError::InvalidConfig(_))
        ));
        // 5x5 grid cannot fit in 4 pixels
        assert!(matches!(
            AtlasPlan::new(25, 4),
            Err(AtlasError::InvalidConfig(_))
        ));
    }
}
