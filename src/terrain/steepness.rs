use crate::errors::{WorldgenError, WorldgenResult};
use crate::terrain::constants::CELL_SIZE;
use crate::terrain::coordinates::GridCoord;
use crate::terrain::heightmap::HeightGrid;
use serde::{Deserialize, Serialize};

/// Source of per-cell steepness in degrees. Implemented by [`SteepnessGrid`];
/// a renderer with its own interpolated normals can supply another source.
pub trait SteepnessSampler {
    fn resolution(&self) -> u32;

    /// Steepness at a cell. Coordinates past the edge read the nearest edge cell.
    fn steepness_at(&self, coord: GridCoord) -> f32;

    /// Steepness at an offset from a cell, clamped to the grid
    fn steepness_near(&self, coord: GridCoord, dx: i32, dy: i32) -> f32 {
        self.steepness_at(coord.offset_clamped(dx, dy, self.resolution()))
    }
}

/// Per-cell steepness in degrees, same layout as [`HeightGrid`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SteepnessGridData")]
pub struct SteepnessGrid {
    resolution: u32,
    degrees: Vec<f32>,
}

#[derive(Deserialize)]
struct SteepnessGridData {
    resolution: u32,
    degrees: Vec<f32>,
}

impl TryFrom<SteepnessGridData> for SteepnessGrid {
    type Error = WorldgenError;

    fn try_from(data: SteepnessGridData) -> WorldgenResult<Self> {
        Self::from_values(data.resolution, data.degrees)
    }
}

impl SteepnessGrid {
    /// Derive steepness from height differences. Heights are stretched by
    /// `depth` world units; neighbours are one world unit apart.
    pub fn from_heights(heights: &HeightGrid, depth: f32) -> Self {
        let resolution = heights.resolution();
        let max = resolution - 1;
        let height_at = |x: u32, y: u32| heights.heights()[GridCoord::new(x, y).index(resolution)];
        let mut degrees = Vec::with_capacity(heights.heights().len());

        for y in 0..resolution {
            for x in 0..resolution {
                let (x0, x1) = (x.saturating_sub(1), (x + 1).min(max));
                let (y0, y1) = (y.saturating_sub(1), (y + 1).min(max));

                let gradient_x = central_difference(height_at(x0, y), height_at(x1, y), x1 - x0);
                let gradient_y = central_difference(height_at(x, y0), height_at(x, y1), y1 - y0);

                let slope = (gradient_x * gradient_x + gradient_y * gradient_y).sqrt() * depth;
                degrees.push(slope.atan().to_degrees());
            }
        }

        Self {
            resolution,
            degrees,
        }
    }

    /// Wrap an externally computed steepness field. Values above 90 are kept so
    /// synthetic fields can mark cells as beyond vertical.
    pub fn from_values(resolution: u32, degrees: Vec<f32>) -> WorldgenResult<Self> {
        let expected_size = resolution as usize * resolution as usize;
        if resolution == 0 || degrees.len() != expected_size {
            return Err(WorldgenError::InvalidGrid {
                reason: format!(
                    "Steepness array size {} does not match resolution {resolution} (expected {expected_size})",
                    degrees.len()
                ),
            });
        }
        if let Some(bad) = degrees.iter().find(|d| !d.is_finite() || **d < 0.0) {
            return Err(WorldgenError::InvalidGrid {
                reason: format!("Steepness must be finite and non-negative, found {bad}"),
            });
        }

        Ok(Self {
            resolution,
            degrees,
        })
    }

    pub fn flat(resolution: u32) -> Self {
        Self {
            resolution,
            degrees: vec![0.0; resolution as usize * resolution as usize],
        }
    }

    pub fn get(&self, coord: GridCoord) -> Option<f32> {
        if !coord.is_valid_for(self.resolution) {
            return None;
        }
        self.degrees.get(coord.index(self.resolution)).copied()
    }

    pub fn values(&self) -> &[f32] {
        &self.degrees
    }
}

impl SteepnessSampler for SteepnessGrid {
    fn resolution(&self) -> u32 {
        self.resolution
    }

    fn steepness_at(&self, coord: GridCoord) -> f32 {
        let clamped = coord.offset_clamped(0, 0, self.resolution);
        self.degrees[clamped.index(self.resolution)]
    }
}

fn central_difference(low: f32, high: f32, cells: u32) -> f32 {
    if cells == 0 {
        return 0.0;
    }
    (high - low) / (cells as f32 * CELL_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_terrain_has_zero_steepness() {
        let heights = HeightGrid::flat(5, 0.7).unwrap();
        let steepness = SteepnessGrid::from_heights(&heights, 60.0);
        assert!(steepness.values().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_ramp_steepness() {
        // Height rises 0.01 per cell along x; stretched by 100 that is a 1:1 slope
        let resolution = 5;
        let heights: Vec<f32> = (0..resolution * resolution)
            .map(|i| (i % resolution) as f32 * 0.01)
            .collect();
        let grid = HeightGrid::new(resolution, heights).unwrap();
        let steepness = SteepnessGrid::from_heights(&grid, 100.0);

        for y in 0..resolution {
            for x in 0..resolution {
                let s = steepness.get(GridCoord::new(x, y)).unwrap();
                assert!((s - 45.0).abs() < 0.01, "Expected 45 degrees at ({x}, {y}), got {s}");
            }
        }
    }

    #[test]
    fn test_steepness_symmetric_under_rotation() {
        let resolution = 6u32;
        let heights: Vec<f32> = (0..resolution * resolution)
            .map(|i| ((i * 7919) % 13) as f32 / 13.0)
            .collect();
        let rotated: Vec<f32> = heights.iter().rev().copied().collect();

        let original = SteepnessGrid::from_heights(&HeightGrid::new(resolution, heights).unwrap(), 10.0);
        let turned = SteepnessGrid::from_heights(&HeightGrid::new(resolution, rotated).unwrap(), 10.0);

        for (a, b) in original.values().iter().zip(turned.values().iter().rev()) {
            assert!((a - b).abs() < 1e-4);
        }
    }

    #[test]
    fn test_from_values_validation() {
        assert!(SteepnessGrid::from_values(2, vec![0.0, 95.0, 10.0, 0.0]).is_ok());
        assert!(SteepnessGrid::from_values(2, vec![0.0, 95.0, 10.0]).is_err());
        assert!(SteepnessGrid::from_values(2, vec![0.0, -1.0, 10.0, 0.0]).is_err());
    }

    #[test]
    fn test_decoding_rejects_short_grid() {
        let bytes = bincode::serde::encode_to_vec((9u32, vec![0.0f32; 3]), bincode::config::standard()).unwrap();
        let decoded: Result<(SteepnessGrid, usize), _> =
            bincode::serde::decode_from_slice(&bytes, bincode::config::standard());
        assert!(decoded.is_err());

        let grid = SteepnessGrid::from_values(2, vec![0.0, 95.0, 10.0, 3.0]).unwrap();
        let bytes = bincode::serde::encode_to_vec(&grid, bincode::config::standard()).unwrap();
        let (decoded, _): (SteepnessGrid, usize) =
            bincode::serde::decode_from_slice(&bytes, bincode::config::standard()).unwrap();
        assert_eq!(decoded, grid);
    }

    #[test]
    fn test_sampler_clamps_to_edges() {
        let grid = SteepnessGrid::from_values(2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(grid.steepness_at(GridCoord::new(5, 0)), 2.0);
        assert_eq!(grid.steepness_near(GridCoord::new(0, 0), -3, 1), 3.0);
        assert_eq!(grid.get(GridCoord::new(5, 0)), None);
    }
}
