use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Canonical 8-neighbourhood: four cardinals, then each diagonal exactly once
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (-1, -1),
    (1, 1),
    (-1, 1),
    (1, -1),
];

/// Grid coordinates on a square heightmap. `x` is the column, `y` the row.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize,
)]
#[display("({x}, {y})")]
pub struct GridCoord {
    pub x: u32,
    pub y: u32,
}

/// World coordinates: `x`/`z` on the ground plane, `y` up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldCoord {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl GridCoord {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Row-major index into a `resolution x resolution` grid
    pub fn index(&self, resolution: u32) -> usize {
        self.y as usize * resolution as usize + self.x as usize
    }

    pub fn from_index(index: usize, resolution: u32) -> Self {
        let resolution = resolution as usize;
        Self::new((index % resolution) as u32, (index / resolution) as u32)
    }

    /// Check if these coordinates are valid for a grid of the given resolution
    pub fn is_valid_for(&self, resolution: u32) -> bool {
        self.x < resolution && self.y < resolution
    }

    /// Step by an offset, returning None when the result leaves the grid
    pub fn offset(&self, dx: i32, dy: i32, resolution: u32) -> Option<GridCoord> {
        let x = self.x as i64 + dx as i64;
        let y = self.y as i64 + dy as i64;
        let limit = resolution as i64;
        if x < 0 || y < 0 || x >= limit || y >= limit {
            return None;
        }
        Some(GridCoord::new(x as u32, y as u32))
    }

    /// Step by an offset, clamping the result to the grid edge
    pub fn offset_clamped(&self, dx: i32, dy: i32, resolution: u32) -> GridCoord {
        let max = resolution.saturating_sub(1) as i64;
        let x = (self.x as i64 + dx as i64).clamp(0, max);
        let y = (self.y as i64 + dy as i64).clamp(0, max);
        GridCoord::new(x as u32, y as u32)
    }

    /// In-bounds 8-neighbours in canonical offset order
    pub fn neighbors(&self, resolution: u32) -> impl Iterator<Item = GridCoord> + '_ {
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(move |&(dx, dy)| self.offset(dx, dy, resolution))
    }

    /// Number of king moves between two cells
    pub fn chebyshev_distance(&self, other: &GridCoord) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    pub fn is_diagonal_to(&self, other: &GridCoord) -> bool {
        self.x != other.x && self.y != other.y
    }

    /// Convert to world coordinates. One grid step is one world unit and the
    /// height sample is stretched by `depth`.
    pub fn to_world(&self, height: f32, depth: f32) -> WorldCoord {
        WorldCoord {
            x: self.x as f32,
            y: height * depth,
            z: self.y as f32,
        }
    }
}

impl WorldCoord {
    /// Nearest grid coordinate, None when outside the grid
    pub fn to_grid(&self, resolution: u32) -> Option<GridCoord> {
        let x = self.x.round();
        let z = self.z.round();
        if x < 0.0 || z < 0.0 || x >= resolution as f32 || z >= resolution as f32 {
            return None;
        }
        Some(GridCoord::new(x as u32, z as u32))
    }
}
