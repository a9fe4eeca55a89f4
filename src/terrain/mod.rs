//! Heightmap synthesis and the per-cell fields derived from it

pub mod constants;
pub mod coordinates;
pub mod heightmap;
pub mod steepness;

pub use coordinates::{GridCoord, NEIGHBOR_OFFSETS, WorldCoord};
pub use heightmap::{HeightGrid, HeightmapGenerator, RidgedNoise, generate_heightmap};
pub use steepness::{SteepnessGrid, SteepnessSampler};
