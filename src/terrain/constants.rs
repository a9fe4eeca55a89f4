/// Constants for terrain generation system
/// Default values for heightmap generation
pub const DEFAULT_MAP_WIDTH: u32 = 256;
pub const DEFAULT_MAP_DEPTH: f32 = 15.0;
pub const DEFAULT_NOISE_SCALE: f32 = 3.0;
pub const DEFAULT_OCTAVES: i32 = 4;
pub const DEFAULT_PERSISTENCE: f32 = 0.5;
pub const DEFAULT_LACUNARITY: f32 = 2.0;
pub const MAX_MAP_WIDTH: u32 = 4096;

/// Random offset range for the sampled noise window
pub const OFFSET_RANGE_MIN: i32 = -10_000;
pub const OFFSET_RANGE_MAX: i32 = 10_000;

/// Falloff shaping defaults
pub const DEFAULT_FALLOFF_POWER: f32 = 3.0;
pub const DEFAULT_FALLOFF_SCALE: f32 = 2.2;
pub const DEFAULT_FALLOFF_RADIUS: f32 = 1.0;

/// Pathfinding constants
pub const ASTAR_CARDINAL_COST: u32 = 10;
pub const ASTAR_DIAGONAL_COST: u32 = 14;
pub const DEFAULT_MAX_WALKABLE_STEEPNESS: f32 = 30.0;
pub const DEFAULT_MAX_CLIMBABLE_STEEPNESS: f32 = 50.0;
pub const DEFAULT_PRIORITY_BASE: u32 = 100;
pub const DEFAULT_PRIORITY_WALK: u32 = 100;
pub const DEFAULT_PRIORITY_CLIMB: u32 = 100;
pub const MAX_STEEPNESS_DEGREES: f32 = 90.0;

/// Camp placement defaults
pub const DEFAULT_CAMP_MIN_DISTANCE: u32 = 5;
pub const DEFAULT_CAMP_SIZE: u32 = 10;
pub const DEFAULT_CAMP_COUNT: u32 = 3;

/// Horizontal world units between adjacent height samples
pub const CELL_SIZE: f32 = 1.0;
