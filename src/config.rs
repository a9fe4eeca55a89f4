use crate::errors::{WorldgenError, WorldgenResult};
use crate::terrain::constants::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use validator::Validate;

pub mod range_types;

use range_types::{Lacunarity, Octaves, Persistence};

/// Complete input of one generation pass
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
// NOTE: When adding new fields, update the worldgen CLI flags as well
pub struct WorldConfig {
    #[validate(nested)]
    pub terrain: TerrainConfig,
    #[validate(nested)]
    pub pathfinding: PathfindingPreset,
    #[validate(nested)]
    pub camps: CampConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TerrainConfig {
    /// Number of terrain cells per side; the heightmap has one more sample
    #[validate(range(min = 1, max = 4096))]
    pub map_width: u32,
    /// World height of a sample with value 1.0
    #[validate(range(min = 0.0, max = 10000.0))]
    pub map_depth: f32,
    pub seed: u64,
    pub octaves: Octaves,
    pub persistence: Persistence,
    pub lacunarity: Lacunarity,
    #[validate(range(min = 0.0, max = 10000.0))]
    pub scale: f32,
    #[validate(nested)]
    pub falloff: FalloffConfig,
}

/// Parameters of the radial attenuation applied to the main tile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct FalloffConfig {
    #[validate(range(min = 0.0, max = 64.0))]
    pub power: f32,
    #[validate(range(min = 0.0, max = 64.0))]
    pub scale: f32,
    /// Reference distance as a fraction of the centre-to-corner distance
    #[validate(range(min = 0.01, max = 16.0))]
    pub radius: f32,
}

/// How the cost search treats cells steeper than the climbable limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockedPolicy {
    /// Blocked cells stay enqueueable with the full walk + climb surcharge
    #[default]
    Detour,
    /// Blocked cells are never entered
    Impassable,
}

/// Where the route ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteTarget {
    #[default]
    Center,
    LowestPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PathfindingPreset {
    pub max_walkable_steepness: f32,
    pub max_climbable_steepness: f32,
    #[validate(range(min = 1, max = 1_000_000))]
    pub priority_base: u32,
    #[validate(range(max = 1_000_000))]
    pub priority_walk: u32,
    #[validate(range(max = 1_000_000))]
    pub priority_climb: u32,
    /// Multiply edge costs by steepness / 90
    pub scale_by_steepness: bool,
    pub blocked_policy: BlockedPolicy,
    pub target: RouteTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CampConfig {
    /// Walkable path steps between two camp candidates
    #[validate(range(min = 1))]
    pub min_distance: u32,
    /// Side of the square window scored around each candidate
    #[validate(range(min = 1, max = 256))]
    pub camp_size: u32,
    pub count: u32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            map_width: DEFAULT_MAP_WIDTH,
            map_depth: DEFAULT_MAP_DEPTH,
            seed: 0,
            octaves: Octaves::default(),
            persistence: Persistence::default(),
            lacunarity: Lacunarity::default(),
            scale: DEFAULT_NOISE_SCALE,
            falloff: FalloffConfig::default(),
        }
    }
}

impl Default for FalloffConfig {
    fn default() -> Self {
        Self {
            power: DEFAULT_FALLOFF_POWER,
            scale: DEFAULT_FALLOFF_SCALE,
            radius: DEFAULT_FALLOFF_RADIUS,
        }
    }
}

impl Default for PathfindingPreset {
    fn default() -> Self {
        Self {
            max_walkable_steepness: DEFAULT_MAX_WALKABLE_STEEPNESS,
            max_climbable_steepness: DEFAULT_MAX_CLIMBABLE_STEEPNESS,
            priority_base: DEFAULT_PRIORITY_BASE,
            priority_walk: DEFAULT_PRIORITY_WALK,
            priority_climb: DEFAULT_PRIORITY_CLIMB,
            scale_by_steepness: true,
            blocked_policy: BlockedPolicy::default(),
            target: RouteTarget::default(),
        }
    }
}

impl Default for CampConfig {
    fn default() -> Self {
        Self {
            min_distance: DEFAULT_CAMP_MIN_DISTANCE,
            camp_size: DEFAULT_CAMP_SIZE,
            count: DEFAULT_CAMP_COUNT,
        }
    }
}

impl TerrainConfig {
    /// Heightmap samples per side
    pub fn resolution(&self) -> u32 {
        self.map_width + 1
    }
}

impl PathfindingPreset {
    /// Thresholds must be non-negative and ordered; they are never reordered
    pub fn check_thresholds(&self) -> WorldgenResult<()> {
        let walkable = self.max_walkable_steepness;
        let climbable = self.max_climbable_steepness;

        if !walkable.is_finite() || !climbable.is_finite() || walkable < 0.0 || climbable < 0.0 {
            return Err(WorldgenError::InvalidConfig {
                reason: format!(
                    "Steepness thresholds must be finite and non-negative, got walkable={walkable}, climbable={climbable}"
                ),
            });
        }

        if walkable > climbable {
            return Err(WorldgenError::ThresholdsOutOfOrder {
                walkable,
                climbable,
            });
        }

        Ok(())
    }
}

impl WorldConfig {
    /// Run range validation and the cross-field checks
    pub fn validate_all(&self) -> WorldgenResult<()> {
        self.validate()
            .map_err(|validation_errors| WorldgenError::InvalidConfig {
                reason: format!("Config validation failed: {validation_errors}"),
            })?;

        if !(self.terrain.scale > 0.0) {
            return Err(WorldgenError::InvalidConfig {
                reason: format!("Noise scale must be positive, got {}", self.terrain.scale),
            });
        }

        self.pathfinding.check_thresholds()
    }
}

pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().and_then(|mut path| {
        path.push("ridgeway");
        fs::create_dir_all(&path).ok()?;
        path.push("worldgen.toml");
        Some(path)
    })
}

/// Load the user config, falling back to defaults when missing or unreadable
pub fn load_config() -> WorldConfig {
    if let Some(config_path) = get_config_path() {
        if let Ok(contents) = fs::read_to_string(&config_path) {
            match toml::from_str::<WorldConfig>(&contents) {
                Ok(config) => return config,
                Err(e) => tracing::warn!(
                    "Ignoring unreadable config at {}: {e}",
                    config_path.display()
                ),
            }
        }
    }
    WorldConfig::default()
}

/// Load a config from an explicit path, propagating every failure
pub fn load_config_from<P: AsRef<Path>>(path: P) -> WorldgenResult<WorldConfig> {
    let contents = fs::read_to_string(path)?;
    Ok(toml::from_str::<WorldConfig>(&contents)?)
}

/// Save as the user config picked up by [`load_config`]
pub fn save_config(config: &WorldConfig) -> WorldgenResult<PathBuf> {
    let config_path = get_config_path().ok_or(WorldgenError::ConfigDirNotFound)?;
    save_config_to(config, &config_path)?;
    Ok(config_path)
}

pub fn save_config_to<P: AsRef<Path>>(config: &WorldConfig, path: P) -> WorldgenResult<()> {
    let contents = toml::to_string_pretty(config)?;
    fs::write(path, contents)?;
    Ok(())
}
