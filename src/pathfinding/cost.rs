use crate::config::{BlockedPolicy, PathfindingPreset};
use crate::errors::{WorldgenError, WorldgenResult};
use crate::terrain::GridCoord;
use crate::terrain::constants::{ASTAR_CARDINAL_COST, ASTAR_DIAGONAL_COST, MAX_STEEPNESS_DEGREES};
use crate::terrain::steepness::SteepnessSampler;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Difficulty bucket of a cell, derived from its steepness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum TraversalClass {
    Walk,
    Climb,
    Blocked,
}

/// Classify a steepness against ordered thresholds
pub fn classify(steepness: f32, max_walkable: f32, max_climbable: f32) -> TraversalClass {
    if steepness <= max_walkable {
        TraversalClass::Walk
    } else if steepness <= max_climbable {
        TraversalClass::Climb
    } else {
        TraversalClass::Blocked
    }
}

/// Extra priority for entering a cell of `class`. Blocked pays both surcharges.
pub fn surcharge(class: TraversalClass, priority_walk: u32, priority_climb: u32) -> u32 {
    match class {
        TraversalClass::Walk => 0,
        TraversalClass::Climb => priority_walk,
        TraversalClass::Blocked => priority_walk.saturating_add(priority_climb),
    }
}

/// Unscaled cost of one step. `base_distance` is the step length in tenths of a
/// cell ([`ASTAR_CARDINAL_COST`] or [`ASTAR_DIAGONAL_COST`]).
pub fn edge_cost(
    base_distance: u32,
    class: TraversalClass,
    priority_base: u32,
    priority_walk: u32,
    priority_climb: u32,
) -> u32 {
    let priority = priority_base.saturating_add(surcharge(class, priority_walk, priority_climb));
    let scaled = priority as u64 * base_distance as u64 / ASTAR_CARDINAL_COST as u64;
    scaled.min(u32::MAX as u64) as u32
}

/// Steepness-derived cost model shared by the route solver, the camp selector
/// and renderers that colour terrain by traversal class.
#[derive(Debug, Clone, PartialEq)]
pub struct CostModel {
    pub max_walkable: f32,
    pub max_climbable: f32,
    pub priority_base: u32,
    pub priority_walk: u32,
    pub priority_climb: u32,
    pub scale_by_steepness: bool,
    pub blocked_policy: BlockedPolicy,
}

impl CostModel {
    /// Build from a preset, rejecting unordered or negative thresholds
    pub fn new(preset: &PathfindingPreset) -> WorldgenResult<Self> {
        preset.check_thresholds()?;
        Ok(Self {
            max_walkable: preset.max_walkable_steepness,
            max_climbable: preset.max_climbable_steepness,
            priority_base: preset.priority_base.max(1),
            priority_walk: preset.priority_walk,
            priority_climb: preset.priority_climb,
            scale_by_steepness: preset.scale_by_steepness,
            blocked_policy: preset.blocked_policy,
        })
    }

    pub fn classify(&self, steepness: f32) -> TraversalClass {
        classify(steepness, self.max_walkable, self.max_climbable)
    }

    /// Cost of stepping from `from` into the adjacent `to`, judged by the
    /// destination's steepness. None when the destination cannot be entered.
    pub fn step_cost(
        &self,
        from: GridCoord,
        to: GridCoord,
        steepness: f32,
    ) -> Option<(u64, TraversalClass)> {
        let class = self.classify(steepness);
        if class == TraversalClass::Blocked && self.blocked_policy == BlockedPolicy::Impassable {
            return None;
        }

        let base_distance = if from.is_diagonal_to(&to) {
            ASTAR_DIAGONAL_COST
        } else {
            ASTAR_CARDINAL_COST
        };
        let cost = edge_cost(
            base_distance,
            class,
            self.priority_base,
            self.priority_walk,
            self.priority_climb,
        ) as u64;

        let cost = if self.scale_by_steepness {
            (cost as f64 * (steepness as f64 / MAX_STEEPNESS_DEGREES as f64)).round() as u64
        } else {
            cost
        };

        // Zero-cost edges would make every flat route tie
        Some((cost.max(1), class))
    }

    /// Classify every cell of a steepness source
    pub fn classify_grid<S: SteepnessSampler>(&self, sampler: &S) -> TraversalMap {
        let resolution = sampler.resolution();
        let classes = (0..resolution * resolution)
            .map(|i| {
                let coord = GridCoord::from_index(i as usize, resolution);
                self.classify(sampler.steepness_at(coord))
            })
            .collect();

        TraversalMap {
            resolution,
            classes,
        }
    }
}

/// Per-cell traversal classes, row-major like the height grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TraversalMapData")]
pub struct TraversalMap {
    resolution: u32,
    classes: Vec<TraversalClass>,
}

#[derive(Deserialize)]
struct TraversalMapData {
    resolution: u32,
    classes: Vec<TraversalClass>,
}

impl TryFrom<TraversalMapData> for TraversalMap {
    type Error = WorldgenError;

    fn try_from(data: TraversalMapData) -> WorldgenResult<Self> {
        Self::new(data.resolution, data.classes)
    }
}

impl TraversalMap {
    pub fn new(resolution: u32, classes: Vec<TraversalClass>) -> WorldgenResult<Self> {
        let expected = resolution as usize * resolution as usize;
        if resolution == 0 || classes.len() != expected {
            return Err(WorldgenError::InvalidGrid {
                reason: format!(
                    "Traversal map has {} cells, expected {expected} for resolution {resolution}",
                    classes.len()
                ),
            });
        }
        Ok(Self {
            resolution,
            classes,
        })
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn get(&self, coord: GridCoord) -> Option<TraversalClass> {
        if !coord.is_valid_for(self.resolution) {
            return None;
        }
        self.classes.get(coord.index(self.resolution)).copied()
    }

    /// (walk, climb, blocked) cell counts
    pub fn counts(&self) -> (usize, usize, usize) {
        self.classes
            .iter()
            .fold((0, 0, 0), |(walk, climb, blocked), class| match class {
                TraversalClass::Walk => (walk + 1, climb, blocked),
                TraversalClass::Climb => (walk, climb + 1, blocked),
                TraversalClass::Blocked => (walk, climb, blocked + 1),
            })
    }
}
