use ridgeway::config::range_types::{Lacunarity, Octaves, Persistence};
use ridgeway::config::{BlockedPolicy, RouteTarget, WorldConfig};
use ridgeway::errors::{WorldgenError, WorldgenResult};

/// Named terrain shapes. Individual flags still override them.
pub fn apply_terrain_preset(config: &mut WorldConfig, name: &str) -> WorldgenResult<()> {
    let terrain = &mut config.terrain;
    match name {
        "default" => {}
        "gentle" => {
            terrain.map_depth = 8.0;
            terrain.octaves = Octaves::new(3);
            terrain.scale = 2.0;
        }
        "alpine" => {
            terrain.map_depth = 40.0;
            terrain.octaves = Octaves::new(6);
            terrain.persistence = Persistence::new(0.55);
            terrain.scale = 4.0;
        }
        "island" => {
            terrain.falloff.power = 2.0;
            terrain.falloff.scale = 4.0;
        }
        _ => {
            return Err(WorldgenError::InvalidConfig {
                reason: format!(
                    "Unknown terrain preset: '{name}'. Available presets: default, gentle, alpine, island"
                ),
            });
        }
    }
    Ok(())
}

/// Layers command-line overrides on top of a base config
pub struct LayoutBuilder {
    config: WorldConfig,
}

impl LayoutBuilder {
    pub fn new(base: WorldConfig) -> Self {
        Self { config: base }
    }

    pub fn preset(mut self, name: Option<&str>) -> WorldgenResult<Self> {
        if let Some(name) = name {
            apply_terrain_preset(&mut self.config, name)?;
        }
        Ok(self)
    }

    pub fn seed(mut self, seed: Option<u64>) -> Self {
        if let Some(seed) = seed {
            self.config.terrain.seed = seed;
        }
        self
    }

    pub fn width(mut self, width: Option<u32>) -> Self {
        if let Some(width) = width {
            self.config.terrain.map_width = width;
        }
        self
    }

    pub fn depth(mut self, depth: Option<f32>) -> Self {
        if let Some(depth) = depth {
            self.config.terrain.map_depth = depth;
        }
        self
    }

    pub fn noise(
        mut self,
        octaves: Option<i32>,
        persistence: Option<f32>,
        lacunarity: Option<f32>,
        scale: Option<f32>,
    ) -> Self {
        let terrain = &mut self.config.terrain;
        if let Some(octaves) = octaves {
            terrain.octaves = Octaves::from(octaves);
        }
        if let Some(persistence) = persistence {
            terrain.persistence = Persistence::new(persistence);
        }
        if let Some(lacunarity) = lacunarity {
            terrain.lacunarity = Lacunarity::new(lacunarity);
        }
        if let Some(scale) = scale {
            terrain.scale = scale;
        }
        self
    }

    pub fn falloff(mut self, falloff: Option<(f32, f32)>, radius: Option<f32>) -> Self {
        if let Some((power, scale)) = falloff {
            self.config.terrain.falloff.power = power;
            self.config.terrain.falloff.scale = scale;
        }
        if let Some(radius) = radius {
            self.config.terrain.falloff.radius = radius;
        }
        self
    }

    pub fn thresholds(mut self, thresholds: Option<(f32, f32)>) -> Self {
        if let Some((walkable, climbable)) = thresholds {
            self.config.pathfinding.max_walkable_steepness = walkable;
            self.config.pathfinding.max_climbable_steepness = climbable;
        }
        self
    }

    pub fn priorities(mut self, priorities: Option<(u32, u32, u32)>) -> Self {
        if let Some((base, walk, climb)) = priorities {
            self.config.pathfinding.priority_base = base;
            self.config.pathfinding.priority_walk = walk;
            self.config.pathfinding.priority_climb = climb;
        }
        self
    }

    pub fn unscaled_costs(mut self, unscaled: bool) -> Self {
        if unscaled {
            self.config.pathfinding.scale_by_steepness = false;
        }
        self
    }

    pub fn blocked_policy(mut self, policy: Option<BlockedPolicy>) -> Self {
        if let Some(policy) = policy {
            self.config.pathfinding.blocked_policy = policy;
        }
        self
    }

    pub fn target(mut self, target: Option<RouteTarget>) -> Self {
        if let Some(target) = target {
            self.config.pathfinding.target = target;
        }
        self
    }

    pub fn camps(
        mut self,
        count: Option<u32>,
        min_distance: Option<u32>,
        camp_size: Option<u32>,
    ) -> Self {
        let camps = &mut self.config.camps;
        if let Some(count) = count {
            camps.count = count;
        }
        if let Some(min_distance) = min_distance {
            camps.min_distance = min_distance;
        }
        if let Some(camp_size) = camp_size {
            camps.camp_size = camp_size;
        }
        self
    }

    pub fn build(self) -> WorldgenResult<WorldConfig> {
        self.config.validate_all()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_base_without_overrides() {
        let config = LayoutBuilder::new(WorldConfig::default())
            .seed(None)
            .width(None)
            .build()
            .unwrap();
        assert_eq!(config, WorldConfig::default());
    }

    #[test]
    fn test_builder_applies_overrides() {
        let config = LayoutBuilder::new(WorldConfig::default())
            .seed(Some(12345))
            .width(Some(64))
            .noise(Some(0), Some(0.4), None, Some(2.5))
            .thresholds(Some((25.0, 45.0)))
            .blocked_policy(Some(BlockedPolicy::Impassable))
            .camps(Some(5), Some(10), None)
            .build()
            .unwrap();

        assert_eq!(config.terrain.seed, 12345);
        assert_eq!(config.terrain.map_width, 64);
        assert_eq!(config.terrain.octaves.get(), 1);
        assert_eq!(config.terrain.persistence.get(), 0.4);
        assert_eq!(config.terrain.scale, 2.5);
        assert_eq!(config.pathfinding.max_walkable_steepness, 25.0);
        assert_eq!(config.pathfinding.blocked_policy, BlockedPolicy::Impassable);
        assert_eq!(config.camps.count, 5);
        assert_eq!(config.camps.min_distance, 10);
    }

    #[test]
    fn test_flags_override_preset() {
        let config = LayoutBuilder::new(WorldConfig::default())
            .preset(Some("alpine"))
            .unwrap()
            .depth(Some(90.0))
            .build()
            .unwrap();
        assert_eq!(config.terrain.octaves.get(), 6);
        assert_eq!(config.terrain.map_depth, 90.0);
    }

    #[test]
    fn test_unknown_preset() {
        assert!(LayoutBuilder::new(WorldConfig::default()).preset(Some("lunar")).is_err());
    }

    #[test]
    fn test_build_rejects_unordered_thresholds() {
        let result = LayoutBuilder::new(WorldConfig::default())
            .thresholds(Some((60.0, 40.0)))
            .build();
        assert!(matches!(result, Err(WorldgenError::ThresholdsOutOfOrder { .. })));
    }
}
