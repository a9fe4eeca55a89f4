use crate::camps::{CampLayout, layout_tents, select_sites};
use crate::config::WorldConfig;
use crate::errors::{WorldgenError, WorldgenResult};
use crate::pathfinding::{CostModel, Route, TraversalMap, find_route};
use crate::terrain::{HeightGrid, HeightmapGenerator, SteepnessGrid, SteepnessSampler};
use rand::SeedableRng;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Everything one generation pass produces, ready for a renderer or scene
/// builder to consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldLayout {
    pub config: WorldConfig,
    pub heights: HeightGrid,
    pub steepness: SteepnessGrid,
    pub traversal: TraversalMap,
    pub route: Route,
    /// Cheapest camp first
    pub camps: Vec<CampLayout>,
}

impl WorldLayout {
    /// Run the whole pipeline from one seeded generator. Draw order: noise
    /// offset, start tie-break, target tie-break, tents.
    pub fn generate(config: &WorldConfig) -> WorldgenResult<Self> {
        config.validate_all()?;

        let mut rng = Pcg64::seed_from_u64(config.terrain.seed);

        let heights = HeightmapGenerator::new(&config.terrain, &mut rng).generate()?;
        let steepness = SteepnessGrid::from_heights(&heights, config.terrain.map_depth);
        let model = CostModel::new(&config.pathfinding)?;
        let traversal = model.classify_grid(&steepness);

        let route = find_route(&heights, &steepness, &config.pathfinding, &mut rng)?;

        let sites = select_sites(
            &route.path,
            config.camps.min_distance,
            config.camps.count as usize,
            config.camps.camp_size,
            &steepness,
            &model,
        );
        let camps = layout_tents(&sites, config.camps.camp_size, steepness.resolution(), &mut rng);

        let (walk, climb, blocked) = traversal.counts();
        tracing::info!(
            "World layout ready: route {} -> {} with {} cells (cost {}), {} camps, terrain {walk} walk / {climb} climb / {blocked} blocked",
            route.start,
            route.target,
            route.len(),
            route.cost,
            camps.len()
        );

        Ok(Self {
            config: config.clone(),
            heights,
            steepness,
            traversal,
            route,
            camps,
        })
    }

    /// Directory saved layouts live in, relative to the working directory
    pub fn get_layouts_dir() -> WorldgenResult<PathBuf> {
        Ok(std::env::current_dir()?.join("layouts"))
    }

    /// Load a layout from the layouts directory
    pub fn load_from_file<P: AsRef<Path>>(filename: P) -> WorldgenResult<Self> {
        validate_layout_path(filename.as_ref())?;
        Self::load_from_path(Self::get_layouts_dir()?.join(filename))
    }

    /// Save into the layouts directory, creating subdirectories as needed
    pub fn save_to_file<P: AsRef<Path>>(&self, filename: P) -> WorldgenResult<PathBuf> {
        validate_layout_path(filename.as_ref())?;
        let file_path = Self::get_layouts_dir()?.join(filename);
        self.save_to_path(&file_path)?;
        Ok(file_path)
    }

    pub fn load_from_path<P: AsRef<Path>>(file_path: P) -> WorldgenResult<Self> {
        let file_path = file_path.as_ref();
        if !file_path.exists() {
            return Err(WorldgenError::LayoutFileNotFound {
                path: file_path.to_path_buf(),
            });
        }

        let data = std::fs::read(file_path)?;
        let (layout, _): (WorldLayout, usize) =
            bincode::serde::decode_from_slice(&data, bincode::config::standard()).map_err(|e| {
                WorldgenError::CorruptedLayoutFile {
                    reason: format!("Failed to deserialize layout data: {e}"),
                }
            })?;

        layout.check_consistency()?;
        Ok(layout)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, file_path: P) -> WorldgenResult<()> {
        self.check_consistency()?;

        let file_path = file_path.as_ref();
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = bincode::serde::encode_to_vec(self, bincode::config::standard())?;
        std::fs::write(file_path, data)?;

        tracing::debug!("Saved layout to {}", file_path.display());
        Ok(())
    }

    /// Grids must agree on resolution and every stored cell must lie on the
    /// grid. Grid lengths are checked by the grid constructors on decode.
    fn check_consistency(&self) -> WorldgenResult<()> {
        let resolution = self.heights.resolution();
        let grids = [
            ("Steepness", self.steepness.resolution()),
            ("Traversal", self.traversal.resolution()),
        ];
        for (name, other) in grids {
            if other != resolution {
                return Err(WorldgenError::CorruptedLayoutFile {
                    reason: format!(
                        "{name} resolution {other} does not match height resolution {resolution}"
                    ),
                });
            }
        }

        let mut route_cells = self
            .route
            .path
            .iter()
            .chain(&self.route.raw_path)
            .chain([&self.route.start, &self.route.target]);
        if let Some(cell) = route_cells.find(|c| !c.is_valid_for(resolution)) {
            return Err(WorldgenError::CorruptedLayoutFile {
                reason: format!("Route cell {cell} lies outside the {resolution}x{resolution} grid"),
            });
        }

        let mut camp_cells = self
            .camps
            .iter()
            .flat_map(|camp| std::iter::once(&camp.site.coord).chain(&camp.tents));
        if let Some(cell) = camp_cells.find(|c| !c.is_valid_for(resolution)) {
            return Err(WorldgenError::CorruptedLayoutFile {
                reason: format!("Camp cell {cell} lies outside the {resolution}x{resolution} grid"),
            });
        }

        Ok(())
    }
}

/// Layout paths are relative to the layouts directory and may not climb out of it
pub fn validate_layout_path(filename: &Path) -> WorldgenResult<()> {
    if filename.is_absolute() {
        return Err(WorldgenError::InvalidConfig {
            reason: format!(
                "Layout path must be relative to the layouts directory, got absolute path: {}",
                filename.display()
            ),
        });
    }

    if filename
        .components()
        .any(|c| matches!(c, std::path::Component::ParentDir))
    {
        return Err(WorldgenError::InvalidConfig {
            reason: "Layout path cannot contain '..'".to_string(),
        });
    }

    Ok(())
}
