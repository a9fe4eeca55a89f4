//! Camp site selection along a finished route, plus the tent scatter around
//! each chosen site.

use crate::pathfinding::{CostModel, MinQueue, TraversalClass};
use crate::terrain::GridCoord;
use crate::terrain::steepness::SteepnessSampler;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A selected settlement location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampSite {
    pub coord: GridCoord,
    /// Summed steepness over the scored window; lower is flatter
    pub area_cost: u32,
    /// Index of `coord` in the route it was picked from
    pub path_index: usize,
}

/// Tents scattered around one camp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampLayout {
    pub site: CampSite,
    pub tents: Vec<GridCoord>,
}

/// Sum of whole-degree steepness over a `size` x `size` window centred on
/// `coord`. Window cells past the edge read the nearest edge cell.
pub fn area_cost<S: SteepnessSampler>(sampler: &S, coord: GridCoord, size: u32) -> u32 {
    let half = (size / 2) as i32;
    let end = size as i32 - half;

    let mut total: u32 = 0;
    for dy in -half..end {
        for dx in -half..end {
            total = total.saturating_add(sampler.steepness_near(coord, dx, dy) as u32);
        }
    }
    total
}

/// Greedy spaced selection. The path is walked from the target back to the
/// start; only Walk cells count toward spacing, and a cell becomes a candidate
/// once `min_distance` walkable steps have passed since the previous one. The
/// first walkable cell is always a candidate. Returns up to `desired_count`
/// candidates, cheapest first.
pub fn select_sites<S: SteepnessSampler>(
    path: &[GridCoord],
    min_distance: u32,
    desired_count: usize,
    area_size: u32,
    sampler: &S,
    model: &CostModel,
) -> Vec<CampSite> {
    let mut candidates = MinQueue::new();
    let mut distance = min_distance;

    for (path_index, &coord) in path.iter().enumerate().rev() {
        if model.classify(sampler.steepness_at(coord)) != TraversalClass::Walk {
            continue;
        }

        distance = distance.saturating_add(1);
        if distance < min_distance {
            continue;
        }

        let area_cost = area_cost(sampler, coord, area_size);
        candidates.push(
            area_cost as u64,
            CampSite {
                coord,
                area_cost,
                path_index,
            },
        );
        distance = 0;
    }

    let found = candidates.len();
    if found < desired_count {
        tracing::debug!("Only {found} camp candidates for {desired_count} requested camps");
    }

    std::iter::from_fn(|| candidates.pop().map(|(_, site)| site))
        .take(desired_count)
        .collect()
}

/// Scatter tents around each site. Earlier (cheaper) camps get more tents:
/// rank `i` of `n` gets `floor((n - i) / n * camp_size)` tents, each offset up
/// to that many cells on both axes and clamped to the grid.
pub fn layout_tents<R: Rng>(
    sites: &[CampSite],
    camp_size: u32,
    resolution: u32,
    rng: &mut R,
) -> Vec<CampLayout> {
    let count = sites.len();

    sites
        .iter()
        .enumerate()
        .map(|(rank, site)| {
            let real_size = ((count - rank) as u64 * camp_size as u64 / count as u64) as i32;
            let tents = (0..real_size)
                .map(|_| {
                    let dx = rng.gen_range(-real_size..real_size);
                    let dy = rng.gen_range(-real_size..real_size);
                    site.coord.offset_clamped(dx, dy, resolution)
                })
                .collect();

            CampLayout { site: *site, tents }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PathfindingPreset;
    use crate::terrain::SteepnessGrid;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    fn model() -> CostModel {
        CostModel::new(&PathfindingPreset {
            max_walkable_steepness: 30.0,
            max_climbable_steepness: 50.0,
            ..PathfindingPreset::default()
        })
        .unwrap()
    }

    /// Straight path along row 0 of a 20x20 grid with varied gentle steepness
    fn straight_path() -> (Vec<GridCoord>, SteepnessGrid) {
        let resolution = 20;
        let values = (0..resolution * resolution)
            .map(|i| ((i * 37) % 29) as f32)
            .collect();
        let steepness = SteepnessGrid::from_values(resolution, values).unwrap();
        let path = (0..resolution).map(|x| GridCoord::new(x, 0)).collect();
        (path, steepness)
    }

    #[test]
    fn test_area_cost_window() {
        let steepness = SteepnessGrid::from_values(3, vec![1.0, 2.0, 3.0, 4.0, 5.5, 6.0, 7.0, 8.0, 9.9]).unwrap();
        assert_eq!(area_cost(&steepness, GridCoord::new(1, 1), 3), 1 + 2 + 3 + 4 + 5 + 6 + 7 + 8 + 9);
        assert_eq!(area_cost(&steepness, GridCoord::new(1, 1), 1), 5);
        // Corner window clamps onto the edge cells
        assert_eq!(area_cost(&steepness, GridCoord::new(0, 0), 3), 1 + 1 + 2 + 1 + 1 + 2 + 4 + 4 + 5);
    }

    #[test]
    fn test_selection_on_length_twenty_path() {
        let (path, steepness) = straight_path();
        assert_eq!(path.len(), 20);

        let sites = select_sites(&path, 5, 3, 3, &steepness, &model());
        assert!(sites.len() <= 3);
        assert!(!sites.is_empty());

        for pair in sites.windows(2) {
            assert!(pair[0].area_cost <= pair[1].area_cost);
        }

        let mut indices: Vec<_> = sites.iter().map(|s| s.path_index).collect();
        indices.sort_unstable();
        for pair in indices.windows(2) {
            assert!(pair[1] - pair[0] >= 5, "Camps at {} and {} are too close", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_default_spacing_fits_short_route() {
        use crate::terrain::constants::{DEFAULT_CAMP_COUNT, DEFAULT_CAMP_MIN_DISTANCE, DEFAULT_CAMP_SIZE};

        let (path, steepness) = straight_path();
        let sites = select_sites(
            &path,
            DEFAULT_CAMP_MIN_DISTANCE,
            DEFAULT_CAMP_COUNT as usize,
            DEFAULT_CAMP_SIZE,
            &steepness,
            &model(),
        );
        assert_eq!(sites.len(), DEFAULT_CAMP_COUNT as usize);
    }

    #[test]
    fn test_candidates_start_at_target_end() {
        let (path, steepness) = straight_path();
        // Every candidate requested: the walk picks indices 19, 14, 9, 4
        let sites = select_sites(&path, 5, usize::MAX, 1, &steepness, &model());
        let mut indices: Vec<_> = sites.iter().map(|s| s.path_index).collect();
        indices.sort_unstable();
        assert_eq!(indices, vec![4, 9, 14, 19]);
    }

    #[test]
    fn test_underflow_returns_fewer_sites() {
        let (path, steepness) = straight_path();
        let sites = select_sites(&path[..3], 5, 3, 3, &steepness, &model());
        assert_eq!(sites.len(), 1);
        assert!(select_sites(&[], 5, 3, 3, &steepness, &model()).is_empty());
    }

    #[test]
    fn test_non_walkable_cells_are_skipped() {
        let mut values = vec![0.0; 25];
        for x in 0..5u32 {
            values[GridCoord::new(x, 2).index(5)] = if x % 2 == 0 { 40.0 } else { 95.0 };
        }
        values[GridCoord::new(1, 2).index(5)] = 10.0;
        let steepness = SteepnessGrid::from_values(5, values).unwrap();
        let path: Vec<_> = (0..5).map(|x| GridCoord::new(x, 2)).collect();

        let sites = select_sites(&path, 1, 5, 1, &steepness, &model());
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].coord, GridCoord::new(1, 2));
        assert_eq!(sites[0].area_cost, 10);
    }

    #[test]
    fn test_tent_layout_shrinks_with_rank() {
        let sites: Vec<_> = (0..3)
            .map(|i| CampSite {
                coord: GridCoord::new(10 + i, 10),
                area_cost: i,
                path_index: i as usize,
            })
            .collect();
        let mut rng = Pcg64::seed_from_u64(9);
        let layouts = layout_tents(&sites, 6, 32, &mut rng);

        let counts: Vec<_> = layouts.iter().map(|l| l.tents.len()).collect();
        assert_eq!(counts, vec![6, 4, 2]);

        for layout in &layouts {
            let reach = layout.tents.len() as u32;
            for tent in &layout.tents {
                assert!(tent.is_valid_for(32));
                assert!(tent.chebyshev_distance(&layout.site.coord) <= reach);
            }
        }

        let mut again = Pcg64::seed_from_u64(9);
        assert_eq!(layout_tents(&sites, 6, 32, &mut again), layouts);
    }

    #[test]
    fn test_tents_clamped_at_grid_edge() {
        let site = CampSite {
            coord: GridCoord::new(0, 0),
            area_cost: 0,
            path_index: 0,
        };
        let mut rng = Pcg64::seed_from_u64(1);
        let layouts = layout_tents(&[site], 10, 4, &mut rng);
        assert_eq!(layouts[0].tents.len(), 10);
        assert!(layouts[0].tents.iter().all(|t| t.is_valid_for(4)));
    }
}
