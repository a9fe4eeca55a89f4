use crate::config::{PathfindingPreset, RouteTarget};
use crate::errors::{WorldgenError, WorldgenResult};
use crate::terrain::steepness::SteepnessSampler;
use crate::terrain::{GridCoord, HeightGrid};
use pathfinding::prelude::bfs;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub mod cost;
pub mod frontier;

pub use cost::{CostModel, TraversalClass, TraversalMap, classify, edge_cost, surcharge};
pub use frontier::MinQueue;

/// A cell discovered by the cost search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchNode {
    pub coord: GridCoord,
    /// Cumulative cost from the start
    pub cost: u64,
    /// Equal to `coord` for the start node
    pub predecessor: GridCoord,
    /// Class of the cell this node was entered into
    pub class: TraversalClass,
}

/// Outcome of the first (cost) phase: every discovered node plus the set of
/// settled cells, which bounds the refinement phase.
#[derive(Debug, Clone)]
pub struct CostSearch {
    resolution: u32,
    start: GridCoord,
    target: GridCoord,
    nodes: Vec<Option<SearchNode>>,
    settled: Vec<bool>,
    settled_count: usize,
}

impl CostSearch {
    pub fn start(&self) -> GridCoord {
        self.start
    }

    pub fn target(&self) -> GridCoord {
        self.target
    }

    pub fn node(&self, coord: GridCoord) -> Option<&SearchNode> {
        if !coord.is_valid_for(self.resolution) {
            return None;
        }
        self.nodes[coord.index(self.resolution)].as_ref()
    }

    /// Optimal cost to the target
    pub fn target_cost(&self) -> u64 {
        self.node(self.target).map(|node| node.cost).unwrap_or(0)
    }

    /// True for cells popped from the frontier, i.e. the corridor
    pub fn is_settled(&self, coord: GridCoord) -> bool {
        coord.is_valid_for(self.resolution) && self.settled[coord.index(self.resolution)]
    }

    pub fn corridor_size(&self) -> usize {
        self.settled_count
    }

    /// Walk the predecessor chain from the target back to the start
    pub fn backtrack(&self) -> WorldgenResult<Vec<GridCoord>> {
        let mut path = vec![self.target];
        let mut current = self.target;
        let limit = self.nodes.len();

        while current != self.start {
            let node = self.node(current).ok_or(WorldgenError::NoPathFound {
                start: self.start,
                target: self.target,
            })?;
            current = node.predecessor;
            path.push(current);

            if path.len() > limit {
                return Err(WorldgenError::InvalidGrid {
                    reason: "Predecessor chain does not reach the start".to_string(),
                });
            }
        }

        path.reverse();
        Ok(path)
    }
}

/// A solved route: the refined path plus what the cost phase found
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub start: GridCoord,
    pub target: GridCoord,
    /// Final path, start and target inclusive
    pub path: Vec<GridCoord>,
    /// Traversal class of each cell of `path`
    pub classes: Vec<TraversalClass>,
    /// Path backtracked straight from the cost phase
    pub raw_path: Vec<GridCoord>,
    /// Optimal cumulative cost found by the cost phase
    pub cost: u64,
    /// Number of cells the refinement phase was allowed to use
    pub corridor_size: usize,
}

impl Route {
    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

/// Two-phase route search over an 8-connected grid
pub struct RouteSolver<'a, S: SteepnessSampler> {
    sampler: &'a S,
    model: &'a CostModel,
}

impl<'a, S: SteepnessSampler> RouteSolver<'a, S> {
    pub fn new(sampler: &'a S, model: &'a CostModel) -> Self {
        Self { sampler, model }
    }

    fn check_bounds(&self, coord: GridCoord) -> WorldgenResult<()> {
        let resolution = self.sampler.resolution();
        if coord.is_valid_for(resolution) {
            Ok(())
        } else {
            Err(WorldgenError::OutOfBounds {
                x: coord.x,
                y: coord.y,
                resolution,
            })
        }
    }

    /// Cost of stepping into `to`, None when it cannot be entered
    pub fn step(&self, from: GridCoord, to: GridCoord) -> Option<(u64, TraversalClass)> {
        self.model.step_cost(from, to, self.sampler.steepness_at(to))
    }

    /// Phase 1: Dijkstra from `start`, stopping when `target` is settled
    pub fn cost_search(&self, start: GridCoord, target: GridCoord) -> WorldgenResult<CostSearch> {
        self.check_bounds(start)?;
        self.check_bounds(target)?;

        let resolution = self.sampler.resolution();
        let cell_count = resolution as usize * resolution as usize;
        let mut nodes: Vec<Option<SearchNode>> = vec![None; cell_count];
        let mut settled = vec![false; cell_count];
        let mut settled_count = 0;
        let mut frontier = MinQueue::with_capacity(cell_count);

        nodes[start.index(resolution)] = Some(SearchNode {
            coord: start,
            cost: 0,
            predecessor: start,
            class: self.model.classify(self.sampler.steepness_at(start)),
        });
        frontier.push(0, start);

        let mut found = false;
        while let Some((cost, current)) = frontier.pop() {
            let index = current.index(resolution);
            if settled[index] {
                continue;
            }
            settled[index] = true;
            settled_count += 1;

            if current == target {
                found = true;
                break;
            }

            for neighbor in current.neighbors(resolution) {
                let neighbor_index = neighbor.index(resolution);
                if settled[neighbor_index] {
                    continue;
                }
                let Some((step_cost, class)) = self.step(current, neighbor) else {
                    continue;
                };

                let candidate = cost + step_cost;
                if let Some(existing) = &nodes[neighbor_index] {
                    if existing.cost <= candidate {
                        continue;
                    }
                }

                nodes[neighbor_index] = Some(SearchNode {
                    coord: neighbor,
                    cost: candidate,
                    predecessor: current,
                    class,
                });
                frontier.push(candidate, neighbor);
            }
        }

        if !found {
            tracing::warn!(
                "Cost search from {start} exhausted {settled_count} cells without reaching {target}"
            );
            return Err(WorldgenError::NoPathFound { start, target });
        }

        let search = CostSearch {
            resolution,
            start,
            target,
            nodes,
            settled,
            settled_count,
        };
        tracing::debug!(
            "Cost search {start} -> {target}: cost {}, {settled_count} cells settled",
            search.target_cost()
        );
        Ok(search)
    }

    /// Phase 2: unweighted breadth-first search confined to the settled cells
    pub fn refine(&self, search: &CostSearch) -> WorldgenResult<Vec<GridCoord>> {
        let resolution = self.sampler.resolution();
        let target = search.target();

        bfs(
            &search.start(),
            |cell: &GridCoord| {
                cell.neighbors(resolution)
                    .filter(|neighbor| search.is_settled(*neighbor))
                    .collect::<Vec<_>>()
            },
            |cell| *cell == target,
        )
        .ok_or(WorldgenError::NoPathFound {
            start: search.start(),
            target,
        })
    }

    /// Run both phases
    pub fn solve(&self, start: GridCoord, target: GridCoord) -> WorldgenResult<Route> {
        let search = self.cost_search(start, target)?;
        let raw_path = search.backtrack()?;
        let path = self.refine(&search)?;
        let classes = path
            .iter()
            .map(|&cell| self.model.classify(self.sampler.steepness_at(cell)))
            .collect();

        tracing::debug!(
            "Route refined from {} to {} cells inside a corridor of {}",
            raw_path.len(),
            path.len(),
            search.corridor_size()
        );

        Ok(Route {
            start,
            target,
            path,
            classes,
            raw_path,
            cost: search.target_cost(),
            corridor_size: search.corridor_size(),
        })
    }

    /// Sum of step costs along a path, None if it enters an impassable cell
    pub fn path_cost(&self, path: &[GridCoord]) -> Option<u64> {
        path.windows(2)
            .map(|pair| self.step(pair[0], pair[1]).map(|(cost, _)| cost))
            .sum()
    }
}

/// Pick uniformly among the cells sharing the maximum height
pub fn select_start<R: Rng>(heights: &HeightGrid, rng: &mut R) -> GridCoord {
    pick(heights.highest_cells(), heights, rng)
}

/// Resolve the configured target. A lowest-point target draws its own tie-break.
pub fn select_target<R: Rng>(heights: &HeightGrid, target: RouteTarget, rng: &mut R) -> GridCoord {
    match target {
        RouteTarget::Center => heights.center(),
        RouteTarget::LowestPoint => pick(heights.lowest_cells(), heights, rng),
    }
}

fn pick<R: Rng>(cells: Vec<GridCoord>, heights: &HeightGrid, rng: &mut R) -> GridCoord {
    if cells.is_empty() {
        return heights.center();
    }
    // Always draw, even for a single candidate, so later draws line up per seed
    cells[rng.gen_range(0..cells.len())]
}

/// Route from the highest peak to the configured target
pub fn find_route<S: SteepnessSampler, R: Rng>(
    heights: &HeightGrid,
    sampler: &S,
    preset: &PathfindingPreset,
    rng: &mut R,
) -> WorldgenResult<Route> {
    if sampler.resolution() != heights.resolution() {
        return Err(WorldgenError::InvalidGrid {
            reason: format!(
                "Steepness resolution {} does not match height resolution {}",
                sampler.resolution(),
                heights.resolution()
            ),
        });
    }

    let model = CostModel::new(preset)?;
    let start = select_start(heights, rng);
    let target = select_target(heights, preset.target, rng);

    RouteSolver::new(sampler, &model).solve(start, target)
}
