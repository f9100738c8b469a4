//! Frontier detection: where known-free space meets the unexplored.
//!
//! When the goal is unreachable under the current belief, the agent
//! explores instead. A frontier cell is a cell observed and believed
//! traversable that has at least one 4-neighbor never observed at all;
//! moving there is guaranteed to widen the known map.

use serde::{Deserialize, Serialize};

use crate::core::{manhattan, Cell};
use crate::mapping::BeliefMap;

/// Configuration for frontier detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontierConfig {
    /// Maximum number of candidates returned per query.
    ///
    /// Bounds how many exploration plans one tick may attempt.
    pub max_candidates: usize,
}

impl Default for FrontierConfig {
    fn default() -> Self {
        Self { max_candidates: 8 }
    }
}

/// Frontier detector.
#[derive(Debug, Clone)]
pub struct FrontierFinder {
    config: FrontierConfig,
}

impl FrontierFinder {
    pub fn new(config: FrontierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FrontierConfig {
        &self.config
    }

    /// Collect frontier cells, closest to `from` first.
    ///
    /// A cell qualifies when it has been observed at least once, its
    /// occupancy probability is below `p_block`, and some 4-neighbor is
    /// still unknown (log-odds exactly zero). The result is sorted by
    /// Manhattan distance from `from` and truncated to the configured
    /// candidate cap.
    pub fn find(&self, belief: &BeliefMap, from: Cell, p_block: f32) -> Vec<Cell> {
        let grid = belief.grid();
        let mut frontiers = Vec::new();

        for y in 0..grid.size() {
            for x in 0..grid.size() {
                let cell = Cell::new(x, y);
                if !belief.observed(cell) || belief.probability(cell) >= p_block {
                    continue;
                }
                let touches_unknown = grid
                    .neighbors4(cell)
                    .into_iter()
                    .any(|neighbor| !belief.observed(neighbor));
                if touches_unknown {
                    frontiers.push(cell);
                }
            }
        }

        frontiers.sort_by_key(|&cell| manhattan(from, cell));
        frontiers.truncate(self.config.max_candidates);
        frontiers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Grid;
    use crate::mapping::{BeliefConfig, BeliefMap};
    use crate::sensing::Observation;

    /// Belief with columns x < 5 observed free, the rest untouched.
    fn half_explored_belief() -> BeliefMap {
        let mut belief = BeliefMap::new(Grid::new(10), BeliefConfig::default());
        let mut observations = Vec::new();
        for x in 0..5 {
            for y in 0..10 {
                observations.push(Observation {
                    cell: Cell::new(x, y),
                    occupied: false,
                });
            }
        }
        belief.integrate(&observations);
        belief
    }

    #[test]
    fn test_frontier_on_explored_boundary() {
        let belief = half_explored_belief();
        let finder = FrontierFinder::new(FrontierConfig { max_candidates: 16 });

        let frontiers = finder.find(&belief, Cell::new(0, 0), 0.7);

        assert_eq!(frontiers.len(), 10);
        assert!(frontiers.iter().all(|c| c.x == 4));
    }

    #[test]
    fn test_sorted_by_distance_and_capped() {
        let belief = half_explored_belief();
        let finder = FrontierFinder::new(FrontierConfig::default());

        let frontiers = finder.find(&belief, Cell::new(0, 0), 0.7);

        assert_eq!(frontiers.len(), 8);
        assert_eq!(frontiers[0], Cell::new(4, 0));
        for pair in frontiers.windows(2) {
            assert!(
                manhattan(Cell::new(0, 0), pair[0]) <= manhattan(Cell::new(0, 0), pair[1])
            );
        }
    }

    #[test]
    fn test_unknown_cells_are_not_frontiers() {
        let belief = BeliefMap::new(Grid::new(10), BeliefConfig::default());
        let finder = FrontierFinder::new(FrontierConfig::default());

        let frontiers = finder.find(&belief, Cell::new(0, 0), 0.7);

        assert!(frontiers.is_empty());
    }

    #[test]
    fn test_occupied_cells_are_not_frontiers() {
        let mut belief = BeliefMap::new(Grid::new(10), BeliefConfig::default());
        belief.integrate(&[Observation {
            cell: Cell::new(3, 3),
            occupied: true,
        }]);
        let finder = FrontierFinder::new(FrontierConfig::default());

        let frontiers = finder.find(&belief, Cell::new(0, 0), 0.7);

        assert!(frontiers.is_empty());
    }

    #[test]
    fn test_fully_observed_map_has_no_frontiers() {
        let mut belief = BeliefMap::new(Grid::new(6), BeliefConfig::default());
        let mut observations = Vec::new();
        for x in 0..6 {
            for y in 0..6 {
                observations.push(Observation {
                    cell: Cell::new(x, y),
                    occupied: false,
                });
            }
        }
        belief.integrate(&observations);
        let finder = FrontierFinder::new(FrontierConfig::default());

        let frontiers = finder.find(&belief, Cell::new(0, 0), 0.7);

        assert!(frontiers.is_empty());
    }
}
