//! Per-tick traversal costs and blocked mask derived from belief.
//!
//! Cost inflation biases the planner toward safer, better-known routes:
//! the risk term penalizes likely-occupied cells and the unknown term
//! penalizes cells still near probability 0.5, so a known-free detour beats
//! blind traversal of unexplored territory when one exists.

use serde::{Deserialize, Serialize};

use crate::core::{Cell, Grid};
use crate::mapping::BeliefMap;

/// Planner risk posture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostConfig {
    /// Occupancy probability at or above which a cell is untraversable.
    pub p_block: f32,

    /// Weight of the occupancy-probability cost term.
    pub w_risk: f32,

    /// Weight of the uncertainty cost term (peaks at probability 0.5).
    pub w_unknown: f32,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            p_block: 0.7,
            w_risk: 2.0,
            w_unknown: 1.0,
        }
    }
}

/// Planner-consumable view of the belief at one tick.
///
/// Rebuilt from the belief map every tick into fresh buffers and owned by
/// the tick that produced it; never persisted across ticks.
#[derive(Debug, Clone)]
pub struct CostField {
    grid: Grid,
    config: CostConfig,
    /// Row-major traversal cost, >= 1.0 everywhere.
    cost: Vec<f32>,
    /// Row-major blocked mask.
    blocked: Vec<bool>,
}

impl CostField {
    /// Derive the field from the current belief.
    ///
    /// `start` and `goal` are forced traversable regardless of belief so
    /// the search stays well-posed.
    pub fn build(belief: &BeliefMap, config: &CostConfig, start: Cell, goal: Cell) -> Self {
        let grid = belief.grid();
        let mut cost = vec![1.0f32; grid.area()];
        let mut blocked = vec![false; grid.area()];

        for y in 0..grid.size() {
            for x in 0..grid.size() {
                let cell = Cell::new(x, y);
                let idx = grid.index(cell);
                let p = belief.probability(cell);

                if p >= config.p_block {
                    blocked[idx] = true;
                }
                let uncertainty = 1.0 - 2.0 * (p - 0.5).abs();
                cost[idx] = 1.0 + config.w_risk * p + config.w_unknown * uncertainty;
            }
        }

        blocked[grid.index(start)] = false;
        blocked[grid.index(goal)] = false;

        Self {
            grid,
            config: config.clone(),
            cost,
            blocked,
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn config(&self) -> &CostConfig {
        &self.config
    }

    /// Cost of moving into a cell.
    #[inline]
    pub fn cost(&self, cell: Cell) -> f32 {
        self.cost[self.grid.index(cell)]
    }

    /// Whether a cell is untraversable under the current belief.
    #[inline]
    pub fn is_blocked(&self, cell: Cell) -> bool {
        self.blocked[self.grid.index(cell)]
    }
}
