//! Log-odds occupancy belief fused from noisy observations.
//!
//! Uses the log-odds representation of a binary Bayes filter:
//!
//! ```text
//! P(occupied) = 1 / (1 + exp(-log_odds))
//!
//! Update: log_odds_new = log_odds_old + log_odds_observation
//! ```
//!
//! Independent observations combine by simple addition, values clamp
//! cleanly, and no observation history needs to be stored. A cell that has
//! never been observed keeps log-odds of exactly 0.0 (probability 0.5) for
//! the life of the run; that is the crate's definition of "unknown".
//!
//! The belief is the only mutable map state across ticks. It has a single
//! writer (observation integration); if the crate were ever extended to
//! concurrent readers, integration must remain the sole writer.

use serde::{Deserialize, Serialize};

use crate::core::{Cell, Grid};
use crate::sensing::Observation;

/// Cell classification derived from belief.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    /// Never observed, or observations cancelled out exactly.
    Unknown,
    /// Believed empty.
    Free,
    /// Believed to contain an obstacle.
    Occupied,
}

/// Configuration for the belief map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeliefConfig {
    /// Log-odds increment for an occupied reading.
    ///
    /// Higher = an "occupied" measurement is believed more strongly.
    pub l_occ: f32,

    /// Log-odds decrement magnitude for a free reading.
    pub l_free: f32,

    /// Minimum log-odds value (clamp).
    pub l_min: f32,

    /// Maximum log-odds value (clamp).
    ///
    /// Clamping bounds confidence and keeps the logistic transform well
    /// away from saturation.
    pub l_max: f32,

    /// Log-odds threshold above which a cell classifies as occupied.
    pub occupied_threshold: f32,

    /// Log-odds threshold below which a cell classifies as free.
    pub free_threshold: f32,
}

impl Default for BeliefConfig {
    fn default() -> Self {
        Self {
            l_occ: 2.2,
            l_free: 2.2,
            l_min: -8.0,
            l_max: 8.0,
            occupied_threshold: 0.5,
            free_threshold: -0.5,
        }
    }
}

/// Per-cell log-odds occupancy estimate.
///
/// One dense row-major buffer, allocated once per run and mutated in place
/// by observation integration. Never reset mid-run.
#[derive(Debug, Clone)]
pub struct BeliefMap {
    grid: Grid,
    config: BeliefConfig,
    /// Row-major log-odds, 0.0 = unknown.
    cells: Vec<f32>,
}

impl BeliefMap {
    pub fn new(grid: Grid, config: BeliefConfig) -> Self {
        let cells = vec![0.0; grid.area()];
        Self {
            grid,
            config,
            cells,
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn config(&self) -> &BeliefConfig {
        &self.config
    }

    /// Log-odds value at a cell.
    #[inline]
    pub fn log_odds(&self, cell: Cell) -> f32 {
        self.cells[self.grid.index(cell)]
    }

    /// Occupancy probability (0.0 to 1.0).
    #[inline]
    pub fn probability(&self, cell: Cell) -> f32 {
        1.0 / (1.0 + (-self.log_odds(cell)).exp())
    }

    /// Whether the cell has ever been observed.
    #[inline]
    pub fn observed(&self, cell: Cell) -> bool {
        self.log_odds(cell) != 0.0
    }

    /// Fuse a batch of observations into the belief.
    pub fn integrate(&mut self, observations: &[Observation]) {
        for obs in observations {
            let idx = self.grid.index(obs.cell);
            let delta = if obs.occupied {
                self.config.l_occ
            } else {
                -self.config.l_free
            };
            self.cells[idx] =
                (self.cells[idx] + delta).clamp(self.config.l_min, self.config.l_max);
        }
    }

    /// Classify a cell against the configured thresholds.
    pub fn state(&self, cell: Cell) -> CellState {
        let log_odds = self.log_odds(cell);
        if log_odds >= self.config.occupied_threshold {
            CellState::Occupied
        } else if log_odds <= self.config.free_threshold {
            CellState::Free
        } else {
            CellState::Unknown
        }
    }

    /// Count cells by state: (free, unknown, occupied).
    pub fn count_cells(&self) -> (usize, usize, usize) {
        let mut free = 0;
        let mut unknown = 0;
        let mut occupied = 0;
        for &log_odds in &self.cells {
            if log_odds >= self.config.occupied_threshold {
                occupied += 1;
            } else if log_odds <= self.config.free_threshold {
                free += 1;
            } else {
                unknown += 1;
            }
        }
        (free, unknown, occupied)
    }

    /// Fraction of cells observed at least once.
    pub fn explored_fraction(&self) -> f32 {
        let observed = self.cells.iter().filter(|&&l| l != 0.0).count();
        observed as f32 / self.grid.area() as f32
    }

    /// Copy the occupancy probabilities out for a renderer or recorder.
    pub fn snapshot(&self) -> BeliefSnapshot {
        let probabilities = self
            .cells
            .iter()
            .map(|&l| 1.0 / (1.0 + (-l).exp()))
            .collect();
        BeliefSnapshot {
            size: self.grid.size(),
            probabilities,
        }
    }
}

/// Occupancy probabilities frozen at a tick, for observers outside the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeliefSnapshot {
    pub size: usize,
    /// Row-major occupancy probabilities.
    pub probabilities: Vec<f32>,
}

impl BeliefSnapshot {
    pub fn probability(&self, cell: Cell) -> f32 {
        self.probabilities[cell.y * self.size + cell.x]
    }
}
