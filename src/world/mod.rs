//! Ground-truth obstacle layout.
//!
//! The environment is generated once per run from the run's seeded RNG and
//! is immutable afterwards. Generation keeps sampling layouts until a
//! breadth-first reachability check confirms that start and goal are
//! connected through free cells, so a run can never begin on a disconnected
//! map. Only the sensor may read ground truth; everything else in the crate
//! works from the belief map.

use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::Rng;

use crate::core::{Cell, Grid};
use crate::error::{MargaError, Result};

/// Bounded retries before generation gives up and reports a
/// configuration error.
const MAX_GENERATION_ATTEMPTS: usize = 50;

/// Static N×N boolean occupancy grid, immutable after generation.
#[derive(Debug, Clone)]
pub struct TrueEnvironment {
    grid: Grid,
    /// Row-major occupancy: true = blocked.
    cells: Vec<bool>,
    start: Cell,
    goal: Cell,
}

impl TrueEnvironment {
    /// Generate a solvable obstacle layout.
    ///
    /// Places `round(density * (N² - 2))` blocked cells on cells other than
    /// start and goal, then verifies start→goal connectivity through free
    /// 4-neighbors. Disconnected layouts are discarded and re-sampled up to
    /// [`MAX_GENERATION_ATTEMPTS`] times.
    pub fn generate(
        size: usize,
        density: f32,
        start: Cell,
        goal: Cell,
        rng: &mut SmallRng,
    ) -> Result<Self> {
        let grid = Grid::new(size);
        let obstacle_count =
            (((grid.area() - 2) as f32) * density).round() as usize;
        let obstacle_count = obstacle_count.min(grid.area() - 2);

        for attempt in 0..MAX_GENERATION_ATTEMPTS {
            let cells = Self::sample_layout(grid, obstacle_count, start, goal, rng);
            let env = Self {
                grid,
                cells,
                start,
                goal,
            };
            if env.free_path_steps().is_some() {
                if attempt > 0 {
                    log::debug!(
                        "environment generation succeeded after {} discarded layouts",
                        attempt
                    );
                }
                return Ok(env);
            }
        }

        Err(MargaError::GenerationExhausted(MAX_GENERATION_ATTEMPTS))
    }

    /// Build a hand-authored layout.
    ///
    /// No solvability check is performed; test harnesses use this to set up
    /// enclosed or unreachable scenes on purpose.
    pub fn from_cells(size: usize, blocked: &[Cell], start: Cell, goal: Cell) -> Self {
        let grid = Grid::new(size);
        let mut cells = vec![false; grid.area()];
        for &cell in blocked {
            cells[grid.index(cell)] = true;
        }
        Self {
            grid,
            cells,
            start,
            goal,
        }
    }

    fn sample_layout(
        grid: Grid,
        obstacle_count: usize,
        start: Cell,
        goal: Cell,
        rng: &mut SmallRng,
    ) -> Vec<bool> {
        let mut cells = vec![false; grid.area()];
        let mut placed = 0;
        while placed < obstacle_count {
            let cell = Cell::new(rng.gen_range(0..grid.size()), rng.gen_range(0..grid.size()));
            if cell == start || cell == goal {
                continue;
            }
            let idx = grid.index(cell);
            if !cells[idx] {
                cells[idx] = true;
                placed += 1;
            }
        }
        cells
    }

    /// Whether a cell contains an obstacle.
    ///
    /// This is the only ground-truth query the rest of the crate may use,
    /// and only the sensor calls it.
    #[inline]
    pub fn is_blocked(&self, cell: Cell) -> bool {
        self.cells[self.grid.index(cell)]
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn goal(&self) -> Cell {
        self.goal
    }

    /// Number of obstacle cells in the layout.
    pub fn obstacle_count(&self) -> usize {
        self.cells.iter().filter(|&&blocked| blocked).count()
    }

    /// Length in moves of the shortest free-cell path from start to goal,
    /// or `None` when start and goal are disconnected.
    ///
    /// Plain BFS over free 4-neighbors; this is the generation contract
    /// check, also useful to harnesses as the optimal-ticks baseline.
    pub fn free_path_steps(&self) -> Option<usize> {
        let mut distance = vec![usize::MAX; self.grid.area()];
        let mut queue = VecDeque::new();

        distance[self.grid.index(self.start)] = 0;
        queue.push_back(self.start);

        while let Some(cell) = queue.pop_front() {
            let dist = distance[self.grid.index(cell)];
            if cell == self.goal {
                return Some(dist);
            }
            for neighbor in self.grid.neighbors4(cell) {
                let idx = self.grid.index(neighbor);
                if !self.cells[idx] && distance[idx] == usize::MAX {
                    distance[idx] = dist + 1;
                    queue.push_back(neighbor);
                }
            }
        }

        None
    }
}
