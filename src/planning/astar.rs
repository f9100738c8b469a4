//! Cost-aware A* search over the 4-connected grid.
//!
//! The heuristic is Manhattan distance, admissible because every cell costs
//! at least 1.0 to enter. An unreachable target yields an empty path; that
//! is a normal result the caller's state machine handles, not an error.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::core::{manhattan, Cell};
use crate::planning::CostField;

/// Shortest-cost path planner.
#[derive(Debug, Clone, Copy, Default)]
pub struct Planner;

impl Planner {
    pub fn new() -> Self {
        Self
    }

    /// Search for the cheapest path from `start` to `goal`.
    ///
    /// Returns the full cell sequence including both endpoints, or an empty
    /// vector when no path exists under the field's blocked mask. Equal-cost
    /// expansions pop in insertion order, so repeated searches over the same
    /// field reproduce the same path.
    pub fn search(&self, field: &CostField, start: Cell, goal: Cell) -> Vec<Cell> {
        let grid = field.grid();
        if !grid.in_bounds(start) || !grid.in_bounds(goal) {
            return Vec::new();
        }
        if start == goal {
            return vec![start];
        }

        let mut g_score = vec![f32::INFINITY; grid.area()];
        let mut came_from: Vec<Option<Cell>> = vec![None; grid.area()];
        let mut open_set = BinaryHeap::new();
        let mut sequence = 0u64;

        g_score[grid.index(start)] = 0.0;
        open_set.push(SearchNode {
            cell: start,
            f_score: manhattan(start, goal) as f32,
            sequence,
        });

        while let Some(current) = open_set.pop() {
            if current.cell == goal {
                return self.reconstruct_path(&came_from, &grid, start, goal);
            }

            let current_g = g_score[grid.index(current.cell)];

            for neighbor in grid.neighbors4(current.cell) {
                if field.is_blocked(neighbor) {
                    continue;
                }

                let idx = grid.index(neighbor);
                let tentative_g = current_g + field.cost(neighbor);

                if tentative_g < g_score[idx] {
                    g_score[idx] = tentative_g;
                    came_from[idx] = Some(current.cell);
                    sequence += 1;
                    open_set.push(SearchNode {
                        cell: neighbor,
                        f_score: tentative_g + manhattan(neighbor, goal) as f32,
                        sequence,
                    });
                }
            }
        }

        Vec::new()
    }

    fn reconstruct_path(
        &self,
        came_from: &[Option<Cell>],
        grid: &crate::core::Grid,
        start: Cell,
        goal: Cell,
    ) -> Vec<Cell> {
        let mut path = vec![goal];
        let mut current = goal;

        while current != start {
            match came_from[grid.index(current)] {
                Some(prev) => {
                    path.push(prev);
                    current = prev;
                }
                None => break,
            }
        }

        path.reverse();
        path
    }
}

/// Node in the A* open set.
#[derive(Clone, Copy)]
struct SearchNode {
    cell: Cell,
    f_score: f32,
    /// Monotone insertion counter; earlier insertions win cost ties.
    sequence: u64,
}

impl Eq for SearchNode {}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.cell == other.cell && self.sequence == other.sequence
    }
}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (lower f_score = higher priority),
        // then lower sequence number first.
        other
            .f_score
            .partial_cmp(&self.f_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
