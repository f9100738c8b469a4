//! Navigation state machine: plan, advance, wait, backtrack.
//!
//! The agent consumes one freshly rebuilt cost field per tick and makes a
//! single decision: step toward the goal, step toward a frontier, hold in
//! place, or retreat along its own motion history. "No path" and "waiting"
//! are recoverable, expected conditions; only an exhausted history while
//! cornered is a hard failure.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::Cell;
use crate::exploration::FrontierFinder;
use crate::mapping::BeliefMap;
use crate::planning::{CostField, Planner};

/// Agent mode, reported every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavMode {
    /// Advancing along a planned path to the goal.
    Seeking,

    /// Goal unreachable under current belief; advancing toward a frontier.
    Exploring,

    /// No step possible this tick; holding in place.
    Waiting,

    /// Retreated one cell along the motion history.
    Backtracking,

    /// Goal cell reached (terminal success).
    GoalReached,

    /// Cornered with no history left to retreat through (terminal failure).
    Stuck,
}

impl NavMode {
    /// Terminal modes absorb all further ticks.
    pub fn is_terminal(&self) -> bool {
        matches!(self, NavMode::GoalReached | NavMode::Stuck)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NavMode::Seeking => "SEEKING",
            NavMode::Exploring => "EXPLORING",
            NavMode::Waiting => "WAITING",
            NavMode::Backtracking => "BACKTRACKING",
            NavMode::GoalReached => "GOAL_REACHED",
            NavMode::Stuck => "STUCK",
        }
    }
}

/// Configuration for the navigation agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Consecutive stepless ticks before the agent backtracks.
    pub max_wait: u32,

    /// Maximum retained history entries; oldest entries are dropped past
    /// the limit. 0 means unbounded.
    pub history_limit: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_wait: 3,
            history_limit: 1024,
        }
    }
}

/// The navigating agent: current cell, motion history, wait counter, mode.
pub struct NavigationAgent {
    config: AgentConfig,
    cell: Cell,
    goal: Cell,
    /// Previously occupied cells, most recent at the back.
    history: VecDeque<Cell>,
    wait_count: u32,
    mode: NavMode,
}

impl NavigationAgent {
    pub fn new(config: AgentConfig, start: Cell, goal: Cell) -> Self {
        Self {
            config,
            cell: start,
            goal,
            history: VecDeque::new(),
            wait_count: 0,
            mode: NavMode::Seeking,
        }
    }

    pub fn cell(&self) -> Cell {
        self.cell
    }

    pub fn goal(&self) -> Cell {
        self.goal
    }

    pub fn mode(&self) -> NavMode {
        self.mode
    }

    pub fn wait_count(&self) -> u32 {
        self.wait_count
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Make one decision against the current cost field.
    ///
    /// Returns the plan consulted this tick (empty when none applied) so
    /// the caller can surface it to observers.
    pub fn advance(
        &mut self,
        field: &CostField,
        planner: &Planner,
        frontiers: &FrontierFinder,
        belief: &BeliefMap,
    ) -> Vec<Cell> {
        if self.mode.is_terminal() {
            return Vec::new();
        }
        if self.cell == self.goal {
            self.mode = NavMode::GoalReached;
            return Vec::new();
        }

        // First choice: a path to the goal.
        let plan = planner.search(field, self.cell, self.goal);
        if plan.len() >= 2 {
            let next = plan[1];
            if field.is_blocked(next) {
                // The latest belief closed the cell the plan steps into.
                log::debug!("next cell {} blocked under current belief, holding", next);
                self.hold();
            } else {
                self.step_forward(next);
                self.mode = if self.cell == self.goal {
                    log::info!("goal {} reached", self.goal);
                    NavMode::GoalReached
                } else {
                    NavMode::Seeking
                };
            }
            return plan;
        }

        // Goal unreachable under current belief: explore the nearest
        // reachable frontier instead.
        let candidates = frontiers.find(belief, self.cell, field.config().p_block);
        for target in candidates {
            let frontier_plan = planner.search(field, self.cell, target);
            if frontier_plan.len() >= 2 {
                self.step_forward(frontier_plan[1]);
                self.mode = if self.cell == self.goal {
                    NavMode::GoalReached
                } else {
                    NavMode::Exploring
                };
                return frontier_plan;
            }
        }

        // No goal path and no reachable frontier.
        self.hold();
        Vec::new()
    }

    /// Step into an adjacent cell, recording the old cell in the history.
    fn step_forward(&mut self, next: Cell) {
        if self.config.history_limit > 0 && self.history.len() >= self.config.history_limit {
            self.history.pop_front();
        }
        self.history.push_back(self.cell);
        self.cell = next;
        self.wait_count = 0;
    }

    /// Count a stepless tick; at the threshold, retreat or give up.
    fn hold(&mut self) {
        self.wait_count += 1;
        if self.wait_count >= self.config.max_wait {
            match self.history.pop_back() {
                Some(previous) => {
                    log::info!(
                        "no progress after {} waits, backtracking from {} to {}",
                        self.wait_count,
                        self.cell,
                        previous
                    );
                    self.cell = previous;
                    self.wait_count = 0;
                    self.mode = NavMode::Backtracking;
                }
                None => {
                    log::warn!("cornered at {} with empty history, giving up", self.cell);
                    self.mode = NavMode::Stuck;
                }
            }
        } else {
            self.mode = NavMode::Waiting;
        }
    }
}
